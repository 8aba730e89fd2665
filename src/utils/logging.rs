/// 日志工具模块
///
/// 提供日志初始化和输出的辅助函数
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// 初始化日志
///
/// 优先使用 `RUST_LOG`，否则按 `verbose` 选择 debug / info
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
///
/// # 参数
/// - `model_name`: 使用的模型
/// - `strict_parsing`: 是否严格解析
/// - `config_file`: 加载的配置文件，`None` 表示只用默认值和环境变量
pub fn log_startup(model_name: &str, strict_parsing: bool, config_file: Option<&str>) {
    info!("{}", "=".repeat(60));
    info!("🚀 试卷生成器启动 - {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));
    match config_file {
        Some(path) => info!("📁 已加载配置文件: {}", path),
        None => debug!("未找到配置文件，使用默认配置和环境变量"),
    }
    info!("🤖 模型: {}", model_name);
    info!("📋 解析模式: {}", if strict_parsing { "严格" } else { "宽松" });
    info!("{}", "=".repeat(60));
}

/// 记录试卷生成结果
///
/// # 参数
/// - `topics`: 主题
/// - `requested`: 请求的题目数量
/// - `generated`: 实际解析出的题目数量
pub fn log_exam_generated(topics: &str, requested: u32, generated: usize) {
    info!("✓ 已生成试卷 [{}]: {}/{} 道题", truncate_text(topics, 40), generated, requested);
}

/// 记录考试完成信息
///
/// # 参数
/// - `correct`: 答对数量
/// - `total`: 题目总数
/// - `percentage`: 正确率
pub fn log_exam_finished(correct: usize, total: usize, percentage: f64) {
    info!("\n{}", "─".repeat(60));
    info!(
        "📊 考试完成 - {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("✅ 答对: {}/{} ({:.2}%)", correct, total, percentage);
    info!("{}", "─".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
