use anyhow::Result;
use exam_generator::utils::logging;
use exam_generator::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置（配置来源在日志初始化后由 App 输出）
    let config = Config::load()?;

    // 初始化日志
    logging::init(config.verbose_logging);

    // 初始化并运行应用
    App::initialize(config)?.run().await?;

    Ok(())
}
