//! 文档导出服务 - 业务能力层
//!
//! 题目 → Markdown → 外部转换程序 → PDF

use std::future::Future;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{AppError, ExportError};
use crate::models::Question;

/// 未勾选的清单项前缀
pub const CHECKBOX_PREFIX: &str = "- [ ] ";
/// 页脚模板（右下角显示页码）
pub const FOOTER_TEMPLATE: &str = ",,{page}";
/// 纸张大小
pub const PAPER_SIZE: &str = "A4";

/// 把题目转换为 Markdown
///
/// 题干加粗，选项写成未勾选的清单项；不做转义
pub fn questions_to_markdown(questions: &[Question]) -> String {
    let mut markdown = String::new();

    for (index, question) in questions.iter().enumerate() {
        markdown.push_str(&format!("**{}. {}**\n\n", index + 1, question.text));

        for answer in &question.answers {
            markdown.push_str(CHECKBOX_PREFIX);
            markdown.push_str(answer);
            markdown.push('\n');
        }

        markdown.push('\n');
    }

    markdown
}

/// 从导出的 Markdown 中统计每道题的选项数量
pub fn answers_per_question(markdown: &str) -> Vec<usize> {
    let mut counts = Vec::new();

    for line in markdown.lines() {
        if line.starts_with("**") {
            counts.push(0);
        } else if line.starts_with(CHECKBOX_PREFIX) {
            if let Some(count) = counts.last_mut() {
                *count += 1;
            }
        }
    }

    counts
}

/// Markdown 转 PDF 的能力
pub trait PdfConverter {
    /// 把 Markdown 转换为 PDF，写入 `output`
    fn convert(&self, markdown: &str, output: &Path) -> impl Future<Output = Result<()>> + Send;
}

/// 调用外部 `mdpdf` 程序的转换器
pub struct MdPdfConverter {
    program: String,
    temp_markdown_file: PathBuf,
}

impl MdPdfConverter {
    pub fn new(config: &Config) -> Self {
        Self {
            program: config.pdf_converter_bin.clone(),
            temp_markdown_file: PathBuf::from(&config.temp_markdown_file),
        }
    }

    /// 执行转换程序（临时文件已写好）
    async fn run_converter(&self, output: &Path) -> Result<(), ExportError> {
        let result = Command::new(&self.program)
            .arg(&self.temp_markdown_file)
            .arg("--output")
            .arg(output)
            .arg("--footer")
            .arg(FOOTER_TEMPLATE)
            .arg("--paper")
            .arg(PAPER_SIZE)
            .output()
            .await
            .map_err(|source| ExportError::SpawnFailed {
                program: self.program.clone(),
                source,
            })?;

        if !result.status.success() {
            return Err(ExportError::ConverterFailed {
                program: self.program.clone(),
                status: result.status.to_string(),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }

        Ok(())
    }
}

impl PdfConverter for MdPdfConverter {
    async fn convert(&self, markdown: &str, output: &Path) -> Result<()> {
        fs::write(&self.temp_markdown_file, markdown)
            .await
            .with_context(|| format!("无法写入临时文件: {}", self.temp_markdown_file.display()))?;

        debug!(
            "执行 {} {} --output {}",
            self.program,
            self.temp_markdown_file.display(),
            output.display()
        );
        let result = self.run_converter(output).await;

        // 无论转换是否成功都删除临时文件
        if let Err(e) = fs::remove_file(&self.temp_markdown_file).await {
            warn!(
                "删除临时文件失败 {}: {}",
                self.temp_markdown_file.display(),
                e
            );
        }

        result.map_err(AppError::from)?;
        Ok(())
    }
}

/// 文档导出服务
pub struct DocumentService<P> {
    converter: P,
}

impl<P: PdfConverter> DocumentService<P> {
    pub fn new(converter: P) -> Self {
        Self { converter }
    }

    pub fn converter(&self) -> &P {
        &self.converter
    }

    /// 导出 PDF，返回文件内容
    pub async fn export_pdf(&self, questions: &[Question], output: &Path) -> Result<Vec<u8>> {
        if questions.is_empty() {
            return Err(AppError::from(ExportError::NoQuestions).into());
        }

        let markdown = questions_to_markdown(questions);
        self.converter.convert(&markdown, output).await?;

        let contents = fs::read(output)
            .await
            .with_context(|| format!("无法读取导出的 PDF: {}", output.display()))?;

        info!(
            "📄 已导出 {} 道题到 {} ({} 字节)",
            questions.len(),
            output.display(),
            contents.len()
        );

        Ok(contents)
    }
}
