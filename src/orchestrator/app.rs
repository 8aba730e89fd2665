//! 应用主流程 - 编排层
//!
//! ## 职责
//!
//! 持有配置、服务和考试会话，按当前界面循环渲染：
//!
//! 1. **生成试卷**：读取主题和数量，调用 `ExamService` 生成题目
//! 2. **答题**：逐题显示，记录选择，前后翻页
//! 3. **成绩**：统计正确率，标出正确/错误答案，按需请求解释
//!
//! 每个界面一个渲染函数，输入按行读取，每次操作只执行一条调用链

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::AppError;
use crate::models::{answer_letter, ExamPage, Question};
use crate::services::prompt::{
    ExamRequest, DEFAULT_ANSWERS, DEFAULT_QUESTIONS, MAX_ANSWERS, MAX_QUESTIONS, MIN_ANSWERS,
    MIN_QUESTIONS,
};
use crate::services::{
    DocumentService, ExamService, LlmService, MdPdfConverter, ParseMode, PdfConverter,
    TextCompleter,
};
use crate::utils::logging::{log_exam_finished, log_exam_generated, log_startup};
use crate::workflow::ExamSession;

const DESCRIPTION: &str = "\
本程序借助大语言模型，根据任意主题生成选择题试卷。可以把题目导出为 PDF，也可以直接在这里答题。
生成的题目质量取决于主题，如果对某道题的答案有疑问，可以在成绩界面请求模型解释。
本程序仅用于学习练习，不适合用于正式考试。";

/// 每次渲染后的去向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// 应用主结构
pub struct App<C, P, R> {
    config: Config,
    exam_service: ExamService<C>,
    document_service: DocumentService<P>,
    session: ExamSession,
    input: Lines<R>,
}

impl App<LlmService, MdPdfConverter, BufReader<Stdin>> {
    /// 使用真实的 LLM 服务、`mdpdf` 和标准输入初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        config.validate().map_err(AppError::from)?;

        log_startup(
            &config.llm_model_name,
            config.strict_parsing,
            config.config_file.as_deref(),
        );

        let completer = LlmService::new(&config);
        let converter = MdPdfConverter::new(&config);
        let input = BufReader::new(tokio::io::stdin());

        Self::with_parts(config, completer, converter, input)
    }
}

impl<C, P, R> App<C, P, R>
where
    C: TextCompleter,
    P: PdfConverter,
    R: AsyncBufRead + Unpin,
{
    pub fn with_parts(config: Config, completer: C, converter: P, input: R) -> Result<Self> {
        let mode = ParseMode::from_strict(config.strict_parsing);
        Ok(Self {
            exam_service: ExamService::new(completer, mode)?,
            document_service: DocumentService::new(converter),
            session: ExamSession::new(),
            input: input.lines(),
            config,
        })
    }

    pub fn session(&self) -> &ExamSession {
        &self.session
    }

    pub fn exam_service(&self) -> &ExamService<C> {
        &self.exam_service
    }

    pub fn document_service(&self) -> &DocumentService<P> {
        &self.document_service
    }

    /// 运行应用主循环，直到用户退出或输入结束
    pub async fn run(&mut self) -> Result<()> {
        loop {
            let flow = match self.session.current_page() {
                ExamPage::GenerateExam => self.render_generate_exam().await?,
                ExamPage::Questions => self.render_questions().await?,
                ExamPage::Results => self.render_results().await?,
            };

            if flow == Flow::Exit {
                info!("👋 程序退出");
                return Ok(());
            }
        }
    }

    // ========== 生成试卷 ==========

    async fn render_generate_exam(&mut self) -> Result<Flow> {
        print_title(ExamPage::GenerateExam);

        if self.session.questions().is_none() {
            println!("{}\n", DESCRIPTION);
            return self.generate_exam().await;
        }

        println!(
            "已生成包含 {} 道题的试卷，可以导出为 PDF，也可以直接开始答题。",
            self.session.question_count()
        );

        let Some(command) = self
            .read_line("[s] 开始答题  [d] 导出 PDF  [g] 重新生成  [q] 退出 > ")
            .await?
        else {
            return Ok(Flow::Exit);
        };

        match command.as_str() {
            "s" => {
                if self.session.question_count() == 0 {
                    println!("⚠️ 没有可以作答的题目，请重新生成");
                } else {
                    self.session.change_question(0);
                    self.session.change_page(ExamPage::Questions);
                }
            }
            "d" => self.export_pdf().await,
            "g" => return self.generate_exam().await,
            "q" => return Ok(Flow::Exit),
            other => println!("未知命令: {}", other),
        }

        Ok(Flow::Continue)
    }

    /// 读取参数并生成试卷；失败时保留原有的试卷
    async fn generate_exam(&mut self) -> Result<Flow> {
        let Some(topics) = self.read_line("主题（建议用逗号分隔）> ").await? else {
            return Ok(Flow::Exit);
        };
        let Some(number_of_questions) = self
            .read_number("题目数量", DEFAULT_QUESTIONS, MIN_QUESTIONS, MAX_QUESTIONS)
            .await?
        else {
            return Ok(Flow::Exit);
        };
        let Some(number_of_answers) = self
            .read_number("选项数量", DEFAULT_ANSWERS, MIN_ANSWERS, MAX_ANSWERS)
            .await?
        else {
            return Ok(Flow::Exit);
        };

        let request = ExamRequest::new(topics, number_of_questions, number_of_answers);

        println!("⏳ 正在生成题目，可能需要一些时间...");
        match self.exam_service.get_questions(&request).await {
            Ok(questions) => {
                log_exam_generated(&request.topics, request.number_of_questions, questions.len());
                self.session.set_questions(questions);
            }
            Err(e) => {
                error!("❌ 生成题目失败: {:#}", e);
                println!("⚠️ 生成题目时出错，请重试");
            }
        }

        Ok(Flow::Continue)
    }

    // ========== 答题 ==========

    async fn render_questions(&mut self) -> Result<Flow> {
        print_title(ExamPage::Questions);

        let index = self.session.current_question_index();
        let Some(question) = self.session.current_question().cloned() else {
            // 没有题目时回到生成界面
            self.session.change_page(ExamPage::GenerateExam);
            return Ok(Flow::Continue);
        };

        println!("第 {}/{} 题", index + 1, self.session.question_count());
        print_question(&question, self.session.get_answer(index));

        let mut commands = Vec::new();
        if !question.answers.is_empty() {
            commands.push(format!("[a-{}] 选择答案", answer_letter(question.answers.len() - 1)));
        }
        if self.session.has_previous() {
            commands.push("[p] 上一题".to_string());
        }
        if self.session.has_next() {
            commands.push("[n] 下一题".to_string());
        }
        commands.push("[f] 交卷".to_string());
        commands.push("[q] 退出".to_string());

        let Some(command) = self.read_line(&format!("{} > ", commands.join("  "))).await? else {
            return Ok(Flow::Exit);
        };

        match command.as_str() {
            "p" if self.session.has_previous() => {
                self.session.change_question(index - 1);
            }
            "n" if self.session.has_next() => {
                self.session.change_question(index + 1);
            }
            "f" => self.finish_exam(),
            "q" => return Ok(Flow::Exit),
            other => match parse_answer(other, question.answers.len()) {
                Some(answer) => self.session.add_answer(index, answer),
                None => println!("无效的输入: {}", other),
            },
        }

        Ok(Flow::Continue)
    }

    fn finish_exam(&mut self) {
        let score = self.session.score();
        log_exam_finished(score.correct, score.total, score.percentage);
        self.session.change_page(ExamPage::Results);
    }

    // ========== 成绩 ==========

    async fn render_results(&mut self) -> Result<Flow> {
        print_title(ExamPage::Results);

        let score = self.session.score();
        println!("题目数量: {}", score.total);
        println!("答对数量: {}", score.correct);
        println!("正确率: {:.2}%\n", score.percentage);

        for (index, question) in self.session.questions().unwrap_or_default().iter().enumerate() {
            print_result(question, self.session.get_answer(index));
        }

        let Some(command) = self
            .read_line("[c <题号>] 解释题目  [d] 导出 PDF  [r] 生成新试卷  [q] 退出 > ")
            .await?
        else {
            return Ok(Flow::Exit);
        };

        match command.split_whitespace().collect::<Vec<_>>().as_slice() {
            ["c", id] => match id.parse::<u32>() {
                Ok(id) => self.clarify(id).await,
                Err(_) => println!("无效的题号: {}", id),
            },
            ["d"] => self.export_pdf().await,
            ["r"] => self.session.reset(),
            ["q"] => return Ok(Flow::Exit),
            _ => println!("未知命令: {}", command),
        }

        Ok(Flow::Continue)
    }

    /// 显示题目解释，同一道题只请求一次
    async fn clarify(&mut self, question_id: u32) {
        if let Some(clarification) = self.session.clarification(question_id) {
            println!("\n{}\n", clarification);
            return;
        }

        let Some(question) = self
            .session
            .questions()
            .and_then(|questions| questions.iter().find(|q| q.id == question_id))
            .cloned()
        else {
            println!("没有第 {} 题", question_id);
            return;
        };

        println!("⏳ 正在请求解释，可能需要一些时间...");
        match self.exam_service.clarify_question(&question).await {
            Ok(clarification) => {
                println!("\n{}\n", clarification);
                self.session.cache_clarification(question_id, clarification);
            }
            Err(e) => {
                warn!("⚠️ 请求解释失败: {:#}", e);
                println!("⚠️ 请求解释时出错，请重试");
            }
        }
    }

    // ========== 公共操作 ==========

    async fn export_pdf(&self) {
        let output = PathBuf::from(&self.config.output_pdf_file);
        let questions = self.session.questions().unwrap_or_default();

        match self.document_service.export_pdf(questions, &output).await {
            Ok(contents) => println!("📄 已导出到 {} ({} 字节)", output.display(), contents.len()),
            Err(e) => {
                warn!("⚠️ 导出 PDF 失败: {:#}", e);
                println!("⚠️ 导出 PDF 失败: {:#}", e);
            }
        }
    }

    /// 读取一行输入，输入结束时返回 None
    async fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        print!("{}", prompt);
        std::io::stdout().flush()?;

        let line = self.input.next_line().await?;
        Ok(line.map(|line| line.trim().to_string()))
    }

    /// 读取范围内的数字，空输入使用默认值，超出范围时重新输入
    async fn read_number(&mut self, label: &str, default: u32, min: u32, max: u32) -> Result<Option<u32>> {
        loop {
            let prompt = format!("{} ({}-{}, 默认 {}) > ", label, min, max, default);
            let Some(line) = self.read_line(&prompt).await? else {
                return Ok(None);
            };

            if line.is_empty() {
                return Ok(Some(default));
            }

            match line.parse::<u32>() {
                Ok(value) if (min..=max).contains(&value) => return Ok(Some(value)),
                _ => println!("请输入 {} 到 {} 之间的数字", min, max),
            }
        }
    }
}

/// 解析选择的答案：字母（a、b……）或序号（1、2……）
fn parse_answer(input: &str, answer_count: usize) -> Option<usize> {
    let mut chars = input.chars();
    let index = match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => (c.to_ascii_lowercase() as u8 - b'a') as usize,
        _ => input.parse::<usize>().ok()?.checked_sub(1)?,
    };

    (index < answer_count).then_some(index)
}

fn print_title(page: ExamPage) {
    println!("\n{}\n{}\n{}", "=".repeat(60), page, "=".repeat(60));
}

fn print_question(question: &Question, selected: Option<usize>) {
    println!("{}. {}", question.id, question.text);

    if question.answers.is_empty() {
        println!("  （这道题没有选项）");
    }

    for (index, answer) in question.answers.iter().enumerate() {
        let marker = if selected == Some(index) { "●" } else { "○" };
        println!("  {} {}) {}", marker, answer_letter(index), answer);
    }
}

fn print_result(question: &Question, user_answer: Option<usize>) {
    println!("{}. {}", question.id, question.text);

    for (index, answer) in question.answers.iter().enumerate() {
        let marker = if question.is_correct(index) {
            "✅"
        } else if user_answer == Some(index) {
            "❌"
        } else {
            "  "
        };
        println!("  {} {}) {}", marker, answer_letter(index), answer);
    }

    if question.correct_answer.is_none() {
        println!("  （未识别出正确答案）");
    }
    if user_answer.is_none() {
        println!("  （未作答）");
    }
    println!();
}
