//! 提示词构建
//!
//! 生成试卷和解释题目时发送给 LLM 的固定模板

use crate::models::{answer_letter, Question};

/// 题目数量下限
pub const MIN_QUESTIONS: u32 = 5;
/// 题目数量上限
pub const MAX_QUESTIONS: u32 = 30;
/// 默认题目数量
pub const DEFAULT_QUESTIONS: u32 = 10;
/// 选项数量下限
pub const MIN_ANSWERS: u32 = 3;
/// 选项数量上限
pub const MAX_ANSWERS: u32 = 5;
/// 默认选项数量
pub const DEFAULT_ANSWERS: u32 = 4;

/// 生成试卷的参数
///
/// 数量范围由调用方（界面）负责检查，这里不做校验
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamRequest {
    /// 主题（建议用逗号分隔）
    pub topics: String,
    pub number_of_questions: u32,
    pub number_of_answers: u32,
}

impl ExamRequest {
    pub fn new(topics: impl Into<String>, number_of_questions: u32, number_of_answers: u32) -> Self {
        Self {
            topics: topics.into(),
            number_of_questions,
            number_of_answers,
        }
    }

    /// 数量是否在允许范围内
    pub fn is_within_bounds(&self) -> bool {
        (MIN_QUESTIONS..=MAX_QUESTIONS).contains(&self.number_of_questions)
            && (MIN_ANSWERS..=MAX_ANSWERS).contains(&self.number_of_answers)
    }
}

/// 构建生成试卷的提示词
pub fn prepare_prompt(topics: &str, number_of_questions: u32, number_of_answers: u32) -> String {
    format!(
        "Create an exam of multiple choice questions with {} questions and {} of possible answers in each question. \
         Put the correct answer in bold (surrounded by **) in its original spot. \
         The exam should be about {}. Only generate the questions and answers, not the exam itself.",
        number_of_questions, number_of_answers, topics
    )
}

/// 构建解释题目的提示词
///
/// 没有识别出正确答案时，改为让模型自己判断哪个选项正确
pub fn prepare_clarification_prompt(question: &Question) -> String {
    let joined_answers = question
        .answers
        .iter()
        .enumerate()
        .map(|(i, answer)| format!("{}. {}", answer_letter(i), answer))
        .collect::<Vec<_>>()
        .join("\n");

    let mut prompt = format!("Given this question: {}\n", question.text);
    prompt.push_str(&format!(" and these answers: {}\n\n", joined_answers));

    match question.correct_answer {
        Some(index) => prompt.push_str(&format!("Why the correct answer is {}?\n\n", answer_letter(index))),
        None => prompt.push_str("Which of the answers is correct and why?\n\n"),
    }

    prompt
}
