//! 考试会话 - 流程层
//!
//! 保存一次考试的全部状态：题目、作答记录、当前界面、当前题号、解释缓存

use std::collections::HashMap;
use std::fmt::Display;

use crate::models::{ExamPage, Question};

/// 考试成绩
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExamScore {
    pub total: usize,
    pub correct: usize,
    /// 正确率（0-100）
    pub percentage: f64,
}

impl Display for ExamScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{} ({:.2}%)", self.correct, self.total, self.percentage)
    }
}

/// 考试会话
///
/// 由 `App` 独占持有；生成新试卷或重置时清空
#[derive(Debug, Default)]
pub struct ExamSession {
    questions: Option<Vec<Question>>,
    /// 题目位置 → 选中的选项
    answers: HashMap<usize, usize>,
    current_page: ExamPage,
    current_question: usize,
    /// 题目 ID → 模型给出的解释
    clarifications: HashMap<u32, String>,
}

impl ExamSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn questions(&self) -> Option<&[Question]> {
        self.questions.as_deref()
    }

    /// 题目数量（没有试卷时为 0）
    pub fn question_count(&self) -> usize {
        self.questions.as_ref().map_or(0, Vec::len)
    }

    /// 替换为新生成的试卷，旧的作答和解释一并清空
    pub fn set_questions(&mut self, questions: Vec<Question>) {
        self.questions = Some(questions);
        self.answers.clear();
        self.clarifications.clear();
        self.current_question = 0;
    }

    pub fn add_answer(&mut self, question_index: usize, answer_index: usize) {
        self.answers.insert(question_index, answer_index);
    }

    pub fn get_answer(&self, question_index: usize) -> Option<usize> {
        self.answers.get(&question_index).copied()
    }

    pub fn current_page(&self) -> ExamPage {
        self.current_page
    }

    pub fn change_page(&mut self, page: ExamPage) {
        self.current_page = page;
    }

    pub fn current_question_index(&self) -> usize {
        self.current_question
    }

    /// 当前题目
    pub fn current_question(&self) -> Option<&Question> {
        self.questions
            .as_ref()
            .and_then(|questions| questions.get(self.current_question))
    }

    /// 跳到指定题目，超出范围时返回 false
    pub fn change_question(&mut self, index: usize) -> bool {
        if index < self.question_count() {
            self.current_question = index;
            true
        } else {
            false
        }
    }

    pub fn has_previous(&self) -> bool {
        self.current_question > 0
    }

    pub fn has_next(&self) -> bool {
        self.current_question + 1 < self.question_count()
    }

    pub fn clarification(&self, question_id: u32) -> Option<&str> {
        self.clarifications.get(&question_id).map(String::as_str)
    }

    pub fn cache_clarification(&mut self, question_id: u32, clarification: String) {
        self.clarifications.insert(question_id, clarification);
    }

    /// 计算成绩：没有作答、或题目没有识别出正确答案，都算答错
    pub fn score(&self) -> ExamScore {
        let questions = self.questions.as_deref().unwrap_or_default();
        let correct = questions
            .iter()
            .enumerate()
            .filter(|(index, question)| {
                self.get_answer(*index)
                    .is_some_and(|answer| question.is_correct(answer))
            })
            .count();

        let total = questions.len();
        let percentage = if total == 0 {
            0.0
        } else {
            correct as f64 / total as f64 * 100.0
        };

        ExamScore {
            total,
            correct,
            percentage,
        }
    }

    /// 重置会话，回到生成试卷界面
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
