//! LLM 响应解析
//!
//! 把模型返回的 Markdown 风格文本转换为 `Question` 列表：
//! - 题目之间用空行分隔
//! - 每块第一行是题干，可能带 "1." 之类的编号
//! - 其余每行是一个选项，可能带 "a)" / "B." 之类的字母
//! - 正确答案用 `**` 包围，只认第一个出现 `**` 的选项

use regex::Regex;
use tracing::{debug, warn};

use crate::models::Question;

/// 正确答案的加粗标记
pub const BOLD_MARKER: &str = "**";

/// 解析模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// 保留不完整的题目（没有选项或没有正确答案）
    #[default]
    Permissive,
    /// 丢弃不完整的题目，不占用编号
    Strict,
}

impl ParseMode {
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            ParseMode::Strict
        } else {
            ParseMode::Permissive
        }
    }
}

/// 响应解析器
pub struct ResponseParser {
    mode: ParseMode,
    /// 题干开头的 "数字."
    question_marker: Regex,
    /// 选项开头的 "a)" / "a."，允许整行加粗的 "**a)"
    answer_marker: Regex,
}

impl ResponseParser {
    pub fn new(mode: ParseMode) -> Result<Self, regex::Error> {
        Ok(Self {
            mode,
            question_marker: Regex::new(r"^\s*[0-9]+\.")?,
            answer_marker: Regex::new(r"^\s*(\*\*)?\s*[a-eA-E][).]")?,
        })
    }

    /// 把 LLM 的响应转换为题目列表
    pub fn parse(&self, response: &str) -> Vec<Question> {
        let normalized = response.replace("\r\n", "\n");
        let mut questions = Vec::new();
        let mut count: u32 = 1;

        for block in normalized.split("\n\n") {
            let block = block.trim();
            if block.is_empty() {
                continue;
            }

            let question = self.parse_block(count, block);

            if self.mode == ParseMode::Strict && !question.is_well_formed() {
                warn!(
                    "⚠️ 丢弃不完整的题目: {} (选项 {} 个, 正确答案: {:?})",
                    question.text,
                    question.answers.len(),
                    question.correct_answer
                );
                continue;
            }

            questions.push(question);
            count += 1;
        }

        debug!("解析出 {} 道题目", questions.len());

        questions
    }

    /// 解析单个题目块
    fn parse_block(&self, id: u32, block: &str) -> Question {
        let mut lines = block.lines();
        let text = lines
            .next()
            .map(|line| self.question_marker.replacen(line, 1, " ").trim().to_string())
            .unwrap_or_default();

        // 去掉字母时保留前面的加粗标记，正确答案仍然能被识别
        let mut answers: Vec<String> = lines
            .map(|line| self.answer_marker.replacen(line, 1, "${1} ").into_owned())
            .collect();

        let correct_answer = find_correct_answer(&answers);
        if let Some(index) = correct_answer {
            answers[index] = answers[index].replace(BOLD_MARKER, "");
        }

        let answers = answers
            .into_iter()
            .map(|answer| answer.trim().to_string())
            .collect();

        Question::new(id, text, answers, correct_answer)
    }
}

/// 第一个包含加粗标记的选项索引
fn find_correct_answer(answers: &[String]) -> Option<usize> {
    answers.iter().position(|answer| answer.contains(BOLD_MARKER))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str = "1. Capital of France?\na) Berlin\nb) **Paris**\nc) Rome\n\n2. 2+2=?\na) 3\nb) 4\nc) **5**";

    fn parse(response: &str, mode: ParseMode) -> Vec<Question> {
        ResponseParser::new(mode).unwrap().parse(response)
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_example_response() {
        let questions = parse(EXAMPLE, ParseMode::Permissive);

        assert_eq!(questions.len(), 2);
        assert_eq!(
            questions[0],
            Question::new(1, "Capital of France?", strings(&["Berlin", "Paris", "Rome"]), Some(1))
        );
        assert_eq!(
            questions[1],
            Question::new(2, "2+2=?", strings(&["3", "4", "5"]), Some(2))
        );
    }

    #[test]
    fn test_strip_question_number() {
        let questions = parse("3. What is 2+2?\na) 4", ParseMode::Permissive);
        assert_eq!(questions[0].text, "What is 2+2?");
    }

    #[test]
    fn test_question_without_number_left_intact() {
        let questions = parse("What is 2+2?\na) 4", ParseMode::Permissive);
        assert_eq!(questions[0].text, "What is 2+2?");
    }

    #[test]
    fn test_strip_answer_letters() {
        let questions = parse(
            "Q?\nb) Paris\nc. London\nA) Madrid\nf) Lisbon\nBerlin",
            ParseMode::Permissive,
        );
        assert_eq!(
            questions[0].answers,
            strings(&["Paris", "London", "Madrid", "f) Lisbon", "Berlin"])
        );
    }

    #[test]
    fn test_bold_answer_is_stripped() {
        let questions = parse("Q?\n3\n**4**\n5", ParseMode::Permissive);
        assert_eq!(questions[0].correct_answer, Some(1));
        assert_eq!(questions[0].answers, strings(&["3", "4", "5"]));
    }

    #[test]
    fn test_whole_line_bold_answer() {
        let questions = parse(
            "1. Capital of France?\na) Berlin\n**b) Paris**\nc) Rome",
            ParseMode::Permissive,
        );
        assert_eq!(questions[0].answers, strings(&["Berlin", "Paris", "Rome"]));
        assert_eq!(questions[0].correct_answer, Some(1));
    }

    #[test]
    fn test_no_bold_answer() {
        let questions = parse("Q?\na) 3\nb) 4", ParseMode::Permissive);
        assert_eq!(questions[0].correct_answer, None);
        assert_eq!(questions[0].correct_answer_index(), -1);
        assert_eq!(questions[0].answers, strings(&["3", "4"]));
    }

    #[test]
    fn test_first_bold_answer_wins() {
        let questions = parse("Q?\na) **3**\nb) **4**", ParseMode::Permissive);
        assert_eq!(questions[0].correct_answer, Some(0));
        // 只清理被选中的那个选项
        assert_eq!(questions[0].answers, strings(&["3", "**4**"]));
    }

    #[test]
    fn test_empty_blocks_do_not_consume_ids() {
        let response = "\n\n1. A?\na) **x**\n\n   \n\n\n\n2. B?\na) **y**\n\n\n";
        let questions = parse(response, ParseMode::Permissive);
        let ids: Vec<u32> = questions.iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(questions[1].text, "B?");
    }

    #[test]
    fn test_block_without_answers() {
        let questions = parse("1. Lonely question?", ParseMode::Permissive);
        assert_eq!(questions.len(), 1);
        assert!(questions[0].answers.is_empty());
        assert_eq!(questions[0].correct_answer, None);
    }

    #[test]
    fn test_crlf_line_endings() {
        let questions = parse(&EXAMPLE.replace('\n', "\r\n"), ParseMode::Permissive);
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[1].answers, strings(&["3", "4", "5"]));
    }

    #[test]
    fn test_strict_mode_drops_incomplete_blocks() {
        let response = "1. No answers?\n\n2. No bold?\na) x\nb) y\n\n3. Good?\na) **z**\nb) w";
        let permissive = parse(response, ParseMode::Permissive);
        assert_eq!(permissive.len(), 3);

        let strict = parse(response, ParseMode::Strict);
        assert_eq!(strict.len(), 1);
        assert_eq!(strict[0].id, 1);
        assert_eq!(strict[0].text, "Good?");
        assert_eq!(strict[0].correct_answer, Some(0));
    }

    #[test]
    fn test_empty_response() {
        assert!(parse("", ParseMode::Permissive).is_empty());
        assert!(parse(" \n\n \n", ParseMode::Strict).is_empty());
    }
}
