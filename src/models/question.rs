use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// 没有找到正确答案时的索引
pub const CORRECT_ANSWER_NOT_FOUND: i64 = -1;

/// 一道选择题
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// 题目编号（同一次生成中从 1 开始连续编号）
    pub id: u32,
    /// 题干
    pub text: String,
    /// 选项
    pub answers: Vec<String>,
    /// 正确答案在 `answers` 中的索引，序列化时 `None` 写作 -1
    #[serde(serialize_with = "serialize_index", deserialize_with = "deserialize_index")]
    pub correct_answer: Option<usize>,
}

impl Question {
    pub fn new(id: u32, text: impl Into<String>, answers: Vec<String>, correct_answer: Option<usize>) -> Self {
        Self {
            id,
            text: text.into(),
            answers,
            correct_answer,
        }
    }

    /// 正确答案索引，没有找到时返回 -1
    pub fn correct_answer_index(&self) -> i64 {
        self.correct_answer
            .map(|index| index as i64)
            .unwrap_or(CORRECT_ANSWER_NOT_FOUND)
    }

    /// 正确答案文本
    pub fn correct_answer_text(&self) -> Option<&str> {
        self.correct_answer
            .and_then(|index| self.answers.get(index))
            .map(String::as_str)
    }

    /// 是否是完整的题目（有选项，且正确答案在选项范围内）
    pub fn is_well_formed(&self) -> bool {
        !self.answers.is_empty() && self.correct_answer_text().is_some()
    }

    pub fn is_correct(&self, answer_index: usize) -> bool {
        self.correct_answer == Some(answer_index)
    }
}

/// 选项字母：0 → 'a'，1 → 'b'……
pub fn answer_letter(index: usize) -> char {
    (b'a' + (index % 26) as u8) as char
}

fn serialize_index<S>(value: &Option<usize>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_i64(value.map(|v| v as i64).unwrap_or(CORRECT_ANSWER_NOT_FOUND))
}

fn deserialize_index<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = i64::deserialize(deserializer)?;
    Ok(usize::try_from(value).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Question {
        Question::new(
            1,
            "Capital of France?",
            vec!["Berlin".to_string(), "Paris".to_string(), "Rome".to_string()],
            Some(1),
        )
    }

    #[test]
    fn test_correct_answer_index() {
        let question = sample();
        assert_eq!(question.correct_answer_index(), 1);
        assert_eq!(question.correct_answer_text(), Some("Paris"));
        assert!(question.is_correct(1));
        assert!(!question.is_correct(0));

        let missing = Question::new(2, "?", vec!["x".to_string()], None);
        assert_eq!(missing.correct_answer_index(), CORRECT_ANSWER_NOT_FOUND);
        assert_eq!(missing.correct_answer_text(), None);
        assert!(!missing.is_well_formed());
    }

    #[test]
    fn test_serialized_sentinel() {
        let missing = Question::new(3, "?", vec![], None);
        let json = serde_json::to_value(&missing).unwrap();
        assert_eq!(json["correct_answer"], -1);

        let parsed: Question = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.correct_answer, None);

        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["correct_answer"], 1);
    }

    #[test]
    fn test_answer_letter() {
        assert_eq!(answer_letter(0), 'a');
        assert_eq!(answer_letter(4), 'e');
    }
}
