use std::fmt::Display;

/// 当前显示的界面
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExamPage {
    /// 生成试卷
    #[default]
    GenerateExam,
    /// 答题
    Questions,
    /// 成绩
    Results,
}

impl Display for ExamPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let title = match self {
            ExamPage::GenerateExam => "生成试卷",
            ExamPage::Questions => "答题",
            ExamPage::Results => "成绩",
        };
        write!(f, "{}", title)
    }
}
