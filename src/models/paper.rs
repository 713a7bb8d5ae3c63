use serde::Serialize;

use super::question::QuestionRecord;

/// 组好的试卷
///
/// 只在内存中存在，不入库。题目按 easy → medium → hard 的处理顺序排列
#[derive(Debug, Clone, Serialize)]
pub struct QuestionPaper {
    pub topic: String,
    pub questions: Vec<QuestionRecord>,
}

impl QuestionPaper {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            questions: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}
