use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// 题目记录
///
/// 字段名与生成提示词里的输出格式保持一致，同时也是 MongoDB 文档的键名
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionRecord {
    /// 入库后由存储分配
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    #[serde(rename = "Question Number", deserialize_with = "deserialize_question_number")]
    pub question_number: String,

    #[serde(rename = "Topic", default)]
    pub topic: String,

    #[serde(rename = "Question Text")]
    pub question_text: String,

    #[serde(rename = "Option A")]
    pub option_a: String,
    #[serde(rename = "Option B")]
    pub option_b: String,
    #[serde(rename = "Option C")]
    pub option_c: String,
    #[serde(rename = "Option D")]
    pub option_d: String,

    #[serde(rename = "Correct Answer")]
    pub correct_answer: String,

    #[serde(rename = "Explanation")]
    pub explanation: String,

    /// 自由文本，例如 "Easy"、"Medium-Plus"
    #[serde(rename = "Difficulty", default)]
    pub difficulty: String,
}

impl QuestionRecord {
    /// (标签, 选项内容)
    pub fn options(&self) -> [(&'static str, &str); 4] {
        [
            ("A", self.option_a.as_str()),
            ("B", self.option_b.as_str()),
            ("C", self.option_c.as_str()),
            ("D", self.option_d.as_str()),
        ]
    }

    /// 正确答案是否对应某个选项
    ///
    /// 接受 "A"、"a"、"Option A"、"A) ..." 以及与选项内容完全一致的写法
    pub fn answer_matches_option(&self) -> bool {
        let answer = self.correct_answer.trim();
        if answer.is_empty() {
            return false;
        }
        let lowered = answer.to_lowercase();
        let label_part = lowered.strip_prefix("option").map(str::trim).unwrap_or(lowered.as_str());

        self.options().iter().any(|(label, text)| {
            let label = label.to_lowercase();
            label_part == label
                || label_part.starts_with(&format!("{})", label))
                || label_part.starts_with(&format!("{}.", label))
                || label_part.starts_with(&format!("{}:", label))
                || text.trim().eq_ignore_ascii_case(answer)
        })
    }

    /// 补齐 LLM 可能留空的主题和难度
    pub fn fill_defaults(&mut self, topic: &str, difficulty_label: &str) {
        if self.topic.trim().is_empty() {
            self.topic = topic.to_string();
        }
        if self.difficulty.trim().is_empty() {
            self.difficulty = difficulty_label.to_string();
        }
    }
}

impl std::fmt::Display for QuestionRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let preview = crate::utils::logging::truncate_text(&self.question_text, 80);
        write!(f, "#{} [{}] {}", self.question_number, self.difficulty, preview)
    }
}

// 题号可能是字符串也可能是整数
fn deserialize_question_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Visitor;
    use std::fmt;

    struct QuestionNumberVisitor;

    impl<'de> Visitor<'de> for QuestionNumberVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or integer question number")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value)
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            if value.fract() == 0.0 {
                Ok(format!("{}", value as i64))
            } else {
                Ok(value.to_string())
            }
        }
    }

    deserializer.deserialize_any(QuestionNumberVisitor)
}

#[cfg(test)]
pub(crate) fn sample_record(number: usize, topic: &str, difficulty: &str) -> QuestionRecord {
    QuestionRecord {
        id: None,
        question_number: number.to_string(),
        topic: topic.to_string(),
        question_text: format!("{} question {}", topic, number),
        option_a: "alpha".to_string(),
        option_b: "beta".to_string(),
        option_c: "gamma".to_string(),
        option_d: "delta".to_string(),
        correct_answer: "A".to_string(),
        explanation: "because".to_string(),
        difficulty: difficulty.to_string(),
    }
}
