//! 题目生成提示词

use crate::models::Difficulty;

/// 系统消息
pub const SYSTEM_PROMPT: &str = "You are an expert educational question generator.";

/// 构建某个难度的出题提示词
///
/// 输出字段名与 `QuestionRecord` 的存储键名一一对应
pub fn build_question_prompt(topic: &str, tier: Difficulty, count: usize) -> String {
    let difficulty = tier.label();
    format!(
        r#"Generate exactly {count} {level} level multiple-choice questions on the topic: {topic}

For each question, provide:
- Question Number (incremental, starting at 1)
- Question Text
- Option A
- Option B
- Option C
- Option D
- Correct Answer (the letter of the correct option)
- Explanation
- Difficulty Level

Respond with JSON only, using exactly these field names:
{{
    "questions": [
        {{
            "Question Number": "1",
            "Topic": "{topic}",
            "Question Text": "...",
            "Option A": "...",
            "Option B": "...",
            "Option C": "...",
            "Option D": "...",
            "Correct Answer": "...",
            "Explanation": "...",
            "Difficulty": "{difficulty}"
        }}
    ]
}}"#,
        count = count,
        level = tier.key(),
        topic = topic,
        difficulty = difficulty,
    )
}
