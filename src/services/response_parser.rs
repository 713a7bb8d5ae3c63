//! LLM 响应解析
//!
//! 接受三种形状：
//! - 题目数组
//! - 单个题目对象（视为只有一道题）
//! - 只有一个数组字段的包装对象，例如 `{"questions": [...]}`

use serde_json::{Map, Value as JsonValue};

use crate::error::LlmError;
use crate::models::QuestionRecord;

/// 判断对象是否本身就是一道题
const QUESTION_MARKER: &str = "Question Text";

/// 解析 LLM 返回的题目 JSON
///
/// 任意一道题字段缺失都会让整个响应作废，错误中保留原始内容
pub fn parse_generated_questions(raw: &str) -> Result<Vec<QuestionRecord>, LlmError> {
    let body = strip_code_fence(raw);

    let value: JsonValue = serde_json::from_str(body)
        .map_err(|e| LlmError::malformed(format!("JSON 解析失败: {}", e), raw))?;

    let items = match value {
        JsonValue::Array(items) => items,
        JsonValue::Object(map) => unwrap_object(map),
        other => {
            return Err(LlmError::malformed(
                format!("期望 JSON 对象或数组，实际为: {}", json_kind(&other)),
                raw,
            ))
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value::<QuestionRecord>(item).map_err(|e| {
                LlmError::malformed(format!("第 {} 道题目格式错误: {}", index + 1, e), raw)
            })
        })
        .collect()
}

fn unwrap_object(map: Map<String, JsonValue>) -> Vec<JsonValue> {
    if map.contains_key(QUESTION_MARKER) || map.len() != 1 {
        return vec![JsonValue::Object(map)];
    }

    let is_wrapper = map
        .values()
        .next()
        .and_then(JsonValue::as_array)
        .is_some_and(|items| items.iter().all(JsonValue::is_object));

    if is_wrapper {
        match map.into_iter().next() {
            Some((_, JsonValue::Array(items))) => items,
            _ => Vec::new(),
        }
    } else {
        vec![JsonValue::Object(map)]
    }
}

/// 去掉 ```json ... ``` 包裹
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(number: u32, difficulty: &str) -> JsonValue {
        json!({
            "Question Number": number,
            "Topic": "Algebra",
            "Question Text": format!("Question {}", number),
            "Option A": "1",
            "Option B": "2",
            "Option C": "3",
            "Option D": "4",
            "Correct Answer": "B",
            "Explanation": "...",
            "Difficulty": difficulty
        })
    }

    #[test]
    fn test_array() {
        let raw = json!([item(1, "Easy"), item(2, "Easy")]).to_string();
        let questions = parse_generated_questions(&raw).unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[1].question_number, "2");
    }

    #[test]
    fn test_single_object_is_one_question() {
        let raw = item(1, "Hard").to_string();
        let questions = parse_generated_questions(&raw).unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].difficulty, "Hard");
    }

    #[test]
    fn test_wrapper_object_is_unwrapped() {
        let raw = json!({ "questions": [item(1, "Medium"), item(2, "Medium")] }).to_string();
        assert_eq!(parse_generated_questions(&raw).unwrap().len(), 2);
    }

    #[test]
    fn test_code_fence_is_stripped() {
        let raw = format!("```json\n{}\n```", json!([item(1, "Easy")]));
        assert_eq!(parse_generated_questions(&raw).unwrap().len(), 1);
    }

    #[test]
    fn test_not_json_keeps_raw_payload() {
        let err = parse_generated_questions("Sure! Here are your questions:").unwrap_err();
        match err {
            LlmError::MalformedResponse { raw, .. } => {
                assert_eq!(raw, "Sure! Here are your questions:")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_one_incomplete_item_rejects_whole_response() {
        let mut broken = item(2, "Easy");
        broken.as_object_mut().unwrap().remove("Correct Answer");
        let raw = json!([item(1, "Easy"), broken]).to_string();
        assert!(matches!(
            parse_generated_questions(&raw),
            Err(LlmError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn test_scalar_is_rejected() {
        assert!(parse_generated_questions("42").is_err());
    }

    #[test]
    fn test_empty_array_is_ok() {
        assert!(parse_generated_questions("[]").unwrap().is_empty());
    }
}
