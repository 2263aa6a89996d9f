//! 测验题结构校验
//!
//! LLM 返回的题目是无类型的 JSON，只有满足结构约定的才会转换为 `QuizItem`：
//! - `question` 是字符串
//! - `options` 是恰好 4 个字符串的数组
//! - `correct_answer` 是 [0, 4) 内的整数
//!
//! 不满足的题目直接丢弃，不做部分修补，也不会报错。

use serde_json::{Map, Value};
use tracing::debug;

use crate::models::{DifficultyLevel, QuizItem};

const OPTION_COUNT: usize = 4;
const DEFAULT_CONCEPT: &str = "General";

/// 校验并规范化一组题目，结果长度不超过输入长度
pub fn validate_quiz(raw_items: &[Value]) -> Vec<QuizItem> {
    let validated: Vec<QuizItem> = raw_items
        .iter()
        .filter_map(|item| item.as_object().and_then(validate_item))
        .collect();

    if validated.len() < raw_items.len() {
        debug!(
            "丢弃 {} 道结构不合法的题目（保留 {}）",
            raw_items.len() - validated.len(),
            validated.len()
        );
    }
    validated
}

fn validate_item(item: &Map<String, Value>) -> Option<QuizItem> {
    let question = item.get("question")?.as_str()?;

    let options = item.get("options")?.as_array()?;
    let options: [String; OPTION_COUNT] = match options.as_slice() {
        [a, b, c, d] => [
            a.as_str()?.to_string(),
            b.as_str()?.to_string(),
            c.as_str()?.to_string(),
            d.as_str()?.to_string(),
        ],
        _ => return None,
    };

    let correct_answer = item.get("correct_answer")?.as_u64()?;
    if correct_answer >= OPTION_COUNT as u64 {
        return None;
    }

    let difficulty = optional_text(item, "difficulty")
        .and_then(|label| DifficultyLevel::from_label(&label))
        .unwrap_or_default();

    Some(QuizItem {
        question: question.to_string(),
        options,
        correct_answer: correct_answer as usize,
        explanation: optional_text(item, "explanation").unwrap_or_default(),
        difficulty,
        concept: optional_text(item, "concept").unwrap_or_else(|| DEFAULT_CONCEPT.to_string()),
    })
}

/// 可选字段：缺失或为 null 时返回 None
fn optional_text(item: &Map<String, Value>, key: &str) -> Option<String> {
    match item.get(key) {
        None | Some(Value::Null) => None,
        Some(value) => Some(text_of(value)),
    }
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
