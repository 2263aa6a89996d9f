//! 章节切分
//!
//! 从抽取出的纯文本里按标题启发式切分章节：
//! 短于 100 个字符，并且全大写，或以 `Chapter` / `Section` / `1.` / `2.` / `3.` 开头的行视为标题。
//! 这里不丢弃短章节，过短章节在内容分析阶段才会被忽略。

use crate::models::Section;

const HEADER_PREFIXES: [&str; 5] = ["Chapter", "Section", "1.", "2.", "3."];
const MAX_HEADER_CHARS: usize = 100;
const DEFAULT_TITLE: &str = "Introduction";

/// 全大写：至少有一个大写字母，且没有小写字母
fn is_upper(line: &str) -> bool {
    line.chars().any(char::is_uppercase) && !line.chars().any(char::is_lowercase)
}

fn is_header(line: &str) -> bool {
    line.chars().count() < MAX_HEADER_CHARS
        && (is_upper(line) || HEADER_PREFIXES.iter().any(|p| line.starts_with(p)))
}

/// 将文本切分为有序章节
pub fn extract_sections(text: &str) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut current = Section::new(DEFAULT_TITLE, "");

    for line in text.split('\n') {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if is_header(line) {
            if !current.content.is_empty() {
                sections.push(current);
            }
            current = Section::new(line, "");
        } else {
            current.content.push_str(line);
            current.content.push(' ');
        }
    }

    if !current.content.is_empty() {
        sections.push(current);
    }

    sections
}
