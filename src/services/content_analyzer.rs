//! 内容分析服务 - 业务能力层
//!
//! 从解析后的文档计算：关键概念、难度、主题、章节要点、可读性、建议题量。
//! 纯函数：同一文档总是得到同一结果；只有 NLP 引擎失败时才会返回错误。

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::error::AnalysisError;
use crate::infrastructure::{NlpDoc, NlpEngine};
use crate::models::{
    Analysis, Concept, DifficultyLevel, ParsedDocument, Section, SectionSummary, Topic,
};

/// 句子切分：连续的 `.` `!` `?` 视为一个分隔符
static SENTENCE_SPLIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]+").expect("valid sentence regex"));

const MAX_CONCEPT_CANDIDATES: usize = 20;
const MAX_CHUNK_WORDS: usize = 3;
const MIN_SECTION_CHARS: usize = 50;
const KEY_POINT_WINDOW: usize = 10;
const MAX_KEY_POINTS: usize = 5;
const BANNED_LEAD_INS: [&str; 3] = ["however", "therefore", "moreover"];
const TOPIC_THRESHOLD: usize = 3;

/// 内容分析服务
///
/// 持有共享的 NLP 引擎句柄，不持有任何按文档变化的状态
pub struct ContentAnalyzer {
    nlp: Arc<dyn NlpEngine>,
}

impl ContentAnalyzer {
    pub fn new(nlp: Arc<dyn NlpEngine>) -> Self {
        Self { nlp }
    }

    /// 分析文档
    pub fn analyze(&self, document: &ParsedDocument) -> Result<Analysis> {
        let text = &document.text;
        let nlp_doc = self
            .nlp
            .process(text)
            .map_err(|e| AnalysisError::NlpFailed {
                message: e.to_string(),
            })?;

        let analysis = Analysis {
            key_concepts: extract_key_concepts(&nlp_doc),
            difficulty_level: assess_difficulty(&nlp_doc),
            topics: identify_topics(text),
            section_analysis: analyze_sections(&document.sections),
            readability_score: calculate_readability(text),
            suggested_quiz_count: suggest_quiz_count(text),
        };

        debug!(
            "分析完成: {} 个概念, 难度 {}, 主题 {:?}, 可读性 {:.2}",
            analysis.key_concepts.len(),
            analysis.difficulty_level,
            analysis.topics,
            analysis.readability_score
        );

        Ok(analysis)
    }
}

/// 关键概念：名词短语（≤3 词）按频次取前 20，再保留频次 > 1 且长度 > 3 的
///
/// 命名实体会被识别出来，但目前只记录日志，不进入概念列表
pub fn extract_key_concepts(nlp_doc: &NlpDoc) -> Vec<Concept> {
    debug!(
        "识别到 {} 个命名实体: {:?}",
        nlp_doc.entities.len(),
        nlp_doc
            .entities
            .iter()
            .take(10)
            .map(|e| format!("{} ({})", e.text, e.label))
            .collect::<Vec<_>>()
    );

    // 按首次出现顺序计数，稳定排序后同频短语保持出现顺序
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for chunk in &nlp_doc.noun_chunks {
        if chunk.split_whitespace().count() > MAX_CHUNK_WORDS {
            continue;
        }
        let count = counts.entry(chunk.as_str()).or_insert(0);
        if *count == 0 {
            order.push(chunk.as_str());
        }
        *count += 1;
    }

    let mut ranked: Vec<(&str, usize)> = order.into_iter().map(|c| (c, counts[c])).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    ranked
        .into_iter()
        .take(MAX_CONCEPT_CANDIDATES)
        .filter(|(concept, count)| *count > 1 && concept.chars().count() > 3)
        .map(|(concept, count)| Concept::new(concept, count))
        .collect()
}

/// 按阈值分级，先判 Advanced，再判 Intermediate
pub fn classify_difficulty(avg_sentence_length: f64, complexity_ratio: f64) -> DifficultyLevel {
    if avg_sentence_length > 20.0 || complexity_ratio > 0.3 {
        DifficultyLevel::Advanced
    } else if avg_sentence_length > 15.0 || complexity_ratio > 0.2 {
        DifficultyLevel::Intermediate
    } else {
        DifficultyLevel::Basic
    }
}

/// 难度评估：平均句长（非标点词元 / 句数）与长词占比（> 6 个字母的字母词元 / 字母词元）
pub fn assess_difficulty(nlp_doc: &NlpDoc) -> DifficultyLevel {
    let non_punct = nlp_doc.tokens.iter().filter(|t| !t.is_punct).count();
    // 没有句子时平均句长按 0 处理
    let avg_sentence_length = if nlp_doc.sentence_count > 0 {
        non_punct as f64 / nlp_doc.sentence_count as f64
    } else {
        0.0
    };

    let alpha: Vec<_> = nlp_doc.tokens.iter().filter(|t| t.is_alpha).collect();
    let complex_words = alpha.iter().filter(|t| t.text.chars().count() > 6).count();
    let complexity_ratio = if alpha.is_empty() {
        0.0
    } else {
        complex_words as f64 / alpha.len() as f64
    };

    debug!(
        "难度指标: 平均句长 {:.2}, 长词占比 {:.2}",
        avg_sentence_length, complexity_ratio
    );
    classify_difficulty(avg_sentence_length, complexity_ratio)
}

/// 主题识别：各主题关键词在小写全文中的出现次数之和 > 3 即命中，按主题声明顺序输出
pub fn identify_topics(text: &str) -> Vec<Topic> {
    let text_lower = text.to_lowercase();
    Topic::ALL
        .into_iter()
        .filter(|topic| {
            let hits: usize = topic
                .keywords()
                .iter()
                .map(|keyword| text_lower.matches(keyword).count())
                .sum();
            hits > TOPIC_THRESHOLD
        })
        .collect()
}

/// 章节分析：去除首尾空白后不足 50 个字符的章节直接跳过
pub fn analyze_sections(sections: &[Section]) -> Vec<SectionSummary> {
    sections
        .iter()
        .filter(|section| section.content.trim().chars().count() >= MIN_SECTION_CHARS)
        .map(|section| {
            let word_count = section.content.split_whitespace().count();
            SectionSummary {
                title: section.title.clone(),
                word_count,
                key_points: extract_key_points(&section.content),
                quiz_potential: word_count / 50,
            }
        })
        .collect()
}

/// 要点抽取：只看前 10 个句子片段，保留长度在 (20, 200) 之间、
/// 且不以 however / therefore / moreover 开头的，最多 5 条
pub fn extract_key_points(text: &str) -> Vec<String> {
    SENTENCE_SPLIT
        .split(text)
        .take(KEY_POINT_WINDOW)
        .map(str::trim)
        .filter(|sentence| {
            let len = sentence.chars().count();
            let lower = sentence.to_lowercase();
            len > 20 && len < 200 && !BANNED_LEAD_INS.iter().any(|w| lower.starts_with(w))
        })
        .take(MAX_KEY_POINTS)
        .map(str::to_string)
        .collect()
}

/// 可读性（0~1，越高越易读）
///
/// 空文本固定为 0.0；否则 `1 - (平均句长 - 10) / 20` 截断到 [0, 1] 并保留两位小数
pub fn calculate_readability(text: &str) -> f64 {
    if text.is_empty() {
        return 0.0;
    }

    // 没有分隔符的文本也会切出 1 段
    let sentences = SENTENCE_SPLIT.split(text).count();
    let words = text.split_whitespace().count();
    let avg_sentence_length = if sentences > 0 {
        words as f64 / sentences as f64
    } else {
        words as f64
    };

    let readability = (1.0 - (avg_sentence_length - 10.0) / 20.0).clamp(0.0, 1.0);
    (readability * 100.0).round() / 100.0
}

/// 按词数给出建议题量
pub fn suggest_quiz_count_for(word_count: usize) -> usize {
    match word_count {
        0..=499 => 3,
        500..=1499 => 5,
        1500..=2999 => 8,
        _ => 10,
    }
}

pub fn suggest_quiz_count(text: &str) -> usize {
    suggest_quiz_count_for(text.split_whitespace().count())
}
