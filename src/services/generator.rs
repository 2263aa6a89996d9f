//! 学习材料生成 - 业务能力层
//!
//! 提示词 → LLM → JSON 解析 → 校验。任何一步失败都会降级为固定的兜底内容，
//! 错误只写日志，不会传给调用方。

use std::sync::Arc;

use anyhow::Result;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, info};

use crate::error::AppError;
use crate::models::{
    Analysis, DifficultyLevel, GeneratedContent, MindMap, MindMapBranch, MindMapNode, QuizItem,
    Summary,
};
use crate::services::llm_service::{ChatBackend, ChatMessage};
use crate::services::prompts;
use crate::services::quiz_validator::validate_quiz;
use crate::utils::truncate_text;

const QUIZ_TEMPERATURE: f32 = 0.7;
const SUMMARY_TEMPERATURE: f32 = 0.5;
const MINDMAP_TEMPERATURE: f32 = 0.6;

/// 生成结果：解析成功的内容，或兜底内容
///
/// 两种情况都是可用的学习材料，区别只用于日志和统计
#[derive(Debug, Clone, PartialEq)]
pub enum Generated<T> {
    Parsed(T),
    Fallback(T),
}

impl<T> Generated<T> {
    pub fn into_inner(self) -> T {
        match self {
            Generated::Parsed(value) | Generated::Fallback(value) => value,
        }
    }

    pub fn as_inner(&self) -> &T {
        match self {
            Generated::Parsed(value) | Generated::Fallback(value) => value,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Generated::Fallback(_))
    }
}

/// 学习材料生成服务
pub struct ContentGenerator {
    backend: Arc<dyn ChatBackend>,
}

impl ContentGenerator {
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self { backend }
    }

    /// 生成测验题
    ///
    /// 响应必须是 JSON 数组；数组中不合法的题目会被丢弃
    pub async fn generate_quiz(
        &self,
        content: &str,
        analysis: &Analysis,
    ) -> Generated<Vec<QuizItem>> {
        let prompt = prompts::quiz_prompt(content, analysis);
        let result = self
            .request_json(prompts::QUIZ_SYSTEM_PROMPT, prompt, QUIZ_TEMPERATURE)
            .await
            .and_then(|value| match value {
                Value::Array(items) => Ok(items),
                other => Err(AppError::malformed_response(
                    "测验题数组",
                    truncate_text(&other.to_string(), 100),
                )
                .into()),
            });

        match result {
            Ok(raw_items) => {
                let quiz = validate_quiz(&raw_items);
                info!("✓ 测验题生成完成: {} 道（原始 {} 道）", quiz.len(), raw_items.len());
                Generated::Parsed(quiz)
            }
            Err(e) => {
                error!("测验题生成失败，使用兜底题目: {}", e);
                Generated::Fallback(fallback_quiz())
            }
        }
    }

    /// 生成摘要
    pub async fn generate_summary(&self, content: &str, analysis: &Analysis) -> Generated<Summary> {
        let prompt = prompts::summary_prompt(content, analysis);
        let result = self
            .request_json(prompts::SUMMARY_SYSTEM_PROMPT, prompt, SUMMARY_TEMPERATURE)
            .await
            .and_then(|value| parse_object::<Summary>(value, "摘要对象"));

        match result {
            Ok(summary) => {
                info!("✓ 摘要生成完成: {} 条要点", summary.main_points.len());
                Generated::Parsed(summary)
            }
            Err(e) => {
                error!("摘要生成失败，使用兜底摘要: {}", e);
                Generated::Fallback(fallback_summary(content))
            }
        }
    }

    /// 生成思维导图
    pub async fn generate_mindmap(&self, content: &str, analysis: &Analysis) -> Generated<MindMap> {
        let prompt = prompts::mindmap_prompt(content, analysis);
        let result = self
            .request_json(prompts::MINDMAP_SYSTEM_PROMPT, prompt, MINDMAP_TEMPERATURE)
            .await
            .and_then(|value| parse_object::<MindMap>(value, "思维导图对象"));

        match result {
            Ok(mindmap) => {
                info!("✓ 思维导图生成完成: {} 个分支", mindmap.branches.len());
                Generated::Parsed(mindmap)
            }
            Err(e) => {
                error!("思维导图生成失败，使用兜底导图: {}", e);
                Generated::Fallback(fallback_mindmap(analysis))
            }
        }
    }

    /// 依次生成测验题、摘要、思维导图
    pub async fn generate_all(&self, content: &str, analysis: &Analysis) -> GeneratedContent {
        let quiz = self.generate_quiz(content, analysis).await;
        let summary = self.generate_summary(content, analysis).await;
        let mindmap = self.generate_mindmap(content, analysis).await;

        let fallbacks = [quiz.is_fallback(), summary.is_fallback(), mindmap.is_fallback()]
            .iter()
            .filter(|f| **f)
            .count();
        if fallbacks > 0 {
            info!("⚠️  {} 项学习材料使用了兜底内容", fallbacks);
        }

        GeneratedContent {
            quiz: quiz.into_inner(),
            summary: summary.into_inner(),
            mindmap: mindmap.into_inner(),
        }
    }

    async fn request_json(
        &self,
        system_prompt: &str,
        prompt: String,
        temperature: f32,
    ) -> Result<Value> {
        debug!("提示词: {}", truncate_text(&prompt, 200));
        let messages = [ChatMessage::system(system_prompt), ChatMessage::user(prompt)];
        let response = self.backend.complete(&messages, temperature).await?;
        debug!("LLM 响应: {}", truncate_text(&response, 200));

        let value = serde_json::from_str(extract_json(&response))
            .map_err(|e| AppError::malformed_response("JSON", e.to_string()))?;
        Ok(value)
    }
}

/// 只接受 JSON 对象，缺失字段按默认值补齐
fn parse_object<T: DeserializeOwned>(value: Value, expected: &'static str) -> Result<T> {
    if !value.is_object() {
        let detail = truncate_text(&value.to_string(), 100);
        return Err(AppError::malformed_response(expected, detail).into());
    }
    serde_json::from_value(value)
        .map_err(|e| AppError::malformed_response(expected, e.to_string()).into())
}

/// 去掉响应外层的 Markdown 代码块（```json ... ```）
pub fn extract_json(response: &str) -> &str {
    let trimmed = response.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // 跳过语言标记所在的第一行
    let body = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

pub fn fallback_quiz() -> Vec<QuizItem> {
    vec![QuizItem {
        question: "What is the main topic of this document?".to_string(),
        options: ["Topic A", "Topic B", "Topic C", "Topic D"].map(String::from),
        correct_answer: 0,
        explanation: "Fallback question generated due to processing error.".to_string(),
        difficulty: DifficultyLevel::Basic,
        concept: "General".to_string(),
    }]
}

pub fn fallback_summary(content: &str) -> Summary {
    Summary {
        overview: format!(
            "This document contains approximately {} words of educational content.",
            content.split_whitespace().count()
        ),
        main_points: vec!["Content processing in progress".to_string()],
        key_takeaways: vec!["Please try again later".to_string()],
        complexity_level: None,
    }
}

pub fn fallback_mindmap(analysis: &Analysis) -> MindMap {
    MindMap {
        central_topic: "Document Content".to_string(),
        branches: analysis
            .top_concepts(3)
            .into_iter()
            .map(|concept| MindMapBranch {
                name: concept.to_string(),
                children: vec![MindMapNode {
                    name: "Details".to_string(),
                }],
            })
            .collect(),
    }
}
