//! 业务能力层（Services）
//!
//! 每个服务只提供一种能力，不关心流程顺序：
//! - `parsers` - 文档解析（PDF / DOCX）与章节切分
//! - `content_analyzer` - 内容分析
//! - `quiz_validator` - 测验题结构校验
//! - `prompts` - 提示词构建
//! - `llm_service` - LLM 调用
//! - `generator` - 学习材料生成（含兜底）

pub mod content_analyzer;
pub mod generator;
pub mod llm_service;
pub mod parsers;
pub mod prompts;
pub mod quiz_validator;

pub use content_analyzer::ContentAnalyzer;
pub use generator::{ContentGenerator, Generated};
pub use llm_service::{ChatBackend, ChatMessage, ChatRole, LlmService};
pub use parsers::{parse_file, DocumentParser, ParserFactory};
pub use quiz_validator::validate_quiz;
