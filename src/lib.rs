//! # Learning Pipeline
//!
//! 把 PDF / DOCX 学习资料变成测验题、摘要、思维导图和可追踪的学习会话
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 进程级资源和外部协作方能力
//! - `NlpEngine` / `RuleBasedNlp` - 分词、分句、实体、名词短语
//! - `LearningStore` / `SpacedRepetition` / `ProgressTracker` - 存储、复习调度、进度跟踪（附内存实现）
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个文档
//! - `parsers` - PDF / DOCX 解析与章节切分
//! - `ContentAnalyzer` - 关键概念、难度、主题、可读性
//! - `ContentGenerator` - 通过 LLM 生成学习材料，失败时降级
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一次学习会话"的完整流程
//! - `SessionCtx` - 上下文封装（user_id + document_id）
//! - `LearningOrchestrator` - 创建会话、处理作答、生成学习计划
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/app` - 扫描输入目录，逐个处理文档
//! - `orchestrator/document_processor` - 单个文档：解析 → 分析 → 生成 → 会话
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::{NlpEngine, RuleBasedNlp};
pub use orchestrator::{process_document, App, DocumentOutcome, PipelineDeps, ProcessingStats};
pub use services::{ChatBackend, ChatMessage, ContentAnalyzer, ContentGenerator, Generated};
pub use workflow::{LearningOrchestrator, SessionCtx};
