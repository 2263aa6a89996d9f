//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `app` - 批量文档处理器
//! - 管理应用生命周期（初始化、运行）
//! - 扫描输入目录，逐个处理文档
//! - 输出全局统计信息
//!
//! ### `document_processor` - 单个文档处理器
//! - 解析 → 分析 → 生成 → 创建学习会话
//!
//! ## 层次关系
//!
//! ```text
//! app (处理 Vec<PathBuf>)
//!     ↓
//! document_processor (处理单个文档)
//!     ↓
//! workflow::LearningOrchestrator (学习会话)
//!     ↓
//! services (能力层：parse / analyze / generate)
//!     ↓
//! infrastructure (基础设施：NLP 引擎、存储、复习调度、进度跟踪)
//! ```

pub mod app;
pub mod document_processor;

pub use app::{App, ProcessingStats};
pub use document_processor::{process_document, DocumentOutcome, PipelineDeps};
