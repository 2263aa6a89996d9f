//! 流程层（Workflow）
//!
//! 定义"一次学习会话"的完整流程：
//! - 创建会话并保存学习材料
//! - 处理测验作答
//! - 生成学习计划
//!
//! 只依赖基础设施层暴露的协作方能力，不关心文档从哪里来

pub mod learning_flow;
pub mod session_ctx;

pub use learning_flow::LearningOrchestrator;
pub use session_ctx::SessionCtx;
