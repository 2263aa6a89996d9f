//! 基础设施层（Infrastructure）
//!
//! 持有进程级资源，只暴露能力：
//! - `nlp` - NLP 引擎（只读，启动时构造一次）
//! - `storage` / `scheduler` / `progress` - 外部协作方的能力接口及内存实现

pub mod nlp;
pub mod progress;
pub mod scheduler;
pub mod storage;

pub use nlp::{NlpDoc, NlpEngine, RuleBasedNlp};
pub use progress::{MemoryProgress, ProgressTracker};
pub use scheduler::{MemoryScheduler, SpacedRepetition};
pub use storage::{LearningStore, MemoryStore};

use std::sync::{Mutex, MutexGuard};

use crate::error::AppError;

/// 获取内存后端的锁，锁中毒视为存储不可用
pub(crate) fn lock<'a, T>(mutex: &'a Mutex<T>, what: &str) -> anyhow::Result<MutexGuard<'a, T>> {
    mutex
        .lock()
        .map_err(|_| AppError::storage_unavailable(format!("{} 锁已中毒", what)).into())
}
