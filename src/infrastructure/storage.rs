//! 学习材料存储
//!
//! `LearningStore` 描述外部数据库需要提供的能力；`MemoryStore` 是进程内实现，
//! 供命令行运行和测试使用。

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::Result;
use tracing::debug;
use uuid::Uuid;

use crate::error::AppError;
use crate::infrastructure::lock;
use crate::models::{MindMapRecord, QuizItem, QuizRecord, SessionRecord, SummaryRecord};

/// 存储能力：每个 create 返回新记录的 ID
pub trait LearningStore: Send + Sync {
    fn create_learning_session(&self, record: SessionRecord) -> Result<String>;
    fn create_quiz(&self, record: QuizRecord) -> Result<String>;
    fn create_summary(&self, record: SummaryRecord) -> Result<String>;
    fn create_mindmap(&self, record: MindMapRecord) -> Result<String>;
    fn get_quiz_questions(&self, quiz_id: &str) -> Result<Vec<QuizItem>>;
}

/// 进程内存储
#[derive(Debug, Default)]
pub struct MemoryStore {
    sessions: Mutex<HashMap<String, SessionRecord>>,
    quizzes: Mutex<HashMap<String, QuizRecord>>,
    summaries: Mutex<HashMap<String, SummaryRecord>>,
    mindmaps: Mutex<HashMap<String, MindMapRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self, session_id: &str) -> Option<SessionRecord> {
        self.sessions.lock().ok()?.get(session_id).cloned()
    }

    pub fn summary(&self, summary_id: &str) -> Option<SummaryRecord> {
        self.summaries.lock().ok()?.get(summary_id).cloned()
    }

    pub fn mindmap(&self, mindmap_id: &str) -> Option<MindMapRecord> {
        self.mindmaps.lock().ok()?.get(mindmap_id).cloned()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.lock().map(|s| s.len()).unwrap_or(0)
    }

    fn insert<T>(map: &Mutex<HashMap<String, T>>, what: &str, record: T) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        lock(map, what)?.insert(id.clone(), record);
        debug!("已保存 {}: {}", what, id);
        Ok(id)
    }
}

impl LearningStore for MemoryStore {
    fn create_learning_session(&self, record: SessionRecord) -> Result<String> {
        Self::insert(&self.sessions, "session", record)
    }

    fn create_quiz(&self, record: QuizRecord) -> Result<String> {
        Self::insert(&self.quizzes, "quiz", record)
    }

    fn create_summary(&self, record: SummaryRecord) -> Result<String> {
        Self::insert(&self.summaries, "summary", record)
    }

    fn create_mindmap(&self, record: MindMapRecord) -> Result<String> {
        Self::insert(&self.mindmaps, "mindmap", record)
    }

    fn get_quiz_questions(&self, quiz_id: &str) -> Result<Vec<QuizItem>> {
        lock(&self.quizzes, "quiz")?
            .get(quiz_id)
            .map(|quiz| quiz.questions.clone())
            .ok_or_else(|| AppError::not_found("quiz", quiz_id).into())
    }
}
