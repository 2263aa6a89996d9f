use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::artifacts::{MindMap, QuizItem, Summary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LearningStatus {
    Active,
    Completed,
}

/// 学习会话记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub user_id: String,
    pub document_id: String,
    pub created_at: DateTime<Utc>,
    pub status: LearningStatus,
}

/// 测验记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizRecord {
    pub session_id: String,
    pub questions: Vec<QuizItem>,
    pub created_at: DateTime<Utc>,
}

/// 摘要记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub session_id: String,
    pub content: Summary,
    pub created_at: DateTime<Utc>,
}

/// 思维导图记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MindMapRecord {
    pub session_id: String,
    pub structure: MindMap,
    pub created_at: DateTime<Utc>,
}

/// 创建学习会话的汇总结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningSessionResult {
    pub session_id: String,
    pub quiz_id: String,
    pub summary_id: String,
    pub mindmap_id: String,
    pub next_review: Option<DateTime<Utc>>,
    /// 预计完成时间（分钟）
    pub estimated_completion_time: u32,
}

/// 单题作答结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionResult {
    pub question_id: usize,
    pub user_answer: usize,
    pub correct_answer: usize,
    pub is_correct: bool,
    pub explanation: String,
    pub concept: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Advance,
    ReviewWeak,
    Repeat,
}

impl ActionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::Advance => "advance",
            ActionKind::ReviewWeak => "review_weak",
            ActionKind::Repeat => "repeat",
        }
    }
}

/// 下一步建议
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextAction {
    pub action: ActionKind,
    pub message: String,
}

/// 一次测验作答的处理结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizAttemptResult {
    pub score: f64,
    pub correct_answers: usize,
    pub total_questions: usize,
    pub results: Vec<QuestionResult>,
    pub next_review: Option<DateTime<Utc>>,
    pub next_action: NextAction,
    pub improvement_suggestions: Vec<String>,
}

/// 学习者进度快照
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProgress {
    /// 今日目标完成百分比
    pub daily_progress: f64,
    pub streak: u32,
    pub total_points: u32,
}

/// 到期待复习的测验
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DueItem {
    pub quiz_id: String,
    pub next_review: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
}

/// 推荐的复习安排
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendedSession {
    pub title: String,
    pub estimated_time: u32,
    pub priority: Priority,
}

/// 下一个积分里程碑
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Milestone {
    Next {
        target: u32,
        current: u32,
        remaining: u32,
        progress_percentage: f64,
    },
    /// 已超过全部里程碑
    Master { current: u32 },
}

impl Milestone {
    pub fn remaining(&self) -> u32 {
        match self {
            Milestone::Next { remaining, .. } => *remaining,
            Milestone::Master { .. } => 0,
        }
    }

    pub fn progress_percentage(&self) -> f64 {
        match self {
            Milestone::Next {
                progress_percentage,
                ..
            } => *progress_percentage,
            Milestone::Master { .. } => 100.0,
        }
    }
}

/// 个性化学习计划
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningPlan {
    pub due_reviews: Vec<DueItem>,
    pub weak_areas: Vec<String>,
    pub recommended_sessions: Vec<RecommendedSession>,
    pub daily_goal_progress: f64,
    pub streak: u32,
    pub next_milestone: Milestone,
}
