//! 学习进度跟踪
//!
//! `MemoryProgress` 规则：
//! - 积分：每次作答得分四舍五入后累加
//! - 连续天数：从今天往前、每天至少一次作答的天数
//! - 今日进度：今日作答次数 / 每日目标，封顶 100%
//! - 薄弱点：答错题目对应的概念，按出现次数降序

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use anyhow::Result;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use tracing::debug;

use crate::infrastructure::lock;
use crate::models::{Analysis, QuestionResult, UserProgress};

/// 进度跟踪能力
pub trait ProgressTracker: Send + Sync {
    fn initialize_progress(
        &self,
        user_id: &str,
        session_id: &str,
        analysis: &Analysis,
    ) -> Result<()>;
    fn get_user_progress(&self, user_id: &str) -> Result<UserProgress>;
    fn get_weak_areas(&self, user_id: &str) -> Result<Vec<String>>;
    fn record_attempt(
        &self,
        user_id: &str,
        quiz_id: &str,
        score: f64,
        results: &[QuestionResult],
    ) -> Result<()>;
}

#[derive(Debug, Clone)]
struct AttemptEntry {
    score: f64,
    at: DateTime<Utc>,
    missed_concepts: Vec<String>,
}

#[derive(Debug, Default)]
struct LearnerState {
    /// session_id → 该会话的重点概念
    sessions: HashMap<String, Vec<String>>,
    attempts: Vec<AttemptEntry>,
}

/// 进程内进度跟踪
#[derive(Debug)]
pub struct MemoryProgress {
    daily_goal: u32,
    learners: Mutex<HashMap<String, LearnerState>>,
}

impl MemoryProgress {
    pub fn new(daily_goal: u32) -> Self {
        Self {
            daily_goal: daily_goal.max(1),
            learners: Mutex::new(HashMap::new()),
        }
    }

    /// 已初始化跟踪的会话数量
    pub fn tracked_sessions(&self, user_id: &str) -> usize {
        self.learners
            .lock()
            .ok()
            .and_then(|learners| learners.get(user_id).map(|l| l.sessions.len()))
            .unwrap_or(0)
    }

    pub fn record_attempt_at(
        &self,
        user_id: &str,
        score: f64,
        results: &[QuestionResult],
        at: DateTime<Utc>,
    ) -> Result<()> {
        let missed_concepts = results
            .iter()
            .filter(|r| !r.is_correct)
            .map(|r| r.concept.clone())
            .collect();

        lock(&self.learners, "progress")?
            .entry(user_id.to_string())
            .or_default()
            .attempts
            .push(AttemptEntry {
                score,
                at,
                missed_concepts,
            });
        Ok(())
    }

    pub fn progress_on(&self, user_id: &str, today: NaiveDate) -> Result<UserProgress> {
        let learners = lock(&self.learners, "progress")?;
        let Some(state) = learners.get(user_id) else {
            return Ok(UserProgress::default());
        };

        let total_points = state
            .attempts
            .iter()
            .map(|a| a.score.round().max(0.0) as u32)
            .sum();

        let active_days: HashSet<NaiveDate> =
            state.attempts.iter().map(|a| a.at.date_naive()).collect();

        let today_attempts = state
            .attempts
            .iter()
            .filter(|a| a.at.date_naive() == today)
            .count() as f64;
        let daily_progress = (today_attempts / self.daily_goal as f64 * 100.0).min(100.0);

        let mut streak = 0;
        let mut day = today;
        while active_days.contains(&day) {
            streak += 1;
            day -= Duration::days(1);
        }

        Ok(UserProgress {
            daily_progress,
            streak,
            total_points,
        })
    }
}

impl ProgressTracker for MemoryProgress {
    fn initialize_progress(
        &self,
        user_id: &str,
        session_id: &str,
        analysis: &Analysis,
    ) -> Result<()> {
        let concepts = analysis
            .top_concepts(usize::MAX)
            .into_iter()
            .map(str::to_string)
            .collect();

        lock(&self.learners, "progress")?
            .entry(user_id.to_string())
            .or_default()
            .sessions
            .insert(session_id.to_string(), concepts);

        debug!("已初始化进度跟踪: 用户 {} 会话 {}", user_id, session_id);
        Ok(())
    }

    fn get_user_progress(&self, user_id: &str) -> Result<UserProgress> {
        self.progress_on(user_id, Utc::now().date_naive())
    }

    fn get_weak_areas(&self, user_id: &str) -> Result<Vec<String>> {
        let learners = lock(&self.learners, "progress")?;
        let Some(state) = learners.get(user_id) else {
            return Ok(Vec::new());
        };

        // 按首次出现顺序计数，稳定排序保证同频概念顺序不变
        let mut counts: Vec<(String, usize)> = Vec::new();
        for concept in state.attempts.iter().flat_map(|a| a.missed_concepts.iter()) {
            match counts.iter_mut().find(|(c, _)| c == concept) {
                Some((_, n)) => *n += 1,
                None => counts.push((concept.clone(), 1)),
            }
        }
        counts.sort_by(|a, b| b.1.cmp(&a.1));

        Ok(counts.into_iter().map(|(concept, _)| concept).collect())
    }

    fn record_attempt(
        &self,
        user_id: &str,
        quiz_id: &str,
        score: f64,
        results: &[QuestionResult],
    ) -> Result<()> {
        debug!("记录作答: 用户 {} 测验 {} 得分 {:.1}", user_id, quiz_id, score);
        self.record_attempt_at(user_id, score, results, Utc::now())
    }
}
