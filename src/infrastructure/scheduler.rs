//! 间隔复习调度
//!
//! `MemoryScheduler` 使用最简单的翻倍间隔：首次 1 天，
//! 得分 ≥ 70 间隔翻倍，否则重置为 1 天。

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::infrastructure::lock;
use crate::models::DueItem;

/// 间隔复习能力
pub trait SpacedRepetition: Send + Sync {
    fn initialize_schedule(&self, user_id: &str, quiz_id: &str) -> Result<()>;
    fn update_schedule(&self, user_id: &str, quiz_id: &str, score: f64) -> Result<()>;
    fn get_due_items(&self, user_id: &str) -> Result<Vec<DueItem>>;
    fn get_next_review_time(&self, user_id: &str, quiz_id: &str) -> Result<Option<DateTime<Utc>>>;
}

const INITIAL_INTERVAL_DAYS: i64 = 1;
const PASSING_SCORE: f64 = 70.0;

#[derive(Debug, Clone)]
struct ScheduleEntry {
    interval_days: i64,
    next_review: DateTime<Utc>,
}

/// 进程内复习调度
#[derive(Debug, Default)]
pub struct MemoryScheduler {
    entries: Mutex<HashMap<(String, String), ScheduleEntry>>,
}

impl MemoryScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(user_id: &str, quiz_id: &str) -> (String, String) {
        (user_id.to_string(), quiz_id.to_string())
    }

    pub fn initialize_schedule_at(
        &self,
        user_id: &str,
        quiz_id: &str,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let entry = ScheduleEntry {
            interval_days: INITIAL_INTERVAL_DAYS,
            next_review: now + Duration::days(INITIAL_INTERVAL_DAYS),
        };
        lock(&self.entries, "schedule")?.insert(Self::key(user_id, quiz_id), entry);
        Ok(())
    }

    /// 未初始化过的测验按首次复习处理
    pub fn update_schedule_at(
        &self,
        user_id: &str,
        quiz_id: &str,
        score: f64,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let mut entries = lock(&self.entries, "schedule")?;
        let entry = entries
            .entry(Self::key(user_id, quiz_id))
            .or_insert_with(|| ScheduleEntry {
                interval_days: INITIAL_INTERVAL_DAYS,
                next_review: now,
            });

        entry.interval_days = if score >= PASSING_SCORE {
            entry.interval_days * 2
        } else {
            INITIAL_INTERVAL_DAYS
        };
        entry.next_review = now + Duration::days(entry.interval_days);

        debug!(
            "复习调度更新: 用户 {} 测验 {} 得分 {:.1} → 间隔 {} 天",
            user_id, quiz_id, score, entry.interval_days
        );
        Ok(())
    }

    pub fn get_due_items_at(&self, user_id: &str, now: DateTime<Utc>) -> Result<Vec<DueItem>> {
        let entries = lock(&self.entries, "schedule")?;
        let mut due: Vec<DueItem> = entries
            .iter()
            .filter(|((user, _), entry)| user.as_str() == user_id && entry.next_review <= now)
            .map(|((_, quiz_id), entry)| DueItem {
                quiz_id: quiz_id.clone(),
                next_review: entry.next_review,
            })
            .collect();
        due.sort_by_key(|item| item.next_review);
        Ok(due)
    }
}

impl SpacedRepetition for MemoryScheduler {
    fn initialize_schedule(&self, user_id: &str, quiz_id: &str) -> Result<()> {
        self.initialize_schedule_at(user_id, quiz_id, Utc::now())
    }

    fn update_schedule(&self, user_id: &str, quiz_id: &str, score: f64) -> Result<()> {
        self.update_schedule_at(user_id, quiz_id, score, Utc::now())
    }

    fn get_due_items(&self, user_id: &str) -> Result<Vec<DueItem>> {
        self.get_due_items_at(user_id, Utc::now())
    }

    fn get_next_review_time(&self, user_id: &str, quiz_id: &str) -> Result<Option<DateTime<Utc>>> {
        Ok(lock(&self.entries, "schedule")?
            .get(&Self::key(user_id, quiz_id))
            .map(|entry| entry.next_review))
    }
}
