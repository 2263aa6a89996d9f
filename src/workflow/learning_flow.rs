//! 学习会话流程 - 流程层
//!
//! 核心职责：把生成好的学习材料变成一次可追踪的学习会话
//!
//! 创建会话的顺序：
//! 1. 会话记录 → 测验 → 摘要 → 思维导图（存储）
//! 2. 初始化复习计划
//! 3. 初始化进度跟踪
//!
//! 任意一步失败都会记录日志后原样返回错误，已完成的步骤不会回滚。

use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use tracing::{error, info};

use crate::error::BusinessError;
use crate::infrastructure::{LearningStore, ProgressTracker, SpacedRepetition};
use crate::models::{
    ActionKind, Analysis, GeneratedContent, LearningPlan, LearningSessionResult, LearningStatus,
    MindMapRecord, Milestone, NextAction, Priority, QuestionResult, QuizAttemptResult, QuizItem,
    QuizRecord, RecommendedSession, SessionRecord, SummaryRecord,
};
use crate::workflow::session_ctx::SessionCtx;

const BASE_MINUTES: f64 = 10.0;
const MINUTES_PER_QUESTION: f64 = 2.0;
const REVIEW_SESSION_MINUTES: u32 = 15;
const MAX_RECOMMENDED_SESSIONS: usize = 3;
const MILESTONES: [u32; 6] = [100, 250, 500, 1000, 2500, 5000];

/// 学习会话编排
///
/// - 不持有文档和生成逻辑
/// - 只依赖存储 / 复习调度 / 进度跟踪三个协作方
pub struct LearningOrchestrator {
    store: Arc<dyn LearningStore>,
    srs: Arc<dyn SpacedRepetition>,
    progress: Arc<dyn ProgressTracker>,
}

impl LearningOrchestrator {
    pub fn new(
        store: Arc<dyn LearningStore>,
        srs: Arc<dyn SpacedRepetition>,
        progress: Arc<dyn ProgressTracker>,
    ) -> Self {
        Self {
            store,
            srs,
            progress,
        }
    }

    /// 创建学习会话并保存全部学习材料
    pub fn create_learning_session(
        &self,
        ctx: &SessionCtx,
        analysis: &Analysis,
        content: &GeneratedContent,
    ) -> Result<LearningSessionResult> {
        self.try_create_session(ctx, analysis, content)
            .map_err(|e| {
                error!("{} ❌ 创建学习会话失败: {}", ctx, e);
                e
            })
    }

    fn try_create_session(
        &self,
        ctx: &SessionCtx,
        analysis: &Analysis,
        content: &GeneratedContent,
    ) -> Result<LearningSessionResult> {
        let session_id = self.store.create_learning_session(SessionRecord {
            user_id: ctx.user_id.clone(),
            document_id: ctx.document_id.clone(),
            created_at: Utc::now(),
            status: LearningStatus::Active,
        })?;

        let quiz_id = self.store.create_quiz(QuizRecord {
            session_id: session_id.clone(),
            questions: content.quiz.clone(),
            created_at: Utc::now(),
        })?;

        let summary_id = self.store.create_summary(SummaryRecord {
            session_id: session_id.clone(),
            content: content.summary.clone(),
            created_at: Utc::now(),
        })?;

        let mindmap_id = self.store.create_mindmap(MindMapRecord {
            session_id: session_id.clone(),
            structure: content.mindmap.clone(),
            created_at: Utc::now(),
        })?;

        self.srs.initialize_schedule(&ctx.user_id, &quiz_id)?;
        self.progress
            .initialize_progress(&ctx.user_id, &session_id, analysis)?;

        let next_review = self.srs.get_next_review_time(&ctx.user_id, &quiz_id)?;
        let estimated_completion_time = estimate_completion_time(analysis);

        info!(
            "{} ✓ 学习会话已创建: {}（测验 {} 道，预计 {} 分钟）",
            ctx,
            session_id,
            content.quiz.len(),
            estimated_completion_time
        );

        Ok(LearningSessionResult {
            session_id,
            quiz_id,
            summary_id,
            mindmap_id,
            next_review,
            estimated_completion_time,
        })
    }

    /// 处理一次测验作答
    ///
    /// 答案按题目顺序一一对应，多出的答案忽略，缺少的题目不计入正确数
    pub fn process_quiz_attempt(
        &self,
        user_id: &str,
        quiz_id: &str,
        answers: &[usize],
    ) -> Result<QuizAttemptResult> {
        let questions = self.store.get_quiz_questions(quiz_id)?;
        if questions.is_empty() {
            return Err(BusinessError::EmptyQuiz {
                quiz_id: quiz_id.to_string(),
            }
            .into());
        }

        let results = grade(&questions, answers);
        let correct_answers = results.iter().filter(|r| r.is_correct).count();
        let score = correct_answers as f64 / questions.len() as f64 * 100.0;

        self.srs.update_schedule(user_id, quiz_id, score)?;
        self.progress
            .record_attempt(user_id, quiz_id, score, &results)?;

        let next_action = determine_next_action(score);
        info!(
            "📝 测验 {} 得分 {:.1}（{}/{}）→ {}",
            quiz_id,
            score,
            correct_answers,
            questions.len(),
            next_action.action.as_str()
        );

        Ok(QuizAttemptResult {
            score,
            correct_answers,
            total_questions: questions.len(),
            next_review: self.srs.get_next_review_time(user_id, quiz_id)?,
            next_action,
            improvement_suggestions: improvement_suggestions(&results),
            results,
        })
    }

    /// 生成个性化学习计划
    pub fn get_learning_plan(&self, user_id: &str) -> Result<LearningPlan> {
        let progress = self.progress.get_user_progress(user_id)?;
        let due_reviews = self.srs.get_due_items(user_id)?;
        let weak_areas = self.progress.get_weak_areas(user_id)?;

        Ok(LearningPlan {
            due_reviews,
            recommended_sessions: recommended_sessions(&weak_areas),
            weak_areas,
            daily_goal_progress: progress.daily_progress,
            streak: progress.streak,
            next_milestone: next_milestone(progress.total_points),
        })
    }
}

fn grade(questions: &[QuizItem], answers: &[usize]) -> Vec<QuestionResult> {
    questions
        .iter()
        .zip(answers)
        .enumerate()
        .map(|(i, (question, &user_answer))| QuestionResult {
            question_id: i,
            user_answer,
            correct_answer: question.correct_answer,
            is_correct: question.correct_answer == user_answer,
            explanation: question.explanation.clone(),
            concept: question.concept.clone(),
        })
        .collect()
}

/// 预计完成时间（分钟）：10 × 难度系数 + 题量 × 2，向下取整
pub fn estimate_completion_time(analysis: &Analysis) -> u32 {
    let minutes = BASE_MINUTES * analysis.difficulty_level.time_multiplier()
        + analysis.suggested_quiz_count as f64 * MINUTES_PER_QUESTION;
    minutes.floor() as u32
}

pub fn determine_next_action(score: f64) -> NextAction {
    let (action, message) = if score >= 90.0 {
        (ActionKind::Advance, "Excellent! Ready for new material.")
    } else if score >= 70.0 {
        (ActionKind::ReviewWeak, "Good job! Review weak areas before advancing.")
    } else {
        (ActionKind::Repeat, "Practice more with this material before advancing.")
    };
    NextAction {
        action,
        message: message.to_string(),
    }
}

/// 最多 3 条改进建议，最后一条总是通用建议
pub fn improvement_suggestions(results: &[QuestionResult]) -> Vec<String> {
    let incorrect = results.iter().filter(|r| !r.is_correct).count();
    let mut suggestions = Vec::new();

    if incorrect as f64 > results.len() as f64 * 0.5 {
        suggestions.push(
            "Consider reviewing the fundamental concepts before retaking the quiz.".to_string(),
        );
    }
    if incorrect > 0 {
        suggestions.push("Focus on understanding rather than memorization.".to_string());
    }
    suggestions.push("Try creating your own examples for difficult concepts.".to_string());
    suggestions
}

pub fn recommended_sessions(weak_areas: &[String]) -> Vec<RecommendedSession> {
    weak_areas
        .iter()
        .take(MAX_RECOMMENDED_SESSIONS)
        .map(|area| RecommendedSession {
            title: format!("Review: {}", area),
            estimated_time: REVIEW_SESSION_MINUTES,
            priority: Priority::High,
        })
        .collect()
}

pub fn next_milestone(current: u32) -> Milestone {
    match MILESTONES.iter().find(|&&target| current < target) {
        Some(&target) => Milestone::Next {
            target,
            current,
            remaining: target - current,
            progress_percentage: current as f64 / target as f64 * 100.0,
        },
        None => Milestone::Master { current },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::{MemoryProgress, MemoryScheduler, MemoryStore};
    use crate::models::{
        Concept, DifficultyLevel, MindMap, QuizItem, Summary, Topic,
    };

    fn analysis(level: DifficultyLevel, quiz_count: usize) -> Analysis {
        Analysis {
            key_concepts: vec![Concept::new("cell membrane", 3)],
            difficulty_level: level,
            topics: vec![Topic::Biology],
            section_analysis: vec![],
            readability_score: 0.8,
            suggested_quiz_count: quiz_count,
        }
    }

    fn question(correct_answer: usize, concept: &str) -> QuizItem {
        QuizItem {
            question: format!("Question about {}?", concept),
            options: ["a", "b", "c", "d"].map(String::from),
            correct_answer,
            explanation: format!("Because of {}.", concept),
            difficulty: DifficultyLevel::Basic,
            concept: concept.to_string(),
        }
    }

    fn content(quiz: Vec<QuizItem>) -> GeneratedContent {
        GeneratedContent {
            quiz,
            summary: Summary {
                overview: "Cells.".to_string(),
                main_points: vec![],
                key_takeaways: vec![],
                complexity_level: Some(DifficultyLevel::Basic),
            },
            mindmap: MindMap {
                central_topic: "Cells".to_string(),
                branches: vec![],
            },
        }
    }

    struct Fixture {
        store: Arc<MemoryStore>,
        progress: Arc<MemoryProgress>,
        orchestrator: LearningOrchestrator,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let progress = Arc::new(MemoryProgress::new(3));
        let orchestrator = LearningOrchestrator::new(
            store.clone(),
            Arc::new(MemoryScheduler::new()),
            progress.clone(),
        );
        Fixture {
            store,
            progress,
            orchestrator,
        }
    }

    fn four_questions() -> Vec<QuizItem> {
        vec![
            question(0, "osmosis"),
            question(1, "mitosis"),
            question(2, "osmosis"),
            question(3, "enzymes"),
        ]
    }

    #[test]
    fn test_next_action_thresholds() {
        assert_eq!(determine_next_action(95.0).action, ActionKind::Advance);
        assert_eq!(determine_next_action(90.0).action, ActionKind::Advance);
        assert_eq!(determine_next_action(75.0).action, ActionKind::ReviewWeak);
        assert_eq!(determine_next_action(70.0).action, ActionKind::ReviewWeak);
        assert_eq!(determine_next_action(50.0).action, ActionKind::Repeat);
        assert_eq!(
            determine_next_action(50.0).message,
            "Practice more with this material before advancing."
        );
    }

    #[test]
    fn test_estimate_completion_time() {
        assert_eq!(estimate_completion_time(&analysis(DifficultyLevel::Basic, 3)), 16);
        assert_eq!(estimate_completion_time(&analysis(DifficultyLevel::Intermediate, 5)), 23);
        assert_eq!(estimate_completion_time(&analysis(DifficultyLevel::Advanced, 10)), 36);
    }

    #[test]
    fn test_improvement_suggestions() {
        let result = |is_correct: bool| QuestionResult {
            question_id: 0,
            user_answer: 0,
            correct_answer: 0,
            is_correct,
            explanation: String::new(),
            concept: "General".to_string(),
        };

        let all_right = improvement_suggestions(&[result(true), result(true)]);
        assert_eq!(all_right, vec!["Try creating your own examples for difficult concepts."]);

        // 恰好一半答错不触发"复习基础"
        let half = improvement_suggestions(&[result(true), result(false)]);
        assert_eq!(half.len(), 2);
        assert_eq!(half[0], "Focus on understanding rather than memorization.");

        let mostly_wrong = improvement_suggestions(&[result(false), result(false), result(true)]);
        assert_eq!(mostly_wrong.len(), 3);
        assert!(mostly_wrong[0].starts_with("Consider reviewing the fundamental concepts"));
    }

    #[test]
    fn test_next_milestone() {
        assert_eq!(
            next_milestone(0),
            Milestone::Next {
                target: 100,
                current: 0,
                remaining: 100,
                progress_percentage: 0.0
            }
        );
        let milestone = next_milestone(300);
        assert_eq!(milestone.remaining(), 200);
        assert!((milestone.progress_percentage() - 60.0).abs() < 1e-9);
        // 恰好达到阈值时指向下一个
        assert!(matches!(next_milestone(100), Milestone::Next { target: 250, .. }));
        assert_eq!(next_milestone(5000), Milestone::Master { current: 5000 });
        assert_eq!(next_milestone(7000).remaining(), 0);
        assert_eq!(next_milestone(7000).progress_percentage(), 100.0);
    }

    #[test]
    fn test_recommended_sessions_capped() {
        let areas: Vec<String> = ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect();
        let sessions = recommended_sessions(&areas);
        assert_eq!(sessions.len(), 3);
        assert_eq!(sessions[0].title, "Review: a");
        assert_eq!(sessions[0].estimated_time, 15);
        assert_eq!(sessions[0].priority, Priority::High);
    }

    #[test]
    fn test_create_learning_session_stores_everything() {
        let f = fixture();
        let ctx = SessionCtx::new("u-1", "cells.pdf");

        let result = f
            .orchestrator
            .create_learning_session(
                &ctx,
                &analysis(DifficultyLevel::Intermediate, 5),
                &content(four_questions()),
            )
            .unwrap();

        let session = f.store.session(&result.session_id).unwrap();
        assert_eq!(session.document_id, "cells.pdf");
        assert_eq!(session.status, LearningStatus::Active);
        assert_eq!(f.store.summary(&result.summary_id).unwrap().session_id, result.session_id);
        assert_eq!(f.store.mindmap(&result.mindmap_id).unwrap().structure.central_topic, "Cells");
        assert_eq!(f.store.get_quiz_questions(&result.quiz_id).unwrap().len(), 4);
        assert_eq!(f.progress.tracked_sessions("u-1"), 1);
        assert!(result.next_review.unwrap() > Utc::now());
        assert_eq!(result.estimated_completion_time, 23);
    }

    #[test]
    fn test_process_quiz_attempt_scores() {
        let f = fixture();
        let ctx = SessionCtx::new("u-1", "cells.pdf");
        let session = f
            .orchestrator
            .create_learning_session(
                &ctx,
                &analysis(DifficultyLevel::Basic, 4),
                &content(four_questions()),
            )
            .unwrap();

        let attempt = f
            .orchestrator
            .process_quiz_attempt("u-1", &session.quiz_id, &[0, 1, 0, 0])
            .unwrap();
        assert_eq!(attempt.correct_answers, 2);
        assert_eq!(attempt.total_questions, 4);
        assert_eq!(attempt.score, 50.0);
        assert_eq!(attempt.next_action.action, ActionKind::Repeat);
        assert_eq!(attempt.improvement_suggestions.len(), 2);
        assert!(!attempt.results[2].is_correct);
        assert_eq!(attempt.results[2].explanation, "Because of osmosis.");

        let attempt = f
            .orchestrator
            .process_quiz_attempt("u-1", &session.quiz_id, &[0, 1, 2, 0])
            .unwrap();
        assert_eq!(attempt.score, 75.0);
        assert_eq!(attempt.next_action.action, ActionKind::ReviewWeak);

        let attempt = f
            .orchestrator
            .process_quiz_attempt("u-1", &session.quiz_id, &[0, 1, 2, 3, 3])
            .unwrap();
        assert_eq!(attempt.score, 100.0);
        assert_eq!(attempt.results.len(), 4);
        assert_eq!(attempt.next_action.action, ActionKind::Advance);
    }

    #[test]
    fn test_process_quiz_attempt_short_answers() {
        let f = fixture();
        let ctx = SessionCtx::new("u-1", "cells.pdf");
        let session = f
            .orchestrator
            .create_learning_session(
                &ctx,
                &analysis(DifficultyLevel::Basic, 4),
                &content(four_questions()),
            )
            .unwrap();

        // 只答了两题：分母仍是题目总数
        let attempt = f
            .orchestrator
            .process_quiz_attempt("u-1", &session.quiz_id, &[0, 1])
            .unwrap();
        assert_eq!(attempt.results.len(), 2);
        assert_eq!(attempt.score, 50.0);
    }

    #[test]
    fn test_process_quiz_attempt_errors() {
        let f = fixture();
        let err = f
            .orchestrator
            .process_quiz_attempt("u-1", "missing", &[0])
            .unwrap_err();
        assert!(err.to_string().contains("missing"));

        let ctx = SessionCtx::new("u-1", "empty.pdf");
        let session = f
            .orchestrator
            .create_learning_session(&ctx, &analysis(DifficultyLevel::Basic, 3), &content(vec![]))
            .unwrap();
        let err = f
            .orchestrator
            .process_quiz_attempt("u-1", &session.quiz_id, &[])
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BusinessError>(),
            Some(BusinessError::EmptyQuiz { .. })
        ));
    }

    #[test]
    fn test_learning_plan_after_attempts() {
        let f = fixture();
        let ctx = SessionCtx::new("u-1", "cells.pdf");
        let session = f
            .orchestrator
            .create_learning_session(
                &ctx,
                &analysis(DifficultyLevel::Basic, 4),
                &content(four_questions()),
            )
            .unwrap();
        f.orchestrator
            .process_quiz_attempt("u-1", &session.quiz_id, &[0, 0, 0, 3])
            .unwrap();

        let plan = f.orchestrator.get_learning_plan("u-1").unwrap();
        assert_eq!(plan.weak_areas, vec!["mitosis", "osmosis"]);
        assert_eq!(plan.recommended_sessions[0].title, "Review: mitosis");
        assert_eq!(plan.streak, 1);
        assert_eq!(plan.next_milestone.remaining(), 50);
        assert!(plan.due_reviews.is_empty());
        assert!((plan.daily_goal_progress - 100.0 / 3.0).abs() < 1e-9);
    }

    /// 摘要写入失败的存储，用于验证失败时不回滚
    struct SummaryFailingStore {
        inner: MemoryStore,
    }

    impl LearningStore for SummaryFailingStore {
        fn create_learning_session(&self, record: SessionRecord) -> Result<String> {
            self.inner.create_learning_session(record)
        }
        fn create_quiz(&self, record: QuizRecord) -> Result<String> {
            self.inner.create_quiz(record)
        }
        fn create_summary(&self, _record: SummaryRecord) -> Result<String> {
            Err(crate::error::AppError::storage_unavailable("disk full").into())
        }
        fn create_mindmap(&self, record: MindMapRecord) -> Result<String> {
            self.inner.create_mindmap(record)
        }
        fn get_quiz_questions(&self, quiz_id: &str) -> Result<Vec<QuizItem>> {
            self.inner.get_quiz_questions(quiz_id)
        }
    }

    #[test]
    fn test_create_session_failure_keeps_earlier_steps() {
        let store = Arc::new(SummaryFailingStore {
            inner: MemoryStore::new(),
        });
        let progress = Arc::new(MemoryProgress::new(3));
        let orchestrator = LearningOrchestrator::new(
            store.clone(),
            Arc::new(MemoryScheduler::new()),
            progress.clone(),
        );

        let err = orchestrator
            .create_learning_session(
                &SessionCtx::new("u-1", "cells.pdf"),
                &analysis(DifficultyLevel::Basic, 3),
                &content(four_questions()),
            )
            .unwrap_err();

        assert!(err.to_string().contains("disk full"));
        assert_eq!(store.inner.session_count(), 1);
        assert_eq!(progress.tracked_sessions("u-1"), 0);
    }
}
