pub mod analysis;
pub mod artifacts;
pub mod document;
pub mod session;
pub mod topic;

pub use analysis::{Analysis, Concept, DifficultyLevel, SectionSummary};
pub use artifacts::{GeneratedContent, MindMap, MindMapBranch, MindMapNode, QuizItem, Summary};
pub use document::{DocumentType, ParsedDocument, Section};
pub use session::{
    ActionKind, DueItem, LearningPlan, LearningSessionResult, LearningStatus, MindMapRecord,
    Milestone, NextAction, Priority, QuestionResult, QuizAttemptResult, QuizRecord,
    RecommendedSession, SessionRecord, SummaryRecord, UserProgress,
};
pub use topic::Topic;
