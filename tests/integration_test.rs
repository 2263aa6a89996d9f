use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use learning_pipeline::infrastructure::{MemoryProgress, MemoryScheduler, MemoryStore};
use learning_pipeline::models::{ActionKind, DifficultyLevel, DocumentType};
use learning_pipeline::services::prompts::{
    MINDMAP_SYSTEM_PROMPT, QUIZ_SYSTEM_PROMPT, SUMMARY_SYSTEM_PROMPT,
};
use learning_pipeline::{
    process_document, App, ChatBackend, ChatMessage, Config, ContentAnalyzer, ContentGenerator,
    LearningOrchestrator, PipelineDeps, ProcessingStats, RuleBasedNlp, SessionCtx,
};

const QUIZ_JSON: &str = r#"```json
[
  {"question": "What controls what enters a cell?", "options": ["Nucleus", "Cell membrane", "Ribosome", "Vacuole"],
   "correct_answer": 1, "explanation": "The membrane is selectively permeable.", "difficulty": "Basic", "concept": "cell membrane"},
  {"question": "Where is DNA stored?", "options": ["Nucleus", "Cytoplasm", "Membrane", "Wall"],
   "correct_answer": 0, "explanation": "DNA lives in the nucleus.", "difficulty": "Intermediate", "concept": "nucleus"},
  {"question": "Invalid", "options": ["only", "three", "options"], "correct_answer": 0}
]
```"#;

const SUMMARY_JSON: &str = r#"{"overview": "Cells are the unit of life.", "main_points": ["Membranes", "Nuclei"],
  "key_takeaways": ["Cells divide"], "complexity_level": "Basic"}"#;

const MINDMAP_JSON: &str = r#"{"central_topic": "The Cell", "branches": [
  {"name": "Structure", "children": [{"name": "Membrane"}, {"name": "Nucleus"}]}]}"#;

/// 按系统提示词返回对应 JSON 的 LLM 替身
struct CannedBackend;

#[async_trait]
impl ChatBackend for CannedBackend {
    async fn complete(&self, messages: &[ChatMessage], _temperature: f32) -> Result<String> {
        let response = match messages[0].content.as_str() {
            QUIZ_SYSTEM_PROMPT => QUIZ_JSON,
            SUMMARY_SYSTEM_PROMPT => SUMMARY_JSON,
            MINDMAP_SYSTEM_PROMPT => MINDMAP_JSON,
            other => anyhow::bail!("unexpected system prompt: {}", other),
        };
        Ok(response.to_string())
    }
}

/// 总是失败的 LLM 替身
struct OfflineBackend;

#[async_trait]
impl ChatBackend for OfflineBackend {
    async fn complete(&self, _messages: &[ChatMessage], _temperature: f32) -> Result<String> {
        anyhow::bail!("connection refused")
    }
}

fn paragraph(style: Option<&str>, text: &str) -> String {
    let props = style
        .map(|s| format!(r#"<w:pPr><w:pStyle w:val="{}"/></w:pPr>"#, s))
        .unwrap_or_default();
    format!("<w:p>{}<w:r><w:t>{}</w:t></w:r></w:p>", props, text)
}

fn write_docx(path: &Path) {
    let body = [
        paragraph(Some("Heading1"), "The Cell"),
        paragraph(
            None,
            "The cell is the basic unit of life. Every cell membrane is selective. \
             The cell membrane is thin and flexible.",
        ),
        paragraph(Some("Heading2"), "Nucleus"),
        paragraph(
            None,
            "The nucleus stores genetic material for the cell. \
             Each nucleus contains chromosomes that carry genetics information.",
        ),
    ]
    .concat();
    let xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
        body
    );

    let mut zip = zip::ZipWriter::new(File::create(path).unwrap());
    zip.start_file("word/document.xml", zip::write::SimpleFileOptions::default())
        .unwrap();
    zip.write_all(xml.as_bytes()).unwrap();
    zip.finish().unwrap();
}

fn deps(backend: Arc<dyn ChatBackend>) -> PipelineDeps {
    PipelineDeps {
        analyzer: ContentAnalyzer::new(Arc::new(RuleBasedNlp::new())),
        generator: ContentGenerator::new(backend),
        learning: LearningOrchestrator::new(
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryScheduler::new()),
            Arc::new(MemoryProgress::new(2)),
        ),
    }
}

#[tokio::test]
async fn test_docx_pipeline_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cells.docx");
    write_docx(&path);

    let deps = deps(Arc::new(CannedBackend));
    let ctx = SessionCtx::new("learner-1", "cells.docx");
    let outcome = process_document(&path, &ctx, &deps).await.unwrap();

    assert_eq!(outcome.document.doc_type, DocumentType::Docx);
    assert_eq!(outcome.document.sections.len(), 2);
    assert_eq!(outcome.document.sections[0].title, "The Cell");
    assert!(!outcome.document.text.contains("Nucleus\n"));

    assert!(outcome.analysis.topics.iter().any(|t| t.name() == "Biology"));
    assert_eq!(outcome.analysis.suggested_quiz_count, 3);
    assert_eq!(outcome.analysis.section_analysis.len(), 2);
    assert!(outcome
        .analysis
        .key_concepts
        .iter()
        .any(|c| c.concept == "cell membrane"));

    // 不合法的第三题被丢弃
    assert_eq!(outcome.content.quiz.len(), 2);
    assert_eq!(outcome.content.summary.complexity_level, Some(DifficultyLevel::Basic));
    assert_eq!(outcome.content.mindmap.branches[0].children.len(), 2);

    let session = &outcome.session;
    assert!(session.next_review.is_some());
    assert!(session.estimated_completion_time >= 16);

    // 作答：第一题答对，第二题答错
    let attempt = deps
        .learning
        .process_quiz_attempt("learner-1", &session.quiz_id, &[1, 2])
        .unwrap();
    assert_eq!(attempt.score, 50.0);
    assert_eq!(attempt.next_action.action, ActionKind::Repeat);
    assert_eq!(
        attempt.improvement_suggestions,
        vec![
            "Focus on understanding rather than memorization.",
            "Try creating your own examples for difficult concepts."
        ]
    );

    let plan = deps.learning.get_learning_plan("learner-1").unwrap();
    assert_eq!(plan.weak_areas, vec!["nucleus"]);
    assert_eq!(plan.recommended_sessions[0].title, "Review: nucleus");
    assert_eq!(plan.daily_goal_progress, 50.0);
    assert_eq!(plan.streak, 1);
    assert_eq!(plan.next_milestone.remaining(), 50);
}

#[tokio::test]
async fn test_offline_llm_degrades_to_fallbacks() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cells.docx");
    write_docx(&path);

    let deps = deps(Arc::new(OfflineBackend));
    let ctx = SessionCtx::new("learner-1", "cells.docx");
    let outcome = process_document(&path, &ctx, &deps).await.unwrap();

    assert_eq!(outcome.content.quiz.len(), 1);
    assert_eq!(outcome.content.quiz[0].correct_answer, 0);
    assert_eq!(outcome.content.quiz[0].difficulty, DifficultyLevel::Basic);
    assert!(outcome.content.summary.overview.starts_with("This document contains approximately"));
    assert_eq!(outcome.content.mindmap.central_topic, "Document Content");

    let attempt = deps
        .learning
        .process_quiz_attempt("learner-1", &outcome.session.quiz_id, &[0])
        .unwrap();
    assert_eq!(attempt.score, 100.0);
    assert_eq!(attempt.next_action.action, ActionKind::Advance);
}

#[tokio::test]
async fn test_unsupported_type_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("slides.pptx");
    std::fs::write(&path, b"not really slides").unwrap();

    let deps = deps(Arc::new(CannedBackend));
    let ctx = SessionCtx::new("learner-1", "slides.pptx");
    let err = process_document(&path, &ctx, &deps).await.unwrap_err();
    assert!(err.to_string().contains("Unsupported file type: pptx"));
}

#[tokio::test]
async fn test_app_processes_folder_and_continues_after_failure() {
    let dir = tempfile::tempdir().unwrap();
    write_docx(&dir.path().join("a_cells.docx"));
    std::fs::write(dir.path().join("b_broken.pdf"), b"%PDF-garbage").unwrap();
    std::fs::write(dir.path().join("c_notes.txt"), b"ignored").unwrap();

    let log_file = dir.path().join("output.txt");
    let config = Config {
        input_folder: dir.path().to_string_lossy().to_string(),
        output_log_file: log_file.to_string_lossy().to_string(),
        ..Config::default()
    };

    let app = App::with_backend(config, Arc::new(CannedBackend)).unwrap();
    let stats = app.run().await.unwrap();
    assert_eq!(
        stats,
        ProcessingStats {
            total: 2,
            success: 1,
            failed: 1
        }
    );

    let log = std::fs::read_to_string(&log_file).unwrap();
    assert!(log.contains("✅ a_cells.docx"));
    assert!(log.contains("❌ b_broken.pdf"));
}

#[tokio::test]
async fn test_app_missing_folder_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        input_folder: dir.path().join("missing").to_string_lossy().to_string(),
        output_log_file: dir.path().join("output.txt").to_string_lossy().to_string(),
        ..Config::default()
    };

    let app = App::with_backend(config, Arc::new(OfflineBackend)).unwrap();
    assert!(app.run().await.is_err());
}
