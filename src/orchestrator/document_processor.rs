//! 单个文档处理器 - 编排层
//!
//! 一份文档的完整处理：识别类型 → 解析 → 分析 → 生成学习材料 → 创建学习会话
//!
//! 解析、分析、会话创建的错误都会终止这份文档的处理；
//! 学习材料生成不会失败（失败时已在生成服务内降级为兜底内容）。

use std::path::Path;

use anyhow::Result;
use tracing::{debug, error, info};

use crate::models::{Analysis, GeneratedContent, LearningSessionResult, ParsedDocument};
use crate::services::{parse_file, ContentAnalyzer, ContentGenerator};
use crate::workflow::{LearningOrchestrator, SessionCtx};

/// 处理文档所需的全部组件，启动时构造一次
pub struct PipelineDeps {
    pub analyzer: ContentAnalyzer,
    pub generator: ContentGenerator,
    pub learning: LearningOrchestrator,
}

/// 单个文档的处理结果
#[derive(Debug, Clone)]
pub struct DocumentOutcome {
    pub document: ParsedDocument,
    pub analysis: Analysis,
    pub content: GeneratedContent,
    pub session: LearningSessionResult,
}

/// 处理单个文档
///
/// # 参数
/// - `path`: 文档路径（按扩展名识别类型）
/// - `ctx`: 学习者与文档ID
/// - `deps`: 处理组件
pub async fn process_document(
    path: &Path,
    ctx: &SessionCtx,
    deps: &PipelineDeps,
) -> Result<DocumentOutcome> {
    let document = parse_file(path).map_err(|e| {
        error!("{} ❌ 文档解析失败: {}", ctx, e);
        e
    })?;
    info!(
        "{} ✓ 解析完成 ({}): {} 个词, {} 个章节",
        ctx,
        document.doc_type.tag(),
        document.word_count(),
        document.sections.len()
    );

    let analysis = deps.analyzer.analyze(&document)?;
    info!(
        "{} ✓ 分析完成: 难度 {}, 建议 {} 道题, 主题 {:?}",
        ctx, analysis.difficulty_level, analysis.suggested_quiz_count, analysis.topics
    );
    debug!("{} 关键概念: {:?}", ctx, analysis.top_concepts(10));

    let content = deps.generator.generate_all(&document.text, &analysis).await;

    let session = deps
        .learning
        .create_learning_session(ctx, &analysis, &content)?;

    Ok(DocumentOutcome {
        document,
        analysis,
        content,
        session,
    })
}
