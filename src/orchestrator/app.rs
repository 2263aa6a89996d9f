//! 批量文档处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责扫描输入目录并逐个处理文档。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：写日志文件头，构造 NLP 引擎、LLM 服务和协作方（只构造一次）
//! 2. **扫描目录**：找出所有 `.pdf` / `.docx` 文件（按文件名排序）
//! 3. **顺序处理**：逐个委托 `document_processor` 处理，单个文档失败不影响后续文档
//! 4. **全局统计**：汇总成功 / 失败数量

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::fs;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::BusinessError;
use crate::infrastructure::{MemoryProgress, MemoryScheduler, MemoryStore, RuleBasedNlp};
use crate::models::DocumentType;
use crate::orchestrator::document_processor::{process_document, DocumentOutcome, PipelineDeps};
use crate::services::{ChatBackend, ContentAnalyzer, ContentGenerator, LlmService};
use crate::utils::logging::{
    append_log_line, init_log_file, log_document_start, log_documents_found, log_startup,
    print_final_stats,
};
use crate::workflow::{LearningOrchestrator, SessionCtx};

/// 全局处理统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingStats {
    pub total: usize,
    pub success: usize,
    pub failed: usize,
}

/// 应用主结构
pub struct App {
    config: Config,
    deps: PipelineDeps,
}

impl App {
    /// 初始化应用，使用真实 LLM 服务和内存协作方
    pub fn initialize(config: Config) -> Result<Self> {
        let backend: Arc<dyn ChatBackend> = Arc::new(LlmService::new(&config));
        Self::with_backend(config, backend)
    }

    /// 使用指定的 LLM 后端初始化应用
    pub fn with_backend(config: Config, backend: Arc<dyn ChatBackend>) -> Result<Self> {
        init_log_file(&config.output_log_file)?;
        log_startup(&config.input_folder, &config.llm_model_name);

        let deps = PipelineDeps {
            analyzer: ContentAnalyzer::new(Arc::new(RuleBasedNlp::new())),
            generator: ContentGenerator::new(backend),
            learning: LearningOrchestrator::new(
                Arc::new(MemoryStore::new()),
                Arc::new(MemoryScheduler::new()),
                Arc::new(MemoryProgress::new(config.daily_goal)),
            ),
        };

        Ok(Self { config, deps })
    }

    /// 学习会话编排器（用于处理后续的测验作答和学习计划）
    pub fn learning(&self) -> &LearningOrchestrator {
        &self.deps.learning
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<ProcessingStats> {
        info!("\n📁 正在扫描待处理的文档...");
        let documents = scan_documents(Path::new(&self.config.input_folder)).await?;

        if documents.is_empty() {
            warn!("⚠️ 没有找到待处理的 PDF / DOCX 文件，程序结束");
            return Ok(ProcessingStats::default());
        }

        let total = documents.len();
        log_documents_found(total);

        let mut stats = ProcessingStats {
            total,
            ..Default::default()
        };

        for (idx, path) in documents.iter().enumerate() {
            let name = file_name(path);
            log_document_start(idx + 1, total, &name);

            let ctx = SessionCtx::new(&self.config.user_id, &name);
            match process_document(path, &ctx, &self.deps).await {
                Ok(outcome) => {
                    stats.success += 1;
                    self.log_outcome(&ctx, &outcome);
                    append_log_line(
                        &self.config.output_log_file,
                        &format!(
                            "✅ {} → 会话 {}（测验 {} 道，预计 {} 分钟）",
                            name,
                            outcome.session.session_id,
                            outcome.content.quiz.len(),
                            outcome.session.estimated_completion_time
                        ),
                    )?;
                }
                Err(e) => {
                    stats.failed += 1;
                    error!("{} ❌ 处理过程中发生错误: {}", ctx, e);
                    append_log_line(&self.config.output_log_file, &format!("❌ {} → {}", name, e))?;
                }
            }
        }

        print_final_stats(stats.success, stats.failed, stats.total, &self.config.output_log_file);
        Ok(stats)
    }

    fn log_outcome(&self, ctx: &SessionCtx, outcome: &DocumentOutcome) {
        info!(
            "{} ✅ 处理完成: 会话 {}，测验 {} 道",
            ctx,
            outcome.session.session_id,
            outcome.content.quiz.len()
        );

        if self.config.verbose_logging {
            info!("  概览: {}", outcome.content.summary.overview);
            info!("  关键概念: {:?}", outcome.analysis.top_concepts(5));
            info!("  可读性: {:.2}", outcome.analysis.readability_score);
            for (i, item) in outcome.content.quiz.iter().enumerate() {
                info!("  Q{}: {}", i + 1, item.question);
            }
        }
    }
}

/// 扫描目录下所有支持的文档，按文件名排序
pub async fn scan_documents(folder: &Path) -> Result<Vec<PathBuf>> {
    if !folder.is_dir() {
        return Err(BusinessError::FolderNotFound {
            path: folder.display().to_string(),
        }
        .into());
    }

    let mut documents = Vec::new();
    let mut entries = fs::read_dir(folder)
        .await
        .with_context(|| format!("无法读取文件夹: {}", folder.display()))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.is_file() && DocumentType::from_path(&path).is_ok() {
            documents.push(path);
        }
    }

    documents.sort();
    Ok(documents)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
