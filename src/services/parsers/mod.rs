//! 文档解析 - 业务能力层
//!
//! 按类型标签选择解析器，产出 `ParsedDocument`：
//! - `pdf` → `PdfParser`
//! - `docx` → `DocxParser`
//!
//! 未知类型是显式错误，不会回退到默认解析器。

pub mod docx;
pub mod pdf;
pub mod sections;

pub use docx::DocxParser;
pub use pdf::PdfParser;
pub use sections::extract_sections;

use std::path::Path;

use anyhow::Result;

use crate::error::AppResult;
use crate::models::{DocumentType, ParsedDocument};

/// 文档解析能力
pub trait DocumentParser: Send + Sync {
    fn parse(&self, path: &Path) -> Result<ParsedDocument>;
}

/// 解析器工厂
pub struct ParserFactory;

impl ParserFactory {
    /// 按类型标签获取解析器（不区分大小写）
    pub fn get_parser(file_type: &str) -> AppResult<Box<dyn DocumentParser>> {
        Ok(Self::for_type(DocumentType::from_tag(file_type)?))
    }

    pub fn for_type(doc_type: DocumentType) -> Box<dyn DocumentParser> {
        match doc_type {
            DocumentType::Pdf => Box::new(PdfParser::new()),
            DocumentType::Docx => Box::new(DocxParser::new()),
        }
    }
}

/// 根据扩展名选择解析器并解析文件
pub fn parse_file(path: &Path) -> Result<ParsedDocument> {
    let doc_type = DocumentType::from_path(path)?;
    ParserFactory::for_type(doc_type).parse(path)
}
