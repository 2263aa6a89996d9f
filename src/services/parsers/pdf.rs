//! PDF 解析
//!
//! 使用 lopdf 逐页抽取文本并读取 Info 字典中的标题

use std::path::Path;

use anyhow::Result;
use lopdf::{Document, Object};
use serde_json::json;
use tracing::{debug, error};

use crate::error::ParseError;
use crate::models::{DocumentType, ParsedDocument};
use crate::services::parsers::{extract_sections, DocumentParser};

#[derive(Debug, Default, Clone)]
pub struct PdfParser;

impl PdfParser {
    pub fn new() -> Self {
        Self
    }

    fn parse_inner(&self, path: &Path) -> Result<ParsedDocument> {
        let pdf_error = |source: lopdf::Error| ParseError::PdfExtractFailed {
            path: path.display().to_string(),
            source: Box::new(source),
        };

        let doc = Document::load(path).map_err(pdf_error)?;
        let title = pdf_title(&doc).unwrap_or_else(|| "Unknown".to_string());

        let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
        let mut pages = Vec::with_capacity(page_numbers.len());
        for page_num in &page_numbers {
            let page_text = doc.extract_text(&[*page_num]).map_err(pdf_error)?;
            pages.push((*page_num, page_text));
        }
        debug!("PDF {} 共 {} 页", path.display(), page_numbers.len());

        let text = assemble_pages(&pages);
        let sections = extract_sections(&text);

        let mut metadata = serde_json::Map::new();
        metadata.insert("pages".to_string(), json!(page_numbers.len()));
        metadata.insert("title".to_string(), json!(title));

        Ok(ParsedDocument {
            text: text.trim().to_string(),
            sections,
            metadata,
            doc_type: DocumentType::Pdf,
        })
    }
}

impl DocumentParser for PdfParser {
    fn parse(&self, path: &Path) -> Result<ParsedDocument> {
        self.parse_inner(path).map_err(|e| {
            error!("PDF parsing error: {}", e);
            e
        })
    }
}

/// 拼接非空页面，每页前加页码标记
pub(crate) fn assemble_pages(pages: &[(u32, String)]) -> String {
    let mut text = String::new();
    for (page_num, page_text) in pages {
        if page_text.trim().is_empty() {
            continue;
        }
        text.push_str(&format!("\n--- Page {} ---\n{}", page_num, page_text));
    }
    text
}

/// 读取 Info 字典中的 /Title
fn pdf_title(doc: &Document) -> Option<String> {
    let info = match doc.trailer.get(b"Info").ok()? {
        Object::Reference(id) => doc.get_object(*id).ok()?,
        other => other,
    };
    let Object::Dictionary(info) = info else {
        return None;
    };

    match info.get(b"Title").ok()? {
        // 先尝试 UTF-8，再退回 Latin-1
        Object::String(bytes, _) => String::from_utf8(bytes.clone())
            .ok()
            .or_else(|| Some(bytes.iter().map(|&b| b as char).collect())),
        _ => None,
    }
}
