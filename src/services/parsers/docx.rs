//! DOCX 解析
//!
//! DOCX 是 ZIP 包，正文在 `word/document.xml`。
//! 只遍历正文顶层段落（表格内段落不计入），`w:pStyle` 以 `Heading` 开头的段落视为章节标题。

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::Result;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde_json::json;
use tracing::{debug, error};
use zip::ZipArchive;

use crate::error::{AppError, ParseError};
use crate::models::{DocumentType, ParsedDocument, Section};
use crate::services::parsers::DocumentParser;

/// `word/document.xml` 中的一个段落
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct DocxParagraph {
    pub style: Option<String>,
    pub text: String,
}

impl DocxParagraph {
    fn is_heading(&self) -> bool {
        self.style
            .as_deref()
            .map(|s| s.starts_with("Heading"))
            .unwrap_or(false)
    }
}

#[derive(Debug, Default, Clone)]
pub struct DocxParser;

impl DocxParser {
    pub fn new() -> Self {
        Self
    }

    fn parse_inner(&self, path: &Path) -> Result<ParsedDocument> {
        let docx_error = |message: String| ParseError::DocxFailed {
            path: path.display().to_string(),
            message,
        };

        let file = File::open(path)
            .map_err(|source| AppError::file_read_failed(path.display().to_string(), source))?;
        let mut archive = ZipArchive::new(file)
            .map_err(|e| docx_error(format!("无法作为 ZIP 打开: {}", e)))?;

        let mut xml = String::new();
        archive
            .by_name("word/document.xml")
            .map_err(|e| docx_error(format!("缺少 word/document.xml: {}", e)))?
            .read_to_string(&mut xml)
            .map_err(|e| docx_error(format!("读取 word/document.xml 失败: {}", e)))?;

        let paragraphs =
            parse_document_xml(&xml).map_err(|e| docx_error(format!("XML 解析失败: {}", e)))?;
        debug!("DOCX {} 共 {} 个段落", path.display(), paragraphs.len());

        Ok(build_document(&paragraphs))
    }
}

impl DocumentParser for DocxParser {
    fn parse(&self, path: &Path) -> Result<ParsedDocument> {
        self.parse_inner(path).map_err(|e| {
            error!("DOCX parsing error: {}", e);
            e
        })
    }
}

/// 由段落列表组装文档
///
/// 标题段落开启新章节且不计入正文；其他段落计入正文，并追加到最近的章节。
/// 第一个标题之前的段落不属于任何章节。
pub(crate) fn build_document(paragraphs: &[DocxParagraph]) -> ParsedDocument {
    let mut text = String::new();
    let mut sections: Vec<Section> = Vec::new();

    for paragraph in paragraphs {
        if paragraph.is_heading() {
            sections.push(Section::new(paragraph.text.clone(), ""));
        } else {
            text.push_str(&paragraph.text);
            text.push('\n');
            if let Some(last) = sections.last_mut() {
                last.content.push_str(&paragraph.text);
                last.content.push(' ');
            }
        }
    }

    let mut metadata = serde_json::Map::new();
    metadata.insert("paragraphs".to_string(), json!(paragraphs.len()));

    ParsedDocument {
        text: text.trim().to_string(),
        sections,
        metadata,
        doc_type: DocumentType::Docx,
    }
}

/// 按 key 取属性值
fn get_attr(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .filter_map(|a| a.ok())
        .find(|a| a.key.as_ref() == key)
        .map(|a| String::from_utf8_lossy(&a.value).to_string())
}

/// 解析 `word/document.xml`，返回正文顶层段落
pub(crate) fn parse_document_xml(xml: &str) -> Result<Vec<DocxParagraph>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);

    let mut paragraphs = Vec::new();
    let mut current: Option<DocxParagraph> = None;
    let mut table_depth = 0usize;
    let mut in_run = false;
    let mut in_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:tbl" => table_depth += 1,
                b"w:p" if table_depth == 0 => current = Some(DocxParagraph::default()),
                b"w:pStyle" => set_style(&mut current, &e),
                b"w:r" => in_run = true,
                b"w:t" => in_text = current.is_some(),
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:p" if table_depth == 0 => paragraphs.push(DocxParagraph::default()),
                b"w:pStyle" => set_style(&mut current, &e),
                // pPr 中的 w:tab 是制表位定义，只有 run 内的才是字符
                b"w:tab" if in_run => push_text(&mut current, "\t"),
                b"w:br" | b"w:cr" if in_run => push_text(&mut current, "\n"),
                _ => {}
            },
            Event::Text(e) if in_text => {
                let text = e.unescape()?;
                push_text(&mut current, &text);
            }
            Event::End(e) => match e.name().as_ref() {
                b"w:tbl" => table_depth = table_depth.saturating_sub(1),
                b"w:r" => in_run = false,
                b"w:t" => in_text = false,
                b"w:p" if table_depth == 0 => {
                    if let Some(paragraph) = current.take() {
                        paragraphs.push(paragraph);
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}

fn set_style(current: &mut Option<DocxParagraph>, e: &BytesStart) {
    if let Some(paragraph) = current.as_mut() {
        paragraph.style = get_attr(e, b"w:val");
    }
}

fn push_text(current: &mut Option<DocxParagraph>, text: &str) {
    if let Some(paragraph) = current.as_mut() {
        paragraph.text.push_str(text);
    }
}
