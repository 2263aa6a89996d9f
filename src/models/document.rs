use std::path::Path;

use phf::phf_map;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// 文档类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Pdf,
    Docx,
}

/// 类型标签 → 文档类型（标签统一小写）
static DOCUMENT_TYPES: phf::Map<&'static str, DocumentType> = phf_map! {
    "pdf" => DocumentType::Pdf,
    "docx" => DocumentType::Docx,
};

impl DocumentType {
    /// 从类型标签解析（不区分大小写），未知标签返回错误而不是默认值
    pub fn from_tag(tag: &str) -> AppResult<Self> {
        DOCUMENT_TYPES
            .get(tag.to_lowercase().as_str())
            .copied()
            .ok_or_else(|| AppError::unsupported_file_type(tag))
    }

    /// 根据文件扩展名判断类型
    pub fn from_path(path: &Path) -> AppResult<Self> {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default();
        Self::from_tag(ext)
    }

    pub fn tag(self) -> &'static str {
        match self {
            DocumentType::Pdf => "pdf",
            DocumentType::Docx => "docx",
        }
    }
}

/// 文档中的一个章节（保持文档顺序）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    pub content: String,
}

impl Section {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

/// 解析器产出的文档，产出后不再修改
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedDocument {
    pub text: String,
    pub sections: Vec<Section>,
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
}

impl ParsedDocument {
    /// 不带元数据的文档，主要用于直接分析已有文本
    pub fn from_text(
        text: impl Into<String>,
        sections: Vec<Section>,
        doc_type: DocumentType,
    ) -> Self {
        Self {
            text: text.into(),
            sections,
            metadata: serde_json::Map::new(),
            doc_type,
        }
    }

    /// 按空白切分的词数
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseError;

    #[test]
    fn test_from_tag_case_insensitive() {
        assert_eq!(DocumentType::from_tag("PDF").unwrap(), DocumentType::Pdf);
        assert_eq!(DocumentType::from_tag("docx").unwrap(), DocumentType::Docx);
    }

    #[test]
    fn test_from_tag_unknown_is_error() {
        let err = DocumentType::from_tag("pptx").unwrap_err();
        assert!(matches!(
            err,
            AppError::Parse(ParseError::UnsupportedFileType { ref file_type })
                if file_type == "pptx"
        ));
    }

    #[test]
    fn test_from_path() {
        assert_eq!(
            DocumentType::from_path(Path::new("notes/cells.Docx")).unwrap(),
            DocumentType::Docx
        );
        assert!(DocumentType::from_path(Path::new("README")).is_err());
    }
}
