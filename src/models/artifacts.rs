use serde::{Deserialize, Serialize};

use crate::models::analysis::{lenient_level, DifficultyLevel};

/// 单道测验题
///
/// 只有通过结构校验的题目才会被构造出来，选项固定为 4 个
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizItem {
    pub question: String,
    pub options: [String; 4],
    pub correct_answer: usize,
    pub explanation: String,
    pub difficulty: DifficultyLevel,
    pub concept: String,
}

/// 文档摘要
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub main_points: Vec<String>,
    #[serde(default)]
    pub key_takeaways: Vec<String>,
    /// `None` 表示未知（序列化为 "Unknown"）
    #[serde(default, with = "lenient_level")]
    pub complexity_level: Option<DifficultyLevel>,
}

/// 思维导图叶子节点
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MindMapNode {
    pub name: String,
}

/// 思维导图分支
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MindMapBranch {
    pub name: String,
    #[serde(default)]
    pub children: Vec<MindMapNode>,
}

/// 思维导图
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MindMap {
    #[serde(default)]
    pub central_topic: String,
    #[serde(default)]
    pub branches: Vec<MindMapBranch>,
}

/// 一份文档生成的全部学习材料
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedContent {
    pub quiz: Vec<QuizItem>,
    pub summary: Summary,
    pub mindmap: MindMap,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_lenient_complexity() {
        let summary: Summary = serde_json::from_str(
            r#"{"overview":"o","main_points":["a"],"key_takeaways":[],"complexity_level":"advanced"}"#,
        )
        .unwrap();
        assert_eq!(summary.complexity_level, Some(DifficultyLevel::Advanced));

        let summary: Summary =
            serde_json::from_str(r#"{"overview":"o","complexity_level":"Basic|Intermediate|Advanced"}"#)
                .unwrap();
        assert_eq!(summary.complexity_level, None);
        assert!(summary.main_points.is_empty());
    }

    #[test]
    fn test_unknown_complexity_serializes_as_unknown() {
        let summary = Summary {
            overview: String::new(),
            main_points: vec![],
            key_takeaways: vec![],
            complexity_level: None,
        };
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["complexity_level"], "Unknown");
    }

    #[test]
    fn test_mindmap_children_default() {
        let map: MindMap =
            serde_json::from_str(r#"{"central_topic":"Cells","branches":[{"name":"Membrane"}]}"#)
                .unwrap();
        assert_eq!(map.branches.len(), 1);
        assert!(map.branches[0].children.is_empty());
    }
}
