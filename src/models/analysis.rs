use serde::{Deserialize, Serialize};

use crate::models::topic::Topic;

/// 难度等级
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DifficultyLevel {
    Basic,
    #[default]
    Intermediate,
    Advanced,
}

impl DifficultyLevel {
    pub fn name(self) -> &'static str {
        match self {
            DifficultyLevel::Basic => "Basic",
            DifficultyLevel::Intermediate => "Intermediate",
            DifficultyLevel::Advanced => "Advanced",
        }
    }

    /// 宽松解析（不区分大小写，忽略首尾空白）
    pub fn from_label(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "basic" => Some(DifficultyLevel::Basic),
            "intermediate" => Some(DifficultyLevel::Intermediate),
            "advanced" => Some(DifficultyLevel::Advanced),
            _ => None,
        }
    }

    /// 预计学习时长的难度系数
    pub fn time_multiplier(self) -> f64 {
        match self {
            DifficultyLevel::Basic => 1.0,
            DifficultyLevel::Intermediate => 1.3,
            DifficultyLevel::Advanced => 1.6,
        }
    }
}

impl std::fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// 关键概念
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Concept {
    pub concept: String,
    pub frequency: usize,
    pub importance: f64,
}

impl Concept {
    pub fn new(concept: impl Into<String>, frequency: usize) -> Self {
        Self {
            concept: concept.into(),
            frequency,
            importance: (frequency as f64 * 0.1).min(1.0),
        }
    }
}

/// 章节分析结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionSummary {
    pub title: String,
    pub word_count: usize,
    pub key_points: Vec<String>,
    pub quiz_potential: usize,
}

/// 文档分析结果，每个文档重新计算，不会原地修改
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub key_concepts: Vec<Concept>,
    pub difficulty_level: DifficultyLevel,
    pub topics: Vec<Topic>,
    pub section_analysis: Vec<SectionSummary>,
    pub readability_score: f64,
    pub suggested_quiz_count: usize,
}

impl Analysis {
    /// 前 n 个关键概念的文本
    pub fn top_concepts(&self, n: usize) -> Vec<&str> {
        self.key_concepts
            .iter()
            .take(n)
            .map(|c| c.concept.as_str())
            .collect()
    }
}

/// 宽松的难度字段反序列化
///
/// 接受字符串（大小写不敏感）；无法识别的值视为未知
pub(crate) mod lenient_level {
    use super::DifficultyLevel;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S>(level: &Option<DifficultyLevel>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match level {
            Some(level) => serializer.serialize_str(level.name()),
            None => serializer.serialize_str("Unknown"),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DifficultyLevel>, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};
        use std::fmt;

        struct LevelVisitor;

        impl<'de> Visitor<'de> for LevelVisitor {
            type Value = Option<DifficultyLevel>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a difficulty label")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(DifficultyLevel::from_label(value))
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(None)
            }

            fn visit_i64<E>(self, _: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(None)
            }

            fn visit_u64<E>(self, _: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(None)
            }

            fn visit_f64<E>(self, _: f64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(None)
            }

            fn visit_bool<E>(self, _: bool) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(None)
            }
        }

        deserializer.deserialize_any(LevelVisitor)
    }
}
