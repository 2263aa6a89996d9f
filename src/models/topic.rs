/// 学科主题枚举
///
/// 声明顺序即主题识别结果的输出顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Topic {
    Biology,
    Chemistry,
    Physics,
    Mathematics,
    History,
    Literature,
}

impl Topic {
    /// 按声明顺序排列的全部主题
    pub const ALL: [Topic; 6] = [
        Topic::Biology,
        Topic::Chemistry,
        Topic::Physics,
        Topic::Mathematics,
        Topic::History,
        Topic::Literature,
    ];

    /// 获取标准名称
    pub fn name(self) -> &'static str {
        match self {
            Topic::Biology => "Biology",
            Topic::Chemistry => "Chemistry",
            Topic::Physics => "Physics",
            Topic::Mathematics => "Mathematics",
            Topic::History => "History",
            Topic::Literature => "Literature",
        }
    }

    /// 该主题的识别关键词（小写）
    pub fn keywords(self) -> &'static [&'static str; 5] {
        match self {
            Topic::Biology => &["cell", "organism", "evolution", "genetics", "ecosystem"],
            Topic::Chemistry => &["molecule", "atom", "reaction", "compound", "element"],
            Topic::Physics => &["energy", "force", "motion", "wave", "particle"],
            Topic::Mathematics => &["equation", "theorem", "proof", "function", "variable"],
            Topic::History => &["century", "war", "empire", "revolution", "civilization"],
            Topic::Literature => &["author", "novel", "poem", "character", "theme"],
        }
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
