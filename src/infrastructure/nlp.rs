//! NLP 引擎 - 基础设施层
//!
//! 进程级只读资源：启动时构造一次，以 `Arc<dyn NlpEngine>` 共享给需要的组件
//!
//! 默认实现 `RuleBasedNlp` 是纯规则的：
//! - 正则分词，标记字母 / 标点
//! - 以 `.` `!` `?` 词元切分句子
//! - 名词短语：句内连续的、非功能词的字母词元，遇到疑似动词时断开
//! - 命名实体：句内连续的首字母大写词元

use anyhow::Result;
use once_cell::sync::Lazy;
use phf::phf_set;
use regex::Regex;

/// 分词结果中的单个词元
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub is_alpha: bool,
    pub is_punct: bool,
}

impl Token {
    fn new(text: &str) -> Self {
        let is_alpha = !text.is_empty() && text.chars().all(char::is_alphabetic);
        let is_punct =
            !text.is_empty() && text.chars().all(|c| !c.is_alphanumeric() && !c.is_whitespace());
        Self {
            text: text.to_string(),
            is_alpha,
            is_punct,
        }
    }

    fn is_sentence_end(&self) -> bool {
        matches!(self.text.as_str(), "." | "!" | "?")
    }
}

/// 命名实体
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub text: String,
    pub label: String,
}

/// 一段文本的 NLP 处理结果
#[derive(Debug, Clone, Default)]
pub struct NlpDoc {
    pub tokens: Vec<Token>,
    pub sentence_count: usize,
    pub entities: Vec<Entity>,
    pub noun_chunks: Vec<String>,
}

/// NLP 引擎能力
pub trait NlpEngine: Send + Sync {
    /// 对文本做分词、分句、实体和名词短语识别
    fn process(&self, text: &str) -> Result<NlpDoc>;
}

static TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\p{L}\p{N}]+(?:['’\-][\p{L}\p{N}]+)*|[^\s\p{L}\p{N}]").expect("valid token regex")
});

/// 不会出现在名词短语中的功能词（小写）
static FUNCTION_WORDS: phf::Set<&'static str> = phf_set! {
    "a", "an", "the", "this", "that", "these", "those", "some", "any", "each", "every",
    "no", "all", "both", "either", "neither", "such", "what", "which", "whose", "who",
    "whom", "whatever", "i", "you", "he", "she", "it", "we", "they", "me", "him", "her",
    "us", "them", "my", "your", "his", "its", "our", "their", "mine", "yours", "ours",
    "theirs", "myself", "itself", "themselves", "of", "in", "on", "at", "by", "for",
    "with", "about", "against", "between", "into", "through", "during", "before",
    "after", "above", "below", "to", "from", "up", "down", "out", "off", "over", "under",
    "within", "without", "across", "along", "among", "around", "behind", "beyond",
    "near", "onto", "per", "via", "than", "as", "and", "or", "but", "nor", "so", "yet",
    "if", "because", "while", "although", "though", "unless", "until", "when", "where",
    "whether", "how", "why", "then", "there", "here", "also", "not", "very", "too",
    "only", "just", "more", "most", "less", "least", "many", "much", "few", "several",
    "other", "another", "same", "own", "is", "are", "was", "were", "be", "been", "being",
    "am", "has", "have", "had", "having", "do", "does", "did", "doing", "will", "would",
    "shall", "should", "can", "could", "may", "might", "must", "make", "makes", "made",
    "use", "uses", "used", "called", "known", "include", "includes", "including",
    "become", "becomes", "became", "however", "therefore", "moreover", "thus", "hence",
    "often", "usually", "always", "never", "sometimes", "again", "once", "even", "still",
    "already", "one", "two", "three", "first", "second", "new",
};

/// 紧跟在动词后面的限定词，用来识别 "membrane protects the cell" 这类谓语
static DETERMINERS: phf::Set<&'static str> = phf_set! {
    "a", "an", "the", "this", "that", "these", "those", "its", "their", "his", "her",
    "our", "your", "each", "every", "some", "many", "any", "no",
};

/// 基于规则的默认 NLP 引擎
#[derive(Debug, Default, Clone)]
pub struct RuleBasedNlp;

impl RuleBasedNlp {
    pub fn new() -> Self {
        Self
    }

    fn tokenize(text: &str) -> Vec<Token> {
        TOKEN_RE
            .find_iter(text)
            .map(|m| Token::new(m.as_str()))
            .collect()
    }

    /// 按句末标点切分，末尾没有标点的残句也算一句
    fn split_sentences(tokens: &[Token]) -> Vec<&[Token]> {
        let mut sentences = Vec::new();
        let mut start = 0;
        for (i, token) in tokens.iter().enumerate() {
            if token.is_sentence_end() {
                if tokens[start..=i].iter().any(|t| !t.is_punct) {
                    sentences.push(&tokens[start..=i]);
                }
                start = i + 1;
            }
        }
        if start < tokens.len() && tokens[start..].iter().any(|t| !t.is_punct) {
            sentences.push(&tokens[start..]);
        }
        sentences
    }

    fn is_chunk_word(token: &Token) -> bool {
        if !token.is_alpha {
            return false;
        }
        let lower = token.text.to_lowercase();
        !FUNCTION_WORDS.contains(lower.as_str()) && !(lower.len() > 4 && lower.ends_with("ly"))
    }

    /// 名词之后的疑似动词：`-ed` 结尾，或 `-s` 结尾且后面紧跟限定词
    fn is_verb_after_noun(token: &Token, next: Option<&Token>) -> bool {
        let lower = token.text.to_lowercase();
        if lower.len() > 4 && lower.ends_with("ed") && !lower.ends_with("eed") {
            return true;
        }
        let third_person = lower.len() > 3
            && lower.ends_with('s')
            && !["ss", "us", "is"].iter().any(|suffix| lower.ends_with(suffix));
        third_person
            && next
                .map(|t| DETERMINERS.contains(t.text.to_lowercase().as_str()))
                .unwrap_or(false)
    }

    fn noun_chunks(sentence: &[Token]) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut current: Vec<&str> = Vec::new();
        for (i, token) in sentence.iter().enumerate() {
            let is_verb = !current.is_empty()
                && token.is_alpha
                && Self::is_verb_after_noun(token, sentence.get(i + 1));
            if Self::is_chunk_word(token) && !is_verb {
                current.push(&token.text);
            } else if !current.is_empty() {
                chunks.push(current.join(" "));
                current.clear();
            }
        }
        if !current.is_empty() {
            chunks.push(current.join(" "));
        }
        chunks
    }

    fn entities(sentence: &[Token]) -> Vec<Entity> {
        let is_capitalized = |t: &Token| {
            t.is_alpha && t.text.chars().next().map(char::is_uppercase).unwrap_or(false)
        };

        let mut entities = Vec::new();
        let mut i = 0;
        while i < sentence.len() {
            if !is_capitalized(&sentence[i]) {
                i += 1;
                continue;
            }
            let start = i;
            while i < sentence.len() && is_capitalized(&sentence[i]) {
                i += 1;
            }
            let mut run = &sentence[start..i];
            if start == 0 {
                if FUNCTION_WORDS.contains(run[0].text.to_lowercase().as_str()) {
                    run = &run[1..];
                } else if run.len() == 1 {
                    // 句首单个大写词无法区分专有名词
                    continue;
                }
            }
            if run.is_empty() {
                continue;
            }
            let text = run
                .iter()
                .map(|t| t.text.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            let is_acronym = run.len() == 1
                && run[0].text.chars().count() > 1
                && run[0].text.chars().all(char::is_uppercase);
            let label = if is_acronym {
                "ACRONYM"
            } else {
                "PROPER_NOUN"
            };
            entities.push(Entity {
                text,
                label: label.to_string(),
            });
        }
        entities
    }
}

impl NlpEngine for RuleBasedNlp {
    fn process(&self, text: &str) -> Result<NlpDoc> {
        let tokens = Self::tokenize(text);
        let sentences = Self::split_sentences(&tokens);

        let mut noun_chunks = Vec::new();
        let mut entities = Vec::new();
        for sentence in &sentences {
            noun_chunks.extend(Self::noun_chunks(sentence));
            entities.extend(Self::entities(sentence));
        }

        Ok(NlpDoc {
            sentence_count: sentences.len(),
            tokens,
            entities,
            noun_chunks,
        })
    }
}
