//! 生成提示词
//!
//! 每种学习材料一个构建函数，输入截断按字符计数

use crate::models::Analysis;

pub const QUIZ_SYSTEM_PROMPT: &str = "You are an expert educational content creator.";
pub const SUMMARY_SYSTEM_PROMPT: &str = "You are an expert at summarizing educational content.";
pub const MINDMAP_SYSTEM_PROMPT: &str = "You are an expert at creating educational mind maps.";

pub const QUIZ_CONTENT_CHARS: usize = 2000;
pub const SUMMARY_CONTENT_CHARS: usize = 3000;
pub const MINDMAP_CONTENT_CHARS: usize = 2000;

/// 取前 `max_chars` 个字符（不切断多字节字符）
pub fn head_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// 测验题提示词：题量、难度、前 5 个关键概念、正文前 2000 字符
pub fn quiz_prompt(content: &str, analysis: &Analysis) -> String {
    let concepts_text = analysis.top_concepts(5).join(", ");

    format!(
        r#"Generate {count} multiple choice questions from the following text.
Difficulty level: {difficulty}
Focus on these key concepts: {concepts}

Text:
{text}

Requirements:
1. Each question should test understanding, not just memorization
2. Include 4 options (A, B, C, D) with only one correct answer
3. Make incorrect options plausible but clearly wrong
4. Vary question types (factual, conceptual, application)

Format as JSON array:
[
    {{
        "question": "Question text here?",
        "options": ["Option A", "Option B", "Option C", "Option D"],
        "correct_answer": 0,
        "explanation": "Why this answer is correct",
        "difficulty": "Basic|Intermediate|Advanced",
        "concept": "Main concept being tested"
    }}
]"#,
        count = analysis.suggested_quiz_count,
        difficulty = analysis.difficulty_level,
        concepts = concepts_text,
        text = head_chars(content, QUIZ_CONTENT_CHARS),
    )
}

/// 摘要提示词：前 3 个关键概念、主题、正文前 3000 字符
pub fn summary_prompt(content: &str, analysis: &Analysis) -> String {
    let topics: Vec<&str> = analysis.topics.iter().map(|t| t.name()).collect();

    format!(
        r#"Create a comprehensive summary of this educational content.

Key concepts to highlight: {concepts:?}
Subject areas: {topics:?}

Content:
{text}

Provide:
1. A brief overview (2-3 sentences)
2. Main points (bullet list)
3. Key takeaways (3-5 important concepts)

Format as JSON:
{{
    "overview": "Brief summary here",
    "main_points": ["Point 1", "Point 2", ...],
    "key_takeaways": ["Takeaway 1", "Takeaway 2", ...],
    "complexity_level": "Basic|Intermediate|Advanced"
}}"#,
        concepts = analysis.top_concepts(3),
        topics = topics,
        text = head_chars(content, SUMMARY_CONTENT_CHARS),
    )
}

/// 思维导图提示词：前 8 个关键概念、前 5 个章节标题、正文前 2000 字符
pub fn mindmap_prompt(content: &str, analysis: &Analysis) -> String {
    let sections: Vec<&str> = analysis
        .section_analysis
        .iter()
        .take(5)
        .map(|s| s.title.as_str())
        .collect();

    format!(
        r#"Create a mind map structure for this educational content.

Key concepts: {concepts:?}
Sections: {sections:?}

Content excerpt:
{text}

Create a hierarchical structure with:
- Central topic
- Main branches (3-6 major concepts)
- Sub-branches (supporting details)

Format as JSON:
{{
    "central_topic": "Main subject",
    "branches": [
        {{
            "name": "Branch name",
            "children": [
                {{"name": "Sub-concept 1"}},
                {{"name": "Sub-concept 2"}}
            ]
        }}
    ]
}}"#,
        concepts = analysis.top_concepts(8),
        sections = sections,
        text = head_chars(content, MINDMAP_CONTENT_CHARS),
    )
}
