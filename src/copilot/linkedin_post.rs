// src/copilot/linkedin_post.rs
use super::error::ValidationError;
use super::{extract, format};
use crate::llm::{LanguageModel, LINKEDIN_POST_MAX_TOKENS};
use crate::utils::word_count;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info};

pub const DEFAULT_MAX_LENGTH: usize = 1300;

#[derive(Debug, Clone)]
pub struct LinkedInPostRequest {
    pub content: String,
    pub tone: String,
    pub include_hashtags: bool,
    pub max_length: usize,
}

impl LinkedInPostRequest {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            tone: super::cover_letter::DEFAULT_TONE.to_string(),
            include_hashtags: true,
            max_length: DEFAULT_MAX_LENGTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostAnalysis {
    pub character_count: usize,
    pub word_count: usize,
    pub hashtag_count: usize,
    pub hashtags: Vec<String>,
    pub tone: String,
    pub max_length: usize,
    pub engagement_score: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostDraft {
    pub post: String,
    pub analysis: PostAnalysis,
    pub template: bool,
    pub tool_used: &'static str,
    pub response: String,
}

pub async fn draft(model: Option<&dyn LanguageModel>, request: &LinkedInPostRequest) -> Result<PostDraft> {
    let content = request.content.trim();
    if content.is_empty() {
        return Err(ValidationError::missing_content().into());
    }

    let Some(model) = model else {
        info!("No API key, returning LinkedIn post template");
        return Ok(template_draft(request, "linkedin_post_template", None));
    };

    match model
        .complete(&prompt(request), LINKEDIN_POST_MAX_TOKENS)
        .await
    {
        Ok(text) => {
            let post = text.trim().to_string();
            let analysis = analyze(&post, request, Some(model.name()));
            info!("Generated LinkedIn post ({} chars)", analysis.character_count);
            Ok(PostDraft {
                response: format::linkedin_post(&post, &analysis),
                post,
                analysis,
                template: false,
                tool_used: "draft_linkedin_post",
            })
        }
        Err(e) => {
            error!("LinkedIn post generation failed: {}", e);
            Ok(template_draft(
                request,
                "linkedin_post_template_fallback",
                Some(e.to_string()),
            ))
        }
    }
}

fn template_draft(
    request: &LinkedInPostRequest,
    tool_used: &'static str,
    failure: Option<String>,
) -> PostDraft {
    let post = template(request.content.trim(), request.include_hashtags);
    let analysis = analyze(&post, request, None);
    PostDraft {
        response: format::linkedin_post_template(&post, &analysis, failure.as_deref()),
        post,
        analysis,
        template: true,
        tool_used,
    }
}

fn analyze(post: &str, request: &LinkedInPostRequest, model: Option<&str>) -> PostAnalysis {
    let hashtags = if request.include_hashtags {
        extract::hashtags(post)
    } else {
        Vec::new()
    };
    let character_count = post.chars().count();

    PostAnalysis {
        character_count,
        word_count: word_count(post),
        hashtag_count: hashtags.len(),
        engagement_score: engagement_score(post, hashtags.len(), request.max_length),
        hashtags,
        tone: request.tone.clone(),
        max_length: request.max_length,
        model: model.map(str::to_string),
        generated_at: Utc::now(),
    }
}

/// Rough 70-100 estimate from structure: hashtags, length, line breaks and a question
pub fn engagement_score(post: &str, hashtag_count: usize, max_length: usize) -> u32 {
    let length = post.chars().count();
    let mut score = 70;
    if (3..=5).contains(&hashtag_count) {
        score += 10;
    }
    if (150..=max_length).contains(&length) {
        score += 10;
    }
    if post.contains("\n\n") {
        score += 5;
    }
    if post.contains('?') {
        score += 5;
    }
    score.min(100)
}

fn prompt(request: &LinkedInPostRequest) -> String {
    let hashtag_rule = if request.include_hashtags {
        "Include 3-5 relevant hashtags at the end"
    } else {
        "Do not include hashtags"
    };

    format!(
        r#"Create a {tone} LinkedIn post based on this content: "{content}"

Requirements:
- Maximum {max_length} characters
- Use a {tone} tone
- Make it engaging and professional
- {hashtag_rule}
- Structure it for maximum engagement (hook, value, call-to-action)
- Make it authentic and personal

Write only the LinkedIn post content, no additional formatting or explanations."#,
        tone = request.tone,
        content = request.content.trim(),
        max_length = request.max_length,
    )
}

/// Up to five hashtags from the longest distinct words of the content
pub fn derive_hashtags(content: &str) -> Vec<String> {
    let mut words: Vec<String> = Vec::new();
    for word in content.split(|c: char| !c.is_alphanumeric()) {
        if word.chars().count() > 3 && !words.iter().any(|w| w.eq_ignore_ascii_case(word)) {
            words.push(word.to_string());
        }
    }
    // stable sort keeps first-seen order among equal lengths
    words.sort_by_key(|w| std::cmp::Reverse(w.chars().count()));

    words
        .into_iter()
        .take(5)
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => format!("#{}{}", first.to_uppercase(), chars.as_str().to_lowercase()),
                None => String::new(),
            }
        })
        .collect()
}

pub fn template(content: &str, include_hashtags: bool) -> String {
    let mut post = format!(
        "I've been reflecting on {content}.\n\n\
         Here's what stood out to me:\n\
         \u{2022} [The key insight or lesson]\n\
         \u{2022} [A concrete example or result]\n\
         \u{2022} [What I would do differently next time]\n\n\
         What has your experience with {content} been? I'd love to hear your thoughts in the comments."
    );

    if include_hashtags {
        let tags = derive_hashtags(content);
        if !tags.is_empty() {
            post.push_str("\n\n");
            post.push_str(&tags.join(" "));
        }
    }
    post
}
