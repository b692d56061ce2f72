// src/copilot/profile_summary.rs
//! Professional summaries of a LinkedIn profile and its recent posts
use super::error::ValidationError;
use super::extract;
use crate::llm::{LanguageModel, PROFILE_SUMMARY_MAX_TOKENS};
use crate::utils::{non_blank, truncate_chars};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

pub const DEFAULT_MAX_POSTS: usize = 10;
const TOP_TOPIC_COUNT: usize = 3;
const POST_PREVIEW_CHARS: usize = 400;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProfilePost {
    pub content: String,
    pub likes: u64,
    pub comments: u64,
    pub shares: u64,
}

impl ProfilePost {
    pub fn interactions(&self) -> u64 {
        self.likes + self.comments + self.shares
    }
}

#[derive(Debug, Clone)]
pub struct ProfileSummaryRequest {
    pub username: String,
    pub headline: Option<String>,
    pub about: Option<String>,
    pub posts: Vec<ProfilePost>,
    pub max_posts: usize,
}

impl ProfileSummaryRequest {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            headline: None,
            about: None,
            posts: Vec::new(),
            max_posts: DEFAULT_MAX_POSTS,
        }
    }

    fn recent_posts(&self) -> &[ProfilePost] {
        let end = self.posts.len().min(self.max_posts);
        &self.posts[..end]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementMetrics {
    pub total_posts: usize,
    pub avg_engagement: f64,
    pub top_topics: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileSummary {
    pub username: String,
    pub summary: String,
    pub engagement_metrics: EngagementMetrics,
    pub data_source: &'static str,
    pub template: bool,
    pub tool_used: &'static str,
    pub model: Option<String>,
    pub generated_at: DateTime<Utc>,
}

pub async fn summarize(
    model: Option<&dyn LanguageModel>,
    request: &ProfileSummaryRequest,
) -> Result<ProfileSummary> {
    let username = request.username.trim();
    if username.is_empty() {
        return Err(ValidationError::missing_username().into());
    }

    let metrics = engagement_metrics(request.recent_posts());

    let Some(model) = model else {
        info!("No API key, returning profile summary template for {}", username);
        return Ok(template_summary(request, metrics, "profile_summary_template"));
    };

    match model
        .complete(&prompt(request, &metrics), PROFILE_SUMMARY_MAX_TOKENS)
        .await
    {
        Ok(text) => {
            info!("Generated profile summary for {}", username);
            Ok(ProfileSummary {
                username: username.to_string(),
                summary: text.trim().to_string(),
                engagement_metrics: metrics,
                data_source: "claude_ai_analysis",
                template: false,
                tool_used: "ai_profile_summary",
                model: Some(model.name().to_string()),
                generated_at: Utc::now(),
            })
        }
        Err(e) => {
            error!("Profile summary generation failed: {}", e);
            Ok(template_summary(
                request,
                metrics,
                "profile_summary_template_fallback",
            ))
        }
    }
}

pub fn engagement_metrics(posts: &[ProfilePost]) -> EngagementMetrics {
    let total: u64 = posts.iter().map(ProfilePost::interactions).sum();
    let avg_engagement = if posts.is_empty() {
        0.0
    } else {
        total as f64 / posts.len() as f64
    };

    EngagementMetrics {
        total_posts: posts.len(),
        avg_engagement,
        top_topics: top_topics(posts),
    }
}

/// Most used hashtags, ties broken by first appearance
pub fn top_topics(posts: &[ProfilePost]) -> Vec<String> {
    let mut topics: Vec<(String, usize)> = Vec::new();
    for tag in posts.iter().flat_map(|p| extract::hashtags(&p.content)) {
        let topic = tag.trim_start_matches('#');
        match topics.iter_mut().find(|(t, _)| t.eq_ignore_ascii_case(topic)) {
            Some((_, count)) => *count += 1,
            None => topics.push((topic.to_string(), 1)),
        }
    }
    // stable, so equal counts keep first-seen order
    topics.sort_by(|a, b| b.1.cmp(&a.1));

    topics
        .into_iter()
        .take(TOP_TOPIC_COUNT)
        .map(|(topic, _)| topic)
        .collect()
}

fn template_summary(
    request: &ProfileSummaryRequest,
    metrics: EngagementMetrics,
    tool_used: &'static str,
) -> ProfileSummary {
    ProfileSummary {
        username: request.username.trim().to_string(),
        summary: template(request, &metrics),
        engagement_metrics: metrics,
        data_source: "template",
        template: true,
        tool_used,
        model: None,
        generated_at: Utc::now(),
    }
}

pub fn template(request: &ProfileSummaryRequest, metrics: &EngagementMetrics) -> String {
    let username = request.username.trim();
    let headline = non_blank(request.headline.as_deref()).unwrap_or("LinkedIn professional");
    let mut summary = format!("## {}\n\n**{}**", username, headline);

    if let Some(about) = non_blank(request.about.as_deref()) {
        summary.push_str("\n\n");
        summary.push_str(about);
    }

    if metrics.total_posts == 0 {
        summary.push_str("\n\nNo recent posts were provided to analyze.");
    } else {
        summary.push_str(&format!(
            "\n\n**Recent activity:** {} posts averaging {:.1} interactions each.",
            metrics.total_posts, metrics.avg_engagement
        ));
        if !metrics.top_topics.is_empty() {
            summary.push_str(&format!(
                "\n**Frequent topics:** {}",
                metrics.top_topics.join(", ")
            ));
        }
    }

    summary.push_str("\n\n*Add your Anthropic API key for an AI-written summary.*");
    summary
}

fn prompt(request: &ProfileSummaryRequest, metrics: &EngagementMetrics) -> String {
    let posts = request
        .recent_posts()
        .iter()
        .enumerate()
        .map(|(i, post)| {
            format!(
                "{}. {} ({} likes, {} comments, {} shares)",
                i + 1,
                truncate_chars(post.content.trim(), POST_PREVIEW_CHARS),
                post.likes,
                post.comments,
                post.shares
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"Analyze this LinkedIn professional's recent activity and create a comprehensive summary:

Username: {username}
Headline: {headline}
About: {about}
Recent posts:
{posts}
Average engagement per post: {avg:.1}

Please provide:
1. Professional summary of their expertise and focus areas
2. Analysis of recent content themes and engagement
3. Key topics they're discussing
4. Professional insights and thought leadership areas
5. Engagement metrics analysis

Format as a professional summary suitable for a personal website."#,
        username = request.username.trim(),
        headline = non_blank(request.headline.as_deref()).unwrap_or("not provided"),
        about = non_blank(request.about.as_deref()).unwrap_or("not provided"),
        posts = if posts.is_empty() { "none provided".to_string() } else { posts },
        avg = metrics.avg_engagement,
    )
}
