// src/web/types.rs
use crate::copilot::scoring::{ScoreResult, ScoringService};
use crate::copilot::ConversationEntry;
use crate::copilot::profile_summary::EngagementMetrics;
use crate::copilot::{
    ChatRequest, CoverLetterDraft, CoverLetterRequest, LinkedInPostRequest, PostDraft,
    ProfilePost, ProfileSummary, ProfileSummaryRequest, Relayed, ResumeInput, ScoreRequest,
    ValidationError,
};
use crate::jobs::types::SearchMetadata;
use crate::jobs::JobPosting;
use rocket::form::FromForm;
use rocket::serde::{Deserialize, Serialize};

#[derive(Deserialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct ChatBody {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub conversation_history: Vec<ConversationEntry>,
}

impl From<ChatBody> for ChatRequest {
    fn from(body: ChatBody) -> Self {
        Self {
            message: body.message,
            api_key: body.api_key,
            conversation_history: body.conversation_history,
        }
    }
}

#[derive(FromForm)]
pub struct JobSearchParams {
    pub keywords: Option<String>,
    pub location: Option<String>,
    pub limit: Option<usize>,
    pub remote: Option<bool>,
    #[field(name = "includeLinkedIn")]
    pub include_linkedin: Option<bool>,
}

#[derive(Deserialize, Default)]
#[serde(crate = "rocket::serde", rename_all = "camelCase", default)]
pub struct CoverLetterBody {
    pub job_title: Option<String>,
    pub company_name: Option<String>,
    pub job_description: Option<String>,
    pub resume: Option<String>,
    pub tone: Option<String>,
    pub message: Option<String>,
    pub api_key: Option<String>,
}

impl CoverLetterBody {
    pub fn to_request(&self) -> CoverLetterRequest {
        CoverLetterRequest {
            job_title: self.job_title.clone(),
            company_name: self.company_name.clone(),
            job_description: self.job_description.clone(),
            resume: self.resume.clone(),
            tone: self.tone.clone(),
            message: self.message.clone(),
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(crate = "rocket::serde", rename_all = "camelCase", default)]
pub struct LinkedInPostBody {
    pub content: String,
    pub tone: Option<String>,
    pub include_hashtags: Option<bool>,
    pub max_length: Option<usize>,
    pub api_key: Option<String>,
}

impl LinkedInPostBody {
    pub fn to_request(&self) -> LinkedInPostRequest {
        let mut request = LinkedInPostRequest::new(self.content.clone());
        if let Some(tone) = self.tone.as_deref().filter(|t| !t.trim().is_empty()) {
            request.tone = tone.to_string();
        }
        if let Some(include) = self.include_hashtags {
            request.include_hashtags = include;
        }
        if let Some(max_length) = self.max_length.filter(|l| *l > 0) {
            request.max_length = max_length;
        }
        request
    }
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct ScoreBody {
    #[serde(default)]
    pub resume: Option<ResumeInput>,
    #[serde(default)]
    pub jobs: Option<Vec<JobPosting>>,
    #[serde(default)]
    pub keywords: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
}

impl ScoreBody {
    pub fn to_request(&self) -> ScoreRequest {
        ScoreRequest {
            resume: self
                .resume
                .clone()
                .unwrap_or_else(|| ResumeInput::Text(String::new())),
            jobs: self.jobs.clone(),
            keywords: self.keywords.clone(),
            location: self.location.clone(),
        }
    }
}

/// Accepts both the camelCase and the Messages API spelling of the token limit
#[derive(Deserialize, Default)]
#[serde(crate = "rocket::serde", rename_all = "camelCase", default)]
pub struct RelayBody {
    pub prompt: String,
    #[serde(alias = "max_tokens")]
    pub max_tokens: Option<u32>,
    pub api_key: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(crate = "rocket::serde", rename_all = "camelCase", default)]
pub struct ProfileSummaryBody {
    pub username: String,
    pub headline: Option<String>,
    pub about: Option<String>,
    pub posts: Vec<ProfilePost>,
    #[serde(alias = "max_posts")]
    pub max_posts: Option<usize>,
    pub api_key: Option<String>,
}

impl ProfileSummaryBody {
    pub fn to_request(&self) -> ProfileSummaryRequest {
        let mut request = ProfileSummaryRequest::new(self.username.clone());
        request.headline = self.headline.clone();
        request.about = self.about.clone();
        request.posts = self.posts.clone();
        if let Some(max_posts) = self.max_posts.filter(|m| *m > 0) {
            request.max_posts = max_posts;
        }
        request
    }
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct JobSearchResponse {
    pub success: bool,
    pub response: String,
    pub jobs: Vec<JobPosting>,
    pub metadata: SearchMetadata,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct CoverLetterResponse {
    pub response: String,
    pub cover_letter: String,
    pub analysis: crate::copilot::cover_letter::CoverLetterAnalysis,
    pub template: bool,
    pub tool_used: String,
}

impl From<CoverLetterDraft> for CoverLetterResponse {
    fn from(draft: CoverLetterDraft) -> Self {
        Self {
            response: draft.response,
            cover_letter: draft.cover_letter,
            analysis: draft.analysis,
            template: draft.template,
            tool_used: draft.tool_used.to_string(),
        }
    }
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct LinkedInPostResponse {
    pub response: String,
    pub post: String,
    pub analysis: crate::copilot::linkedin_post::PostAnalysis,
    pub template: bool,
    pub tool_used: String,
}

impl From<PostDraft> for LinkedInPostResponse {
    fn from(draft: PostDraft) -> Self {
        Self {
            response: draft.response,
            post: draft.post,
            analysis: draft.analysis,
            template: draft.template,
            tool_used: draft.tool_used.to_string(),
        }
    }
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct ScoreResponse {
    pub response: String,
    pub scores: Vec<ScoreResult>,
    pub service_used: ScoringService,
    pub tool_used: String,
    pub jobs_scored: usize,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: String,
}

/// Shaped like a Messages API reply so callers can read `content[0].text`
#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct RelayResponse {
    pub content: Vec<ContentBlock>,
    pub model: String,
}

impl From<Relayed> for RelayResponse {
    fn from(relayed: Relayed) -> Self {
        Self {
            content: vec![ContentBlock {
                kind: "text",
                text: relayed.text,
            }],
            model: relayed.model,
        }
    }
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct ProfileSummaryResponse {
    pub success: bool,
    pub username: String,
    pub summary: String,
    pub engagement_metrics: EngagementMetrics,
    pub data_source: String,
    pub template: bool,
    pub tool_used: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub timestamp: String,
}

impl From<ProfileSummary> for ProfileSummaryResponse {
    fn from(summary: ProfileSummary) -> Self {
        Self {
            success: true,
            username: summary.username,
            summary: summary.summary,
            engagement_metrics: summary.engagement_metrics,
            data_source: summary.data_source.to_string(),
            template: summary.template,
            tool_used: summary.tool_used.to_string(),
            model: summary.model,
            timestamp: summary.generated_at.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub server: &'static str,
    pub version: &'static str,
    pub timestamp: String,
    pub providers: Vec<String>,
    pub capabilities: Vec<&'static str>,
    pub ai_configured: bool,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde", rename_all = "lowercase")]
pub enum ResponseType {
    Error,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct StandardErrorResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub error: String,
    pub error_code: String,
    pub suggestions: Vec<String>,
}

impl StandardErrorResponse {
    pub fn new(error: String, error_code: String, suggestions: Vec<String>) -> Self {
        Self {
            response_type: ResponseType::Error,
            success: false,
            error,
            error_code,
            suggestions,
        }
    }
}

impl From<&ValidationError> for StandardErrorResponse {
    fn from(error: &ValidationError) -> Self {
        Self::new(
            error.message.clone(),
            error.code.to_string(),
            error.suggestions.clone(),
        )
    }
}
