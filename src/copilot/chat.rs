// src/copilot/chat.rs
use super::cover_letter::{self, CoverLetterDraft, CoverLetterRequest};
use super::error::ValidationError;
use super::linkedin_post::{self, LinkedInPostRequest, PostDraft};
use super::profile_summary::{self, ProfileSummary, ProfileSummaryRequest};
use super::router::{self, CareerTool, RouteDecision};
use super::scoring::{self, ResumeInput, ScoringOutcome};
use super::{extract, format};
use crate::core::ConfigManager;
use crate::jobs::{AggregatedJobs, JobAggregator, JobPosting, JobQuery};
use crate::llm::{
    AnthropicClient, LanguageModel, GENERAL_MAX_TOKENS, RELAY_DEFAULT_MAX_TOKENS,
    RELAY_MAX_TOKENS_CAP,
};
use crate::utils::{non_blank, truncate_chars};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{error, info};

const CHAT_JOB_LIMIT: usize = 10;
const DEFAULT_POST_TOPIC: &str = "professional development";

/// One prior turn as the frontend keeps it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationEntry {
    #[serde(rename = "type", alias = "role")]
    pub kind: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

#[derive(Debug, Clone, Default)]
pub struct ChatRequest {
    pub message: String,
    pub api_key: Option<String>,
    pub conversation_history: Vec<ConversationEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub response: String,
    pub tool_used: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ChatReply {
    fn new(response: String, tool_used: &str) -> Self {
        Self {
            response,
            tool_used: tool_used.to_string(),
            data: None,
        }
    }

    fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

#[derive(Debug, Clone)]
pub struct ScoreRequest {
    pub resume: ResumeInput,
    pub jobs: Option<Vec<JobPosting>>,
    pub keywords: Option<String>,
    pub location: Option<String>,
}

/// Request-scoped career actions over the shared job aggregator
pub struct CareerCopilot {
    config: ConfigManager,
    aggregator: JobAggregator,
    http: reqwest::Client,
}

impl CareerCopilot {
    pub fn new(config: ConfigManager) -> Result<Self> {
        let aggregator = JobAggregator::from_config(&config.providers)?;
        Self::with_aggregator(config, aggregator)
    }

    pub fn with_aggregator(config: ConfigManager, aggregator: JobAggregator) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            config,
            aggregator,
            http,
        })
    }

    pub fn config(&self) -> &ConfigManager {
        &self.config
    }

    pub fn aggregator(&self) -> &JobAggregator {
        &self.aggregator
    }

    /// The request's key when given, else the configured one
    pub fn model_for(&self, api_key: Option<&str>) -> Option<AnthropicClient> {
        let key = non_blank(api_key).or_else(|| non_blank(self.config.llm.api_key.as_deref()))?;
        Some(AnthropicClient::with_client(
            self.http.clone(),
            &self.config.llm,
            key,
        ))
    }

    pub fn default_query(&self, keywords: Option<&str>) -> JobQuery {
        JobQuery::new(non_blank(keywords).unwrap_or(&self.config.search.default_keywords))
            .with_limit(self.config.search.default_limit.min(self.config.search.max_limit))
    }

    pub async fn search_jobs(&self, query: &JobQuery) -> AggregatedJobs {
        let mut query = query.clone();
        query.limit = query.limit.min(self.config.search.max_limit);
        self.aggregator.search(&query).await
    }

    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatReply> {
        let model = self.model_for(request.api_key.as_deref());
        self.respond(request, model.as_ref().map(|m| m as &dyn LanguageModel))
            .await
    }

    /// Route the message and run the chosen action with `model` (if any)
    pub async fn respond(
        &self,
        request: &ChatRequest,
        model: Option<&dyn LanguageModel>,
    ) -> Result<ChatReply> {
        let message = request.message.trim();
        if message.is_empty() {
            return Err(ValidationError::empty_message().into());
        }

        info!("Career chat request: {}", truncate_chars(message, 80));

        let decision = router::route(
            message,
            &request.conversation_history,
            model,
            self.config.llm.llm_routing,
        )
        .await;

        match decision.tool {
            CareerTool::FetchJobs => Ok(self.chat_fetch_jobs(message, &decision).await),
            CareerTool::DraftCoverLetter => Ok(self.chat_cover_letter(message, &decision, model).await),
            CareerTool::DraftLinkedInPost => self.chat_linkedin_post(message, &decision, model).await,
            CareerTool::ScoreJobs => {
                self.chat_score(message, &decision, &request.conversation_history, model)
                    .await
            }
            CareerTool::General => Ok(self.chat_general(message, &decision, model).await),
        }
    }

    async fn chat_fetch_jobs(&self, message: &str, decision: &RouteDecision) -> ChatReply {
        let keywords = decision
            .param("keywords")
            .map(str::to_string)
            .unwrap_or_else(|| extract::job_keywords(message));
        let location = decision
            .param("location")
            .map(str::to_string)
            .or_else(|| extract::location(message))
            .unwrap_or_default();
        let limit = decision
            .parameters
            .get("limit")
            .and_then(Value::as_u64)
            .map(|l| l as usize)
            .unwrap_or(CHAT_JOB_LIMIT);
        let remote = message.to_lowercase().contains("remote") || location == "remote";

        let query = JobQuery::new(&keywords)
            .with_location(&location)
            .with_limit(limit)
            .remote_only(remote);

        let result = self.search_jobs(&query).await;
        let data = serde_json::to_value(&result).unwrap_or(Value::Null);

        ChatReply::new(format::job_list(&result), "fetch_jobs").with_data(data)
    }

    async fn chat_cover_letter(
        &self,
        message: &str,
        decision: &RouteDecision,
        model: Option<&dyn LanguageModel>,
    ) -> ChatReply {
        let request = CoverLetterRequest {
            job_title: decision.param("jobTitle").map(str::to_string),
            company_name: decision.param("companyName").map(str::to_string),
            job_description: decision.param("jobDescription").map(str::to_string),
            resume: decision.param("resume").map(str::to_string),
            tone: decision.param("tone").map(str::to_string),
            message: Some(message.to_string()),
        };
        let title = request.resolved_title();
        let company = request.resolved_company();

        let draft =
            cover_letter::draft(model, title.as_deref(), company.as_deref(), &request).await;
        cover_letter_reply(draft)
    }

    async fn chat_linkedin_post(
        &self,
        message: &str,
        decision: &RouteDecision,
        model: Option<&dyn LanguageModel>,
    ) -> Result<ChatReply> {
        let content = decision
            .param("content")
            .map(str::to_string)
            .or_else(|| extract::topic(message))
            .unwrap_or_else(|| DEFAULT_POST_TOPIC.to_string());

        let mut request = LinkedInPostRequest::new(content);
        if let Some(tone) = decision.param("tone") {
            request.tone = tone.to_string();
        }
        if let Some(include) = decision.parameters.get("includeHashtags").and_then(Value::as_bool) {
            request.include_hashtags = include;
        }

        let draft = linkedin_post::draft(model, &request).await?;
        Ok(post_reply(draft))
    }

    async fn chat_score(
        &self,
        message: &str,
        decision: &RouteDecision,
        history: &[ConversationEntry],
        model: Option<&dyn LanguageModel>,
    ) -> Result<ChatReply> {
        let resume = extract::resume_from_message(message)
            .or_else(|| decision.param("resume"))
            .map(str::to_string)
            .or_else(|| resume_from_history(history));

        let Some(resume) = resume else {
            return Ok(ChatReply::new(format::missing_resume(), "score_jobs_prompt"));
        };

        let jobs = jobs_from_history(history);
        if jobs.is_empty() {
            return Ok(ChatReply::new(format::missing_jobs(), "score_jobs_prompt"));
        }

        let outcome = scoring::score_jobs(model, &ResumeInput::Text(resume), &jobs).await?;
        Ok(score_reply(outcome))
    }

    async fn chat_general(
        &self,
        message: &str,
        decision: &RouteDecision,
        model: Option<&dyn LanguageModel>,
    ) -> ChatReply {
        if let Some(answer) = &decision.response {
            return ChatReply::new(format::general_answer(answer), "general_chat");
        }

        let Some(model) = model else {
            return ChatReply::new(format::help(), "general_help");
        };

        match model.complete(&general_prompt(message), GENERAL_MAX_TOKENS).await {
            Ok(answer) => ChatReply::new(format::general_answer(&answer), "general_chat"),
            Err(e) => {
                error!("General chat generation failed: {}", e);
                ChatReply::new(format::help(), "general_help")
            }
        }
    }

    /// Endpoint flavour of cover letters: with a model, title and company must be known
    pub async fn cover_letter(
        &self,
        request: &CoverLetterRequest,
        api_key: Option<&str>,
    ) -> Result<CoverLetterDraft> {
        let model = self.model_for(api_key);
        self.cover_letter_with(request, model.as_ref().map(|m| m as &dyn LanguageModel))
            .await
    }

    pub async fn cover_letter_with(
        &self,
        request: &CoverLetterRequest,
        model: Option<&dyn LanguageModel>,
    ) -> Result<CoverLetterDraft> {
        let title = request.resolved_title();
        let company = request.resolved_company();

        if model.is_some() {
            if title.is_none() {
                return Err(ValidationError::missing_job_title().into());
            }
            if company.is_none() {
                return Err(ValidationError::missing_company().into());
            }
        }

        Ok(cover_letter::draft(model, title.as_deref(), company.as_deref(), request).await)
    }

    pub async fn linkedin_post(
        &self,
        request: &LinkedInPostRequest,
        api_key: Option<&str>,
    ) -> Result<PostDraft> {
        let model = self.model_for(api_key);
        linkedin_post::draft(model.as_ref().map(|m| m as &dyn LanguageModel), request).await
    }

    pub async fn profile_summary(
        &self,
        request: &ProfileSummaryRequest,
        api_key: Option<&str>,
    ) -> Result<ProfileSummary> {
        let model = self.model_for(api_key);
        profile_summary::summarize(model.as_ref().map(|m| m as &dyn LanguageModel), request).await
    }

    /// Raw prompt straight through to the model; unlike the drafting tools there is no template
    pub async fn relay(
        &self,
        prompt: &str,
        max_tokens: Option<u32>,
        api_key: Option<&str>,
    ) -> Result<Relayed> {
        if prompt.trim().is_empty() {
            return Err(ValidationError::missing_prompt().into());
        }
        let Some(model) = self.model_for(api_key) else {
            return Err(ValidationError::missing_api_key().into());
        };
        relay_with(&model, prompt, max_tokens).await
    }

    /// Score against the given jobs, or against a fresh search when none are given
    pub async fn score(
        &self,
        request: &ScoreRequest,
        api_key: Option<&str>,
    ) -> Result<(ScoringOutcome, Vec<JobPosting>)> {
        if request.resume.is_blank() {
            return Err(ValidationError::missing_resume().into());
        }

        let jobs = match &request.jobs {
            Some(jobs) if !jobs.is_empty() => jobs.clone(),
            _ => {
                let query = self
                    .default_query(request.keywords.as_deref())
                    .with_location(request.location.as_deref().unwrap_or_default());
                self.search_jobs(&query).await.jobs
            }
        };

        let model = self.model_for(api_key);
        let outcome = scoring::score_jobs(
            model.as_ref().map(|m| m as &dyn LanguageModel),
            &request.resume,
            &jobs,
        )
        .await?;
        Ok((outcome, jobs))
    }
}

pub fn cover_letter_reply(draft: CoverLetterDraft) -> ChatReply {
    let data = json!({
        "coverLetter": draft.cover_letter,
        "analysis": draft.analysis,
        "template": draft.template,
    });
    ChatReply::new(draft.response, draft.tool_used).with_data(data)
}

pub fn post_reply(draft: PostDraft) -> ChatReply {
    let data = json!({
        "post": draft.post,
        "analysis": draft.analysis,
        "template": draft.template,
    });
    ChatReply::new(draft.response, draft.tool_used).with_data(data)
}

pub fn score_reply(outcome: ScoringOutcome) -> ChatReply {
    let data = serde_json::to_value(&outcome).unwrap_or(Value::Null);
    ChatReply::new(format::score_list(&outcome), "score_jobs_against_resume").with_data(data)
}

/// Model output from a relayed prompt
#[derive(Debug, Clone, PartialEq)]
pub struct Relayed {
    pub text: String,
    pub model: String,
}

pub async fn relay_with(
    model: &dyn LanguageModel,
    prompt: &str,
    max_tokens: Option<u32>,
) -> Result<Relayed> {
    if prompt.trim().is_empty() {
        return Err(ValidationError::missing_prompt().into());
    }
    let max_tokens = max_tokens
        .unwrap_or(RELAY_DEFAULT_MAX_TOKENS)
        .clamp(1, RELAY_MAX_TOKENS_CAP);

    info!("Relaying prompt to {} ({} max tokens)", model.name(), max_tokens);
    let text = model.complete(prompt, max_tokens).await?;
    Ok(Relayed {
        text,
        model: model.name().to_string(),
    })
}

/// Jobs from the most recent assistant turn that carried any
pub fn jobs_from_history(history: &[ConversationEntry]) -> Vec<JobPosting> {
    history
        .iter()
        .rev()
        .filter(|entry| entry.kind == "assistant")
        .filter_map(|entry| entry.data.as_ref()?.get("jobs")?.as_array())
        .map(|jobs| {
            jobs.iter()
                .filter_map(|job| serde_json::from_value::<JobPosting>(job.clone()).ok())
                .collect::<Vec<_>>()
        })
        .find(|jobs| !jobs.is_empty())
        .unwrap_or_default()
}

fn resume_from_history(history: &[ConversationEntry]) -> Option<String> {
    history
        .iter()
        .rev()
        .filter(|entry| entry.kind == "user")
        .find_map(|entry| extract::resume_from_message(&entry.content))
        .map(str::to_string)
}

fn general_prompt(message: &str) -> String {
    format!(
        r#"You are an AI career assistant with live job board integration. Respond helpfully to: "{}"

Available features:
- Job search across LinkedIn, RemoteOK, The Muse and other job boards
- Resume analysis and compatibility scoring
- Cover letter generation
- LinkedIn post creation optimized for engagement
- Professional career advice and guidance

Keep responses concise, professional and encouraging."#,
        message
    )
}
