// src/copilot/router.rs
use super::chat::ConversationEntry;
use crate::llm::{extract_json, LanguageModel, ROUTING_MAX_TOKENS};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CareerTool {
    FetchJobs,
    ScoreJobs,
    DraftCoverLetter,
    DraftLinkedInPost,
    General,
}

impl CareerTool {
    /// Tool name as the routing prompt spells it
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FetchJobs => "fetch_jobs",
            Self::ScoreJobs => "score_jobs_against_resume",
            Self::DraftCoverLetter => "draft_cover_letter",
            Self::DraftLinkedInPost => "draft_linkedin_post",
            Self::General => "general_response",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim() {
            "fetch_jobs" => Some(Self::FetchJobs),
            "score_jobs_against_resume" => Some(Self::ScoreJobs),
            "draft_cover_letter" => Some(Self::DraftCoverLetter),
            "draft_linkedin_post" => Some(Self::DraftLinkedInPost),
            "general_response" => Some(Self::General),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteVia {
    Keywords,
    Llm,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteDecision {
    pub tool: CareerTool,
    pub parameters: Map<String, Value>,
    pub confidence: Option<f64>,
    pub reasoning: Option<String>,
    /// Direct answer the model supplied along with a general routing
    pub response: Option<String>,
    pub via: RouteVia,
}

impl RouteDecision {
    fn keywords(tool: CareerTool) -> Self {
        Self {
            tool,
            parameters: Map::new(),
            confidence: None,
            reasoning: None,
            response: None,
            via: RouteVia::Keywords,
        }
    }

    /// Non-blank string parameter extracted by the model
    pub fn param(&self, name: &str) -> Option<&str> {
        self.parameters
            .get(name)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }
}

/// Substring routing; earlier groups take precedence
pub fn route_by_keywords(message: &str) -> CareerTool {
    let text = message.to_lowercase();
    let has = |needles: &[&str]| needles.iter().any(|n| text.contains(n));

    if has(&["job", "find", "search"]) {
        CareerTool::FetchJobs
    } else if has(&["cover letter", "letter"]) {
        CareerTool::DraftCoverLetter
    } else if has(&["linkedin", "post"]) {
        CareerTool::DraftLinkedInPost
    } else if has(&["score", "resume", "analyze"]) {
        CareerTool::ScoreJobs
    } else {
        CareerTool::General
    }
}

#[derive(Debug, Deserialize)]
struct LlmRoute {
    tool: String,
    #[serde(default)]
    parameters: Option<Map<String, Value>>,
    #[serde(default)]
    confidence: Option<f64>,
    #[serde(default)]
    reasoning: Option<String>,
    #[serde(default)]
    response: Option<String>,
}

pub async fn route_with_llm(
    model: &dyn LanguageModel,
    message: &str,
    history: &[ConversationEntry],
) -> anyhow::Result<RouteDecision> {
    let reply = model
        .complete(&routing_prompt(message, history), ROUTING_MAX_TOKENS)
        .await?;
    let parsed: LlmRoute = serde_json::from_value(extract_json(&reply)?)?;

    let tool = CareerTool::from_name(&parsed.tool)
        .ok_or_else(|| anyhow::anyhow!("Unknown tool from router: {}", parsed.tool))?;

    Ok(RouteDecision {
        tool,
        parameters: parsed.parameters.unwrap_or_default(),
        confidence: parsed.confidence,
        reasoning: parsed.reasoning,
        response: parsed.response.filter(|r| !r.trim().is_empty()),
        via: RouteVia::Llm,
    })
}

/// LLM routing when a model is available and enabled, keyword routing otherwise
pub async fn route(
    message: &str,
    history: &[ConversationEntry],
    model: Option<&dyn LanguageModel>,
    llm_routing: bool,
) -> RouteDecision {
    if let (Some(model), true) = (model, llm_routing) {
        match route_with_llm(model, message, history).await {
            Ok(decision) => {
                info!(
                    "Routed to {} via LLM (confidence {:?})",
                    decision.tool.as_str(),
                    decision.confidence
                );
                return decision;
            }
            Err(e) => warn!("LLM routing failed, using keywords: {}", e),
        }
    }

    let decision = RouteDecision::keywords(route_by_keywords(message));
    info!("Routed to {} via keywords", decision.tool.as_str());
    decision
}

fn routing_prompt(message: &str, history: &[ConversationEntry]) -> String {
    let context = history
        .iter()
        .rev()
        .take(3)
        .rev()
        .map(|entry| format!("{}: {}", entry.kind, entry.content))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are an AI assistant that routes user requests to the appropriate career tools.

Available tools:
1. fetch_jobs - Search for jobs (job search, find jobs, hiring, positions, opportunities)
2. score_jobs_against_resume - Score resume compatibility (score, analyze, match, resume, rate, evaluate)
3. draft_cover_letter - Generate cover letters (cover letter, application letter, letter for job)
4. draft_linkedin_post - Create LinkedIn posts (linkedin post, professional post, share, post about)

User message: "{}"

Recent conversation context:
{}

Respond with a JSON object:
{{
  "tool": "tool_name",
  "parameters": {{}},
  "confidence": 0.95,
  "reasoning": "why this tool was chosen"
}}

Parameters per tool:
- fetch_jobs: keywords, location, limit
- score_jobs_against_resume: resume
- draft_cover_letter: jobTitle, companyName, jobDescription, resume, tone
- draft_linkedin_post: content, tone, includeHashtags

For a general question use {{"tool": "general_response", "response": "your helpful answer", "confidence": 0.9}}.
Respond with JSON only."#,
        message, context
    )
}
