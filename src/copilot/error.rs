// src/copilot/error.rs
use std::fmt;

/// A request the copilot refuses to act on. Handlers turn this into a 400;
/// anything else reaching them is treated as internal.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub message: String,
    pub code: &'static str,
    pub suggestions: Vec<String>,
}

impl ValidationError {
    pub fn new(message: impl Into<String>, code: &'static str) -> Self {
        Self {
            message: message.into(),
            code,
            suggestions: Vec::new(),
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn empty_message() -> Self {
        Self::new("Message is required", "EMPTY_MESSAGE")
            .with_suggestion("Ask something like \"Find rust developer jobs in Berlin\"")
    }

    pub fn missing_content() -> Self {
        Self::new("Content required", "MISSING_CONTENT")
            .with_suggestion("Provide content or a topic for the LinkedIn post")
    }

    pub fn missing_job_title() -> Self {
        Self::new("Missing job title", "MISSING_JOB_TITLE").with_suggestion(
            "Provide a job title or include it in your message (e.g. \"cover letter for Software Engineer at Google\")",
        )
    }

    pub fn missing_company() -> Self {
        Self::new("Missing company name", "MISSING_COMPANY").with_suggestion(
            "Provide a company name or include it in your message (e.g. \"cover letter for Software Engineer at Google\")",
        )
    }

    pub fn no_jobs() -> Self {
        Self::new("No jobs provided for scoring", "NO_JOBS")
            .with_suggestion("Pass jobs to score, or keywords to search for them first")
    }

    pub fn missing_resume() -> Self {
        Self::new("Resume content is required", "MISSING_RESUME")
            .with_suggestion("Paste your resume text or describe your background")
    }

    pub fn missing_prompt() -> Self {
        Self::new("Prompt is required", "MISSING_PROMPT")
    }

    pub fn missing_api_key() -> Self {
        Self::new("Missing API key", "MISSING_API_KEY")
            .with_suggestion("Send apiKey in the body or set ANTHROPIC_API_KEY on the server")
    }

    pub fn missing_username() -> Self {
        Self::new("Username is required", "MISSING_USERNAME")
            .with_suggestion("Pass the LinkedIn username whose activity should be summarized")
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ValidationError {}

/// The validation failure behind `error`, if that is what it is
pub fn as_validation(error: &anyhow::Error) -> Option<&ValidationError> {
    error.downcast_ref::<ValidationError>()
}
