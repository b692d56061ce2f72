// src/llm/mod.rs
pub mod anthropic_client;
mod types;

pub use anthropic_client::AnthropicClient;

use anyhow::{Context, Result};
use async_trait::async_trait;

pub const ROUTING_MAX_TOKENS: u32 = 1000;
pub const COVER_LETTER_MAX_TOKENS: u32 = 1500;
pub const LINKEDIN_POST_MAX_TOKENS: u32 = 800;
pub const SCORING_MAX_TOKENS: u32 = 2000;
pub const GENERAL_MAX_TOKENS: u32 = 800;
pub const PROFILE_SUMMARY_MAX_TOKENS: u32 = 1000;
pub const RELAY_DEFAULT_MAX_TOKENS: u32 = 1000;
pub const RELAY_MAX_TOKENS_CAP: u32 = 4096;

/// A text completion backend
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Reported in response metadata
    fn name(&self) -> &str;

    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String>;
}

/// Pull a JSON value out of model output that may wrap it in code fences or prose
pub fn extract_json(text: &str) -> Result<serde_json::Value> {
    let trimmed = strip_fences(text.trim());

    if let Ok(value) = serde_json::from_str(trimmed) {
        return Ok(value);
    }

    let span = outermost_span(trimmed, '{', '}')
        .into_iter()
        .chain(outermost_span(trimmed, '[', ']'))
        .min_by_key(|(start, _)| *start)
        .context("No JSON object or array found in model output")?;

    serde_json::from_str(&trimmed[span.0..=span.1]).context("Model output is not valid JSON")
}

fn strip_fences(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // drop an optional language tag on the opening fence
    let rest = rest.split_once('\n').map(|(_, body)| body).unwrap_or(rest);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

fn outermost_span(text: &str, open: char, close: char) -> Option<(usize, usize)> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    (end > start).then_some((start, end))
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Replays canned replies and records every prompt it receives
    pub struct ScriptedModel {
        replies: Mutex<Vec<Result<String, String>>>,
        pub prompts: Mutex<Vec<String>>,
    }

    impl ScriptedModel {
        pub fn replying(replies: &[&str]) -> Self {
            Self {
                replies: Mutex::new(replies.iter().rev().map(|r| Ok(r.to_string())).collect()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn failing() -> Self {
            Self {
                replies: Mutex::new(vec![Err("upstream unavailable".to_string())]),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn last_prompt(&self) -> String {
            self.prompts.lock().unwrap().last().cloned().unwrap_or_default()
        }
    }

    #[async_trait]
    impl LanguageModel for ScriptedModel {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn complete(&self, prompt: &str, _max_tokens: u32) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            let mut replies = self.replies.lock().unwrap();
            let reply = if replies.len() > 1 {
                replies.pop()
            } else {
                replies.last().cloned()
            };
            match reply {
                Some(Ok(text)) => Ok(text),
                Some(Err(e)) => Err(anyhow::anyhow!(e)),
                None => Err(anyhow::anyhow!("no scripted reply")),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_json() {
        assert_eq!(extract_json(r#"{"tool": "fetch_jobs"}"#).unwrap(), json!({"tool": "fetch_jobs"}));
    }

    #[test]
    fn test_fenced_json() {
        let text = "```json\n[{\"jobId\": \"1\", \"overallScore\": 80}]\n```";
        assert_eq!(
            extract_json(text).unwrap(),
            json!([{"jobId": "1", "overallScore": 80}])
        );
    }

    #[test]
    fn test_json_inside_prose() {
        let text = "Here is the analysis you asked for:\n{\"tool\": \"draft_cover_letter\", \"confidence\": 0.9}\nLet me know!";
        assert_eq!(extract_json(text).unwrap()["tool"], "draft_cover_letter");
    }

    #[test]
    fn test_array_before_object_wins() {
        let text = "Scores: [{\"jobId\": \"a\"}, {\"jobId\": \"b\"}] done";
        assert!(extract_json(text).unwrap().is_array());
    }

    #[test]
    fn test_no_json() {
        assert!(extract_json("I could not score these jobs.").is_err());
        assert!(extract_json("{ not json }").is_err());
    }
}
