// src/jobs/sources/jooble.rs
use super::{id_string, secs, JobSource};
use crate::core::config_manager::ProvidersConfig;
use crate::core::ServiceClient;
use crate::jobs::types::{JobPosting, JobQuery, JobSourceKind};
use crate::utils::html_to_text;
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

#[derive(Debug, Serialize)]
struct JoobleRequest<'a> {
    keywords: &'a str,
    location: &'a str,
    page: &'a str,
}

#[derive(Debug, Default, Deserialize)]
pub struct JoobleResponse {
    #[serde(default)]
    jobs: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct JoobleJob {
    #[serde(default)]
    id: serde_json::Value,
    title: Option<String>,
    company: Option<String>,
    location: Option<String>,
    snippet: Option<String>,
    link: Option<String>,
    salary: Option<String>,
    #[serde(rename = "type")]
    job_type: Option<String>,
}

pub struct JoobleSource {
    client: ServiceClient,
    api_key: String,
    timeout: Duration,
}

impl JoobleSource {
    /// None unless an API key is configured
    pub fn from_config(config: &ProvidersConfig) -> Result<Option<Self>> {
        let Some(api_key) = &config.jooble.api_key else {
            info!("Jooble API key not provided, skipping");
            return Ok(None);
        };

        Ok(Some(Self {
            client: ServiceClient::new(
                &config.jooble.base_url,
                &config.user_agent,
                config.timeout_seconds,
            )?
            .with_secret(api_key),
            api_key: api_key.clone(),
            timeout: secs(config.timeout_seconds),
        }))
    }
}

#[async_trait]
impl JobSource for JoobleSource {
    fn kind(&self) -> JobSourceKind {
        JobSourceKind::Jooble
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn fetch(&self, query: &JobQuery, limit: usize) -> Result<Vec<JobPosting>> {
        info!("Fetching Jooble jobs for: {}", query.keywords);

        let endpoint = format!("/api/{}", self.api_key);
        let request = JoobleRequest {
            keywords: &query.keywords,
            location: &query.location,
            page: "1",
        };

        let response: JoobleResponse = self.client.post_json(&endpoint, &request).await?;
        let jobs = into_postings(response, limit);

        info!("Fetched {} jobs from Jooble", jobs.len());
        Ok(jobs)
    }
}

pub fn into_postings(response: JoobleResponse, limit: usize) -> Vec<JobPosting> {
    response
        .jobs
        .into_iter()
        .filter_map(|item| serde_json::from_value::<JoobleJob>(item).ok())
        .filter_map(to_posting)
        .take(limit)
        .collect()
}

fn to_posting(raw: JoobleJob) -> Option<JobPosting> {
    let title = raw.title.map(|t| html_to_text(&t)).filter(|t| !t.is_empty())?;
    let company = raw
        .company
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| "Unknown Company".to_string());

    let id = id_string(&raw.id)
        .unwrap_or_else(|| uuid::Uuid::new_v4().simple().to_string());

    let description = raw
        .snippet
        .map(|s| html_to_text(&s))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| format!("{} position at {}.", title, company));

    Some(
        JobPosting::new(format!("jooble_{}", id), title, company, JobSourceKind::Jooble)
            .with_location(
                raw.location
                    .filter(|l| !l.trim().is_empty())
                    .unwrap_or_else(|| "Not specified".to_string()),
            )
            .with_description(description)
            .with_url(raw.link.unwrap_or_else(|| "https://jooble.org".to_string()))
            .with_salary(raw.salary.filter(|s| !s.trim().is_empty()))
            .with_tags(raw.job_type.into_iter().filter(|t| !t.is_empty()).collect()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_maps_jobs() {
        let response: JoobleResponse = serde_json::from_value(json!({
            "totalCount": 2,
            "jobs": [
                {
                    "id": -7188362453318497000i64, "title": "Frontend Developer",
                    "company": "Pixel GmbH", "location": "Berlin",
                    "snippet": "&nbsp;<b>React</b> and TypeScript", "link": "https://jooble.org/desc/1",
                    "salary": "", "type": "Full-time"
                },
                {"title": "QA Engineer", "company": ""}
            ]
        }))
        .unwrap();

        let jobs = into_postings(response, 10);
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].id, "jooble_-7188362453318497000");
        assert_eq!(jobs[0].description, "React and TypeScript");
        assert_eq!(jobs[0].salary, None);
        assert_eq!(jobs[0].tags, vec!["Full-time"]);
        assert_eq!(jobs[1].company, "Unknown Company");
        assert!(jobs[1].id.starts_with("jooble_"));
    }

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(JoobleRequest {
            keywords: "rust",
            location: "Berlin",
            page: "1",
        })
        .unwrap();
        assert_eq!(body, json!({"keywords": "rust", "location": "Berlin", "page": "1"}));
    }
}
