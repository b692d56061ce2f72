// src/jobs/sources/remoteok.rs
use super::{id_string, secs, JobSource};
use crate::core::config_manager::ProvidersConfig;
use crate::core::ServiceClient;
use crate::jobs::types::{salary_range, JobPosting, JobQuery, JobSourceKind};
use crate::utils::html_to_text;
use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::info;

const API_ENDPOINT: &str = "/api";

#[derive(Debug, Deserialize)]
struct RemoteOkJob {
    #[serde(default)]
    id: serde_json::Value,
    position: Option<String>,
    company: Option<String>,
    location: Option<String>,
    description: Option<String>,
    url: Option<String>,
    salary_min: Option<f64>,
    salary_max: Option<f64>,
    #[serde(default)]
    tags: Option<Vec<String>>,
}

pub struct RemoteOkSource {
    client: ServiceClient,
    timeout: Duration,
}

impl RemoteOkSource {
    pub fn new(config: &ProvidersConfig) -> Result<Self> {
        Ok(Self {
            client: ServiceClient::new(
                &config.remoteok.base_url,
                &config.user_agent,
                config.timeout_seconds,
            )?,
            timeout: secs(config.timeout_seconds),
        })
    }
}

#[async_trait]
impl JobSource for RemoteOkSource {
    fn kind(&self) -> JobSourceKind {
        JobSourceKind::RemoteOk
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn fetch(&self, query: &JobQuery, limit: usize) -> Result<Vec<JobPosting>> {
        info!("Fetching RemoteOK jobs for: {}", query.keywords);

        let items: Vec<serde_json::Value> = self.client.get_json(API_ENDPOINT, &[]).await?;
        let jobs = into_postings(items, query, limit);

        info!("Fetched {} jobs from RemoteOK", jobs.len());
        Ok(jobs)
    }
}

/// The feed starts with a legal notice object; anything without a position and company is skipped
pub fn into_postings(
    items: Vec<serde_json::Value>,
    query: &JobQuery,
    limit: usize,
) -> Vec<JobPosting> {
    items
        .into_iter()
        .filter_map(|item| serde_json::from_value::<RemoteOkJob>(item).ok())
        .filter_map(to_posting)
        .filter(|job| query.matches(job))
        .take(limit)
        .collect()
}

fn to_posting(raw: RemoteOkJob) -> Option<JobPosting> {
    let title = raw.position.filter(|p| !p.trim().is_empty())?;
    let company = raw.company.filter(|c| !c.trim().is_empty())?;
    let upstream_id = id_string(&raw.id);

    let description = raw
        .description
        .map(|d| html_to_text(&d))
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| {
            format!(
                "{} at {}. Remote position with competitive benefits.",
                title, company
            )
        });

    let url = raw.url.filter(|u| !u.is_empty()).unwrap_or_else(|| {
        format!(
            "https://remoteok.io/remote-jobs/{}",
            upstream_id.clone().unwrap_or_default()
        )
    });

    let id = format!(
        "remoteok_{}",
        upstream_id.unwrap_or_else(|| uuid::Uuid::new_v4().simple().to_string())
    );

    Some(
        JobPosting::new(id, title.trim(), company.trim(), JobSourceKind::RemoteOk)
            .with_location(
                raw.location
                    .filter(|l| !l.trim().is_empty())
                    .unwrap_or_else(|| "Remote".to_string()),
            )
            .with_description(description)
            .with_url(url)
            .with_salary(salary_range(raw.salary_min, raw.salary_max))
            .with_tags(raw.tags.unwrap_or_default()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn feed() -> Vec<serde_json::Value> {
        vec![
            json!({"last_updated": 1700000000, "legal": "API terms"}),
            json!({
                "id": "1001", "position": "Senior Rust Engineer", "company": "Oxide",
                "description": "<p>Build <b>Rust</b> services</p>", "url": "https://remoteok.io/l/1001",
                "salary_min": 150000, "salary_max": 190000, "tags": ["rust", "backend"]
            }),
            json!({"id": 1002, "position": "Account Executive", "company": "SalesCo"}),
            json!({"id": 1003, "position": "Python Developer", "company": "Snake Inc", "location": ""}),
        ]
    }

    #[test]
    fn test_skips_legal_notice_and_filters_keywords() {
        let query = JobQuery::new("rust developer");
        let jobs = into_postings(feed(), &query, 10);

        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].id, "remoteok_1001");
        assert_eq!(jobs[0].description, "Build Rust services");
        assert_eq!(jobs[0].salary.as_deref(), Some("$150000 - $190000"));
        assert_eq!(jobs[0].tags, vec!["rust", "backend"]);
        assert_eq!(jobs[1].id, "remoteok_1003");
        assert_eq!(jobs[1].location, "Remote");
        assert_eq!(jobs[1].url, "https://remoteok.io/remote-jobs/1003");
    }

    #[test]
    fn test_respects_limit() {
        let query = JobQuery::new("rust developer");
        assert_eq!(into_postings(feed(), &query, 1).len(), 1);
    }

    #[test]
    fn test_malformed_entries_are_ignored() {
        let query = JobQuery::new("rust");
        let items = vec![json!("not an object"), json!({"position": 7})];
        assert!(into_postings(items, &query, 10).is_empty());
    }
}
