// src/jobs/sources/adzuna.rs
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

#[derive(Debug, Default, Deserialize)]
pub struct AdzunaResponse {
    #[serde(default)]
    results: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct AdzunaJob {
    #[serde(default)]
    id: serde_json::Value,
    title: Option<String>,
    company: Option<DisplayName>,
    location: Option<DisplayName>,
    description: Option<String>,
    redirect_url: Option<String>,
    salary_min: Option<f64>,
    salary_max: Option<f64>,
    category: Option<Label>,
}

#[derive(Debug, Deserialize)]
struct DisplayName {
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Label {
    label: Option<String>,
}

pub struct AdzunaSource {
    client: ServiceClient,
    country: String,
    app_id: String,
    app_key: String,
    timeout: Duration,
}

impl AdzunaSource {
    /// None unless both the app id and key are configured
    pub fn from_config(config: &ProvidersConfig) -> Result<Option<Self>> {
        let adzuna = &config.adzuna;
        let (Some(app_id), Some(app_key)) = (&adzuna.app_id, &adzuna.app_key) else {
            info!("Adzuna API credentials not provided, skipping");
            return Ok(None);
        };

        Ok(Some(Self {
            client: ServiceClient::new(&adzuna.base_url, &config.user_agent, config.timeout_seconds)?
                .with_secret(app_id)
                .with_secret(app_key),
            country: adzuna.country.clone(),
            app_id: app_id.clone(),
            app_key: app_key.clone(),
            timeout: secs(config.timeout_seconds),
        }))
    }
}

#[async_trait]
impl JobSource for AdzunaSource {
    fn kind(&self) -> JobSourceKind {
        JobSourceKind::Adzuna
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn fetch(&self, query: &JobQuery, limit: usize) -> Result<Vec<JobPosting>> {
        info!("Fetching Adzuna jobs for: {}", query.keywords);

        let endpoint = format!("/v1/api/jobs/{}/search/1", self.country);
        let params = [
            ("app_id", self.app_id.clone()),
            ("app_key", self.app_key.clone()),
            ("results_per_page", limit.to_string()),
            ("what", query.keywords.clone()),
            ("where", query.location.clone()),
            ("content_type", "application/json".to_string()),
        ];

        let response: AdzunaResponse = self.client.get_json(&endpoint, &params).await?;
        let jobs = into_postings(response, limit);

        info!("Fetched {} jobs from Adzuna", jobs.len());
        Ok(jobs)
    }
}

/// Adzuna filters by keyword upstream, so no local keyword filter here
pub fn into_postings(response: AdzunaResponse, limit: usize) -> Vec<JobPosting> {
    response
        .results
        .into_iter()
        .filter_map(|item| serde_json::from_value::<AdzunaJob>(item).ok())
        .filter_map(to_posting)
        .take(limit)
        .collect()
}

fn to_posting(raw: AdzunaJob) -> Option<JobPosting> {
    let title = raw.title.map(|t| html_to_text(&t)).filter(|t| !t.is_empty())?;
    let upstream_id = id_string(&raw.id)?;

    let company = raw
        .company
        .and_then(|c| c.display_name)
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| "Unknown Company".to_string());

    let location = raw
        .location
        .and_then(|l| l.display_name)
        .unwrap_or_else(|| "Not specified".to_string());

    let description = raw
        .description
        .map(|d| html_to_text(&d))
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| "No description available".to_string());

    let url = raw
        .redirect_url
        .unwrap_or_else(|| format!("https://www.adzuna.com/details/{}", upstream_id));

    let tags = raw.category.and_then(|c| c.label).into_iter().collect();

    Some(
        JobPosting::new(
            format!("adzuna_{}", upstream_id),
            title,
            company,
            JobSourceKind::Adzuna,
        )
        .with_location(location)
        .with_description(description)
        .with_url(url)
        .with_salary(salary_range(raw.salary_min, raw.salary_max))
        .with_tags(tags),
    )
}
