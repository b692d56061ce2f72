// src/jobs/sources/themuse.rs
use super::{id_string, secs, JobSource, Named};
use crate::core::config_manager::ProvidersConfig;
use crate::core::ServiceClient;
use crate::jobs::types::{JobPosting, JobQuery, JobSourceKind};
use crate::utils::html_to_text;
use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::info;

const JOBS_ENDPOINT: &str = "/api/public/jobs";
const CATEGORY: &str = "Computer and IT";

#[derive(Debug, Default, Deserialize)]
pub struct MuseResponse {
    #[serde(default)]
    results: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct MuseJob {
    #[serde(default)]
    id: serde_json::Value,
    name: Option<String>,
    contents: Option<String>,
    company: Option<Named>,
    #[serde(default)]
    locations: Vec<Named>,
    refs: Option<MuseRefs>,
    #[serde(default)]
    levels: Vec<Named>,
    #[serde(default)]
    categories: Vec<Named>,
}

#[derive(Debug, Deserialize)]
struct MuseRefs {
    landing_page: Option<String>,
}

pub struct TheMuseSource {
    client: ServiceClient,
    timeout: Duration,
}

impl TheMuseSource {
    pub fn new(config: &ProvidersConfig) -> Result<Self> {
        Ok(Self {
            client: ServiceClient::new(
                &config.themuse.base_url,
                &config.user_agent,
                config.timeout_seconds,
            )?,
            timeout: secs(config.timeout_seconds),
        })
    }
}

#[async_trait]
impl JobSource for TheMuseSource {
    fn kind(&self) -> JobSourceKind {
        JobSourceKind::TheMuse
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The Muse has no remote filter, so remote-only searches leave it out
    fn enabled_for(&self, query: &JobQuery) -> bool {
        !query.remote
    }

    async fn fetch(&self, query: &JobQuery, limit: usize) -> Result<Vec<JobPosting>> {
        info!("Fetching The Muse jobs for: {}", query.keywords);

        let mut params = vec![("category", CATEGORY.to_string()), ("page", "0".to_string())];
        if !query.location.is_empty() && !query.location.eq_ignore_ascii_case("remote") {
            params.push(("location", query.location.clone()));
        }

        let response: MuseResponse = self.client.get_json(JOBS_ENDPOINT, &params).await?;
        let jobs = into_postings(response, query, limit);

        info!("Fetched {} jobs from The Muse", jobs.len());
        Ok(jobs)
    }
}

pub fn into_postings(response: MuseResponse, query: &JobQuery, limit: usize) -> Vec<JobPosting> {
    response
        .results
        .into_iter()
        .filter_map(|item| serde_json::from_value::<MuseJob>(item).ok())
        .filter_map(to_posting)
        .filter(|job| query.matches(job))
        .take(limit)
        .collect()
}

fn to_posting(raw: MuseJob) -> Option<JobPosting> {
    let title = raw.name.filter(|n| !n.trim().is_empty())?;
    let upstream_id = id_string(&raw.id)?;

    let company = raw
        .company
        .and_then(|c| c.name)
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| "Company via The Muse".to_string());

    let location = raw
        .locations
        .into_iter()
        .find_map(|l| l.name)
        .unwrap_or_else(|| "Not specified".to_string());

    let description = raw
        .contents
        .map(|c| html_to_text(&c))
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| {
            format!(
                "{} position at {}. Apply through The Muse for more details.",
                title, company
            )
        });

    let url = raw
        .refs
        .and_then(|r| r.landing_page)
        .unwrap_or_else(|| format!("https://www.themuse.com/jobs/{}", upstream_id));

    let tags = raw
        .levels
        .into_iter()
        .chain(raw.categories)
        .filter_map(|n| n.name)
        .collect();

    Some(
        JobPosting::new(
            format!("themuse_{}", upstream_id),
            title.trim(),
            company,
            JobSourceKind::TheMuse,
        )
        .with_location(location)
        .with_description(description)
        .with_url(url)
        .with_tags(tags),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_maps_results() {
        let response: MuseResponse = serde_json::from_value(json!({
            "page": 0,
            "results": [
                {
                    "id": 555, "name": "Data Engineer",
                    "contents": "<div>Pipelines in <i>Python</i></div>",
                    "company": {"name": "Muse Co"},
                    "locations": [{"name": "New York, NY"}],
                    "refs": {"landing_page": "https://www.themuse.com/jobs/museco/data-engineer"},
                    "levels": [{"name": "Mid Level"}],
                    "categories": [{"name": "Data Science"}]
                },
                {"id": 556, "name": "Office Manager", "contents": "Keep things tidy"},
                {"id": 557, "name": "Python Developer"}
            ]
        }))
        .unwrap();

        let query = JobQuery::new("python");
        let jobs = into_postings(response, &query, 10);

        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].id, "themuse_555");
        assert_eq!(jobs[0].company, "Muse Co");
        assert_eq!(jobs[0].location, "New York, NY");
        assert_eq!(jobs[0].description, "Pipelines in Python");
        assert_eq!(jobs[0].tags, vec!["Mid Level", "Data Science"]);
        assert_eq!(jobs[1].company, "Company via The Muse");
        assert_eq!(jobs[1].location, "Not specified");
        assert_eq!(jobs[1].url, "https://www.themuse.com/jobs/557");
    }

    #[test]
    fn test_missing_results_is_empty() {
        let response: MuseResponse = serde_json::from_value(json!({"error": "rate limited"})).unwrap();
        assert!(into_postings(response, &JobQuery::new("rust"), 5).is_empty());
    }
}
