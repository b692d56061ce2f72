// src/jobs/types.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobSourceKind {
    LinkedIn,
    RemoteOk,
    TheMuse,
    Adzuna,
    Jooble,
    /// Supplied by the caller rather than fetched
    Manual,
}

impl JobSourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LinkedIn => "linkedin",
            Self::RemoteOk => "remoteok",
            Self::TheMuse => "themuse",
            Self::Adzuna => "adzuna",
            Self::Jooble => "jooble",
            Self::Manual => "manual",
        }
    }
}

impl fmt::Display for JobSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One listing, built per request from whichever upstream produced it.
/// Callers may post partial listings back for scoring, hence the lenient defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPosting {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
    #[serde(default = "manual_source")]
    pub source: JobSourceKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Only LinkedIn entries carry this; false marks a search-link placeholder
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scraped: Option<bool>,
    #[serde(default = "Utc::now")]
    pub fetched_at: DateTime<Utc>,
}

fn manual_source() -> JobSourceKind {
    JobSourceKind::Manual
}

impl JobPosting {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        company: impl Into<String>,
        source: JobSourceKind,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            company: company.into(),
            location: String::new(),
            description: String::new(),
            url: String::new(),
            source,
            salary: None,
            tags: Vec::new(),
            scraped: None,
            fetched_at: Utc::now(),
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_salary(mut self, salary: Option<String>) -> Self {
        self.salary = salary;
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Case-insensitive (title, company) pair used for de-duplication
    pub fn dedup_key(&self) -> (String, String) {
        (self.title.to_lowercase(), self.company.to_lowercase())
    }

    /// Lowercased title and description, the text keyword filters run against
    pub fn search_text(&self) -> String {
        format!("{} {}", self.title, self.description).to_lowercase()
    }
}

/// Parameters for one aggregated search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobQuery {
    pub keywords: String,
    pub location: String,
    pub limit: usize,
    pub remote: bool,
    pub include_linkedin: bool,
}

impl JobQuery {
    pub const DEFAULT_KEYWORDS: &'static str = "software engineer";
    pub const DEFAULT_LIMIT: usize = 20;
    pub const MAX_LIMIT: usize = 50;

    pub fn new(keywords: &str) -> Self {
        Self {
            keywords: keywords.to_string(),
            location: String::new(),
            limit: Self::DEFAULT_LIMIT,
            remote: false,
            include_linkedin: true,
        }
        .normalized()
    }

    pub fn with_location(mut self, location: &str) -> Self {
        self.location = location.trim().to_string();
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self.normalized()
    }

    pub fn remote_only(mut self, remote: bool) -> Self {
        self.remote = remote;
        self
    }

    pub fn include_linkedin(mut self, include: bool) -> Self {
        self.include_linkedin = include;
        self
    }

    /// Blank keywords fall back to the default; limit is clamped to 1..=MAX_LIMIT
    pub fn normalized(mut self) -> Self {
        let trimmed = self.keywords.trim();
        self.keywords = if trimmed.is_empty() {
            Self::DEFAULT_KEYWORDS.to_string()
        } else {
            trimmed.to_string()
        };
        self.limit = self.limit.clamp(1, Self::MAX_LIMIT);
        self
    }

    /// Lowercased, whitespace-separated keyword terms
    pub fn terms(&self) -> Vec<String> {
        self.keywords
            .to_lowercase()
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }

    /// True when any query term occurs in the posting's title or description
    pub fn matches(&self, job: &JobPosting) -> bool {
        let text = job.search_text();
        self.terms().iter().any(|term| text.contains(term.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceFailure {
    pub source: JobSourceKind,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMetadata {
    pub total_jobs: usize,
    pub providers: Vec<JobSourceKind>,
    pub providers_attempted: Vec<JobSourceKind>,
    pub failures: Vec<SourceFailure>,
    pub linkedin_jobs: usize,
    pub query: JobQuery,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedJobs {
    pub jobs: Vec<JobPosting>,
    pub metadata: SearchMetadata,
}

/// `$min - $max` when both bounds are present and positive
pub fn salary_range(min: Option<f64>, max: Option<f64>) -> Option<String> {
    match (min, max) {
        (Some(min), Some(max)) if min > 0.0 && max > 0.0 => {
            Some(format!("${} - ${}", min.round() as i64, max.round() as i64))
        }
        _ => None,
    }
}
