// src/jobs/aggregator.rs
use super::sources::{configured_sources, JobSource};
use super::types::{AggregatedJobs, JobPosting, JobQuery, JobSourceKind, SearchMetadata, SourceFailure};
use crate::core::config_manager::ProvidersConfig;
use anyhow::Result;
use futures::future::join_all;
use std::collections::HashSet;
use tracing::{info, warn};

/// Fans one query out to every enabled board and merges what comes back
pub struct JobAggregator {
    sources: Vec<Box<dyn JobSource>>,
}

impl JobAggregator {
    pub fn new(sources: Vec<Box<dyn JobSource>>) -> Self {
        Self { sources }
    }

    pub fn from_config(config: &ProvidersConfig) -> Result<Self> {
        Ok(Self::new(configured_sources(config)?))
    }

    pub fn source_kinds(&self) -> Vec<JobSourceKind> {
        self.sources.iter().map(|s| s.kind()).collect()
    }

    pub async fn search(&self, query: &JobQuery) -> AggregatedJobs {
        let query = query.clone().normalized();
        let enabled: Vec<&dyn JobSource> = self
            .sources
            .iter()
            .map(|s| s.as_ref())
            .filter(|s| s.enabled_for(&query))
            .collect();

        let attempted: Vec<JobSourceKind> = enabled.iter().map(|s| s.kind()).collect();
        let per_source = per_source_limit(query.limit, enabled.len());

        info!(
            "Searching {} sources for '{}' ({} per source)",
            enabled.len(),
            query.keywords,
            per_source
        );

        let calls = enabled.iter().map(|source| {
            let query = &query;
            async move {
                let kind = source.kind();
                let outcome =
                    match tokio::time::timeout(source.timeout(), source.fetch(query, per_source))
                        .await
                    {
                        Ok(Ok(jobs)) => Ok(jobs),
                        Ok(Err(e)) => Err(e.to_string()),
                        Err(_) => Err(format!("timed out after {}s", source.timeout().as_secs())),
                    };
                (kind, outcome)
            }
        });

        let mut collected = Vec::new();
        let mut failures = Vec::new();
        for (kind, outcome) in join_all(calls).await {
            match outcome {
                Ok(jobs) => collected.extend(jobs),
                Err(error) => {
                    warn!("Job source {} failed: {}", kind, error);
                    failures.push(SourceFailure { source: kind, error });
                }
            }
        }

        let mut jobs = dedupe(collected);
        jobs.truncate(query.limit);

        let metadata = SearchMetadata {
            total_jobs: jobs.len(),
            providers: providers_present(&jobs),
            providers_attempted: attempted,
            failures,
            linkedin_jobs: jobs
                .iter()
                .filter(|j| j.source == JobSourceKind::LinkedIn)
                .count(),
            query,
        };

        info!(
            "Aggregated {} jobs from {:?}",
            metadata.total_jobs, metadata.providers
        );

        AggregatedJobs { jobs, metadata }
    }
}

/// ceil(limit / sources), never zero
pub fn per_source_limit(limit: usize, sources: usize) -> usize {
    if sources == 0 {
        return limit.max(1);
    }
    limit.div_ceil(sources).max(1)
}

/// Keep the first posting for each (title, company) pair
pub fn dedupe(jobs: Vec<JobPosting>) -> Vec<JobPosting> {
    let mut seen = HashSet::new();
    jobs.into_iter()
        .filter(|job| seen.insert(job.dedup_key()))
        .collect()
}

fn providers_present(jobs: &[JobPosting]) -> Vec<JobSourceKind> {
    let mut providers = Vec::new();
    for job in jobs {
        if !providers.contains(&job.source) {
            providers.push(job.source);
        }
    }
    providers
}
