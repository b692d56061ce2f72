// src/jobs/sources/mod.rs
//! Upstream job boards. Each source turns one query into postings or an error;
//! the aggregator decides what a failure means.

pub mod adzuna;
pub mod jooble;
pub mod linkedin;
pub mod remoteok;
pub mod themuse;

pub use adzuna::AdzunaSource;
pub use jooble::JoobleSource;
pub use linkedin::LinkedInSource;
pub use remoteok::RemoteOkSource;
pub use themuse::TheMuseSource;

use super::types::{JobPosting, JobQuery, JobSourceKind};
use crate::core::config_manager::ProvidersConfig;
use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

#[async_trait]
pub trait JobSource: Send + Sync {
    fn kind(&self) -> JobSourceKind;

    /// Per-call budget the aggregator enforces around `fetch`
    fn timeout(&self) -> Duration;

    fn enabled_for(&self, _query: &JobQuery) -> bool {
        true
    }

    async fn fetch(&self, query: &JobQuery, limit: usize) -> Result<Vec<JobPosting>>;
}

/// Build every source the configuration allows, in aggregation order
pub fn configured_sources(config: &ProvidersConfig) -> Result<Vec<Box<dyn JobSource>>> {
    let mut sources: Vec<Box<dyn JobSource>> = vec![
        Box::new(LinkedInSource::new(&config.linkedin)?),
        Box::new(RemoteOkSource::new(config)?),
        Box::new(TheMuseSource::new(config)?),
    ];

    if let Some(source) = AdzunaSource::from_config(config)? {
        sources.push(Box::new(source));
    }
    if let Some(source) = JoobleSource::from_config(config)? {
        sources.push(Box::new(source));
    }

    Ok(sources)
}

/// `{"name": ...}` objects as used by several boards
#[derive(Debug, Default, Deserialize)]
pub(crate) struct Named {
    #[serde(default)]
    pub name: Option<String>,
}

/// Upstream ids arrive as strings or numbers
pub(crate) fn id_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub(crate) fn secs(seconds: u64) -> Duration {
    Duration::from_secs(seconds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ConfigManager;

    #[test]
    fn test_id_string() {
        assert_eq!(id_string(&serde_json::json!("abc")), Some("abc".to_string()));
        assert_eq!(id_string(&serde_json::json!(42)), Some("42".to_string()));
        assert_eq!(id_string(&serde_json::json!("")), None);
        assert_eq!(id_string(&serde_json::Value::Null), None);
    }

    #[test]
    fn test_keyed_sources_need_credentials() {
        let mut config = ConfigManager::default();
        let kinds: Vec<_> = configured_sources(&config.providers)
            .unwrap()
            .iter()
            .map(|s| s.kind())
            .collect();
        assert_eq!(
            kinds,
            vec![
                JobSourceKind::LinkedIn,
                JobSourceKind::RemoteOk,
                JobSourceKind::TheMuse
            ]
        );

        config.providers.adzuna.app_id = Some("id".into());
        config.providers.adzuna.app_key = Some("key".into());
        config.providers.jooble.api_key = Some("key".into());
        let kinds: Vec<_> = configured_sources(&config.providers)
            .unwrap()
            .iter()
            .map(|s| s.kind())
            .collect();
        assert_eq!(kinds.len(), 5);
        assert_eq!(kinds[3], JobSourceKind::Adzuna);
        assert_eq!(kinds[4], JobSourceKind::Jooble);
    }
}
