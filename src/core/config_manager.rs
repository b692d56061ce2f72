// src/core/config_manager.rs
//! Unified configuration: built-in defaults, optional YAML overlay, then environment

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

const DEFAULT_CONFIG_FILE: &str = "copilot.yaml";
const CONFIG_PATH_VAR: &str = "CAREER_COPILOT_CONFIG";

const LINKEDIN_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigManager {
    pub server: ServerSettings,
    pub llm: LlmConfig,
    pub providers: ProvidersConfig,
    pub search: SearchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub address: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub version: String,
    pub timeout_seconds: u64,
    /// Ask the model to pick the tool before falling back to keyword routing
    pub llm_routing: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    pub timeout_seconds: u64,
    pub user_agent: String,
    pub linkedin: LinkedInConfig,
    pub remoteok: RemoteOkConfig,
    pub themuse: TheMuseConfig,
    pub adzuna: AdzunaConfig,
    pub jooble: JoobleConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkedInConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteOkConfig {
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TheMuseConfig {
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdzunaConfig {
    pub base_url: String,
    pub country: String,
    #[serde(skip_serializing)]
    pub app_id: Option<String>,
    #[serde(skip_serializing)]
    pub app_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JoobleConfig {
    pub base_url: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub default_keywords: String,
    pub default_limit: usize,
    pub max_limit: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            address: "0.0.0.0".to_string(),
            port: 3001,
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.anthropic.com".to_string(),
            model: "claude-3-haiku-20240307".to_string(),
            version: "2023-06-01".to_string(),
            timeout_seconds: 60,
            llm_routing: false,
        }
    }
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 10,
            user_agent: "Career-Copilot/1.0".to_string(),
            linkedin: LinkedInConfig::default(),
            remoteok: RemoteOkConfig::default(),
            themuse: TheMuseConfig::default(),
            adzuna: AdzunaConfig::default(),
            jooble: JoobleConfig::default(),
        }
    }
}

impl Default for LinkedInConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.linkedin.com".to_string(),
            user_agent: LINKEDIN_USER_AGENT.to_string(),
            timeout_seconds: 15,
        }
    }
}

impl Default for RemoteOkConfig {
    fn default() -> Self {
        Self {
            base_url: "https://remoteok.io".to_string(),
        }
    }
}

impl Default for TheMuseConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.themuse.com".to_string(),
        }
    }
}

impl Default for AdzunaConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.adzuna.com".to_string(),
            country: "us".to_string(),
            app_id: None,
            app_key: None,
        }
    }
}

impl Default for JoobleConfig {
    fn default() -> Self {
        Self {
            base_url: "https://jooble.org".to_string(),
            api_key: None,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_keywords: "software engineer".to_string(),
            default_limit: 20,
            max_limit: 50,
        }
    }
}

impl ConfigManager {
    /// Load defaults, the optional YAML file, then environment overrides
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_file_path() {
            Some(path) => Self::from_yaml_file(&path)?,
            None => Self::default(),
        };

        config.apply_env(|key| std::env::var(key).ok());
        config.log_summary();

        Ok(config)
    }

    fn config_file_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_PATH_VAR) {
            if !path.trim().is_empty() {
                return Some(PathBuf::from(path));
            }
        }

        let local = PathBuf::from(DEFAULT_CONFIG_FILE);
        local.exists().then_some(local)
    }

    /// Parse a YAML overlay; omitted fields keep their defaults
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_yaml_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).context("Invalid YAML configuration")
    }

    /// Apply environment overrides through `lookup`; blank values count as unset
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(port) = get("PORT").and_then(|p| p.trim().parse::<u16>().ok()) {
            self.server.port = port;
        }
        if let Some(host) = get("HOST") {
            self.server.address = host;
        }
        if let Some(key) = get("ANTHROPIC_API_KEY") {
            self.llm.api_key = Some(key);
        }
        if let Some(model) = get("ANTHROPIC_MODEL") {
            self.llm.model = model;
        }
        if let Some(flag) = get("COPILOT_LLM_ROUTING") {
            self.llm.llm_routing = matches!(flag.to_lowercase().as_str(), "1" | "true" | "yes");
        }
        if let Some(app_id) = get("ADZUNA_APP_ID") {
            self.providers.adzuna.app_id = Some(app_id);
        }
        if let Some(app_key) = get("ADZUNA_APP_KEY") {
            self.providers.adzuna.app_key = Some(app_key);
        }
        if let Some(key) = get("JOOBLE_API_KEY") {
            self.providers.jooble.api_key = Some(key);
        }
    }

    fn log_summary(&self) {
        info!(
            "Server: {}:{}, model: {}, LLM routing: {}",
            self.server.address, self.server.port, self.llm.model, self.llm.llm_routing
        );
        info!("Anthropic API key: {}", configured(self.llm.is_configured()));
        info!("Adzuna API: {}", configured(self.providers.adzuna.is_configured()));
        info!("Jooble API: {}", configured(self.providers.jooble.is_configured()));
    }
}

impl LlmConfig {
    pub fn is_configured(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

impl AdzunaConfig {
    pub fn is_configured(&self) -> bool {
        self.app_id.is_some() && self.app_key.is_some()
    }
}

impl JoobleConfig {
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

fn configured(flag: bool) -> &'static str {
    if flag {
        "configured"
    } else {
        "not configured"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ConfigManager::default();
        assert_eq!(config.server.port, 3001);
        assert_eq!(config.llm.model, "claude-3-haiku-20240307");
        assert_eq!(config.providers.timeout_seconds, 10);
        assert_eq!(config.providers.linkedin.timeout_seconds, 15);
        assert_eq!(config.search.max_limit, 50);
        assert!(!config.providers.adzuna.is_configured());
        assert!(!config.providers.jooble.is_configured());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ConfigManager::default();
        config.apply_env(env(&[
            ("PORT", "8080"),
            ("ANTHROPIC_API_KEY", "sk-test"),
            ("ADZUNA_APP_ID", "id"),
            ("ADZUNA_APP_KEY", "key"),
            ("JOOBLE_API_KEY", "   "),
            ("COPILOT_LLM_ROUTING", "true"),
        ]));

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.llm.api_key.as_deref(), Some("sk-test"));
        assert!(config.llm.llm_routing);
        assert!(config.providers.adzuna.is_configured());
        assert!(!config.providers.jooble.is_configured());
    }

    #[test]
    fn test_invalid_port_is_ignored() {
        let mut config = ConfigManager::default();
        config.apply_env(env(&[("PORT", "not-a-port")]));
        assert_eq!(config.server.port, 3001);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
providers:
  remoteok:
    base_url: "http://127.0.0.1:9999"
search:
  default_limit: 5
"#;
        let config = ConfigManager::from_yaml_str(yaml).unwrap();
        assert_eq!(config.providers.remoteok.base_url, "http://127.0.0.1:9999");
        assert_eq!(config.providers.themuse.base_url, "https://www.themuse.com");
        assert_eq!(config.search.default_limit, 5);
        assert_eq!(config.search.max_limit, 50);
        assert_eq!(config.server.port, 3001);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let config = ConfigManager::from_yaml_str("  \n").unwrap();
        assert_eq!(config.search.default_keywords, "software engineer");
    }
}
