// src/core/service_client.rs
//! Thin HTTP client shared by the job board sources

use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::time::Duration;
use tracing::trace;

const REDACTED: &str = "***";

pub struct ServiceClient {
    client: reqwest::Client,
    base_url: String,
    secrets: Vec<String>,
}

impl ServiceClient {
    pub fn new(base_url: &str, user_agent: &str, timeout_seconds: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(timeout_seconds))
            .redirect(reqwest::redirect::Policy::limited(3))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            secrets: Vec::new(),
        })
    }

    /// Credentials carried in a path or query; masked in every error this client produces
    pub fn with_secret(mut self, secret: &str) -> Self {
        if !secret.trim().is_empty() {
            self.secrets.push(secret.to_string());
        }
        self
    }

    pub fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    pub fn redact(&self, text: &str) -> String {
        self.secrets
            .iter()
            .fold(text.to_string(), |acc, secret| acc.replace(secret.as_str(), REDACTED))
    }

    fn scrub(&self, err: reqwest::Error) -> reqwest::Error {
        if self.secrets.is_empty() {
            err
        } else {
            err.without_url()
        }
    }

    /// GET with query parameters, decoding a JSON body
    pub async fn get_json<R>(&self, endpoint: &str, query: &[(&str, String)]) -> Result<R>
    where
        R: serde::de::DeserializeOwned,
    {
        let url = self.url(endpoint);
        trace!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| self.scrub(e))
            .with_context(|| format!("Failed to GET from {}", self.redact(&url)))?;

        let status = response.status();
        if status.is_success() {
            response
                .json::<R>()
                .await
                .map_err(|e| self.scrub(e))
                .with_context(|| format!("Failed to parse JSON response from {}", self.redact(&url)))
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            anyhow::bail!(
                "HTTP {} error from {}: {}",
                status,
                self.redact(&url),
                self.redact(&error_text)
            )
        }
    }

    /// GET returning the raw body, for HTML pages
    pub async fn get_text(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
        headers: &[(&str, &str)],
    ) -> Result<String> {
        let url = self.url(endpoint);
        trace!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .query(query)
            .headers(to_header_map(headers)?)
            .send()
            .await
            .map_err(|e| self.scrub(e))
            .with_context(|| format!("Failed to GET from {}", self.redact(&url)))?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("HTTP error: {}", status);
        }

        response
            .text()
            .await
            .map_err(|e| self.scrub(e))
            .context("Failed to read response body")
    }

    /// POST a JSON payload, decoding a JSON body
    pub async fn post_json<T, R>(&self, endpoint: &str, payload: &T) -> Result<R>
    where
        T: serde::Serialize,
        R: serde::de::DeserializeOwned,
    {
        let url = self.url(endpoint);
        trace!("POST {}", self.redact(&url));

        let response = self
            .client
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(|e| self.scrub(e))
            .with_context(|| format!("Failed to POST to {}", self.redact(&url)))?;

        let status = response.status();
        if status.is_success() {
            response
                .json::<R>()
                .await
                .map_err(|e| self.scrub(e))
                .context("Failed to parse JSON response")
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            anyhow::bail!("HTTP {} error: {}", status, self.redact(&error_text))
        }
    }
}

fn to_header_map(headers: &[(&str, &str)]) -> Result<HeaderMap> {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .with_context(|| format!("Invalid header name: {}", name))?;
        let value = HeaderValue::from_str(value)
            .with_context(|| format!("Invalid header value for {}", name))?;
        map.insert(name, value);
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = ServiceClient::new("http://localhost:1234/", "test", 5).unwrap();
        assert_eq!(client.url("/api"), "http://localhost:1234/api");
    }

    #[test]
    fn test_secrets_are_masked() {
        let client = ServiceClient::new("http://localhost:1234", "test", 5)
            .unwrap()
            .with_secret("SUPERSECRET")
            .with_secret("  ");
        let url = client.url("/api/SUPERSECRET");
        assert_eq!(client.redact(&url), "http://localhost:1234/api/***");
        assert_eq!(client.redact("nothing here"), "nothing here");
    }

    #[test]
    fn test_header_map() {
        let map = to_header_map(&[("Accept-Language", "en-US,en;q=0.5"), ("DNT", "1")]).unwrap();
        assert_eq!(map.len(), 2);
        assert!(to_header_map(&[("bad header", "x")]).is_err());
    }
}
