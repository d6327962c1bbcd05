//! Client for the third-party random fact endpoint (catfact.ninja by default).
//!
//! Responses look like `{"fact": "...", "length": 42}`; only `fact` is used.

use crate::error::{FactError, Result};
use std::time::Duration;

#[derive(Debug, serde::Deserialize)]
struct UpstreamFact {
    fact: String,
}

pub struct Upstream {
    client: reqwest::Client,
    url: String,
}

impl Upstream {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch one fact from upstream and return its trimmed text.
    pub async fn fetch_fact(&self) -> Result<String> {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(FactError::UpstreamUnavailable(format!(
                "upstream returned {}: {}",
                status,
                truncate_error(&body)
            )));
        }

        let parsed: UpstreamFact = serde_json::from_str(&body).map_err(|e| {
            FactError::UpstreamUnavailable(format!("invalid upstream JSON: {}", e))
        })?;

        let fact = parsed.fact.trim();
        if fact.is_empty() {
            return Err(FactError::UpstreamUnavailable(
                "upstream returned an empty fact".to_string(),
            ));
        }
        Ok(fact.to_string())
    }
}

fn truncate_error(body: &str) -> String {
    if body.chars().count() > 200 {
        let head: String = body.chars().take(200).collect();
        format!("{}...", head)
    } else {
        body.to_string()
    }
}
