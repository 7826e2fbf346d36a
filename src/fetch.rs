use crate::config::HttpConfig;
use crate::error::{Result, ScraperError};
use std::time::Duration;
use tracing::{debug, warn};

/// Shared HTTP client for the venue crawlers: fixed retry policy (N attempts
/// with a fixed sleep between them) and a polite per-page delay for adapters
/// that walk detail pages.
#[derive(Debug, Clone)]
pub struct FetchClient {
    client: reqwest::Client,
    retry_attempts: u32,
    retry_delay: Duration,
    page_delay: Duration,
}

impl FetchClient {
    pub fn new(config: &HttpConfig) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .unwrap_or_default();
        Self {
            client,
            retry_attempts: config.retry_attempts.max(1),
            retry_delay: Duration::from_millis(config.retry_delay_ms),
            page_delay: Duration::from_millis(config.page_delay_ms),
        }
    }

    /// Fetches a page body, retrying transient failures.
    pub async fn get_text(&self, url: &str) -> Result<String> {
        let response = self.get_with_retries(url).await?;
        Ok(response.text().await?)
    }

    /// Fetches and deserializes a JSON endpoint, retrying transient failures.
    pub async fn get_json(&self, url: &str) -> Result<serde_json::Value> {
        let response = self.get_with_retries(url).await?;
        Ok(response.json().await?)
    }

    async fn get_with_retries(&self, url: &str) -> Result<reqwest::Response> {
        let mut last_error: Option<ScraperError> = None;
        for attempt in 1..=self.retry_attempts {
            match self.client.get(url).send().await {
                Ok(response) if response.status().is_success() => {
                    debug!(url, attempt, "Fetched");
                    return Ok(response);
                }
                Ok(response) => {
                    let status = response.status().as_u16();
                    warn!(url, status, attempt, "Non-success status");
                    last_error = Some(ScraperError::HttpStatus {
                        status,
                        url: url.to_string(),
                    });
                }
                Err(e) => {
                    warn!(url, attempt, "Request failed: {}", e);
                    last_error = Some(e.into());
                }
            }
            if attempt < self.retry_attempts {
                tokio::time::sleep(self.retry_delay).await;
            }
        }
        Err(last_error.unwrap_or_else(|| ScraperError::Extract {
            message: format!("no attempts made for {url}"),
        }))
    }

    /// Sleep between detail-page requests within one crawl.
    pub async fn page_delay(&self) {
        if !self.page_delay.is_zero() {
            tokio::time::sleep(self.page_delay).await;
        }
    }
}
