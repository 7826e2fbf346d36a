use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveTime;
use std::sync::Arc;
use tempfile::tempdir;

use citybeat_scraper::config::{Config, HttpConfig};
use citybeat_scraper::fetch::FetchClient;
use citybeat_scraper::pipeline::Pipeline;
use citybeat_scraper::storage::{InMemoryStorage, Storage};
use citybeat_scraper::types::{RawEvent, VenueInfo, VenueScraper};

/// Adapter pointed at a port nothing listens on.
struct DeadSiteScraper {
    client: FetchClient,
}

#[async_trait]
impl VenueScraper for DeadSiteScraper {
    fn source_id(&self) -> &'static str {
        "test_dead_site"
    }

    fn venue(&self) -> VenueInfo {
        VenueInfo {
            name: "Dead Site".to_string(),
            address: "0 Nowhere Rd".to_string(),
            city: "Testville".to_string(),
            website: None,
        }
    }

    fn default_start_time(&self) -> Option<NaiveTime> {
        None
    }

    async fn fetch_candidates(&self) -> citybeat_scraper::error::Result<Vec<RawEvent>> {
        // Connection refused immediately; no external network involved.
        let body = self.client.get_text("http://127.0.0.1:9/listings").await?;
        Ok(vec![RawEvent::new("never reached", body)])
    }
}

#[tokio::test]
async fn unreachable_site_yields_empty_result_not_error() -> Result<()> {
    let temp = tempdir()?;
    let http = HttpConfig {
        timeout_seconds: 2,
        retry_attempts: 2,
        retry_delay_ms: 1,
        page_delay_ms: 0,
        ..HttpConfig::default()
    };
    let scraper = DeadSiteScraper {
        client: FetchClient::new(&http),
    };
    let mut config = Config::default();
    config.http = http;
    config.output.dir = temp.path().to_str().unwrap().to_string();

    let storage: Arc<dyn Storage> = Arc::new(InMemoryStorage::new());
    let result =
        Pipeline::run_for_scraper_with_storage(&scraper, &config, storage.clone()).await?;

    assert_eq!(result.total_candidates, 0);
    assert_eq!(result.emitted, 0);
    assert_eq!(result.output_file, None);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].contains("fetch failed"));
    assert!(storage.list_events(None).await?.is_empty());
    Ok(())
}
