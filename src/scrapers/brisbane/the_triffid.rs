use crate::config::HttpConfig;
use crate::error::Result;
use crate::fetch::FetchClient;
use crate::types::{RawEvent, VenueInfo, VenueScraper};
use scraper::{Html, Selector};
use serde_json::Value;
use tracing::{debug, info, warn};

pub const SOURCE_ID: &str = "brisbane_the_triffid";
const LISTING_URL: &str = "https://thetriffid.com.au/gigs/";

/// The Triffid embeds schema.org Event records as JSON-LD script blocks,
/// which is far more stable than its markup.
pub struct TheTriffidScraper {
    client: FetchClient,
}

impl TheTriffidScraper {
    pub fn new(config: &HttpConfig) -> Self {
        Self {
            client: FetchClient::new(config),
        }
    }
}

fn event_from_ld(node: &Value) -> Option<RawEvent> {
    let kind = node.get("@type").and_then(|t| t.as_str())?;
    if kind != "Event" && kind != "MusicEvent" {
        return None;
    }
    let title = node.get("name").and_then(|n| n.as_str())?.trim();
    let start = node.get("startDate").and_then(|d| d.as_str())?;
    if title.is_empty() {
        return None;
    }

    let mut raw = RawEvent::new(title, start);
    raw.url = node
        .get("url")
        .and_then(|u| u.as_str())
        .map(|s| s.to_string());
    raw.image_url = node
        .get("image")
        .and_then(|i| i.as_str().or_else(|| i.get(0).and_then(|f| f.as_str())))
        .map(|s| s.to_string());
    raw.description = node
        .get("description")
        .and_then(|d| d.as_str())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    raw.category = Some("live-music".to_string());
    Some(raw)
}

pub fn parse_listing(html: &str) -> Vec<RawEvent> {
    let document = Html::parse_document(html);
    let script_selector = Selector::parse(r#"script[type="application/ld+json"]"#).unwrap();

    let mut events = Vec::new();
    for script in document.select(&script_selector) {
        let body = script.text().collect::<String>();
        let parsed: Value = match serde_json::from_str(&body) {
            Ok(v) => v,
            Err(e) => {
                debug!("Skipping malformed JSON-LD block: {}", e);
                continue;
            }
        };
        // Blocks are either a single object or a @graph/array of them.
        let nodes: Vec<&Value> = if let Some(arr) = parsed.as_array() {
            arr.iter().collect()
        } else if let Some(graph) = parsed.get("@graph").and_then(|g| g.as_array()) {
            graph.iter().collect()
        } else {
            vec![&parsed]
        };
        for node in nodes {
            if let Some(raw) = event_from_ld(node) {
                events.push(raw);
            }
        }
    }
    events
}

#[async_trait::async_trait]
impl VenueScraper for TheTriffidScraper {
    fn source_id(&self) -> &'static str {
        SOURCE_ID
    }

    fn venue(&self) -> VenueInfo {
        VenueInfo {
            name: "The Triffid".to_string(),
            address: "7-9 Stratton St, Newstead".to_string(),
            city: "Brisbane".to_string(),
            website: Some("https://thetriffid.com.au".to_string()),
        }
    }

    async fn fetch_candidates(&self) -> Result<Vec<RawEvent>> {
        info!("Fetching events from The Triffid");
        let body = self.client.get_text(LISTING_URL).await?;
        let events = parse_listing(&body);
        info!("Parsed {} candidates from The Triffid", events.len());
        if events.is_empty() {
            warn!("No JSON-LD events found - the site may have dropped structured data");
        }
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><head>
        <script type="application/ld+json">
        {"@context":"https://schema.org","@graph":[
          {"@type":"MusicEvent","name":"Hiatus Coyote","startDate":"2026-09-18T20:00:00+10:00",
           "url":"https://thetriffid.com.au/event/hiatus-coyote/",
           "image":"https://thetriffid.com.au/img/hc.jpg",
           "description":"With special guests."},
          {"@type":"Place","name":"The Triffid"}
        ]}
        </script>
        <script type="application/ld+json">
        {"@type":"Event","name":"Vinyl Fair","startDate":"2026-09-20"}
        </script>
        <script type="application/ld+json">not json at all</script>
        </head><body></body></html>"#;

    #[test]
    fn extracts_events_from_graph_and_bare_blocks() {
        let events = parse_listing(PAGE);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].title, "Hiatus Coyote");
        assert_eq!(events[0].date_text, "2026-09-18T20:00:00+10:00");
        assert_eq!(
            events[0].url.as_deref(),
            Some("https://thetriffid.com.au/event/hiatus-coyote/")
        );
        assert_eq!(events[0].description.as_deref(), Some("With special guests."));
        assert_eq!(events[1].title, "Vinyl Fair");
        assert_eq!(events[1].date_text, "2026-09-20");
    }

    #[test]
    fn non_event_nodes_are_ignored() {
        let events = parse_listing(
            r#"<script type="application/ld+json">{"@type":"Place","name":"X"}</script>"#,
        );
        assert!(events.is_empty());
    }
}
