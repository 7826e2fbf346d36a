use crate::config::HttpConfig;
use crate::error::Result;
use crate::fetch::FetchClient;
use crate::types::{RawEvent, VenueInfo, VenueScraper};
use chrono::NaiveTime;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use tracing::{info, warn};

pub const SOURCE_ID: &str = "queenstown_sherwood";
const LISTING_URL: &str = "https://sherwoodqueenstown.nz/events/";

/// Sherwood's gig list is a plain `<ul>` of one-line entries like
/// "12 Sep — Aldous Harding — 9pm". No markup to hang selectors on inside
/// the line, so a regex splits it.
static GIG_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(.+?)\s+[-\u{2013}\u{2014}]\s+(.+?)\s*(?:[-\u{2013}\u{2014}]\s+(.+?))?\s*$").unwrap());

pub struct SherwoodScraper {
    client: FetchClient,
}

impl SherwoodScraper {
    pub fn new(config: &HttpConfig) -> Self {
        Self {
            client: FetchClient::new(config),
        }
    }
}

pub fn parse_listing(html: &str) -> Vec<RawEvent> {
    let document = Html::parse_document(html);
    let line_selector = Selector::parse("ul.gigs li").unwrap();

    let mut events = Vec::new();
    for line_el in document.select(&line_selector) {
        let line = line_el.text().collect::<String>();
        let Some(caps) = GIG_LINE_RE.captures(line.trim()) else {
            continue;
        };
        let date_part = caps[1].trim().to_string();
        let title = caps[2].trim().to_string();
        if title.is_empty() || date_part.is_empty() {
            continue;
        }
        // Optional trailing segment is the time.
        let date_text = match caps.get(3) {
            Some(time) => format!("{date_part} {}", time.as_str().trim()),
            None => date_part,
        };
        let mut raw = RawEvent::new(title, date_text);
        raw.category = Some("live-music".to_string());
        events.push(raw);
    }
    events
}

#[async_trait::async_trait]
impl VenueScraper for SherwoodScraper {
    fn source_id(&self) -> &'static str {
        SOURCE_ID
    }

    fn venue(&self) -> VenueInfo {
        VenueInfo {
            name: "Sherwood".to_string(),
            address: "554 Frankton Rd".to_string(),
            city: "Queenstown".to_string(),
            website: Some("https://sherwoodqueenstown.nz".to_string()),
        }
    }

    fn default_start_time(&self) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(21, 0, 0)
    }

    async fn fetch_candidates(&self) -> Result<Vec<RawEvent>> {
        info!("Fetching events from Sherwood");
        let body = self.client.get_text(LISTING_URL).await?;
        let events = parse_listing(&body);
        info!("Parsed {} candidates from Sherwood", events.len());
        if events.is_empty() {
            warn!("No events found - the page structure may have changed");
        }
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"
        <ul class="gigs">
          <li>12 Sep &#8212; Aldous Harding &#8212; 9pm</li>
          <li>19 Sep - DJ Border Collie</li>
          <li>members only</li>
        </ul>"#;

    #[test]
    fn splits_gig_lines_on_dashes() {
        let events = parse_listing(LISTING);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].title, "Aldous Harding");
        assert_eq!(events[0].date_text, "12 Sep 9pm");
        assert_eq!(events[1].title, "DJ Border Collie");
        assert_eq!(events[1].date_text, "19 Sep");
    }

    #[test]
    fn lines_without_a_dash_are_dropped() {
        let events = parse_listing(LISTING);
        assert!(!events.iter().any(|e| e.title.contains("members")));
    }
}
