use crate::config::HttpConfig;
use crate::error::Result;
use crate::fetch::FetchClient;
use crate::types::{RawEvent, VenueInfo, VenueScraper};
use scraper::{Html, Selector};
use tracing::{info, warn};

pub const SOURCE_ID: &str = "dublin_whelans";
const BASE_URL: &str = "https://www.whelanslive.com";
const LISTING_URL: &str = "https://www.whelanslive.com/listings/";

/// Whelan's gig list is one row per show with separate date, title and
/// doors spans.
pub struct WhelansScraper {
    client: FetchClient,
}

impl WhelansScraper {
    pub fn new(config: &HttpConfig) -> Self {
        Self {
            client: FetchClient::new(config),
        }
    }
}

pub fn parse_listing(html: &str) -> Vec<RawEvent> {
    let document = Html::parse_document(html);
    let row_selector = Selector::parse("div.gig-row").unwrap();
    let date_selector = Selector::parse("span.gig-date").unwrap();
    let title_selector = Selector::parse("span.gig-title a").unwrap();
    let doors_selector = Selector::parse("span.gig-doors").unwrap();

    let mut events = Vec::new();
    for row in document.select(&row_selector) {
        let Some(title_el) = row.select(&title_selector).next() else {
            continue;
        };
        let title = title_el.text().collect::<String>().trim().to_string();
        let Some(date_el) = row.select(&date_selector).next() else {
            continue;
        };
        let mut date_text = date_el.text().collect::<String>().trim().to_string();
        if title.is_empty() || date_text.is_empty() {
            continue;
        }
        // "Doors 8pm" rides along so the normalizer sees the time.
        if let Some(doors_el) = row.select(&doors_selector).next() {
            let doors = doors_el.text().collect::<String>().trim().to_string();
            if !doors.is_empty() {
                date_text = format!("{date_text} {doors}");
            }
        }

        let mut raw = RawEvent::new(title, date_text);
        raw.url = title_el.value().attr("href").map(|h| {
            if h.starts_with("http") {
                h.to_string()
            } else {
                format!("{BASE_URL}{h}")
            }
        });
        raw.category = Some("live-music".to_string());
        events.push(raw);
    }
    events
}

#[async_trait::async_trait]
impl VenueScraper for WhelansScraper {
    fn source_id(&self) -> &'static str {
        SOURCE_ID
    }

    fn venue(&self) -> VenueInfo {
        VenueInfo {
            name: "Whelan's".to_string(),
            address: "25 Wexford St".to_string(),
            city: "Dublin".to_string(),
            website: Some(BASE_URL.to_string()),
        }
    }

    async fn fetch_candidates(&self) -> Result<Vec<RawEvent>> {
        info!("Fetching events from Whelan's");
        let body = self.client.get_text(LISTING_URL).await?;
        let events = parse_listing(&body);
        info!("Parsed {} candidates from Whelan's", events.len());
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
        <div class="listings">
          <div class="gig-row">
            <span class="gig-date">Fri 12 Sep</span>
            <span class="gig-title"><a href="https://www.whelanslive.com/event/the-scratch">The Scratch</a></span>
            <span class="gig-doors">Doors 8pm</span>
          </div>
          <div class="gig-row">
            <span class="gig-date">Sat 13 Sep</span>
            <span class="gig-title"><a href="/event/trad-session">Trad Session</a></span>
          </div>
          <div class="gig-row">
            <span class="gig-title"><a href="/event/no-date">No Date Gig</a></span>
          </div>
        </div>"#;

    #[test]
    fn parses_rows_and_folds_doors_into_date_text() {
        let events = parse_listing(LISTING);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].title, "The Scratch");
        assert_eq!(events[0].date_text, "Fri 12 Sep Doors 8pm");
        assert_eq!(
            events[0].url.as_deref(),
            Some("https://www.whelanslive.com/event/the-scratch")
        );
        assert_eq!(events[1].date_text, "Sat 13 Sep");
    }

    #[test]
    fn relative_hrefs_are_joined_to_the_site_root() {
        let events = parse_listing(LISTING);
        assert_eq!(
            events[1].url.as_deref(),
            Some("https://www.whelanslive.com/event/trad-session")
        );
    }

    #[test]
    fn rows_without_dates_are_dropped() {
        let events = parse_listing(LISTING);
        assert!(!events.iter().any(|e| e.title == "No Date Gig"));
    }
}
