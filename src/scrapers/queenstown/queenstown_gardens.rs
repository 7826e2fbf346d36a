use crate::config::HttpConfig;
use crate::error::Result;
use crate::fetch::FetchClient;
use crate::types::{RawEvent, VenueInfo, VenueScraper};
use chrono::NaiveTime;
use scraper::{Html, Selector};
use tracing::{info, warn};

pub const SOURCE_ID: &str = "queenstown_gardens";
const LISTING_URL: &str = "https://www.queenstownnz.co.nz/queenstown-gardens/events/";

/// Council listing of outdoor events in the Gardens. Daytime programme, so
/// the fallback start time is midday, and multi-day festivals are common.
pub struct QueenstownGardensScraper {
    client: FetchClient,
}

impl QueenstownGardensScraper {
    pub fn new(config: &HttpConfig) -> Self {
        Self {
            client: FetchClient::new(config),
        }
    }
}

pub fn parse_listing(html: &str) -> Vec<RawEvent> {
    let document = Html::parse_document(html);
    let card_selector = Selector::parse("div.park-event").unwrap();
    let title_selector = Selector::parse("h3").unwrap();
    let when_selector = Selector::parse("span.when").unwrap();
    let summary_selector = Selector::parse("p.summary").unwrap();

    let mut events = Vec::new();
    for card in document.select(&card_selector) {
        let Some(title_el) = card.select(&title_selector).next() else {
            continue;
        };
        let title = title_el.text().collect::<String>().trim().to_string();
        let Some(when_el) = card.select(&when_selector).next() else {
            continue;
        };
        let date_text = when_el.text().collect::<String>().trim().to_string();
        if title.is_empty() || date_text.is_empty() {
            continue;
        }

        let mut raw = RawEvent::new(title, date_text);
        raw.description = card
            .select(&summary_selector)
            .next()
            .map(|p| p.text().collect::<String>().trim().to_string())
            .filter(|s| !s.is_empty());
        raw.category = Some("outdoors".to_string());
        events.push(raw);
    }
    events
}

#[async_trait::async_trait]
impl VenueScraper for QueenstownGardensScraper {
    fn source_id(&self) -> &'static str {
        SOURCE_ID
    }

    fn venue(&self) -> VenueInfo {
        VenueInfo {
            name: "Queenstown Gardens".to_string(),
            address: "Park St".to_string(),
            city: "Queenstown".to_string(),
            website: Some("https://www.queenstownnz.co.nz".to_string()),
        }
    }

    fn default_start_time(&self) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(12, 0, 0)
    }

    async fn fetch_candidates(&self) -> Result<Vec<RawEvent>> {
        info!("Fetching events from Queenstown Gardens");
        let body = self.client.get_text(LISTING_URL).await?;
        let events = parse_listing(&body);
        info!("Parsed {} candidates from Queenstown Gardens", events.len());
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
        <div class="park-events">
          <div class="park-event">
            <h3>Summer Sound Shell Series</h3>
            <span class="when">17 &#8211; 19 January</span>
            <p class="summary">Free afternoon concerts by the rotunda.</p>
          </div>
          <div class="park-event">
            <h3>Frisbee Golf Open</h3>
            <span class="when">4 October, 9am</span>
          </div>
        </div>"#;

    #[test]
    fn parses_park_events() {
        let events = parse_listing(LISTING);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].title, "Summer Sound Shell Series");
        assert_eq!(events[0].date_text, "17 \u{2013} 19 January");
        assert_eq!(
            events[0].description.as_deref(),
            Some("Free afternoon concerts by the rotunda.")
        );
        assert_eq!(events[0].category.as_deref(), Some("outdoors"));
        assert_eq!(events[1].date_text, "4 October, 9am");
    }
}
