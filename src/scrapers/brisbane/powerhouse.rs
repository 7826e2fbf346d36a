use crate::config::HttpConfig;
use crate::error::Result;
use crate::fetch::FetchClient;
use crate::types::{DedupPolicy, RawEvent, VenueInfo, VenueScraper};
use chrono::NaiveTime;
use scraper::{Html, Selector};
use tracing::{info, warn};

pub const SOURCE_ID: &str = "brisbane_powerhouse";
const BASE_URL: &str = "https://brisbanepowerhouse.org";
const LISTING_URL: &str = "https://brisbanepowerhouse.org/whats-on/";

/// Brisbane Powerhouse runs a what's-on programme of theatre, comedy and
/// markets. Items are seasons with date ranges rather than single nights,
/// and the programme URL is the stable handle, so dedup is title+URL.
pub struct PowerhouseScraper {
    client: FetchClient,
}

impl PowerhouseScraper {
    pub fn new(config: &HttpConfig) -> Self {
        Self {
            client: FetchClient::new(config),
        }
    }
}

pub fn parse_listing(html: &str) -> Vec<RawEvent> {
    let document = Html::parse_document(html);
    let item_selector = Selector::parse("li.programme-item").unwrap();
    let title_selector = Selector::parse("a.programme-title").unwrap();
    let date_selector = Selector::parse("time").unwrap();
    let badge_selector = Selector::parse("span.badge").unwrap();

    let mut events = Vec::new();
    for item in document.select(&item_selector) {
        let Some(title_el) = item.select(&title_selector).next() else {
            continue;
        };
        let title = title_el.text().collect::<String>().trim().to_string();
        let Some(date_el) = item.select(&date_selector).next() else {
            continue;
        };
        let date_text = date_el.text().collect::<String>().trim().to_string();
        if title.is_empty() || date_text.is_empty() {
            continue;
        }

        let mut raw = RawEvent::new(title, date_text);
        raw.url = title_el.value().attr("href").map(|h| {
            if h.starts_with("http") {
                h.to_string()
            } else {
                format!("{BASE_URL}{h}")
            }
        });
        raw.category = item
            .select(&badge_selector)
            .next()
            .map(|b| b.text().collect::<String>().trim().to_lowercase())
            .filter(|s| !s.is_empty());
        events.push(raw);
    }
    events
}

#[async_trait::async_trait]
impl VenueScraper for PowerhouseScraper {
    fn source_id(&self) -> &'static str {
        SOURCE_ID
    }

    fn venue(&self) -> VenueInfo {
        VenueInfo {
            name: "Brisbane Powerhouse".to_string(),
            address: "119 Lamington St, New Farm".to_string(),
            city: "Brisbane".to_string(),
            website: Some(BASE_URL.to_string()),
        }
    }

    fn default_start_time(&self) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(19, 30, 0)
    }

    fn dedup_policy(&self) -> DedupPolicy {
        DedupPolicy::TitleUrl
    }

    async fn fetch_candidates(&self) -> Result<Vec<RawEvent>> {
        info!("Fetching events from Brisbane Powerhouse");
        let body = self.client.get_text(LISTING_URL).await?;
        let events = parse_listing(&body);
        info!("Parsed {} candidates from Brisbane Powerhouse", events.len());
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
        <ul class="programme">
          <li class="programme-item">
            <span class="badge">Comedy</span>
            <a class="programme-title" href="/event/festival-of-laughs">Festival of Laughs</a>
            <time>25 &#8211; 27 September</time>
          </li>
          <li class="programme-item">
            <a class="programme-title" href="https://brisbanepowerhouse.org/event/night-market">Night Market</a>
            <time>3 October, 5pm</time>
          </li>
          <li class="programme-item">
            <a class="programme-title" href="/event/tba">Untitled Season</a>
          </li>
        </ul>"#;

    #[test]
    fn parses_programme_items() {
        let events = parse_listing(LISTING);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].title, "Festival of Laughs");
        assert_eq!(events[0].date_text, "25 \u{2013} 27 September");
        assert_eq!(events[0].category.as_deref(), Some("comedy"));
        assert_eq!(
            events[0].url.as_deref(),
            Some("https://brisbanepowerhouse.org/event/festival-of-laughs")
        );
        assert_eq!(events[1].date_text, "3 October, 5pm");
        assert_eq!(events[1].category, None);
    }

    #[test]
    fn items_without_dates_are_dropped() {
        let events = parse_listing(LISTING);
        assert!(!events.iter().any(|e| e.title == "Untitled Season"));
    }
}
