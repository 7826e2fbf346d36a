use crate::config::HttpConfig;
use crate::error::Result;
use crate::fetch::FetchClient;
use crate::types::{RawEvent, VenueInfo, VenueScraper};
use scraper::{Html, Selector};
use tracing::{info, warn};

pub const SOURCE_ID: &str = "vancouver_fox_cabaret";
const BASE_URL: &str = "https://www.foxcabaret.com";
const LISTING_URL: &str = "https://www.foxcabaret.com/";

/// Fox Cabaret lists upcoming shows on its homepage as a flat list of
/// article cards with a short date line.
pub struct FoxCabaretScraper {
    client: FetchClient,
}

impl FoxCabaretScraper {
    pub fn new(config: &HttpConfig) -> Self {
        Self {
            client: FetchClient::new(config),
        }
    }
}

pub fn parse_listing(html: &str) -> Vec<RawEvent> {
    let document = Html::parse_document(html);
    let card_selector = Selector::parse("article.event-item").unwrap();
    let title_selector = Selector::parse("h3.event-title a").unwrap();
    let date_selector = Selector::parse("span.event-date").unwrap();
    let blurb_selector = Selector::parse("p.event-blurb").unwrap();
    let image_selector = Selector::parse("img").unwrap();

    let mut events = Vec::new();
    for card in document.select(&card_selector) {
        let Some(title_el) = card.select(&title_selector).next() else {
            continue;
        };
        let title = title_el.text().collect::<String>().trim().to_string();
        if title.len() < 3 {
            continue;
        }
        let Some(date_el) = card.select(&date_selector).next() else {
            continue;
        };
        let date_text = date_el.text().collect::<String>().trim().to_string();

        let mut raw = RawEvent::new(title, date_text);
        raw.url = title_el.value().attr("href").map(|h| {
            if h.starts_with("http") {
                h.to_string()
            } else {
                format!("{BASE_URL}{h}")
            }
        });
        raw.description = card
            .select(&blurb_selector)
            .next()
            .map(|p| p.text().collect::<String>().trim().to_string())
            .filter(|s| !s.is_empty());
        raw.image_url = card
            .select(&image_selector)
            .next()
            .and_then(|img| img.value().attr("src"))
            .map(|s| s.to_string());
        events.push(raw);
    }
    events
}

#[async_trait::async_trait]
impl VenueScraper for FoxCabaretScraper {
    fn source_id(&self) -> &'static str {
        SOURCE_ID
    }

    fn venue(&self) -> VenueInfo {
        VenueInfo {
            name: "Fox Cabaret".to_string(),
            address: "2321 Main St".to_string(),
            city: "Vancouver".to_string(),
            website: Some(LISTING_URL.to_string()),
        }
    }

    async fn fetch_candidates(&self) -> Result<Vec<RawEvent>> {
        info!("Fetching events from Fox Cabaret");
        let body = self.client.get_text(LISTING_URL).await?;
        let events = parse_listing(&body);
        info!("Parsed {} candidates from Fox Cabaret", events.len());
        if events.is_empty() {
            warn!("No events found - the page structure may have changed");
        }
        Ok(events)
    }
}
