use crate::config::HttpConfig;
use crate::error::Result;
use crate::fetch::FetchClient;
use crate::types::{RawEvent, VenueInfo, VenueScraper};
use scraper::{Html, Selector};
use tracing::{info, warn};

pub const SOURCE_ID: &str = "wellington_san_fran";
const BASE_URL: &str = "https://www.sanfran.co.nz";
const LISTING_URL: &str = "https://www.sanfran.co.nz/gigs/";

/// San Fran marks up each show with a `<time datetime="...">` attribute;
/// prefer that ISO value over the display text when present.
pub struct SanFranScraper {
    client: FetchClient,
}

impl SanFranScraper {
    pub fn new(config: &HttpConfig) -> Self {
        Self {
            client: FetchClient::new(config),
        }
    }
}

pub fn parse_listing(html: &str) -> Vec<RawEvent> {
    let document = Html::parse_document(html);
    let show_selector = Selector::parse("article.show").unwrap();
    let title_selector = Selector::parse("h4 a").unwrap();
    let time_selector = Selector::parse("time").unwrap();
    let image_selector = Selector::parse("img").unwrap();

    let mut events = Vec::new();
    for show in document.select(&show_selector) {
        let Some(title_el) = show.select(&title_selector).next() else {
            continue;
        };
        let title = title_el.text().collect::<String>().trim().to_string();
        let Some(time_el) = show.select(&time_selector).next() else {
            continue;
        };
        let date_text = match time_el.value().attr("datetime") {
            Some(iso) if !iso.trim().is_empty() => iso.trim().to_string(),
            _ => time_el.text().collect::<String>().trim().to_string(),
        };
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
        raw.image_url = show
            .select(&image_selector)
            .next()
            .and_then(|img| img.value().attr("src"))
            .map(|s| s.to_string());
        raw.category = Some("live-music".to_string());
        events.push(raw);
    }
    events
}

#[async_trait::async_trait]
impl VenueScraper for SanFranScraper {
    fn source_id(&self) -> &'static str {
        SOURCE_ID
    }

    fn venue(&self) -> VenueInfo {
        VenueInfo {
            name: "San Fran".to_string(),
            address: "171 Cuba St".to_string(),
            city: "Wellington".to_string(),
            website: Some(BASE_URL.to_string()),
        }
    }

    async fn fetch_candidates(&self) -> Result<Vec<RawEvent>> {
        info!("Fetching events from San Fran");
        let body = self.client.get_text(LISTING_URL).await?;
        let events = parse_listing(&body);
        info!("Parsed {} candidates from San Fran", events.len());
        if events.is_empty() {
            warn!("No events found - the page structure may have changed");
        }
        Ok(events)
    }
}
