use crate::config::HttpConfig;
use crate::error::Result;
use crate::fetch::FetchClient;
use crate::types::{DedupPolicy, RawEvent, VenueInfo, VenueScraper};
use chrono::NaiveTime;
use scraper::{Html, Selector};
use tracing::{info, warn};

pub const SOURCE_ID: &str = "wellington_city_gallery";
const BASE_URL: &str = "https://citygallery.org.nz";
const LISTING_URL: &str = "https://citygallery.org.nz/exhibitions/";

/// City Gallery Wellington shows run for months; listings carry a full date
/// range and the gallery's opening time stands in for a start time.
pub struct CityGalleryScraper {
    client: FetchClient,
}

impl CityGalleryScraper {
    pub fn new(config: &HttpConfig) -> Self {
        Self {
            client: FetchClient::new(config),
        }
    }
}

pub fn parse_listing(html: &str) -> Vec<RawEvent> {
    let document = Html::parse_document(html);
    let card_selector = Selector::parse("section.exhibition-card").unwrap();
    let title_selector = Selector::parse("h2 a").unwrap();
    let range_selector = Selector::parse("div.date-range").unwrap();
    let image_selector = Selector::parse("img").unwrap();

    let mut events = Vec::new();
    for card in document.select(&card_selector) {
        let Some(title_el) = card.select(&title_selector).next() else {
            continue;
        };
        let title = title_el.text().collect::<String>().trim().to_string();
        let Some(range_el) = card.select(&range_selector).next() else {
            continue;
        };
        let date_text = range_el.text().collect::<String>().trim().to_string();
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
        raw.image_url = card
            .select(&image_selector)
            .next()
            .and_then(|img| img.value().attr("src"))
            .map(|s| s.to_string());
        raw.category = Some("exhibition".to_string());
        events.push(raw);
    }
    events
}

#[async_trait::async_trait]
impl VenueScraper for CityGalleryScraper {
    fn source_id(&self) -> &'static str {
        SOURCE_ID
    }

    fn venue(&self) -> VenueInfo {
        VenueInfo {
            name: "City Gallery Wellington".to_string(),
            address: "Civic Square, 101 Wakefield St".to_string(),
            city: "Wellington".to_string(),
            website: Some(BASE_URL.to_string()),
        }
    }

    fn default_start_time(&self) -> Option<NaiveTime> {
        // Gallery opens at ten.
        NaiveTime::from_hms_opt(10, 0, 0)
    }

    fn dedup_policy(&self) -> DedupPolicy {
        DedupPolicy::TitleUrl
    }

    async fn fetch_candidates(&self) -> Result<Vec<RawEvent>> {
        info!("Fetching exhibitions from City Gallery Wellington");
        let body = self.client.get_text(LISTING_URL).await?;
        let events = parse_listing(&body);
        info!(
            "Parsed {} candidates from City Gallery Wellington",
            events.len()
        );
        if events.is_empty() {
            warn!("No exhibitions found - the page structure may have changed");
        }
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"
        <main>
          <section class="exhibition-card">
            <img src="/media/yayoi.jpg">
            <h2><a href="/exhibitions/infinite-rooms">Infinite Rooms</a></h2>
            <div class="date-range">25 September 2026 &#8211; 17 January 2027</div>
          </section>
          <section class="exhibition-card">
            <h2><a href="/exhibitions/drawing-open">Drawing Open</a></h2>
            <div class="date-range">12 &#8211; 30 September</div>
          </section>
        </main>"#;

    #[test]
    fn parses_exhibition_ranges() {
        let events = parse_listing(LISTING);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].title, "Infinite Rooms");
        assert_eq!(
            events[0].date_text,
            "25 September 2026 \u{2013} 17 January 2027"
        );
        assert_eq!(
            events[0].url.as_deref(),
            Some("https://citygallery.org.nz/exhibitions/infinite-rooms")
        );
        assert_eq!(events[1].date_text, "12 \u{2013} 30 September");
    }
}
