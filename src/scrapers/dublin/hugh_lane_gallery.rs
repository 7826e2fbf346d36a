use crate::config::HttpConfig;
use crate::error::Result;
use crate::fetch::FetchClient;
use crate::types::{DedupPolicy, RawEvent, VenueInfo, VenueScraper};
use chrono::NaiveTime;
use scraper::{Html, Selector};
use tracing::{info, warn};

pub const SOURCE_ID: &str = "dublin_hugh_lane_gallery";
const BASE_URL: &str = "https://www.hughlane.ie";
const LISTING_URL: &str = "https://www.hughlane.ie/whats-on/";

/// Hugh Lane Gallery lists exhibitions with long date ranges. Morning
/// opening time, title+URL dedup since exhibition pages are stable.
pub struct HughLaneGalleryScraper {
    client: FetchClient,
}

impl HughLaneGalleryScraper {
    pub fn new(config: &HttpConfig) -> Self {
        Self {
            client: FetchClient::new(config),
        }
    }
}

pub fn parse_listing(html: &str) -> Vec<RawEvent> {
    let document = Html::parse_document(html);
    let card_selector = Selector::parse("article.exhibition").unwrap();
    let title_selector = Selector::parse("h2 a").unwrap();
    let dates_selector = Selector::parse("p.dates").unwrap();
    let image_selector = Selector::parse("img").unwrap();

    let mut events = Vec::new();
    for card in document.select(&card_selector) {
        let Some(title_el) = card.select(&title_selector).next() else {
            continue;
        };
        let title = title_el.text().collect::<String>().trim().to_string();
        let Some(dates_el) = card.select(&dates_selector).next() else {
            continue;
        };
        let date_text = dates_el.text().collect::<String>().trim().to_string();
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
impl VenueScraper for HughLaneGalleryScraper {
    fn source_id(&self) -> &'static str {
        SOURCE_ID
    }

    fn venue(&self) -> VenueInfo {
        VenueInfo {
            name: "Hugh Lane Gallery".to_string(),
            address: "Parnell Square North".to_string(),
            city: "Dublin".to_string(),
            website: Some(BASE_URL.to_string()),
        }
    }

    fn default_start_time(&self) -> Option<NaiveTime> {
        // Gallery opening time.
        NaiveTime::from_hms_opt(9, 45, 0)
    }

    fn dedup_policy(&self) -> DedupPolicy {
        DedupPolicy::TitleUrl
    }

    async fn fetch_candidates(&self) -> Result<Vec<RawEvent>> {
        info!("Fetching exhibitions from Hugh Lane Gallery");
        let body = self.client.get_text(LISTING_URL).await?;
        let events = parse_listing(&body);
        info!("Parsed {} candidates from Hugh Lane Gallery", events.len());
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
          <article class="exhibition">
            <img src="/media/bacon-studio.jpg">
            <h2><a href="/whats-on/francis-bacon-studio">Francis Bacon Studio</a></h2>
            <p class="dates">27 June &#8211; 2 July 2027</p>
          </article>
          <article class="exhibition">
            <h2><a href="https://www.hughlane.ie/whats-on/sunday-concerts">Sunday@Noon Concerts</a></h2>
            <p class="dates">14 September, noon</p>
          </article>
        </main>"#;

    #[test]
    fn parses_exhibition_cards() {
        let events = parse_listing(LISTING);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].title, "Francis Bacon Studio");
        assert_eq!(events[0].date_text, "27 June \u{2013} 2 July 2027");
        assert_eq!(
            events[0].url.as_deref(),
            Some("https://www.hughlane.ie/whats-on/francis-bacon-studio")
        );
        assert_eq!(events[0].image_url.as_deref(), Some("/media/bacon-studio.jpg"));
        assert_eq!(events[0].category.as_deref(), Some("exhibition"));
        assert_eq!(events[1].date_text, "14 September, noon");
    }
}
