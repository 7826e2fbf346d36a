use crate::config::HttpConfig;
use crate::error::Result;
use crate::fetch::FetchClient;
use crate::types::{RawEvent, VenueInfo, VenueScraper};
use scraper::{Html, Selector};
use tracing::{debug, info, warn};

pub const SOURCE_ID: &str = "vancouver_rickshaw_theatre";
const BASE_URL: &str = "https://rickshawtheatre.com";
const LISTING_URL: &str = "https://rickshawtheatre.com/events/";

/// Cap on detail-page fetches per crawl. The listing page already has title
/// and date; descriptions are enrichment only.
const MAX_DETAIL_PAGES: usize = 20;

/// The Rickshaw publishes an event-card grid; each card links to a detail
/// page that carries the long description.
pub struct RickshawTheatreScraper {
    client: FetchClient,
}

impl RickshawTheatreScraper {
    pub fn new(config: &HttpConfig) -> Self {
        Self {
            client: FetchClient::new(config),
        }
    }
}

pub fn parse_listing(html: &str) -> Vec<RawEvent> {
    let document = Html::parse_document(html);
    let card_selector = Selector::parse("div.event-card").unwrap();
    let title_selector = Selector::parse("h2 a").unwrap();
    let date_selector = Selector::parse("div.date").unwrap();
    let time_selector = Selector::parse("div.doors").unwrap();
    let image_selector = Selector::parse("img").unwrap();

    let mut events = Vec::new();
    for card in document.select(&card_selector) {
        let Some(title_el) = card.select(&title_selector).next() else {
            continue;
        };
        let title = title_el.text().collect::<String>().trim().to_string();
        if title.is_empty() {
            continue;
        }
        let date_part = card
            .select(&date_selector)
            .next()
            .map(|d| d.text().collect::<String>().trim().to_string())
            .unwrap_or_default();
        // Fold the doors line into the date text so the normalizer can pick
        // up the time in one pass.
        let time_part = card
            .select(&time_selector)
            .next()
            .map(|t| t.text().collect::<String>().trim().to_string())
            .unwrap_or_default();
        let date_text = format!("{date_part} {time_part}").trim().to_string();

        let mut raw = RawEvent::new(title, date_text);
        raw.url = title_el.value().attr("href").map(absolute_url);
        raw.image_url = card
            .select(&image_selector)
            .next()
            .and_then(|img| img.value().attr("src"))
            .map(|s| s.to_string());
        events.push(raw);
    }
    events
}

pub fn parse_detail_description(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let description_selector = Selector::parse("div.event-description p").unwrap();
    let text: String = document
        .select(&description_selector)
        .map(|p| p.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n");
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn absolute_url(href: &str) -> String {
    if href.starts_with("http") {
        href.to_string()
    } else {
        format!("{BASE_URL}{href}")
    }
}

#[async_trait::async_trait]
impl VenueScraper for RickshawTheatreScraper {
    fn source_id(&self) -> &'static str {
        SOURCE_ID
    }

    fn venue(&self) -> VenueInfo {
        VenueInfo {
            name: "Rickshaw Theatre".to_string(),
            address: "254 E Hastings St".to_string(),
            city: "Vancouver".to_string(),
            website: Some(BASE_URL.to_string()),
        }
    }

    async fn fetch_candidates(&self) -> Result<Vec<RawEvent>> {
        info!("Fetching events from Rickshaw Theatre");
        let body = self.client.get_text(LISTING_URL).await?;
        let mut events = parse_listing(&body);
        info!("Parsed {} candidates from Rickshaw Theatre", events.len());
        if events.is_empty() {
            warn!("No events found - the page structure may have changed");
            return Ok(events);
        }

        // Enrich from detail pages, capped and throttled. A failed detail
        // fetch only costs that event its description.
        for event in events.iter_mut().take(MAX_DETAIL_PAGES) {
            let Some(url) = event.url.clone() else {
                continue;
            };
            self.client.page_delay().await;
            match self.client.get_text(&url).await {
                Ok(detail_body) => {
                    event.description = parse_detail_description(&detail_body);
                }
                Err(e) => {
                    debug!("Detail page fetch failed for {}: {}", url, e);
                }
            }
        }
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"
        <div class="events-grid">
          <div class="event-card">
            <img src="https://cdn.example.com/poster.jpg">
            <h2><a href="/event/big-band-night">Big Band Night</a></h2>
            <div class="date">Friday, September 12, 2026</div>
            <div class="doors">Doors 7pm</div>
          </div>
          <div class="event-card">
            <h2><a href="https://rickshawtheatre.com/event/punk-matinee">Punk Matinee</a></h2>
            <div class="date">Sep 14</div>
          </div>
        </div>"#;

    #[test]
    fn parses_cards_and_resolves_relative_urls() {
        let events = parse_listing(LISTING);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].title, "Big Band Night");
        assert_eq!(events[0].date_text, "Friday, September 12, 2026 Doors 7pm");
        assert_eq!(
            events[0].url.as_deref(),
            Some("https://rickshawtheatre.com/event/big-band-night")
        );
        assert_eq!(
            events[1].url.as_deref(),
            Some("https://rickshawtheatre.com/event/punk-matinee")
        );
        assert_eq!(events[1].date_text, "Sep 14");
    }

    #[test]
    fn detail_description_joins_paragraphs() {
        let html = r#"
            <div class="event-description">
              <p>Eighteen-piece band.</p>
              <p>All ages until 10pm.</p>
            </div>"#;
        assert_eq!(
            parse_detail_description(html).as_deref(),
            Some("Eighteen-piece band.\nAll ages until 10pm.")
        );
        assert_eq!(parse_detail_description("<p>loose</p>"), None);
    }
}
