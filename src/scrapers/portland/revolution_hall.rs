use crate::config::HttpConfig;
use crate::error::Result;
use crate::fetch::FetchClient;
use crate::types::{RawEvent, VenueInfo, VenueScraper};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use tracing::{info, warn};

pub const SOURCE_ID: &str = "portland_revolution_hall";
const BASE_URL: &str = "https://www.revolutionhall.com";
const LISTING_URL: &str = "https://www.revolutionhall.com/events/";

/// Revolution Hall prints the show line as "Doors 7PM / Show 8PM"; the show
/// time is the one worth keeping, so it is pulled out before the doors time
/// can win as first token.
static SHOW_TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)show\s+(\d{1,2}(?::\d{2})?\s*[ap]m)").unwrap());

pub struct RevolutionHallScraper {
    client: FetchClient,
}

impl RevolutionHallScraper {
    pub fn new(config: &HttpConfig) -> Self {
        Self {
            client: FetchClient::new(config),
        }
    }
}

pub fn parse_listing(html: &str) -> Vec<RawEvent> {
    let document = Html::parse_document(html);
    let card_selector = Selector::parse("div.show-card").unwrap();
    let title_selector = Selector::parse("h3.show-title a").unwrap();
    let date_selector = Selector::parse("div.show-date").unwrap();
    let time_selector = Selector::parse("div.show-time").unwrap();
    let image_selector = Selector::parse("img").unwrap();

    let mut events = Vec::new();
    for card in document.select(&card_selector) {
        let Some(title_el) = card.select(&title_selector).next() else {
            continue;
        };
        let title = title_el.text().collect::<String>().trim().to_string();
        let Some(date_el) = card.select(&date_selector).next() else {
            continue;
        };
        let mut date_text = date_el.text().collect::<String>().trim().to_string();
        if title.is_empty() || date_text.is_empty() {
            continue;
        }
        if let Some(time_el) = card.select(&time_selector).next() {
            let time_line = time_el.text().collect::<String>();
            if let Some(caps) = SHOW_TIME_RE.captures(&time_line) {
                date_text = format!("{date_text} {}", &caps[1]);
            } else {
                let time_line = time_line.trim();
                if !time_line.is_empty() {
                    date_text = format!("{date_text} {time_line}");
                }
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
        raw.image_url = card
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
impl VenueScraper for RevolutionHallScraper {
    fn source_id(&self) -> &'static str {
        SOURCE_ID
    }

    fn venue(&self) -> VenueInfo {
        VenueInfo {
            name: "Revolution Hall".to_string(),
            address: "1300 SE Stark St".to_string(),
            city: "Portland".to_string(),
            website: Some(BASE_URL.to_string()),
        }
    }

    async fn fetch_candidates(&self) -> Result<Vec<RawEvent>> {
        info!("Fetching events from Revolution Hall");
        let body = self.client.get_text(LISTING_URL).await?;
        let events = parse_listing(&body);
        info!("Parsed {} candidates from Revolution Hall", events.len());
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
        <div class="shows">
          <div class="show-card">
            <img src="https://cdn.example.com/tour.jpg">
            <h3 class="show-title"><a href="https://www.revolutionhall.com/event/laura-gibson">Laura Gibson</a></h3>
            <div class="show-date">SAT, SEP 12</div>
            <div class="show-time">Doors 7PM / Show 8PM</div>
          </div>
          <div class="show-card">
            <h3 class="show-title"><a href="/event/film-fest">Rooftop Film Fest</a></h3>
            <div class="show-date">SEP 20</div>
            <div class="show-time">9pm</div>
          </div>
        </div>"#;

    #[test]
    fn show_time_beats_doors_time() {
        let events = parse_listing(LISTING);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].date_text, "SAT, SEP 12 8PM");
        assert_eq!(events[1].date_text, "SEP 20 9pm");
    }

    #[test]
    fn relative_hrefs_are_joined_to_the_site_root() {
        let events = parse_listing(LISTING);
        assert_eq!(
            events[0].url.as_deref(),
            Some("https://www.revolutionhall.com/event/laura-gibson")
        );
        assert_eq!(
            events[1].url.as_deref(),
            Some("https://www.revolutionhall.com/event/film-fest")
        );
    }

    #[test]
    fn show_time_regex_handles_minutes() {
        let caps = SHOW_TIME_RE.captures("Doors 6:30PM / Show 7:30PM").unwrap();
        assert_eq!(&caps[1], "7:30PM");
    }
}
