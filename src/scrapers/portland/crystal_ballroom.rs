use crate::config::HttpConfig;
use crate::error::Result;
use crate::fetch::FetchClient;
use crate::types::{RawEvent, VenueInfo, VenueScraper};
use scraper::{Html, Selector};
use tracing::{info, warn};

pub const SOURCE_ID: &str = "portland_crystal_ballroom";
const BASE_URL: &str = "https://www.crystalballroompdx.com";
const LISTING_URL: &str = "https://www.crystalballroompdx.com/calendar";

/// The Crystal Ballroom calendar is a plain table, one row per show.
pub struct CrystalBallroomScraper {
    client: FetchClient,
}

impl CrystalBallroomScraper {
    pub fn new(config: &HttpConfig) -> Self {
        Self {
            client: FetchClient::new(config),
        }
    }
}

pub fn parse_calendar(html: &str) -> Vec<RawEvent> {
    let document = Html::parse_document(html);
    let row_selector = Selector::parse("table.calendar tr.event-row").unwrap();
    let date_selector = Selector::parse("td.date").unwrap();
    let artist_selector = Selector::parse("td.artist a").unwrap();
    let time_selector = Selector::parse("td.time").unwrap();

    let mut events = Vec::new();
    for row in document.select(&row_selector) {
        let Some(artist_el) = row.select(&artist_selector).next() else {
            continue;
        };
        let title = artist_el.text().collect::<String>().trim().to_string();
        let Some(date_el) = row.select(&date_selector).next() else {
            continue;
        };
        let mut date_text = date_el.text().collect::<String>().trim().to_string();
        if title.is_empty() || date_text.is_empty() {
            continue;
        }
        if let Some(time_el) = row.select(&time_selector).next() {
            let time = time_el.text().collect::<String>().trim().to_string();
            if !time.is_empty() {
                date_text = format!("{date_text} {time}");
            }
        }

        let mut raw = RawEvent::new(title, date_text);
        raw.url = artist_el.value().attr("href").map(|h| {
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
impl VenueScraper for CrystalBallroomScraper {
    fn source_id(&self) -> &'static str {
        SOURCE_ID
    }

    fn venue(&self) -> VenueInfo {
        VenueInfo {
            name: "Crystal Ballroom".to_string(),
            address: "1332 W Burnside St".to_string(),
            city: "Portland".to_string(),
            website: Some(BASE_URL.to_string()),
        }
    }

    async fn fetch_candidates(&self) -> Result<Vec<RawEvent>> {
        info!("Fetching events from Crystal Ballroom");
        let body = self.client.get_text(LISTING_URL).await?;
        let events = parse_calendar(&body);
        info!("Parsed {} candidates from Crystal Ballroom", events.len());
        if events.is_empty() {
            warn!("No events found - the page structure may have changed");
        }
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CALENDAR: &str = r#"
        <table class="calendar">
          <tr class="event-row">
            <td class="date">Sat, Sep 12</td>
            <td class="artist"><a href="/event/shins-night">The Shins</a></td>
            <td class="time">8:00 PM</td>
          </tr>
          <tr class="event-row">
            <td class="date">Sun, Sep 13</td>
            <td class="artist"><a href="https://www.crystalballroompdx.com/event/soul-revue">Soul Revue</a></td>
          </tr>
          <tr class="event-row">
            <td class="date">Mon, Sep 14</td>
            <td class="artist"></td>
          </tr>
        </table>"#;

    #[test]
    fn parses_table_rows() {
        let events = parse_calendar(CALENDAR);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].title, "The Shins");
        assert_eq!(events[0].date_text, "Sat, Sep 12 8:00 PM");
        assert_eq!(
            events[0].url.as_deref(),
            Some("https://www.crystalballroompdx.com/event/shins-night")
        );
        assert_eq!(events[1].date_text, "Sun, Sep 13");
    }
}
