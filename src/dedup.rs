use crate::types::{DedupPolicy, Event};
use std::collections::HashSet;

/// Composite key used to spot duplicate listings within a run and to key
/// upserts across runs. Title is lowercased and trimmed; the second half is
/// the ISO day or the listing URL depending on the venue's policy.
pub fn dedup_key(policy: DedupPolicy, event: &Event) -> String {
    let title = event.title.trim().to_lowercase();
    match policy {
        DedupPolicy::TitleDay => format!("{}|{}", title, event.day),
        DedupPolicy::TitleUrl => {
            // Fall back to the day when a listing carries no URL, otherwise
            // every URL-less event would collide on the same key.
            match &event.url {
                Some(url) => format!("{}|{}", title, url),
                None => format!("{}|{}", title, event.day),
            }
        }
    }
}

/// Per-run duplicate tracker.
#[derive(Debug, Default)]
pub struct Deduper {
    seen: HashSet<String>,
}

impl Deduper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when the key was already seen this run.
    pub fn insert(&mut self, key: &str) -> bool {
        self.seen.insert(key.to_string())
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::VenueInfo;
    use chrono::{NaiveDate, Utc};

    fn sample_event(title: &str, day: NaiveDate, url: Option<&str>) -> Event {
        Event {
            id: "0000000000000000".to_string(),
            title: title.to_string(),
            day,
            start_time: None,
            end_day: None,
            url: url.map(|u| u.to_string()),
            image_url: None,
            description: None,
            category: None,
            venue: VenueInfo {
                name: "Test Venue".to_string(),
                address: "1 Test St".to_string(),
                city: "Testville".to_string(),
                website: None,
            },
            source_id: "test_venue".to_string(),
            scraped_at: Utc::now(),
        }
    }

    #[test]
    fn title_day_key_ignores_case() {
        let day = NaiveDate::from_ymd_opt(2026, 9, 12).unwrap();
        let a = sample_event("Jazz Night", day, None);
        let b = sample_event("  JAZZ NIGHT ", day, None);
        assert_eq!(
            dedup_key(DedupPolicy::TitleDay, &a),
            dedup_key(DedupPolicy::TitleDay, &b)
        );
    }

    #[test]
    fn title_url_key_separates_same_title_on_different_pages() {
        let day = NaiveDate::from_ymd_opt(2026, 9, 12).unwrap();
        let a = sample_event("Market Day", day, Some("https://x.test/a"));
        let b = sample_event("Market Day", day, Some("https://x.test/b"));
        assert_ne!(
            dedup_key(DedupPolicy::TitleUrl, &a),
            dedup_key(DedupPolicy::TitleUrl, &b)
        );
    }

    #[test]
    fn title_url_key_without_url_falls_back_to_day() {
        let day = NaiveDate::from_ymd_opt(2026, 9, 12).unwrap();
        let a = sample_event("Market Day", day, None);
        assert_eq!(
            dedup_key(DedupPolicy::TitleUrl, &a),
            dedup_key(DedupPolicy::TitleDay, &a)
        );
    }

    #[test]
    fn deduper_rejects_second_insert() {
        let mut deduper = Deduper::new();
        assert!(deduper.insert("jazz night|2026-09-12"));
        assert!(!deduper.insert("jazz night|2026-09-12"));
        assert_eq!(deduper.len(), 1);
    }
}
