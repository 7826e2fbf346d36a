use crate::error::Result;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Fixed metadata for the physical venue a scraper covers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VenueInfo {
    pub name: String,
    pub address: String,
    pub city: String,
    pub website: Option<String>,
}

/// Raw field candidates pulled off a venue page before any normalization.
/// Everything is text; the shared pipeline owns date parsing, identity and
/// dedup so adapters stay thin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEvent {
    pub title: String,
    pub date_text: String,
    pub url: Option<String>,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
}

impl RawEvent {
    pub fn new(title: impl Into<String>, date_text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            date_text: date_text.into(),
            url: None,
            image_url: None,
            description: None,
            category: None,
        }
    }
}

/// A normalized event ready for dedup and persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub day: NaiveDate,
    pub start_time: Option<NaiveTime>,
    /// Set for multi-day listings such as exhibitions and festivals.
    pub end_day: Option<NaiveDate>,
    pub url: Option<String>,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub venue: VenueInfo,
    pub source_id: String,
    pub scraped_at: DateTime<Utc>,
}

/// Outcome of persisting one event.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ChangeType {
    Created,
    Updated,
    NoChange,
}

/// Which composite key a venue's listings dedup on. Club gig lists repeat
/// titles across dates, so title+day is the default; sites whose listing
/// URLs are the stable handle use title+URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupPolicy {
    TitleDay,
    TitleUrl,
}

/// Core trait every venue adapter implements. Adapters fetch and extract;
/// the pipeline normalizes, filters, dedups and persists.
#[async_trait::async_trait]
pub trait VenueScraper: Send + Sync {
    /// Stable identifier, e.g. "vancouver_fox_cabaret".
    fn source_id(&self) -> &'static str;

    /// The venue this adapter covers.
    fn venue(&self) -> VenueInfo;

    /// Start time assumed when the page text carries none. Clubs default to
    /// evening, galleries to opening time, parks to midday.
    fn default_start_time(&self) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(20, 0, 0)
    }

    fn dedup_policy(&self) -> DedupPolicy {
        DedupPolicy::TitleDay
    }

    /// Fetch the venue's listing page(s) and extract raw candidates.
    async fn fetch_candidates(&self) -> Result<Vec<RawEvent>>;
}
