use crate::error::Result;
use crate::types::{ChangeType, Event};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Storage trait for persisting normalized events. Upserts are keyed by the
/// source-scoped dedup key, so a listing scraped on consecutive runs updates
/// in place instead of piling up duplicates, while the same title on the same
/// day at two different venues stays two events.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn upsert_event(&self, key: &str, event: &Event) -> Result<ChangeType>;
    async fn get_event(&self, key: &str) -> Result<Option<Event>>;
    async fn list_events(&self, source_id: Option<&str>) -> Result<Vec<Event>>;
}

/// In-memory storage implementation for development/testing. The JSON files
/// the pipeline writes are the durable artifact.
pub struct InMemoryStorage {
    events: Arc<Mutex<HashMap<String, Event>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

/// Field-level comparison that ignores `scraped_at`, which changes every run.
fn same_payload(a: &Event, b: &Event) -> bool {
    a.title == b.title
        && a.day == b.day
        && a.start_time == b.start_time
        && a.end_day == b.end_day
        && a.url == b.url
        && a.image_url == b.image_url
        && a.description == b.description
        && a.category == b.category
        && a.venue == b.venue
        && a.source_id == b.source_id
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn upsert_event(&self, key: &str, event: &Event) -> Result<ChangeType> {
        let mut events = self.events.lock().unwrap();
        match events.get(key) {
            Some(existing) if same_payload(existing, event) => {
                debug!(key, "Event unchanged");
                Ok(ChangeType::NoChange)
            }
            Some(_) => {
                events.insert(key.to_string(), event.clone());
                debug!(key, title = %event.title, "Updated event");
                Ok(ChangeType::Updated)
            }
            None => {
                events.insert(key.to_string(), event.clone());
                debug!(key, title = %event.title, "Created event");
                Ok(ChangeType::Created)
            }
        }
    }

    async fn get_event(&self, key: &str) -> Result<Option<Event>> {
        let events = self.events.lock().unwrap();
        Ok(events.get(key).cloned())
    }

    async fn list_events(&self, source_id: Option<&str>) -> Result<Vec<Event>> {
        let events = self.events.lock().unwrap();
        let mut list: Vec<Event> = events
            .values()
            .filter(|e| source_id.map_or(true, |s| e.source_id == s))
            .cloned()
            .collect();
        list.sort_by(|a, b| a.day.cmp(&b.day).then_with(|| a.title.cmp(&b.title)));
        Ok(list)
    }
}
