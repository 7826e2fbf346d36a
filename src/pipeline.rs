use crate::config::Config;
use crate::datetext;
use crate::dedup::{dedup_key, Deduper};
use crate::error::Result;
use crate::ident::event_id;
use crate::storage::Storage;
use crate::types::{ChangeType, Event, RawEvent, VenueScraper};
use chrono::{NaiveDate, Utc};
use metrics::{counter, histogram};
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Result of a complete pipeline run for one venue.
#[derive(Debug, Serialize)]
pub struct PipelineResult {
    pub run_id: Uuid,
    pub source_id: String,
    pub total_candidates: usize,
    pub emitted: usize,
    pub skipped_no_date: usize,
    pub skipped_past: usize,
    pub duplicates: usize,
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub errors: Vec<String>,
    pub output_file: Option<String>,
}

impl PipelineResult {
    fn empty(source_id: &str) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            source_id: source_id.to_string(),
            total_candidates: 0,
            emitted: 0,
            skipped_no_date: 0,
            skipped_past: 0,
            duplicates: 0,
            created: 0,
            updated: 0,
            unchanged: 0,
            errors: Vec::new(),
            output_file: None,
        }
    }
}

/// The shared engine: fetch raw candidates from one adapter, normalize date
/// text, filter past events, assign identity, dedup, upsert, and write the
/// run's events as a timestamped JSON file.
pub struct Pipeline;

impl Pipeline {
    /// Turns one raw candidate into a normalized event, or says why it was
    /// dropped so the run tally stays honest.
    fn normalize_candidate(
        scraper: &dyn VenueScraper,
        raw: &RawEvent,
        today: NaiveDate,
    ) -> std::result::Result<Event, DropReason> {
        let title = raw.title.trim();
        if title.is_empty() {
            return Err(DropReason::NoDate);
        }
        let when = datetext::normalize(&raw.date_text, today, scraper.default_start_time())
            .ok_or(DropReason::NoDate)?;
        if when.day < today {
            return Err(DropReason::Past);
        }
        Ok(Event {
            id: event_id(scraper.source_id(), title, when.day),
            title: title.to_string(),
            day: when.day,
            start_time: when.start_time,
            end_day: when.end_day,
            url: raw.url.clone(),
            image_url: raw.image_url.clone(),
            description: raw.description.clone(),
            category: raw.category.clone(),
            venue: scraper.venue(),
            source_id: scraper.source_id().to_string(),
            scraped_at: Utc::now(),
        })
    }

    /// Run the complete pipeline for one venue adapter.
    ///
    /// A fetch failure is logged and yields an empty result rather than an
    /// error: a dead venue site must not break a cron sweep, and callers can
    /// still see what happened in `result.errors`.
    #[instrument(skip(scraper, config, storage), fields(source_id = %scraper.source_id()))]
    pub async fn run_for_scraper_with_storage(
        scraper: &dyn VenueScraper,
        config: &Config,
        storage: Arc<dyn Storage>,
    ) -> Result<PipelineResult> {
        let source_id = scraper.source_id();
        let mut result = PipelineResult::empty(source_id);
        info!("Starting pipeline");
        counter!("citybeat_pipeline_runs_total", "source" => source_id).increment(1);
        let t_pipeline = std::time::Instant::now();

        let t_fetch = std::time::Instant::now();
        let raw_events = match scraper.fetch_candidates().await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Fetch failed, emitting no events: {}", e);
                counter!("citybeat_fetch_errors_total", "source" => source_id).increment(1);
                result.errors.push(format!("fetch failed: {e}"));
                return Ok(result);
            }
        };
        histogram!("citybeat_fetch_duration_seconds", "source" => source_id)
            .record(t_fetch.elapsed().as_secs_f64());
        info!("Fetched {} raw candidates", raw_events.len());
        result.total_candidates = raw_events.len();

        let today = Utc::now().date_naive();
        let mut deduper = Deduper::new();
        let mut events = Vec::new();

        for (i, raw) in raw_events.iter().enumerate() {
            match Self::normalize_candidate(scraper, raw, today) {
                Ok(event) => {
                    // Storage is shared across a sweep, so the key carries the
                    // source id: two venues listing the same title on the same
                    // day are different events.
                    let key = format!(
                        "{source_id}|{}",
                        dedup_key(scraper.dedup_policy(), &event)
                    );
                    if !deduper.insert(&key) {
                        debug!("Duplicate listing: {}", event.title);
                        result.duplicates += 1;
                        continue;
                    }
                    events.push((key, event));
                }
                Err(DropReason::NoDate) => {
                    debug!(
                        "Dropping candidate {} ({:?}): no parseable date",
                        i, raw.title
                    );
                    result.skipped_no_date += 1;
                }
                Err(DropReason::Past) => {
                    debug!("Dropping candidate {} ({:?}): in the past", i, raw.title);
                    result.skipped_past += 1;
                }
            }
        }

        for (key, event) in &events {
            match storage.upsert_event(key, event).await {
                Ok(ChangeType::Created) => result.created += 1,
                Ok(ChangeType::Updated) => result.updated += 1,
                Ok(ChangeType::NoChange) => result.unchanged += 1,
                Err(e) => {
                    warn!("Failed to persist {}: {}", event.title, e);
                    result.errors.push(format!("persist {}: {e}", event.id));
                }
            }
        }

        let emitted: Vec<&Event> = events.iter().map(|(_, e)| e).collect();
        result.emitted = emitted.len();
        counter!("citybeat_events_emitted_total", "source" => source_id)
            .increment(result.emitted as u64);
        counter!("citybeat_events_skipped_total", "source" => source_id)
            .increment((result.skipped_no_date + result.skipped_past + result.duplicates) as u64);

        if !emitted.is_empty() {
            match Self::persist_to_json(&emitted, source_id, &config.output.dir) {
                Ok(path) => {
                    info!("Saved {} events to {}", emitted.len(), path);
                    result.output_file = Some(path);
                }
                Err(e) => {
                    warn!("Failed to write output file: {}", e);
                    result.errors.push(format!("output file: {e}"));
                }
            }
        }

        histogram!("citybeat_pipeline_duration_seconds", "source" => source_id)
            .record(t_pipeline.elapsed().as_secs_f64());
        info!(
            "Pipeline finished: {} emitted, {} no-date, {} past, {} duplicates",
            result.emitted, result.skipped_no_date, result.skipped_past, result.duplicates
        );
        Ok(result)
    }

    /// Persist the run's events to a timestamped JSON file.
    fn persist_to_json(events: &[&Event], source_id: &str, output_dir: &str) -> Result<String> {
        fs::create_dir_all(output_dir)?;
        let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
        let filename = format!("{source_id}_{timestamp}.json");
        let filepath = Path::new(output_dir).join(&filename);
        let json_content = serde_json::to_string_pretty(events)?;
        fs::write(&filepath, json_content)?;
        Ok(filepath.to_string_lossy().to_string())
    }
}

enum DropReason {
    NoDate,
    Past,
}
