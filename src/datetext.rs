//! Normalization of the ad-hoc date text venue sites publish ("Jun 27",
//! "Friday 27th June", "8.30pm", "27 June – 2 July") into concrete dates.
//!
//! Year policy: an explicit year is taken verbatim; a missing year means the
//! current year, rolled forward one year when the resulting date has already
//! passed. Time policy: the first parseable time token wins, otherwise the
//! venue's default applies.

use chrono::{NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;

/// A normalized occurrence: the day an event starts, an optional start time,
/// and an optional last day for multi-day listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventWhen {
    pub day: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_day: Option<NaiveDate>,
}

const MONTHS: &str = "jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|jun(?:e)?|jul(?:y)?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?";

static ORDINAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(\d{1,2})(?:st|nd|rd|th)\b").unwrap());
// No trailing \b: ISO datetimes continue straight into a `T`, which is a
// word character, so a boundary would never match there.
static ISO_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{4})-(\d{1,2})-(\d{1,2})").unwrap());
static NUMERIC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,2})/(\d{1,2})(?:/(\d{2,4}))?\b").unwrap());
static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(20\d{2})\b").unwrap());
static PAIR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b({m})\s+(\d{{1,2}})\b|\b(\d{{1,2}})\s+({m})\b",
        m = MONTHS
    ))
    .unwrap()
});
static RANGE_MONTH_FIRST_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b({m})\s+(\d{{1,2}})\s*-\s*(\d{{1,2}})\b",
        m = MONTHS
    ))
    .unwrap()
});
static RANGE_DAYS_FIRST_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b(\d{{1,2}})\s*-\s*(\d{{1,2}})\s+({m})\b",
        m = MONTHS
    ))
    .unwrap()
});
static TIME_AMPM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(\d{1,2})(?:[:.](\d{2}))?\s*(am|pm)\b").unwrap());
// The time immediately after an ISO `T` separator. Checked before the
// generic 24-hour form so a trailing `+10:00` offset can never win.
static TIME_ISO_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[Tt]([01]\d|2[0-3]):([0-5]\d)").unwrap());
static TIME_24H_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([01]?\d|2[0-3]):([0-5]\d)\b").unwrap());
static NOON_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(?:noon|midday)\b").unwrap());

fn month_number(name: &str) -> Option<u32> {
    let key: String = name.to_lowercase().chars().take(3).collect();
    let n = match key.as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(n)
}

/// Resolves a (month, day) with no explicit year: current year, rolled
/// forward when the date has already passed.
fn resolve_year(month: u32, day: u32, today: NaiveDate, explicit_year: Option<i32>) -> Option<NaiveDate> {
    use chrono::Datelike;
    if let Some(year) = explicit_year {
        return NaiveDate::from_ymd_opt(year, month, day);
    }
    let candidate = NaiveDate::from_ymd_opt(today.year(), month, day)?;
    if candidate < today {
        NaiveDate::from_ymd_opt(today.year() + 1, month, day)
    } else {
        Some(candidate)
    }
}

fn extract_time(text: &str) -> Option<NaiveTime> {
    if let Some(caps) = TIME_ISO_RE.captures(text) {
        let hour: u32 = caps[1].parse().ok()?;
        let minute: u32 = caps[2].parse().ok()?;
        return NaiveTime::from_hms_opt(hour, minute, 0);
    }
    if let Some(caps) = TIME_AMPM_RE.captures(text) {
        let mut hour: u32 = caps[1].parse().ok()?;
        let minute: u32 = caps
            .get(2)
            .map(|m| m.as_str().parse().ok())
            .unwrap_or(Some(0))?;
        if hour == 0 || hour > 12 {
            return None;
        }
        let meridiem = caps[3].to_lowercase();
        if meridiem == "pm" && hour < 12 {
            hour += 12;
        } else if meridiem == "am" && hour == 12 {
            hour = 0;
        }
        return NaiveTime::from_hms_opt(hour, minute, 0);
    }
    if let Some(caps) = TIME_24H_RE.captures(text) {
        let hour: u32 = caps[1].parse().ok()?;
        let minute: u32 = caps[2].parse().ok()?;
        return NaiveTime::from_hms_opt(hour, minute, 0);
    }
    if NOON_RE.is_match(text) {
        return NaiveTime::from_hms_opt(12, 0, 0);
    }
    None
}

/// All month/day pairs in text order, both "June 27" and "27 June" forms.
fn month_day_pairs(text: &str) -> Vec<(u32, u32)> {
    let mut pairs = Vec::new();
    for caps in PAIR_RE.captures_iter(text) {
        let (month_str, day_str) = if caps.get(1).is_some() {
            (caps.get(1).unwrap().as_str(), caps.get(2).unwrap().as_str())
        } else {
            (caps.get(4).unwrap().as_str(), caps.get(3).unwrap().as_str())
        };
        if let (Some(month), Ok(day)) = (month_number(month_str), day_str.parse::<u32>()) {
            if (1..=31).contains(&day) {
                pairs.push((month, day));
            }
        }
    }
    pairs
}

/// Normalizes one blob of date text. Returns `None` when nothing date-like
/// can be extracted; callers drop the event rather than fabricating one.
pub fn normalize(text: &str, today: NaiveDate, default_time: Option<NaiveTime>) -> Option<EventWhen> {
    // Ordinal suffixes and typographic dashes only get in the way.
    let cleaned = ORDINAL_RE.replace_all(text, "$1");
    let cleaned = cleaned.replace(['\u{2013}', '\u{2014}', '\u{2212}'], "-");

    let start_time = extract_time(&cleaned).or(default_time);
    let explicit_year = YEAR_RE
        .captures(&cleaned)
        .and_then(|c| c[1].parse::<i32>().ok());

    // Fully explicit forms first.
    if let Some(caps) = ISO_RE.captures(&cleaned) {
        let day = NaiveDate::from_ymd_opt(
            caps[1].parse().ok()?,
            caps[2].parse().ok()?,
            caps[3].parse().ok()?,
        )?;
        return Some(EventWhen { day, start_time, end_day: None });
    }

    // Same-month ranges before single pairs, so "27-29 June" does not read
    // as a single "29 June".
    if let Some(caps) = RANGE_MONTH_FIRST_RE.captures(&cleaned) {
        let month = month_number(&caps[1])?;
        let start = resolve_year(month, caps[2].parse().ok()?, today, explicit_year)?;
        let end = NaiveDate::from_ymd_opt(
            chrono::Datelike::year(&start),
            month,
            caps[3].parse().ok()?,
        )?;
        return Some(EventWhen { day: start, start_time, end_day: Some(end) });
    }
    if let Some(caps) = RANGE_DAYS_FIRST_RE.captures(&cleaned) {
        let month = month_number(&caps[3])?;
        let start = resolve_year(month, caps[1].parse().ok()?, today, explicit_year)?;
        let end = NaiveDate::from_ymd_opt(
            chrono::Datelike::year(&start),
            month,
            caps[2].parse().ok()?,
        )?;
        return Some(EventWhen { day: start, start_time, end_day: Some(end) });
    }

    let pairs = month_day_pairs(&cleaned);
    if pairs.len() >= 2 {
        // Cross-month range: "Jun 27 - Jul 2", "27 June - 2 July".
        let (sm, sd) = pairs[0];
        let (em, ed) = pairs[1];
        let start = resolve_year(sm, sd, today, explicit_year)?;
        let mut end = NaiveDate::from_ymd_opt(chrono::Datelike::year(&start), em, ed)?;
        if end < start {
            end = NaiveDate::from_ymd_opt(chrono::Datelike::year(&start) + 1, em, ed)?;
        }
        return Some(EventWhen { day: start, start_time, end_day: Some(end) });
    }
    if let Some(&(month, day)) = pairs.first() {
        let day = resolve_year(month, day, today, explicit_year)?;
        return Some(EventWhen { day, start_time, end_day: None });
    }

    // Day-first numeric dates; every covered city writes 27/06, not 06/27.
    if let Some(caps) = NUMERIC_RE.captures(&cleaned) {
        let d: u32 = caps[1].parse().ok()?;
        let m: u32 = caps[2].parse().ok()?;
        if m <= 12 {
            let year = caps.get(3).and_then(|y| {
                let n: i32 = y.as_str().parse().ok()?;
                Some(if n < 100 { 2000 + n } else { n })
            });
            let day = resolve_year(m, d, today, year.or(explicit_year))?;
            return Some(EventWhen { day, start_time, end_day: None });
        }
    }

    None
}
