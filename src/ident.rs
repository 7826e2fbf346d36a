use chrono::NaiveDate;
use sha2::{Digest, Sha256};

/// Deterministic event identifier: sha256 over a canonical
/// `source|title|day` string, truncated for readability. The same listing
/// scraped twice maps to the same id, so upserts stay idempotent across runs.
pub fn event_id(source_id: &str, title: &str, day: NaiveDate) -> String {
    let mut s = String::new();
    s.push_str(source_id);
    s.push('|');
    s.push_str(&title.trim().to_lowercase());
    s.push('|');
    s.push_str(&day.to_string());

    let mut hasher = Sha256::new();
    hasher.update(s.as_bytes());
    let out = hasher.finalize();
    hex::encode(out)[..16].to_string()
}

/// Lowercase-hyphenated slug used for source ids and output filenames.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_hyphen = true;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn event_id_is_deterministic() {
        let a = event_id("vancouver_fox_cabaret", "Jazz Night", day(2026, 9, 12));
        let b = event_id("vancouver_fox_cabaret", "Jazz Night", day(2026, 9, 12));
        assert_eq!(a, b);
        assert_eq!(a.len(), 16);
    }

    #[test]
    fn event_id_ignores_title_case_and_whitespace() {
        let a = event_id("src", "  Jazz Night ", day(2026, 9, 12));
        let b = event_id("src", "jazz night", day(2026, 9, 12));
        assert_eq!(a, b);
    }

    #[test]
    fn event_id_differs_across_titles_and_days() {
        let base = event_id("src", "Jazz Night", day(2026, 9, 12));
        assert_ne!(base, event_id("src", "Blues Night", day(2026, 9, 12)));
        assert_ne!(base, event_id("src", "Jazz Night", day(2026, 9, 13)));
    }

    #[test]
    fn slugify_collapses_punctuation() {
        assert_eq!(slugify("Darrell's Tavern"), "darrell-s-tavern");
        assert_eq!(slugify("  Fox   Cabaret  "), "fox-cabaret");
        assert_eq!(slugify("Whelan's!"), "whelan-s");
    }
}
