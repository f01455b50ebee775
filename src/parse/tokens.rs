use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#([A-Za-z0-9_-]+)").unwrap());
static PRIORITY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"!p(\d+)").unwrap());
static DUE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@due\((\d{4}-\d{2}-\d{2})\)").unwrap());

/// Distinct `#tag` tokens, case-folded, in first-seen order
pub fn extract_tags(text: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for caps in TAG_RE.captures_iter(text) {
        let tag = caps[1].to_lowercase();
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags
}

/// The first `!pN` token with N > 0
pub fn extract_priority(text: &str) -> Option<u32> {
    PRIORITY_RE
        .captures_iter(text)
        .filter_map(|caps| caps[1].parse::<u32>().ok())
        .find(|&n| n > 0)
}

/// The earliest valid `@due(YYYY-MM-DD)` date
pub fn extract_due(text: &str) -> Option<NaiveDate> {
    DUE_RE
        .captures_iter(text)
        .filter_map(|caps| NaiveDate::parse_from_str(&caps[1], "%Y-%m-%d").ok())
        .min()
}
