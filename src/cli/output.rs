use chrono::NaiveDate;
use serde::Serialize;

use crate::model::config::Config;
use crate::model::document::Document;
use crate::model::item::{ChecklistItem, PriorityBand};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct ItemJson {
    /// 1-based, as accepted by toggle/edit/delete
    pub index: usize,
    pub checked: bool,
    pub text: String,
    pub depth: usize,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub band: Option<PriorityBand>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub headings: Vec<String>,
}

pub fn item_to_json(item: &ChecklistItem, doc: &Document) -> ItemJson {
    ItemJson {
        index: item.index + 1,
        checked: item.checked,
        text: item.markdown(),
        depth: item.depth,
        tags: item.tags.clone(),
        priority: item.priority,
        band: item.priority_band(),
        due: item.due,
        headings: item
            .section_path
            .iter()
            .filter_map(|&ordinal| doc.heading(ordinal))
            .map(|h| crate::model::inline::plain_text(&h.text))
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Text output
// ---------------------------------------------------------------------------

/// `[ ]` or `[✓]` (with the configured check symbol)
pub fn checkbox(checked: bool, check_symbol: &str) -> String {
    if checked {
        format!("[{}]", check_symbol)
    } else {
        "[ ]".to_string()
    }
}

/// One line of `tdx list`
pub fn format_list_line(item: &ChecklistItem, check_symbol: &str) -> String {
    format!(
        "  {}. {} {}",
        item.index + 1,
        checkbox(item.checked, check_symbol),
        item.markdown()
    )
}

/// All lines of `tdx list`
pub fn format_list(doc: &Document, check_symbol: &str) -> String {
    if doc.is_empty() {
        return "No todos found".to_string();
    }
    doc.items()
        .map(|item| format_list_line(item, check_symbol))
        .collect::<Vec<_>>()
        .join("\n")
}

/// `tdx config`: where the config came from, then the effective values
pub fn format_config(config: &Config, source: Option<&str>) -> Result<String, toml::ser::Error> {
    let body = toml::to_string_pretty(config)?;
    let header = match source {
        Some(path) => format!("# {}", path),
        None => "# built-in defaults".to_string(),
    };
    Ok(format!("{}\n{}", header, body.trim_end()))
}
