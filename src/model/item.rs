use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::inline::{Inline, plain_text, render_markdown, token_text};
use crate::parse::tokens;

/// Coarse priority classification used for display and filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityBand {
    High,
    Medium,
    Low,
}

impl PriorityBand {
    pub fn from_priority(priority: u32) -> PriorityBand {
        match priority {
            0 | 1 => PriorityBand::High,
            2 => PriorityBand::Medium,
            _ => PriorityBand::Low,
        }
    }
}

/// A checklist item (`- [ ] text`). Nesting is expressed only through
/// `depth`: the children of an item are the contiguous run of following
/// items with a strictly greater depth.
#[derive(Debug, Clone, Serialize)]
pub struct ChecklistItem {
    pub checked: bool,
    pub text: Vec<Inline>,
    /// Nesting depth (0 = top-level)
    pub depth: usize,
    /// Tags without the `#`, case-folded, first-seen order
    pub tags: Vec<String>,
    pub priority: Option<u32>,
    pub due: Option<NaiveDate>,
    /// Ordinals of the enclosing headings, outermost first
    pub section_path: Vec<usize>,
    /// Position in the document's canonical item order
    pub index: usize,
    /// Indented continuation lines that travel with the item
    #[serde(skip)]
    pub body: Vec<String>,

    // --- Source tracking ---
    /// Leading whitespace as written
    #[serde(skip)]
    pub indent: String,
    /// List marker as written (`-`, `*`, `1.`)
    #[serde(skip)]
    pub marker: String,
    /// Checkbox character as written
    #[serde(skip)]
    pub glyph: char,
    /// The original item line (for verbatim emission)
    #[serde(skip)]
    pub source_text: Option<String>,
    /// Whether this item has been modified since parsing
    #[serde(skip)]
    pub dirty: bool,
}

impl ChecklistItem {
    /// Create a new top-level item, marked dirty (no source)
    pub fn new(text: Vec<Inline>, checked: bool) -> Self {
        let mut item = ChecklistItem {
            checked,
            text: Vec::new(),
            depth: 0,
            tags: Vec::new(),
            priority: None,
            due: None,
            section_path: Vec::new(),
            index: 0,
            body: Vec::new(),
            indent: String::new(),
            marker: "-".into(),
            glyph: if checked { 'x' } else { ' ' },
            source_text: None,
            dirty: true,
        };
        item.set_text(text);
        item
    }

    /// Replace the inline content and re-derive tags, priority and due date
    pub fn set_text(&mut self, text: Vec<Inline>) {
        self.text = text;
        let raw = token_text(&self.text);
        self.tags = tokens::extract_tags(&raw);
        self.priority = tokens::extract_priority(&raw);
        self.due = tokens::extract_due(&raw);
    }

    /// Mark this item as dirty (will be serialized in canonical format)
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Case-insensitive tag membership
    pub fn has_tag(&self, tag: &str) -> bool {
        let tag = tag.trim_start_matches('#').to_lowercase();
        self.tags.iter().any(|t| *t == tag)
    }

    pub fn priority_band(&self) -> Option<PriorityBand> {
        self.priority.map(PriorityBand::from_priority)
    }

    /// The item text as markdown source
    pub fn markdown(&self) -> String {
        render_markdown(&self.text)
    }

    /// The item text without formatting delimiters
    pub fn display_text(&self) -> String {
        plain_text(&self.text)
    }
}

/// Equality ignores source tracking and derived positions
impl PartialEq for ChecklistItem {
    fn eq(&self, other: &Self) -> bool {
        self.checked == other.checked
            && self.text == other.text
            && self.depth == other.depth
            && self.body == other.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_inlines;

    #[test]
    fn tags_fold_case_and_keep_first_order() {
        let item = ChecklistItem::new(parse_inlines("Fix bug #Urgent #backend #urgent"), false);
        assert_eq!(item.tags, vec!["urgent", "backend"]);
        assert!(item.has_tag("URGENT"));
        assert!(item.has_tag("#Backend"));
        assert!(!item.has_tag("frontend"));
    }

    #[test]
    fn set_text_rederives_tokens() {
        let mut item = ChecklistItem::new(parse_inlines("Ship !p1 #release"), false);
        assert_eq!(item.priority, Some(1));
        item.set_text(parse_inlines("Ship later"));
        assert_eq!(item.priority, None);
        assert!(item.tags.is_empty());
    }

    #[test]
    fn priority_bands() {
        assert_eq!(PriorityBand::from_priority(1), PriorityBand::High);
        assert_eq!(PriorityBand::from_priority(2), PriorityBand::Medium);
        assert_eq!(PriorityBand::from_priority(3), PriorityBand::Low);
        assert_eq!(PriorityBand::from_priority(9), PriorityBand::Low);
    }

    #[test]
    fn equality_ignores_source() {
        let mut a = ChecklistItem::new(parse_inlines("Same"), false);
        let b = ChecklistItem::new(parse_inlines("Same"), false);
        a.source_text = Some("- [ ] Same".into());
        a.dirty = false;
        a.index = 4;
        assert_eq!(a, b);
    }
}
