use serde::{Deserialize, Serialize};

/// Typed frontmatter fields. `None` means the key was absent, which is
/// distinct from an explicit `false` or `0`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub filter_done: Option<bool>,
    pub show_headings: Option<bool>,
    pub max_visible: Option<u32>,
    pub read_only: Option<bool>,
    pub word_wrap: Option<bool>,
}

/// Recognized frontmatter keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataKey {
    FilterDone,
    ShowHeadings,
    MaxVisible,
    ReadOnly,
    WordWrap,
}

impl MetadataKey {
    pub const ALL: [MetadataKey; 5] = [
        MetadataKey::FilterDone,
        MetadataKey::ShowHeadings,
        MetadataKey::MaxVisible,
        MetadataKey::ReadOnly,
        MetadataKey::WordWrap,
    ];

    /// The key as written when the prelude is emitted canonically
    pub fn as_str(self) -> &'static str {
        match self {
            MetadataKey::FilterDone => "filter-done",
            MetadataKey::ShowHeadings => "show-headings",
            MetadataKey::MaxVisible => "max-visible",
            MetadataKey::ReadOnly => "read-only",
            MetadataKey::WordWrap => "word-wrap",
        }
    }

    /// Look up a key, accepting `hide-completed` as a synonym for `filter-done`
    pub fn from_name(name: &str) -> Option<MetadataKey> {
        match name {
            "filter-done" | "hide-completed" => Some(MetadataKey::FilterDone),
            "show-headings" => Some(MetadataKey::ShowHeadings),
            "max-visible" => Some(MetadataKey::MaxVisible),
            "read-only" => Some(MetadataKey::ReadOnly),
            "word-wrap" => Some(MetadataKey::WordWrap),
            _ => None,
        }
    }
}

impl Metadata {
    /// True when no field is set; an empty prelude is never written.
    pub fn is_empty(&self) -> bool {
        *self == Metadata::default()
    }

    pub fn filter_done_or(&self, default: bool) -> bool {
        self.filter_done.unwrap_or(default)
    }

    pub fn show_headings_or(&self, default: bool) -> bool {
        self.show_headings.unwrap_or(default)
    }

    pub fn max_visible_or(&self, default: u32) -> u32 {
        self.max_visible.unwrap_or(default)
    }

    pub fn read_only_or(&self, default: bool) -> bool {
        self.read_only.unwrap_or(default)
    }

    pub fn word_wrap_or(&self, default: bool) -> bool {
        self.word_wrap.unwrap_or(default)
    }

    /// The value of `key` rendered for a `key: value` line, if set
    pub fn value_of(&self, key: MetadataKey) -> Option<String> {
        match key {
            MetadataKey::FilterDone => self.filter_done.map(|v| v.to_string()),
            MetadataKey::ShowHeadings => self.show_headings.map(|v| v.to_string()),
            MetadataKey::MaxVisible => self.max_visible.map(|v| v.to_string()),
            MetadataKey::ReadOnly => self.read_only.map(|v| v.to_string()),
            MetadataKey::WordWrap => self.word_wrap.map(|v| v.to_string()),
        }
    }

    /// Set `key` from its textual value. Returns false when the value does
    /// not have the key's type; the field is left unchanged in that case.
    pub fn set_from_str(&mut self, key: MetadataKey, value: &str) -> bool {
        let slot = match key {
            MetadataKey::MaxVisible => {
                return match value.parse::<u32>() {
                    Ok(n) => {
                        self.max_visible = Some(n);
                        true
                    }
                    Err(_) => false,
                };
            }
            MetadataKey::FilterDone => &mut self.filter_done,
            MetadataKey::ShowHeadings => &mut self.show_headings,
            MetadataKey::ReadOnly => &mut self.read_only,
            MetadataKey::WordWrap => &mut self.word_wrap,
        };
        match parse_flag(value) {
            Some(flag) => {
                *slot = Some(flag);
                true
            }
            None => false,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value {
        "true" | "yes" | "on" => Some(true),
        "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_differs_from_explicit_false() {
        let absent = Metadata::default();
        let explicit = Metadata {
            filter_done: Some(false),
            ..Default::default()
        };
        assert!(absent.filter_done_or(true));
        assert!(!explicit.filter_done_or(true));
        assert!(absent.is_empty());
        assert!(!explicit.is_empty());
    }

    #[test]
    fn set_from_str_rejects_wrong_type() {
        let mut meta = Metadata::default();
        assert!(!meta.set_from_str(MetadataKey::MaxVisible, "lots"));
        assert!(!meta.set_from_str(MetadataKey::ReadOnly, "7"));
        assert!(meta.set_from_str(MetadataKey::MaxVisible, "7"));
        assert_eq!(meta.max_visible, Some(7));
        assert_eq!(meta.read_only, None);
    }

    #[test]
    fn hide_completed_is_a_synonym() {
        assert_eq!(
            MetadataKey::from_name("hide-completed"),
            Some(MetadataKey::FilterDone)
        );
        assert_eq!(MetadataKey::from_name("theme"), None);
    }
}
