use serde::{Deserialize, Serialize};

use super::metadata::Metadata;

/// Global configuration from config.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub format: FormatConfig,
}

/// Defaults for per-document view settings. Frontmatter and CLI flags
/// override these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ViewConfig {
    #[serde(default)]
    pub filter_done: bool,
    #[serde(default)]
    pub show_headings: bool,
    /// 0 means no limit
    #[serde(default)]
    pub max_visible: u32,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default = "default_true")]
    pub word_wrap: bool,
    #[serde(default = "default_true")]
    pub line_numbers: bool,
    #[serde(default)]
    pub section_scope: ScopeMode,
}

impl Default for ViewConfig {
    fn default() -> Self {
        ViewConfig {
            filter_done: false,
            show_headings: false,
            max_visible: 0,
            read_only: false,
            word_wrap: true,
            line_numbers: true,
            section_scope: ScopeMode::Document,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Symbols used by the terminal UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DisplayConfig {
    #[serde(default = "default_check_symbol")]
    pub check_symbol: String,
    #[serde(default = "default_select_marker")]
    pub select_marker: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            check_symbol: default_check_symbol(),
            select_marker: default_select_marker(),
        }
    }
}

fn default_check_symbol() -> String {
    "✓".into()
}

fn default_select_marker() -> String {
    "➜".into()
}

/// How checklist items are written back to the file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FormatConfig {
    /// Character written inside `[ ]` for a completed item
    #[serde(default = "default_done_glyph")]
    pub done_glyph: char,
    /// Spaces per nesting level for items whose depth changed
    #[serde(default = "default_indent_unit")]
    pub indent_unit: usize,
}

impl Default for FormatConfig {
    fn default() -> Self {
        FormatConfig {
            done_glyph: default_done_glyph(),
            indent_unit: default_indent_unit(),
        }
    }
}

fn default_done_glyph() -> char {
    'x'
}

fn default_indent_unit() -> usize {
    2
}

/// Whether navigation, move and sort stop at heading boundaries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeMode {
    #[default]
    Document,
    Section,
}

/// Options threaded through parse and serialize
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    pub done_glyph: char,
    pub indent_unit: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            done_glyph: 'x',
            indent_unit: 2,
        }
    }
}

impl From<&FormatConfig> for ParseOptions {
    fn from(format: &FormatConfig) -> Self {
        ParseOptions {
            done_glyph: format.done_glyph,
            indent_unit: format.indent_unit.max(1),
        }
    }
}

/// View settings given on the command line; `None` defers to the document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewOverrides {
    pub filter_done: Option<bool>,
    pub show_headings: Option<bool>,
    pub max_visible: Option<u32>,
    pub read_only: Option<bool>,
}

/// Effective view settings for one open document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewSettings {
    pub filter_done: bool,
    pub show_headings: bool,
    pub max_visible: u32,
    pub read_only: bool,
    pub word_wrap: bool,
    pub line_numbers: bool,
    pub scope: ScopeMode,
}

impl ViewSettings {
    /// Precedence: command line, then frontmatter, then global config
    pub fn resolve(config: &Config, metadata: &Metadata, overrides: &ViewOverrides) -> Self {
        let view = &config.view;
        ViewSettings {
            filter_done: overrides
                .filter_done
                .unwrap_or_else(|| metadata.filter_done_or(view.filter_done)),
            show_headings: overrides
                .show_headings
                .unwrap_or_else(|| metadata.show_headings_or(view.show_headings)),
            max_visible: overrides
                .max_visible
                .unwrap_or_else(|| metadata.max_visible_or(view.max_visible)),
            read_only: overrides
                .read_only
                .unwrap_or_else(|| metadata.read_only_or(view.read_only)),
            word_wrap: metadata.word_wrap_or(view.word_wrap),
            line_numbers: view.line_numbers,
            scope: view.section_scope,
        }
    }
}
