use crate::model::metadata::{Metadata, MetadataKey};

/// A problem in the frontmatter block. The document body is still usable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MetadataError {
    #[error("unknown frontmatter key '{key}' (line {line})")]
    UnknownKey { key: String, line: usize },
    #[error("malformed frontmatter line {line}: '{text}'")]
    Malformed { line: usize, text: String },
    #[error("invalid value '{value}' for frontmatter key '{key}' (line {line})")]
    InvalidValue {
        key: String,
        value: String,
        line: usize,
    },
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end() == "---"
}

/// Number of leading lines that form a frontmatter block, delimiters
/// included. Zero when the document has none.
pub fn prelude_len(lines: &[String]) -> usize {
    match lines.first() {
        Some(first) if is_delimiter(first) => lines[1..]
            .iter()
            .position(|l| is_delimiter(l))
            .map_or(0, |close| close + 2),
        _ => 0,
    }
}

/// Decode the `key: value` lines between the delimiters. Every line is
/// applied that can be; the first problem found is returned alongside.
pub fn parse_prelude(block: &[String]) -> (Metadata, Option<MetadataError>) {
    let mut metadata = Metadata::default();
    let mut error = None;
    let inner = match block.len() {
        0..=2 => &[][..],
        n => &block[1..n - 1],
    };

    for (offset, raw) in inner.iter().enumerate() {
        // 1-based line numbers within the file; the opening delimiter is line 1
        let line = offset + 2;
        let text = raw.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }
        let problem = match text.split_once(':') {
            None => Some(MetadataError::Malformed {
                line,
                text: text.to_string(),
            }),
            Some((key, value)) => {
                let key = key.trim();
                let value = unquote(value.trim());
                match MetadataKey::from_name(key) {
                    None => Some(MetadataError::UnknownKey {
                        key: key.to_string(),
                        line,
                    }),
                    Some(known) if !metadata.set_from_str(known, value) => {
                        Some(MetadataError::InvalidValue {
                            key: key.to_string(),
                            value: value.to_string(),
                            line,
                        })
                    }
                    Some(_) => None,
                }
            }
        };
        if error.is_none() {
            error = problem;
        }
    }

    (metadata, error)
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|v| v.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

/// Canonical frontmatter lines for `metadata`; empty when nothing is set
pub fn serialize_prelude(metadata: &Metadata) -> Vec<String> {
    if metadata.is_empty() {
        return Vec::new();
    }
    let mut lines = vec!["---".to_string()];
    for key in MetadataKey::ALL {
        if let Some(value) = metadata.value_of(key) {
            lines.push(format!("{}: {}", key.as_str(), value));
        }
    }
    lines.push("---".to_string());
    lines
}
