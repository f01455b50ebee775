use serde::{Deserialize, Serialize};

/// An inline span. Every variant keeps the delimiters it was written with,
/// so rendering a parsed span list reproduces its source exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Inline {
    Text {
        text: String,
    },
    /// `*em*` or `_em_`
    Emphasis {
        delim: char,
        children: Vec<Inline>,
    },
    /// `**strong**` or `__strong__`
    Strong {
        delim: char,
        children: Vec<Inline>,
    },
    /// `~~struck~~`
    Strikethrough {
        children: Vec<Inline>,
    },
    /// A code span; `ticks` is the length of the backtick run
    Code {
        ticks: usize,
        text: String,
    },
    /// `[text](dest)` where `dest` is everything between the parentheses
    Link {
        children: Vec<Inline>,
        dest: String,
    },
}

impl Inline {
    pub fn text(s: impl Into<String>) -> Inline {
        Inline::Text { text: s.into() }
    }

    /// The link target without an optional quoted title
    pub fn link_url(&self) -> Option<&str> {
        match self {
            Inline::Link { dest, .. } => Some(split_dest(dest).0),
            _ => None,
        }
    }

    /// The quoted title of a link, if present
    pub fn link_title(&self) -> Option<&str> {
        match self {
            Inline::Link { dest, .. } => split_dest(dest).1,
            _ => None,
        }
    }
}

fn split_dest(dest: &str) -> (&str, Option<&str>) {
    let trimmed = dest.trim();
    if let Some(space) = trimmed.find(char::is_whitespace) {
        let (url, rest) = trimmed.split_at(space);
        let rest = rest.trim();
        if rest.len() >= 2
            && ((rest.starts_with('"') && rest.ends_with('"'))
                || (rest.starts_with('\'') && rest.ends_with('\'')))
        {
            return (url, Some(&rest[1..rest.len() - 1]));
        }
    }
    (trimmed, None)
}

/// Render spans back to markdown source
pub fn render_markdown(spans: &[Inline]) -> String {
    let mut out = String::new();
    push_markdown(&mut out, spans);
    out
}

fn push_markdown(out: &mut String, spans: &[Inline]) {
    for span in spans {
        match span {
            Inline::Text { text } => out.push_str(text),
            Inline::Emphasis { delim, children } => {
                out.push(*delim);
                push_markdown(out, children);
                out.push(*delim);
            }
            Inline::Strong { delim, children } => {
                out.push(*delim);
                out.push(*delim);
                push_markdown(out, children);
                out.push(*delim);
                out.push(*delim);
            }
            Inline::Strikethrough { children } => {
                out.push_str("~~");
                push_markdown(out, children);
                out.push_str("~~");
            }
            Inline::Code { ticks, text } => {
                let fence = "`".repeat(*ticks);
                out.push_str(&fence);
                out.push_str(text);
                out.push_str(&fence);
            }
            Inline::Link { children, dest } => {
                out.push('[');
                push_markdown(out, children);
                out.push_str("](");
                out.push_str(dest);
                out.push(')');
            }
        }
    }
}

/// Render spans as display text, without markdown delimiters
pub fn plain_text(spans: &[Inline]) -> String {
    let mut out = String::new();
    push_plain(&mut out, spans);
    out
}

fn push_plain(out: &mut String, spans: &[Inline]) {
    for span in spans {
        match span {
            Inline::Text { text } | Inline::Code { text, .. } => out.push_str(text),
            Inline::Emphasis { children, .. }
            | Inline::Strong { children, .. }
            | Inline::Strikethrough { children }
            | Inline::Link { children, .. } => push_plain(out, children),
        }
    }
}

/// Concatenated text of all spans outside code spans. Tag, priority and
/// due tokens are only recognized here.
pub fn token_text(spans: &[Inline]) -> String {
    let mut out = String::new();
    push_token_text(&mut out, spans);
    out
}

fn push_token_text(out: &mut String, spans: &[Inline]) {
    for span in spans {
        match span {
            Inline::Text { text } => out.push_str(text),
            // Keep a separator so tokens on either side of a code span stay apart
            Inline::Code { .. } => out.push(' '),
            Inline::Emphasis { children, .. }
            | Inline::Strong { children, .. }
            | Inline::Strikethrough { children }
            | Inline::Link { children, .. } => push_token_text(out, children),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_title_is_split_from_url() {
        let link = Inline::Link {
            children: vec![Inline::text("docs")],
            dest: "https://example.com \"The Docs\"".into(),
        };
        assert_eq!(link.link_url(), Some("https://example.com"));
        assert_eq!(link.link_title(), Some("The Docs"));
        assert_eq!(
            render_markdown(std::slice::from_ref(&link)),
            "[docs](https://example.com \"The Docs\")"
        );
    }

    #[test]
    fn plain_text_drops_delimiters() {
        let spans = vec![
            Inline::text("ship "),
            Inline::Strong {
                delim: '*',
                children: vec![Inline::text("v2")],
            },
            Inline::text(" "),
            Inline::Code {
                ticks: 1,
                text: "#notatag".into(),
            },
        ];
        assert_eq!(plain_text(&spans), "ship v2 #notatag");
        assert_eq!(token_text(&spans), "ship v2  ");
        assert_eq!(render_markdown(&spans), "ship **v2** `#notatag`");
    }
}
