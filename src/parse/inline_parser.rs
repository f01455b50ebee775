use crate::model::inline::Inline;

/// Parse inline markdown into spans. Unmatched delimiters stay plain text,
/// so `render_markdown(&parse_inlines(s)) == s` for every input.
pub fn parse_inlines(text: &str) -> Vec<Inline> {
    let mut spans = Vec::new();
    let bytes = text.as_bytes();
    let mut plain_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        let parsed = match bytes[i] {
            b'`' => parse_code(text, i),
            b'*' | b'_' => parse_emphasis(text, i),
            b'~' => parse_strike(text, i),
            b'[' => parse_link(text, i),
            _ => None,
        };
        match parsed {
            Some((span, end)) => {
                push_text(&mut spans, &text[plain_start..i]);
                spans.push(span);
                i = end;
                plain_start = end;
            }
            None => {
                // Skip a whole backtick run so a longer run is never split
                if bytes[i] == b'`' {
                    i += run_length(bytes, i, b'`');
                } else {
                    i += 1;
                }
            }
        }
    }
    push_text(&mut spans, &text[plain_start..]);
    spans
}

fn push_text(spans: &mut Vec<Inline>, s: &str) {
    if s.is_empty() {
        return;
    }
    if let Some(Inline::Text { text }) = spans.last_mut() {
        text.push_str(s);
    } else {
        spans.push(Inline::text(s));
    }
}

fn run_length(bytes: &[u8], start: usize, ch: u8) -> usize {
    bytes[start..].iter().take_while(|&&b| b == ch).count()
}

/// `` `code` ``: closed by a backtick run of the same length
fn parse_code(text: &str, start: usize) -> Option<(Inline, usize)> {
    let bytes = text.as_bytes();
    let ticks = run_length(bytes, start, b'`');
    let mut j = start + ticks;
    while j < bytes.len() {
        if bytes[j] == b'`' {
            let run = run_length(bytes, j, b'`');
            if run == ticks {
                let code = Inline::Code {
                    ticks,
                    text: text[start + ticks..j].to_string(),
                };
                return Some((code, j + run));
            }
            j += run;
        } else {
            j += 1;
        }
    }
    None
}

fn is_space_at(bytes: &[u8], i: usize) -> bool {
    bytes.get(i).is_none_or(|b| b.is_ascii_whitespace())
}

fn is_word_at(bytes: &[u8], i: Option<usize>) -> bool {
    i.and_then(|i| bytes.get(i))
        .is_some_and(|b| b.is_ascii_alphanumeric())
}

/// Find a closing delimiter `delim` (one or two chars) at or after `from`.
/// The closer must follow a non-space and, for `_`, must not be followed
/// by a word character.
fn find_closer(bytes: &[u8], from: usize, delim: u8, width: usize) -> Option<usize> {
    let mut j = from;
    while j + width <= bytes.len() {
        if bytes[j..j + width].iter().all(|&b| b == delim)
            && j > 0
            && !bytes[j - 1].is_ascii_whitespace()
            && (delim != b'_' || !is_word_at(bytes, Some(j + width)))
        {
            // A single delimiter must not be half of a double one
            let extends = bytes.get(j + width) == Some(&delim);
            if width == 2 || !extends {
                return Some(j);
            }
            j += run_length(bytes, j, delim);
            continue;
        }
        if bytes[j] == b'`' {
            // Delimiters inside code spans do not count
            let ticks = run_length(bytes, j, b'`');
            let mut k = j + ticks;
            let mut closed = None;
            while k < bytes.len() {
                let run = run_length(bytes, k, b'`');
                if run == ticks {
                    closed = Some(k + run);
                    break;
                }
                k += run.max(1);
            }
            j = closed.unwrap_or(j + ticks);
            continue;
        }
        j += 1;
    }
    None
}

/// `*em*`, `_em_`, `**strong**`, `__strong__`
fn parse_emphasis(text: &str, start: usize) -> Option<(Inline, usize)> {
    let bytes = text.as_bytes();
    let delim = bytes[start];
    if delim == b'_' && is_word_at(bytes, start.checked_sub(1)) {
        return None;
    }
    let run = run_length(bytes, start, delim);
    let width = if run >= 2 { 2 } else { 1 };
    if is_space_at(bytes, start + width) {
        return None;
    }
    let close = find_closer(bytes, start + width + 1, delim, width)?;
    let children = parse_inlines(&text[start + width..close]);
    let span = if width == 2 {
        Inline::Strong {
            delim: delim as char,
            children,
        }
    } else {
        Inline::Emphasis {
            delim: delim as char,
            children,
        }
    };
    Some((span, close + width))
}

/// `~~struck~~`
fn parse_strike(text: &str, start: usize) -> Option<(Inline, usize)> {
    let bytes = text.as_bytes();
    if run_length(bytes, start, b'~') < 2 || is_space_at(bytes, start + 2) {
        return None;
    }
    let close = find_closer(bytes, start + 3, b'~', 2)?;
    let children = parse_inlines(&text[start + 2..close]);
    Some((Inline::Strikethrough { children }, close + 2))
}

/// `[text](dest)`; brackets and parentheses may nest
fn parse_link(text: &str, start: usize) -> Option<(Inline, usize)> {
    let bytes = text.as_bytes();
    let close_bracket = matching(bytes, start, b'[', b']')?;
    if bytes.get(close_bracket + 1) != Some(&b'(') {
        return None;
    }
    let close_paren = matching(bytes, close_bracket + 1, b'(', b')')?;
    let children = parse_inlines(&text[start + 1..close_bracket]);
    let dest = text[close_bracket + 2..close_paren].to_string();
    Some((Inline::Link { children, dest }, close_paren + 1))
}

fn matching(bytes: &[u8], open_at: usize, open: u8, close: u8) -> Option<usize> {
    let mut depth = 0usize;
    for (offset, &b) in bytes[open_at..].iter().enumerate() {
        if b == open {
            depth += 1;
        } else if b == close {
            depth -= 1;
            if depth == 0 {
                return Some(open_at + offset);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::inline::render_markdown;
    use pretty_assertions::assert_eq;

    fn assert_lossless(s: &str) {
        assert_eq!(render_markdown(&parse_inlines(s)), s);
    }

    #[test]
    fn plain_text_is_one_span() {
        assert_eq!(parse_inlines("just words"), vec![Inline::text("just words")]);
        assert!(parse_inlines("").is_empty());
    }

    #[test]
    fn recognizes_each_span_kind() {
        let spans = parse_inlines("a *em* **strong** ~~gone~~ `code` [link](http://x)");
        let kinds: Vec<&str> = spans
            .iter()
            .map(|s| match s {
                Inline::Text { .. } => "text",
                Inline::Emphasis { .. } => "em",
                Inline::Strong { .. } => "strong",
                Inline::Strikethrough { .. } => "strike",
                Inline::Code { .. } => "code",
                Inline::Link { .. } => "link",
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                "text", "em", "text", "strong", "text", "strike", "text", "code", "text", "link"
            ]
        );
    }

    #[test]
    fn nested_spans() {
        let spans = parse_inlines("**bold *and em***");
        assert_lossless("**bold *and em***");
        assert!(matches!(spans[0], Inline::Strong { .. }));
    }

    #[test]
    fn unmatched_delimiters_stay_text() {
        for s in [
            "2 * 3 * 4",
            "snake_case_name",
            "open *em",
            "[not a link]",
            "[text](unclosed",
            "``",
            "~single~",
            "**",
            "trailing `tick",
        ] {
            assert_lossless(s);
        }
        assert_eq!(parse_inlines("snake_case_name"), vec![Inline::text("snake_case_name")]);
    }

    #[test]
    fn code_span_hides_delimiters() {
        let spans = parse_inlines("run `a*b*c` now");
        assert_eq!(
            spans[1],
            Inline::Code {
                ticks: 1,
                text: "a*b*c".into()
            }
        );
        assert_lossless("``double `tick` span``");
    }

    #[test]
    fn link_with_title_and_nested_text() {
        let s = "see [the **docs**](https://e.com/a_(b) \"Title\")";
        assert_lossless(s);
        let spans = parse_inlines(s);
        assert_eq!(spans[1].link_url(), Some("https://e.com/a_(b)"));
        assert_eq!(spans[1].link_title(), Some("Title"));
    }

    #[test]
    fn unicode_text_round_trips() {
        assert_lossless("café ✓ *naïve* — done");
    }
}
