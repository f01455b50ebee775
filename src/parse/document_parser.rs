use crate::model::config::ParseOptions;
use crate::model::document::{
    Blockquote, CodeBlock, Document, Heading, LineEnding, List, ListEntry, Node, Paragraph,
};
use crate::model::item::ChecklistItem;
use crate::parse::inline_parser::parse_inlines;
use crate::parse::prelude::{MetadataError, parse_prelude, prelude_len};

/// Parse a markdown document. A frontmatter problem is returned alongside
/// the document rather than instead of it: the prelude is stripped and the
/// body parsed either way.
pub fn parse_document(source: &str, options: &ParseOptions) -> (Document, Option<MetadataError>) {
    let line_ending = if source.contains("\r\n") {
        LineEnding::CrLf
    } else {
        LineEnding::Lf
    };
    let trailing_newline = source.is_empty() || source.ends_with('\n');

    let mut lines: Vec<String> = if source.is_empty() {
        Vec::new()
    } else {
        source
            .split('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l).to_string())
            .collect()
    };
    if trailing_newline && !source.is_empty() {
        lines.pop();
    }

    let prelude_end = prelude_len(&lines);
    let (metadata, error) = parse_prelude(&lines[..prelude_end]);
    let prelude_source = (prelude_end > 0).then(|| lines[..prelude_end].to_vec());

    let nodes = parse_blocks(&lines[prelude_end..], options);
    let mut doc = Document::from_nodes(nodes);
    doc.prelude_metadata = metadata.clone();
    doc.metadata = metadata;
    doc.prelude_source = prelude_source;
    doc.line_ending = line_ending;
    doc.trailing_newline = trailing_newline;
    (doc, error)
}

/// Parse body lines into nodes. Blockquote content is parsed recursively
/// with this same function.
pub fn parse_blocks(lines: &[String], options: &ParseOptions) -> Vec<Node> {
    let mut nodes = Vec::new();
    let mut literal_buf: Vec<String> = Vec::new();
    // Indent widths of the items enclosing the next item
    let mut item_stack: Vec<usize> = Vec::new();
    let mut idx = 0;

    while idx < lines.len() {
        let line = &lines[idx];

        if line.trim().is_empty() {
            literal_buf.push(line.clone());
            idx += 1;
            continue;
        }

        if let Some(item_line) = parse_item_line(line, options) {
            flush_literal(&mut literal_buf, &mut nodes);
            let (node, next) = parse_item(lines, idx, item_line, &mut item_stack, options);
            nodes.push(node);
            idx = next;
            continue;
        }

        flush_literal(&mut literal_buf, &mut nodes);
        item_stack.clear();

        let (node, next) = if let Some(fence) = fence_open(line) {
            parse_code_block(lines, idx, fence)
        } else if let Some(level) = heading_level(line) {
            (parse_heading(line, level), idx + 1)
        } else if is_thematic_break(line) {
            (Node::ThematicBreak(Some(line.clone())), idx + 1)
        } else if is_quote_line(line) {
            parse_blockquote(lines, idx, options)
        } else if list_marker(line).is_some() {
            parse_list(lines, idx, options)
        } else if is_opaque_line(line) {
            parse_opaque(lines, idx)
        } else {
            parse_paragraph(lines, idx)
        };
        nodes.push(node);
        idx = next;
    }

    flush_literal(&mut literal_buf, &mut nodes);
    nodes
}

fn flush_literal(buf: &mut Vec<String>, nodes: &mut Vec<Node>) {
    if !buf.is_empty() {
        nodes.push(Node::Literal(std::mem::take(buf)));
    }
}

/// Width of leading whitespace, tabs counting as four columns
pub fn indent_width(line: &str) -> usize {
    line.chars()
        .take_while(|c| c.is_whitespace())
        .map(|c| if c == '\t' { 4 } else { 1 })
        .sum()
}

fn leading_whitespace(line: &str) -> &str {
    &line[..line.len() - line.trim_start().len()]
}

/// The pieces of a `- [ ] text` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemLine<'a> {
    pub indent: &'a str,
    pub marker: &'a str,
    pub glyph: char,
    pub text: &'a str,
}

/// Recognize a checklist line: a bullet or ordered marker, whitespace,
/// then `[ ]`, `[x]`, `[X]` or `[<done glyph>]`.
pub fn parse_item_line<'a>(line: &'a str, options: &ParseOptions) -> Option<ItemLine<'a>> {
    let indent = leading_whitespace(line);
    let rest = &line[indent.len()..];
    let marker_len = list_marker(line)?;
    let marker = &rest[..marker_len];
    let after_marker = &rest[marker_len..];
    let body = after_marker.trim_start_matches([' ', '\t']);
    if body.len() == after_marker.len() {
        return None;
    }
    let inner = body.strip_prefix('[')?;
    let mut chars = inner.chars();
    let glyph = chars.next()?;
    let after_box = chars.as_str().strip_prefix(']')?;
    if !(glyph == ' ' || glyph == 'x' || glyph == 'X' || glyph == options.done_glyph) {
        return None;
    }
    let text = match after_box.strip_prefix(' ') {
        Some(text) => text,
        None if after_box.is_empty() => "",
        None => return None,
    };
    Some(ItemLine {
        indent,
        marker,
        glyph,
        text,
    })
}

/// Byte length of a list marker (`-`, `*`, `+`, `1.`, `1)`) at the start of
/// the trimmed line, when it is followed by whitespace or the end of line.
fn list_marker(line: &str) -> Option<usize> {
    let rest = line.trim_start();
    let bytes = rest.as_bytes();
    let len = match bytes.first()? {
        b'-' | b'*' | b'+' => 1,
        b'0'..=b'9' => {
            let digits = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
            match bytes.get(digits) {
                Some(b'.') | Some(b')') if digits <= 9 => digits + 1,
                _ => return None,
            }
        }
        _ => return None,
    };
    match bytes.get(len) {
        None | Some(b' ') | Some(b'\t') => Some(len),
        _ => None,
    }
}

fn parse_item(
    lines: &[String],
    start: usize,
    item_line: ItemLine<'_>,
    item_stack: &mut Vec<usize>,
    options: &ParseOptions,
) -> (Node, usize) {
    let width = indent_width(item_line.indent);
    while item_stack.last().is_some_and(|&w| w >= width) {
        item_stack.pop();
    }
    let depth = item_stack.len();
    item_stack.push(width);

    let mut item = ChecklistItem::new(parse_inlines(item_line.text), item_line.glyph != ' ');
    item.depth = depth;
    item.indent = item_line.indent.to_string();
    item.marker = item_line.marker.to_string();
    item.glyph = item_line.glyph;
    item.source_text = Some(lines[start].clone());
    item.dirty = false;

    // Deeper-indented lines that are not items themselves belong to the item
    let mut idx = start + 1;
    let mut in_fence: Option<String> = None;
    while idx < lines.len() {
        let line = &lines[idx];
        if let Some(fence) = &in_fence {
            if line.trim().is_empty() || indent_width(line) > width {
                if fence_close(line, fence) {
                    in_fence = None;
                }
                item.body.push(line.clone());
                idx += 1;
                continue;
            }
            break;
        }
        if line.trim().is_empty() || indent_width(line) <= width {
            break;
        }
        if parse_item_line(line, options).is_some() {
            break;
        }
        if let Some(fence) = fence_run(line.trim_start()) {
            in_fence = Some(fence);
        }
        item.body.push(line.clone());
        idx += 1;
    }

    (Node::ChecklistItem(item), idx)
}

/// The fence run opening a top-level code block
fn fence_open(line: &str) -> Option<String> {
    if indent_width(line) > 3 {
        return None;
    }
    fence_run(line.trim_start())
}

/// A run of three or more backticks or tildes starting `trimmed`
fn fence_run(trimmed: &str) -> Option<String> {
    let ch = trimmed.chars().next()?;
    if ch != '`' && ch != '~' {
        return None;
    }
    let run = trimmed.chars().take_while(|&c| c == ch).count();
    if run < 3 {
        return None;
    }
    // Backtick fences may not carry backticks in their info string
    if ch == '`' && trimmed[run..].contains('`') {
        return None;
    }
    Some(trimmed[..run].to_string())
}

fn fence_close(line: &str, fence: &str) -> bool {
    let trimmed = line.trim();
    let ch = fence.chars().next().unwrap_or('`');
    trimmed.len() >= fence.len() && trimmed.chars().all(|c| c == ch)
}

fn parse_code_block(lines: &[String], start: usize, fence: String) -> (Node, usize) {
    let opener = lines[start].trim_start();
    let language = opener[fence.len()..].trim().to_string();
    let mut body = Vec::new();
    let mut idx = start + 1;
    let mut closed = false;
    while idx < lines.len() {
        if fence_close(&lines[idx], &fence) {
            closed = true;
            idx += 1;
            break;
        }
        body.push(lines[idx].clone());
        idx += 1;
    }
    let end = if closed { idx } else { lines.len() };
    let node = Node::CodeBlock(CodeBlock {
        fence,
        language,
        lines: body,
        source_text: Some(lines[start..end].to_vec()),
    });
    (node, end)
}

/// ATX heading level (`#` to `######` followed by a space or end of line)
fn heading_level(line: &str) -> Option<u8> {
    if indent_width(line) > 3 {
        return None;
    }
    let trimmed = line.trim_start();
    let hashes = trimmed.chars().take_while(|&c| c == '#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    match trimmed[hashes..].chars().next() {
        None | Some(' ') | Some('\t') => Some(hashes as u8),
        _ => None,
    }
}

fn parse_heading(line: &str, level: u8) -> Node {
    let content = line.trim_start()[level as usize..].trim();
    // Optional closing sequence: `## Title ##`
    let content = match content.trim_end_matches('#') {
        stripped if stripped.ends_with(' ') => stripped.trim_end(),
        "" => "",
        _ => content,
    };
    Node::Heading(Heading {
        level,
        text: parse_inlines(content),
        source_text: Some(vec![line.to_string()]),
    })
}

fn is_thematic_break(line: &str) -> bool {
    if indent_width(line) > 3 {
        return false;
    }
    let compact: Vec<char> = line.chars().filter(|c| !c.is_whitespace()).collect();
    compact.len() >= 3
        && matches!(compact[0], '-' | '*' | '_')
        && compact.iter().all(|&c| c == compact[0])
}

fn is_quote_line(line: &str) -> bool {
    indent_width(line) <= 3 && line.trim_start().starts_with('>')
}

fn strip_quote(line: &str) -> String {
    let rest = line.trim_start().strip_prefix('>').unwrap_or(line);
    rest.strip_prefix(' ').unwrap_or(rest).to_string()
}

fn parse_blockquote(lines: &[String], start: usize, options: &ParseOptions) -> (Node, usize) {
    let end = lines[start..]
        .iter()
        .position(|l| !is_quote_line(l))
        .map_or(lines.len(), |p| start + p);
    let inner: Vec<String> = lines[start..end].iter().map(|l| strip_quote(l)).collect();
    let node = Node::Blockquote(Blockquote {
        children: parse_blocks(&inner, options),
        source_text: Some(lines[start..end].to_vec()),
    });
    (node, end)
}

fn parse_list(lines: &[String], start: usize, options: &ParseOptions) -> (Node, usize) {
    let ordered = lines[start]
        .trim_start()
        .starts_with(|c: char| c.is_ascii_digit());
    let mut items = Vec::new();
    let mut idx = start;
    while idx < lines.len() {
        let line = &lines[idx];
        if line.trim().is_empty() || parse_item_line(line, options).is_some() {
            break;
        }
        if let Some(marker_len) = list_marker(line) {
            let rest = line.trim_start();
            items.push(ListEntry {
                marker: rest[..marker_len].to_string(),
                depth: indent_width(line) / options.indent_unit.max(1),
                text: parse_inlines(rest[marker_len..].trim_start()),
            });
        } else if indent_width(line) == 0 {
            break;
        }
        idx += 1;
    }
    let node = Node::List(List {
        ordered,
        items,
        source_text: Some(lines[start..idx].to_vec()),
    });
    (node, idx)
}

/// HTML blocks and tables pass through untouched
fn is_opaque_line(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with('<') || trimmed.starts_with('|')
}

fn parse_opaque(lines: &[String], start: usize) -> (Node, usize) {
    let end = lines[start..]
        .iter()
        .position(|l| l.trim().is_empty())
        .map_or(lines.len(), |p| start + p);
    (Node::Literal(lines[start..end].to_vec()), end)
}

fn starts_block(line: &str) -> bool {
    fence_open(line).is_some()
        || heading_level(line).is_some()
        || is_thematic_break(line)
        || is_quote_line(line)
        || list_marker(line).is_some()
}

fn parse_paragraph(lines: &[String], start: usize) -> (Node, usize) {
    let mut end = start + 1;
    while end < lines.len() && !lines[end].trim().is_empty() && !starts_block(&lines[end]) {
        end += 1;
    }
    let source = lines[start..end].to_vec();
    let node = Node::Paragraph(Paragraph {
        text: parse_inlines(&source.join("\n")),
        source_text: Some(source),
    });
    (node, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> Document {
        let (doc, err) = parse_document(source, &ParseOptions::default());
        assert_eq!(err, None);
        doc
    }

    fn kinds(doc: &Document) -> Vec<&'static str> {
        doc.nodes()
            .map(|n| match n {
                Node::Heading(_) => "heading",
                Node::Paragraph(_) => "paragraph",
                Node::CodeBlock(_) => "code",
                Node::Blockquote(_) => "quote",
                Node::List(_) => "list",
                Node::ThematicBreak(_) => "break",
                Node::ChecklistItem(_) => "item",
                Node::Literal(_) => "literal",
            })
            .collect()
    }

    #[test]
    fn scenario_two_items() {
        let doc = parse("# Todos\n\n- [ ] A\n- [x] B\n");
        assert_eq!(doc.len(), 2);
        assert!(!doc.item(0).unwrap().checked);
        assert!(doc.item(1).unwrap().checked);
        assert_eq!(doc.item(0).unwrap().markdown(), "A");
        assert_eq!(kinds(&doc), vec!["heading", "literal", "item", "item"]);
    }

    #[test]
    fn item_line_variants() {
        let opts = ParseOptions::default();
        let parsed = parse_item_line("  * [X] Done thing", &opts).unwrap();
        assert_eq!(parsed.indent, "  ");
        assert_eq!(parsed.marker, "*");
        assert_eq!(parsed.glyph, 'X');
        assert_eq!(parsed.text, "Done thing");

        assert_eq!(parse_item_line("1. [ ] first", &opts).unwrap().marker, "1.");
        assert_eq!(parse_item_line("- [ ]", &opts).unwrap().text, "");
        assert!(parse_item_line("- [?] odd", &opts).is_none());
        assert!(parse_item_line("- [ ]no space", &opts).is_none());
        assert!(parse_item_line("-[ ] tight", &opts).is_none());
        assert!(parse_item_line("- plain bullet", &opts).is_none());

        let glyph = ParseOptions {
            done_glyph: '✓',
            ..Default::default()
        };
        assert!(parse_item_line("- [✓] custom", &glyph).is_some());
        assert!(parse_item_line("- [✓] custom", &opts).is_none());
    }

    #[test]
    fn depth_follows_relative_indentation() {
        let doc = parse("- [ ] a\n    - [ ] b\n        - [ ] c\n    - [ ] d\n- [ ] e\n");
        let depths: Vec<usize> = doc.items().map(|i| i.depth).collect();
        assert_eq!(depths, vec![0, 1, 2, 1, 0]);
    }

    #[test]
    fn continuation_lines_attach_to_item() {
        let doc = parse("- [ ] parent\n  a note\n  - plain sub-bullet\n- [ ] next\n");
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.item(0).unwrap().body, vec!["  a note", "  - plain sub-bullet"]);
        assert!(doc.item(1).unwrap().body.is_empty());
    }

    #[test]
    fn code_fence_hides_checkboxes() {
        let doc = parse("```md\n- [ ] not an item\n```\n- [ ] real\n");
        assert_eq!(doc.len(), 1);
        assert_eq!(kinds(&doc), vec!["code", "item"]);
        match doc.nodes().next() {
            Some(Node::CodeBlock(cb)) => {
                assert_eq!(cb.language, "md");
                assert_eq!(cb.lines, vec!["- [ ] not an item"]);
            }
            other => panic!("expected code block, got {:?}", other),
        }
    }

    #[test]
    fn quoted_checkboxes_are_not_indexed() {
        let doc = parse("> - [ ] quoted\n> more\n\n- [ ] real\n");
        assert_eq!(doc.len(), 1);
        assert_eq!(kinds(&doc), vec!["quote", "literal", "item"]);
    }

    #[test]
    fn block_kinds() {
        let doc = parse(
            "# Title\n\nSome *text*\nwrapped.\n\n---\n\n- plain\n- list\n\n| a | b |\n|---|---|\n\n## Sub ##\n",
        );
        assert_eq!(
            kinds(&doc),
            vec![
                "heading", "literal", "paragraph", "literal", "break", "literal", "list",
                "literal", "literal", "literal", "heading"
            ]
        );
        match doc.nodes().last() {
            Some(Node::Heading(h)) => {
                assert_eq!(h.level, 2);
                assert_eq!(crate::model::inline::plain_text(&h.text), "Sub");
            }
            other => panic!("expected heading, got {:?}", other),
        }
    }

    #[test]
    fn frontmatter_is_stripped_even_with_unknown_key() {
        let (doc, err) = parse_document(
            "---\ncolor: red\nfilter-done: true\n---\n- [ ] a\n",
            &ParseOptions::default(),
        );
        assert!(matches!(err, Some(MetadataError::UnknownKey { .. })));
        assert_eq!(doc.metadata.filter_done, Some(true));
        assert_eq!(doc.len(), 1);
        assert_eq!(kinds(&doc), vec!["item"]);
    }

    #[test]
    fn line_endings_and_final_newline() {
        let doc = parse("- [ ] a\r\n- [ ] b\r\n");
        assert_eq!(doc.line_ending, LineEnding::CrLf);
        assert_eq!(doc.item(1).unwrap().markdown(), "b");

        let doc = parse("- [ ] no newline");
        assert!(!doc.trailing_newline);

        let doc = parse("");
        assert!(doc.is_empty());
        assert_eq!(doc.node_count(), 0);
    }

    #[test]
    fn item_stack_resets_after_other_blocks() {
        let doc = parse("- [ ] a\n  - [ ] b\n\nParagraph\n\n  - [ ] c\n");
        let depths: Vec<usize> = doc.items().map(|i| i.depth).collect();
        assert_eq!(depths, vec![0, 1, 0]);
    }
}
