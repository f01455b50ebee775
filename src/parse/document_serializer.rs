use crate::model::config::ParseOptions;
use crate::model::document::{Document, Node};
use crate::model::inline::render_markdown;
use crate::model::item::ChecklistItem;
use crate::parse::prelude::serialize_prelude;

/// Serialize a document back to text. Nodes that still carry their source
/// lines are emitted verbatim; new or modified nodes get the canonical form.
pub fn serialize_document(doc: &Document, options: &ParseOptions) -> String {
    let mut lines: Vec<String> = Vec::new();

    match &doc.prelude_source {
        Some(source) if doc.metadata == doc.prelude_metadata => lines.extend(source.iter().cloned()),
        _ => lines.extend(serialize_prelude(&doc.metadata)),
    }

    for node in doc.nodes() {
        serialize_node(node, options, &mut lines);
    }

    let ending = doc.line_ending.as_str();
    let mut out = lines.join(ending);
    if doc.trailing_newline && !lines.is_empty() {
        out.push_str(ending);
    }
    out
}

/// Append the lines of one node
pub fn serialize_node(node: &Node, options: &ParseOptions, lines: &mut Vec<String>) {
    match node {
        Node::Heading(h) => match &h.source_text {
            Some(src) => lines.extend(src.iter().cloned()),
            None => lines.push(format!(
                "{} {}",
                "#".repeat(h.level as usize),
                render_markdown(&h.text)
            )),
        },
        Node::Paragraph(p) => match &p.source_text {
            Some(src) => lines.extend(src.iter().cloned()),
            None => lines.extend(render_markdown(&p.text).split('\n').map(String::from)),
        },
        Node::CodeBlock(cb) => match &cb.source_text {
            Some(src) => lines.extend(src.iter().cloned()),
            None => {
                lines.push(format!("{}{}", cb.fence, cb.language));
                lines.extend(cb.lines.iter().cloned());
                lines.push(cb.fence.clone());
            }
        },
        Node::Blockquote(q) => match &q.source_text {
            Some(src) => lines.extend(src.iter().cloned()),
            None => {
                let mut inner = Vec::new();
                for child in &q.children {
                    serialize_node(child, options, &mut inner);
                }
                lines.extend(inner.into_iter().map(|l| {
                    if l.is_empty() {
                        ">".to_string()
                    } else {
                        format!("> {}", l)
                    }
                }));
            }
        },
        Node::List(list) => match &list.source_text {
            Some(src) => lines.extend(src.iter().cloned()),
            None => {
                for entry in &list.items {
                    lines.push(format!(
                        "{}{} {}",
                        " ".repeat(entry.depth * options.indent_unit),
                        entry.marker,
                        render_markdown(&entry.text)
                    ));
                }
            }
        },
        Node::ThematicBreak(src) => lines.push(src.clone().unwrap_or_else(|| "---".into())),
        Node::ChecklistItem(item) => {
            match (&item.source_text, item.dirty) {
                (Some(src), false) => lines.push(src.clone()),
                _ => lines.push(item_line(item, options)),
            }
            lines.extend(item.body.iter().cloned());
        }
        Node::Literal(src) => lines.extend(src.iter().cloned()),
    }
}

/// Canonical `- [ ] text` line for an item
pub fn item_line(item: &ChecklistItem, options: &ParseOptions) -> String {
    let glyph = match (item.checked, item.glyph) {
        (false, _) => ' ',
        (true, ' ') => options.done_glyph,
        (true, written) => written,
    };
    let text = render_markdown(&item.text);
    let mut line = format!("{}{} [{}]", item.indent, item.marker, glyph);
    if !text.is_empty() {
        line.push(' ');
        line.push_str(&text);
    }
    line
}
