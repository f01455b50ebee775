use std::ops::Range;
use std::sync::Arc;

use super::inline::Inline;
use super::item::ChecklistItem;
use super::metadata::Metadata;

/// `# Heading`
#[derive(Debug, Clone, PartialEq)]
pub struct Heading {
    pub level: u8,
    pub text: Vec<Inline>,
    pub source_text: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    pub text: Vec<Inline>,
    pub source_text: Option<Vec<String>>,
}

/// A fenced code block. Its content is never scanned for checklist items.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeBlock {
    /// The fence run as written (three or more backticks or tildes)
    pub fence: String,
    pub language: String,
    pub lines: Vec<String>,
    pub source_text: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Blockquote {
    pub children: Vec<Node>,
    pub source_text: Option<Vec<String>>,
}

/// One entry of a plain (non-checkbox) list
#[derive(Debug, Clone, PartialEq)]
pub struct ListEntry {
    pub marker: String,
    pub depth: usize,
    pub text: Vec<Inline>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct List {
    pub ordered: bool,
    pub items: Vec<ListEntry>,
    pub source_text: Option<Vec<String>>,
}

/// A node of the document body
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Heading(Heading),
    Paragraph(Paragraph),
    CodeBlock(CodeBlock),
    Blockquote(Blockquote),
    List(List),
    ThematicBreak(Option<String>),
    ChecklistItem(ChecklistItem),
    /// Blank lines and anything not recognized, emitted verbatim
    Literal(Vec<String>),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// A parsed markdown document: metadata prelude plus body nodes, with the
/// checklist items indexed in document order.
///
/// Nodes are reference counted, so cloning a document (for undo, or for the
/// move-mode snapshot) copies pointers; a node is deep-copied only when it is
/// mutated.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub metadata: Metadata,
    /// The prelude lines as read, including both `---` delimiters
    pub prelude_source: Option<Vec<String>>,
    /// The metadata the prelude source decodes to
    pub prelude_metadata: Metadata,
    pub line_ending: LineEnding,
    pub trailing_newline: bool,
    nodes: Vec<Arc<Node>>,
    /// Node position of each checklist item, canonical order
    slots: Vec<usize>,
    /// Node position of each heading, document order
    heading_slots: Vec<usize>,
}

impl Document {
    pub fn from_nodes(nodes: Vec<Node>) -> Self {
        let mut doc = Document {
            nodes: nodes.into_iter().map(Arc::new).collect(),
            trailing_newline: true,
            ..Default::default()
        };
        doc.reindex();
        doc
    }

    /// The document written for a file that does not exist yet
    pub fn template() -> Self {
        Document::from_nodes(vec![
            Node::Heading(Heading {
                level: 1,
                text: vec![Inline::text("Todos")],
                source_text: None,
            }),
            Node::Literal(vec![String::new()]),
        ])
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().map(|n| n.as_ref())
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of checklist items
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn item(&self, index: usize) -> Option<&ChecklistItem> {
        let slot = *self.slots.get(index)?;
        match self.nodes[slot].as_ref() {
            Node::ChecklistItem(item) => Some(item),
            _ => None,
        }
    }

    /// Mutable access to one item. Only that node is copied if a snapshot
    /// still shares it.
    pub fn item_mut(&mut self, index: usize) -> Option<&mut ChecklistItem> {
        let slot = *self.slots.get(index)?;
        match Arc::make_mut(&mut self.nodes[slot]) {
            Node::ChecklistItem(item) => Some(item),
            _ => None,
        }
    }

    /// Items in canonical order
    pub fn items(&self) -> impl Iterator<Item = &ChecklistItem> {
        self.slots.iter().filter_map(|&slot| match self.nodes[slot].as_ref() {
            Node::ChecklistItem(item) => Some(item),
            _ => None,
        })
    }

    pub fn headings(&self) -> impl Iterator<Item = &Heading> {
        self.heading_slots
            .iter()
            .filter_map(|&slot| match self.nodes[slot].as_ref() {
                Node::Heading(h) => Some(h),
                _ => None,
            })
    }

    pub fn heading(&self, ordinal: usize) -> Option<&Heading> {
        self.headings().nth(ordinal)
    }

    /// Node position of a checklist item
    pub fn node_position(&self, index: usize) -> Option<usize> {
        self.slots.get(index).copied()
    }

    pub fn insert_node(&mut self, position: usize, node: Node) {
        let position = position.min(self.nodes.len());
        self.nodes.insert(position, Arc::new(node));
        self.reindex();
    }

    pub fn push_node(&mut self, node: Node) {
        self.nodes.push(Arc::new(node));
        self.reindex();
    }

    /// Remove a checklist item (with its body) from the document
    pub fn remove_item(&mut self, index: usize) -> Option<ChecklistItem> {
        let slot = *self.slots.get(index)?;
        let node = self.nodes.remove(slot);
        self.reindex();
        match Arc::unwrap_or_clone(node) {
            Node::ChecklistItem(item) => Some(item),
            _ => None,
        }
    }

    /// Rearrange items across the existing item slots: after the call the
    /// item at canonical position `k` is the one previously at `order[k]`.
    /// Non-item nodes never move. `order` must be a permutation of
    /// `0..len()`; anything else is ignored.
    pub fn permute(&mut self, order: &[usize]) {
        if order.len() != self.slots.len() || !is_permutation(order) {
            return;
        }
        let moved: Vec<Arc<Node>> = order
            .iter()
            .map(|&from| Arc::clone(&self.nodes[self.slots[from]]))
            .collect();
        for (slot, node) in self.slots.clone().into_iter().zip(moved) {
            self.nodes[slot] = node;
        }
        self.reindex();
    }

    /// Whether both documents write out the same text. Nodes the two share
    /// are not compared.
    pub fn same_content(&self, other: &Document) -> bool {
        self.nodes.len() == other.nodes.len()
            && self.line_ending == other.line_ending
            && self.trailing_newline == other.trailing_newline
            && self.prelude_source == other.prelude_source
            && self.nodes.iter().zip(&other.nodes).all(|(a, b)| same_node(a, b))
    }

    /// Canonical index range of the heading section containing `index`.
    /// Items before the first heading form their own section.
    pub fn section_range(&self, index: usize) -> Range<usize> {
        let Some(item) = self.item(index) else {
            return 0..0;
        };
        let section = item.section_path.last().copied();
        let same = |i: usize| self.item(i).map(|it| it.section_path.last().copied()) == Some(section);
        let mut start = index;
        while start > 0 && same(start - 1) {
            start -= 1;
        }
        let mut end = index + 1;
        while end < self.len() && same(end) {
            end += 1;
        }
        start..end
    }

    /// All section ranges, in document order
    pub fn section_ranges(&self) -> Vec<Range<usize>> {
        let mut ranges = Vec::new();
        let mut start = 0;
        while start < self.len() {
            let range = self.section_range(start);
            start = range.end;
            ranges.push(range);
        }
        ranges
    }

    /// Number of items that appear before the heading with this ordinal
    pub fn items_before_heading(&self, ordinal: usize) -> usize {
        match self.heading_slots.get(ordinal) {
            Some(&slot) => self.slots.iter().take_while(|&&s| s < slot).count(),
            None => self.len(),
        }
    }

    /// Recompute item slots, canonical indices and section paths
    pub fn reindex(&mut self) {
        self.slots.clear();
        self.heading_slots.clear();
        // (level, ordinal) of the currently open headings
        let mut open: Vec<(u8, usize)> = Vec::new();
        for pos in 0..self.nodes.len() {
            let stale = match self.nodes[pos].as_ref() {
                Node::Heading(h) => {
                    let level = h.level;
                    while open.last().is_some_and(|&(open_level, _)| open_level >= level) {
                        open.pop();
                    }
                    open.push((level, self.heading_slots.len()));
                    self.heading_slots.push(pos);
                    continue;
                }
                Node::ChecklistItem(item) => {
                    item.index != self.slots.len()
                        || !item.section_path.iter().eq(open.iter().map(|(_, o)| o))
                }
                _ => continue,
            };
            if stale {
                let index = self.slots.len();
                if let Node::ChecklistItem(item) = Arc::make_mut(&mut self.nodes[pos]) {
                    item.index = index;
                    item.section_path = open.iter().map(|&(_, ordinal)| ordinal).collect();
                }
            }
            self.slots.push(pos);
        }
    }
}

fn same_node(a: &Arc<Node>, b: &Arc<Node>) -> bool {
    if Arc::ptr_eq(a, b) {
        return true;
    }
    match (a.as_ref(), b.as_ref()) {
        // Item equality ignores how the line is written
        (Node::ChecklistItem(x), Node::ChecklistItem(y)) => {
            x == y && x.indent == y.indent && x.marker == y.marker && x.dirty == y.dirty
        }
        (x, y) => x == y,
    }
}

fn is_permutation(order: &[usize]) -> bool {
    let mut seen = vec![false; order.len()];
    for &i in order {
        match seen.get_mut(i) {
            Some(s) if !*s => *s = true,
            _ => return false,
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_inlines;

    fn item(text: &str) -> Node {
        Node::ChecklistItem(ChecklistItem::new(parse_inlines(text), false))
    }

    fn heading(level: u8, text: &str) -> Node {
        Node::Heading(Heading {
            level,
            text: parse_inlines(text),
            source_text: None,
        })
    }

    fn texts(doc: &Document) -> Vec<String> {
        doc.items().map(|i| i.markdown()).collect()
    }

    #[test]
    fn reindex_assigns_indices_and_sections() {
        let doc = Document::from_nodes(vec![
            item("loose"),
            heading(1, "Top"),
            item("a"),
            heading(2, "Sub"),
            item("b"),
            heading(2, "Other"),
            item("c"),
        ]);
        let paths: Vec<Vec<usize>> = doc.items().map(|i| i.section_path.clone()).collect();
        assert_eq!(paths, vec![vec![], vec![0], vec![0, 1], vec![0, 2]]);
        let indices: Vec<usize> = doc.items().map(|i| i.index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
    }

    #[test]
    fn permute_keeps_other_nodes_in_place() {
        let mut doc = Document::from_nodes(vec![
            item("a"),
            Node::Literal(vec![String::new()]),
            item("b"),
            item("c"),
        ]);
        doc.permute(&[2, 0, 1]);
        assert_eq!(texts(&doc), vec!["c", "a", "b"]);
        assert!(matches!(doc.nodes().nth(1), Some(Node::Literal(_))));
    }

    #[test]
    fn permute_ignores_invalid_order() {
        let mut doc = Document::from_nodes(vec![item("a"), item("b")]);
        doc.permute(&[0, 0]);
        assert_eq!(texts(&doc), vec!["a", "b"]);
    }

    #[test]
    fn section_ranges_split_on_headings() {
        let doc = Document::from_nodes(vec![
            item("a"),
            heading(1, "One"),
            item("b"),
            item("c"),
            heading(1, "Two"),
            item("d"),
        ]);
        assert_eq!(doc.section_ranges(), vec![0..1, 1..3, 3..4]);
        assert_eq!(doc.section_range(2), 1..3);
        assert_eq!(doc.items_before_heading(1), 3);
    }

    #[test]
    fn same_content_compares_written_form() {
        let mut doc = Document::from_nodes(vec![item("a"), item("b")]);
        let before = doc.clone();
        doc.permute(&[0, 1]);
        assert!(doc.same_content(&before));

        // A copied but unchanged node still matches
        let _ = doc.item_mut(0);
        assert!(doc.same_content(&before));

        doc.permute(&[1, 0]);
        assert!(!doc.same_content(&before));
    }

    #[test]
    fn clone_shares_untouched_nodes() {
        let mut doc = Document::from_nodes(vec![item("a"), item("b")]);
        let snapshot = doc.clone();
        if let Some(it) = doc.item_mut(0) {
            it.checked = true;
        }
        assert!(!snapshot.item(0).unwrap().checked);
        assert!(doc.item(0).unwrap().checked);
        assert!(Arc::ptr_eq(&snapshot.nodes[1], &doc.nodes[1]));
    }
}
