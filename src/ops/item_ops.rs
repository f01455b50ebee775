use std::ops::Range;

use chrono::NaiveDate;

use crate::model::config::{ParseOptions, ScopeMode};
use crate::model::document::{Document, Node};
use crate::model::item::ChecklistItem;
use crate::parse::document_parser::indent_width;
use crate::parse::parse_inlines;

/// Error type for item operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ItemError {
    #[error("invalid index {index}: document has {len} item(s)")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("cannot indent: no item above to nest under")]
    CannotIndent,
    #[error("cannot outdent: item is already at the top level")]
    CannotOutdent,
}

fn check_index(doc: &Document, index: usize) -> Result<(), ItemError> {
    if index < doc.len() {
        Ok(())
    } else {
        Err(ItemError::IndexOutOfRange {
            index,
            len: doc.len(),
        })
    }
}

// ---------------------------------------------------------------------------
// Structure helpers
// ---------------------------------------------------------------------------

fn depth_of(doc: &Document, index: usize) -> usize {
    doc.item(index).map_or(0, |i| i.depth)
}

/// One past the last descendant of `index`
pub fn subtree_end(doc: &Document, index: usize) -> usize {
    let depth = depth_of(doc, index);
    let mut end = index + 1;
    while end < doc.len() && depth_of(doc, end) > depth {
        end += 1;
    }
    end
}

/// The nearest earlier item one level shallower, if any
pub fn parent_of(doc: &Document, index: usize) -> Option<usize> {
    let depth = depth_of(doc, index);
    (0..index).rev().find(|&k| depth_of(doc, k) < depth)
}

/// Canonical ranges that bound navigation, moves and sorts
pub fn scope_ranges(doc: &Document, mode: ScopeMode) -> Vec<Range<usize>> {
    match mode {
        ScopeMode::Document if doc.is_empty() => Vec::new(),
        ScopeMode::Document => vec![0..doc.len()],
        ScopeMode::Section => doc.section_ranges(),
    }
}

/// The scope range containing `index`
pub fn scope_of(doc: &Document, index: usize, mode: ScopeMode) -> Range<usize> {
    match mode {
        ScopeMode::Document => 0..doc.len(),
        ScopeMode::Section => doc.section_range(index),
    }
}

/// Whether only blank lines separate the nodes of two items
fn items_adjacent(doc: &Document, earlier: usize, later: usize) -> bool {
    let (Some(a), Some(b)) = (doc.node_position(earlier), doc.node_position(later)) else {
        return false;
    };
    doc.nodes().skip(a + 1).take(b.saturating_sub(a + 1)).all(|node| match node {
        Node::Literal(lines) => lines.iter().all(|l| l.trim().is_empty()),
        Node::ChecklistItem(_) => true,
        _ => false,
    })
}

/// Leading whitespace that places an item at `depth` when it follows
/// the item at `index - 1`
fn indent_for(doc: &Document, index: usize, depth: usize, options: &ParseOptions) -> String {
    if depth == 0 {
        return String::new();
    }
    for k in (0..index).rev() {
        let Some(prev) = doc.item(k) else { break };
        if prev.depth == depth {
            return prev.indent.clone();
        }
        if prev.depth + 1 == depth {
            return format!("{}{}", prev.indent, " ".repeat(options.indent_unit));
        }
        if prev.depth + 1 < depth {
            break;
        }
    }
    " ".repeat(depth * options.indent_unit)
}

/// Shift the item's continuation lines by the change in indent width
fn reindent_body(item: &mut ChecklistItem, old_width: usize, new_width: usize) {
    for line in &mut item.body {
        if new_width > old_width {
            line.insert_str(0, &" ".repeat(new_width - old_width));
        } else {
            let strip = (old_width - new_width).min(line.len() - line.trim_start_matches(' ').len());
            line.replace_range(..strip, "");
        }
    }
}

fn next_marker(marker: &str) -> String {
    let digits: String = marker.chars().take_while(|c| c.is_ascii_digit()).collect();
    match digits.parse::<u64>() {
        Ok(n) => format!("{}{}", n + 1, &marker[digits.len()..]),
        Err(_) => marker.to_string(),
    }
}

fn new_item_like(text: &str, template: Option<&ChecklistItem>) -> ChecklistItem {
    let mut item = ChecklistItem::new(parse_inlines(text), false);
    if let Some(t) = template {
        item.depth = t.depth;
        item.indent = t.indent.clone();
        item.marker = next_marker(&t.marker);
    }
    item
}

// ---------------------------------------------------------------------------
// Add / insert
// ---------------------------------------------------------------------------

/// Append an item after the last checklist item in the document, or start
/// a new list at the end when there is none. Returns the new index.
pub fn add_item(doc: &mut Document, text: &str) -> usize {
    doc.trailing_newline = true;
    if doc.is_empty() {
        let needs_gap = doc.nodes().last().is_some_and(|node| match node {
            Node::Literal(lines) => lines.last().is_some_and(|l| !l.trim().is_empty()),
            _ => true,
        });
        if needs_gap {
            doc.push_node(Node::Literal(vec![String::new()]));
        }
        doc.push_node(Node::ChecklistItem(new_item_like(text, None)));
        return 0;
    }

    let last = doc.len() - 1;
    // Siblings of the outermost item in the last run
    let root = (0..=last)
        .rev()
        .find(|&k| depth_of(doc, k) == 0)
        .unwrap_or(last);
    let item = new_item_like(text, doc.item(root));
    let position = doc.node_position(last).map_or(doc.node_count(), |p| p + 1);
    doc.insert_node(position, Node::ChecklistItem(item));
    last + 1
}

/// Insert an item as the next sibling of `after` (following its subtree),
/// or before the first item when `after` is `None`. Returns the new index.
pub fn insert_item(doc: &mut Document, after: Option<usize>, text: &str) -> Result<usize, ItemError> {
    match after {
        None if doc.is_empty() => Ok(add_item(doc, text)),
        None => {
            let item = new_item_like(text, doc.item(0));
            let position = doc.node_position(0).unwrap_or(0);
            doc.insert_node(position, Node::ChecklistItem(item));
            Ok(0)
        }
        Some(index) => {
            check_index(doc, index)?;
            let end = subtree_end(doc, index);
            let item = new_item_like(text, doc.item(index));
            let position = doc.node_position(end - 1).map_or(doc.node_count(), |p| p + 1);
            doc.insert_node(position, Node::ChecklistItem(item));
            Ok(end)
        }
    }
}

// ---------------------------------------------------------------------------
// Toggle / edit / delete
// ---------------------------------------------------------------------------

/// Flip the checkbox. Returns the new state.
pub fn toggle_item(doc: &mut Document, index: usize) -> Result<bool, ItemError> {
    check_index(doc, index)?;
    let checked = doc.item(index).is_some_and(|i| !i.checked);
    set_checked(doc, index, checked)?;
    Ok(checked)
}

pub fn set_checked(doc: &mut Document, index: usize, checked: bool) -> Result<(), ItemError> {
    check_index(doc, index)?;
    if let Some(item) = doc.item_mut(index) {
        if item.checked != checked {
            item.checked = checked;
            item.mark_dirty();
        }
    }
    Ok(())
}

/// Replace the item text (markdown source)
pub fn edit_item(doc: &mut Document, index: usize, text: &str) -> Result<(), ItemError> {
    check_index(doc, index)?;
    if let Some(item) = doc.item_mut(index) {
        if item.markdown() != text {
            item.set_text(parse_inlines(text));
            item.mark_dirty();
        }
    }
    Ok(())
}

/// Remove exactly one item. Its descendants stay, re-nested under whatever
/// now precedes them.
pub fn delete_item(doc: &mut Document, index: usize, options: &ParseOptions) -> Result<ChecklistItem, ItemError> {
    check_index(doc, index)?;
    let removed = doc.remove_item(index).ok_or(ItemError::IndexOutOfRange {
        index,
        len: doc.len(),
    })?;
    settle_depths(doc, options);
    Ok(removed)
}

// ---------------------------------------------------------------------------
// Indent / outdent
// ---------------------------------------------------------------------------

/// Nest an item under the item above it. Only this item's depth changes.
pub fn indent_item(doc: &mut Document, index: usize, options: &ParseOptions) -> Result<(), ItemError> {
    check_index(doc, index)?;
    if index == 0 || !items_adjacent(doc, index - 1, index) {
        return Err(ItemError::CannotIndent);
    }
    let depth = depth_of(doc, index);
    if depth_of(doc, index - 1) < depth {
        return Err(ItemError::CannotIndent);
    }
    set_depth(doc, index, depth + 1, options);
    Ok(())
}

/// Move an item one level out. Only this item's depth changes.
pub fn outdent_item(doc: &mut Document, index: usize, options: &ParseOptions) -> Result<(), ItemError> {
    check_index(doc, index)?;
    let depth = depth_of(doc, index);
    if depth == 0 {
        return Err(ItemError::CannotOutdent);
    }
    set_depth(doc, index, depth - 1, options);
    Ok(())
}

fn set_depth(doc: &mut Document, index: usize, depth: usize, options: &ParseOptions) {
    let indent = indent_for(doc, index, depth, options);
    if let Some(item) = doc.item_mut(index) {
        let old_width = indent_width(&item.indent);
        let new_width = indent_width(&indent);
        reindent_body(item, old_width, new_width);
        item.depth = depth;
        item.indent = indent;
        item.mark_dirty();
    }
}

/// Depth an item indented `width` columns gets below the open items whose
/// indent widths are `open` (ascending)
fn open_depth(open: &[usize], width: usize) -> usize {
    open.iter().take_while(|&&w| w < width).count()
}

/// Bring depths and indentation back in line after items were moved or
/// removed. An item ends up at most one level below the item above it, and
/// its written indent parses back to its depth. Items that already agree
/// are left untouched.
fn settle_depths(doc: &mut Document, options: &ParseOptions) {
    let mut open: Vec<usize> = Vec::new();
    for index in 0..doc.len() {
        if index > 0 && !items_adjacent(doc, index - 1, index) {
            open.clear();
        }
        let Some(item) = doc.item(index) else { continue };
        let (depth, mut width) = (item.depth, indent_width(&item.indent));
        if open_depth(&open, width) != depth {
            set_depth(doc, index, depth.min(open.len()), options);
            width = doc.item(index).map_or(0, |i| indent_width(&i.indent));
            let parsed = open_depth(&open, width);
            if let Some(item) = doc.item_mut(index)
                && item.depth != parsed
            {
                item.depth = parsed;
            }
        }
        open.truncate(open_depth(&open, width));
        open.push(width);
    }
}

// ---------------------------------------------------------------------------
// Reorder
// ---------------------------------------------------------------------------

/// Move the item at `from` to canonical position `to` (remove + insert).
/// Items in between shift by one; no other node moves. Depths are then
/// settled, so a child left without its parent moves out a level.
pub fn move_item(doc: &mut Document, from: usize, to: usize, options: &ParseOptions) -> Result<(), ItemError> {
    check_index(doc, from)?;
    check_index(doc, to)?;
    if from == to {
        return Ok(());
    }
    let mut order: Vec<usize> = (0..doc.len()).collect();
    let moved = order.remove(from);
    order.insert(to, moved);
    doc.permute(&order);
    settle_depths(doc, options);
    Ok(())
}

/// Sort orders for the `sort-*` commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Open items first
    Done,
    /// `!p1` first, unprioritized last
    Priority,
    /// Earliest due first, undated last
    Due,
}

/// Stable sort of the top-level groups (an item plus its descendants)
/// within each scope range. Returns the applied order: the item now at
/// position `k` was at `order[k]`.
pub fn sort_items(doc: &mut Document, key: SortKey, scope: ScopeMode, options: &ParseOptions) -> Vec<usize> {
    let mut order: Vec<usize> = Vec::with_capacity(doc.len());
    for range in scope_ranges(doc, scope) {
        let mut groups: Vec<Vec<usize>> = Vec::new();
        let mut root_depth = 0;
        for index in range {
            let depth = depth_of(doc, index);
            match groups.last_mut() {
                Some(group) if depth > root_depth => group.push(index),
                _ => {
                    root_depth = depth;
                    groups.push(vec![index]);
                }
            }
        }
        groups.sort_by_key(|group| sort_rank(doc.item(group[0]), key));
        order.extend(groups.into_iter().flatten());
    }
    doc.permute(&order);
    settle_depths(doc, options);
    order
}

fn sort_rank(item: Option<&ChecklistItem>, key: SortKey) -> (bool, u32, Option<NaiveDate>) {
    let Some(item) = item else {
        return (true, 0, None);
    };
    match key {
        SortKey::Done => (item.checked, 0, None),
        SortKey::Priority => (item.priority.is_none(), item.priority.unwrap_or(0), None),
        SortKey::Due => (item.due.is_none(), 0, item.due),
    }
}

// ---------------------------------------------------------------------------
// Bulk commands
// ---------------------------------------------------------------------------

/// Check or uncheck every item. Returns how many changed.
pub fn set_all_checked(doc: &mut Document, checked: bool) -> usize {
    let targets: Vec<usize> = doc
        .items()
        .filter(|i| i.checked != checked)
        .map(|i| i.index)
        .collect();
    for &index in &targets {
        if let Some(item) = doc.item_mut(index) {
            item.checked = checked;
            item.mark_dirty();
        }
    }
    targets.len()
}

/// Delete every checked item. Returns how many were removed.
pub fn clear_done(doc: &mut Document, options: &ParseOptions) -> usize {
    let done: Vec<usize> = doc.items().filter(|i| i.checked).map(|i| i.index).collect();
    for &index in done.iter().rev() {
        doc.remove_item(index);
    }
    settle_depths(doc, options);
    done.len()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::{parse_document, serialize_document};
    use pretty_assertions::assert_eq;

    fn opts() -> ParseOptions {
        ParseOptions::default()
    }

    fn doc(source: &str) -> Document {
        parse_document(source, &opts()).0
    }

    fn text(doc: &Document) -> String {
        serialize_document(doc, &opts())
    }

    fn names(doc: &Document) -> Vec<String> {
        doc.items().map(|i| i.markdown()).collect()
    }

    fn depths(doc: &Document) -> Vec<usize> {
        doc.items().map(|i| i.depth).collect()
    }

    /// The depths held in memory are the ones the written text parses to
    fn assert_depths_match_file(d: &Document) {
        assert_eq!(depths(d), depths(&doc(&text(d))));
    }

    #[test]
    fn add_appends_after_last_item() {
        let mut d = doc("# Todos\n\n- [ ] A\n  - [ ] A1\n\nFooter paragraph\n");
        let index = add_item(&mut d, "B");
        assert_eq!(index, 2);
        assert_eq!(text(&d), "# Todos\n\n- [ ] A\n  - [ ] A1\n- [ ] B\n\nFooter paragraph\n");
    }

    #[test]
    fn add_to_document_without_items() {
        let mut d = doc("# Notes\nSome text");
        add_item(&mut d, "first");
        assert_eq!(text(&d), "# Notes\nSome text\n\n- [ ] first\n");

        let mut d = doc("");
        add_item(&mut d, "only");
        assert_eq!(text(&d), "- [ ] only\n");

        let mut d = Document::template();
        add_item(&mut d, "new");
        assert_eq!(text(&d), "# Todos\n\n- [ ] new\n");
    }

    #[test]
    fn add_continues_ordered_markers() {
        let mut d = doc("1. [ ] one\n2. [ ] two\n");
        add_item(&mut d, "three");
        assert_eq!(text(&d), "1. [ ] one\n2. [ ] two\n3. [ ] three\n");
    }

    #[test]
    fn add_increases_count_by_one() {
        let mut d = doc("- [ ] a\n- [x] b\n");
        let before = d.len();
        add_item(&mut d, "c");
        assert_eq!(d.len(), before + 1);
    }

    #[test]
    fn insert_after_skips_subtree() {
        let mut d = doc("- [ ] a\n  - [ ] a1\n- [ ] b\n");
        let index = insert_item(&mut d, Some(0), "new").unwrap();
        assert_eq!(index, 2);
        assert_eq!(names(&d), vec!["a", "a1", "new", "b"]);

        let index = insert_item(&mut d, Some(1), "child").unwrap();
        assert_eq!(index, 2);
        assert_eq!(text(&d), "- [ ] a\n  - [ ] a1\n  - [ ] child\n- [ ] new\n- [ ] b\n");
    }

    #[test]
    fn insert_at_top() {
        let mut d = doc("# T\n\n- [ ] a\n");
        assert_eq!(insert_item(&mut d, None, "zero").unwrap(), 0);
        assert_eq!(text(&d), "# T\n\n- [ ] zero\n- [ ] a\n");
        assert_eq!(
            insert_item(&mut d, Some(9), "x"),
            Err(ItemError::IndexOutOfRange { index: 9, len: 2 })
        );
    }

    #[test]
    fn toggle_and_edit_keep_order() {
        let mut d = doc("- [ ] a\n- [ ] b\n- [ ] c\n");
        assert!(toggle_item(&mut d, 1).unwrap());
        edit_item(&mut d, 2, "c **edited** #tag").unwrap();
        assert_eq!(names(&d), vec!["a", "b", "c **edited** #tag"]);
        assert_eq!(d.item(2).unwrap().tags, vec!["tag"]);
        assert_eq!(text(&d), "- [ ] a\n- [x] b\n- [ ] c **edited** #tag\n");
        assert!(!toggle_item(&mut d, 1).unwrap());
        assert_eq!(text(&d), "- [ ] a\n- [ ] b\n- [ ] c **edited** #tag\n");
    }

    #[test]
    fn out_of_range_rejected_without_mutation() {
        let mut d = doc("- [ ] a\n");
        let before = text(&d);
        assert!(toggle_item(&mut d, 1).is_err());
        assert!(edit_item(&mut d, 5, "x").is_err());
        assert!(delete_item(&mut d, 1, &opts()).is_err());
        assert!(move_item(&mut d, 0, 3, &opts()).is_err());
        assert_eq!(text(&d), before);
    }

    #[test]
    fn delete_removes_exactly_one() {
        let mut d = doc("# H\n\n- [ ] a\n- [ ] b\n  note for b\n- [ ] c\n\ntrailer\n");
        let removed = delete_item(&mut d, 1, &opts()).unwrap();
        assert_eq!(removed.markdown(), "b");
        assert_eq!(names(&d), vec!["a", "c"]);
        assert_eq!(text(&d), "# H\n\n- [ ] a\n- [ ] c\n\ntrailer\n");
    }

    #[test]
    fn delete_first_parent_outdents_child() {
        let mut d = doc("- [ ] a\n  - [ ] a1\n    note\n- [ ] b\n");
        delete_item(&mut d, 0, &opts()).unwrap();
        assert_eq!(text(&d), "- [ ] a1\n  note\n- [ ] b\n");
        assert_eq!(depths(&d), vec![0, 0]);
        assert_depths_match_file(&d);
    }

    #[test]
    fn delete_middle_level_renests_grandchild() {
        let mut d = doc("- [ ] a\n  - [ ] b\n    - [ ] c\n- [ ] d\n");
        delete_item(&mut d, 1, &opts()).unwrap();
        assert_eq!(text(&d), "- [ ] a\n  - [ ] c\n- [ ] d\n");
        assert_eq!(depths(&d), vec![0, 1, 0]);
        assert_depths_match_file(&d);
    }

    #[test]
    fn delete_keeps_children_that_still_have_a_parent() {
        let mut d = doc("- [ ] a\n  - [ ] a1\n  - [ ] a2\n");
        delete_item(&mut d, 1, &opts()).unwrap();
        assert_eq!(text(&d), "- [ ] a\n  - [ ] a2\n");
        assert!(!d.item(1).unwrap().dirty);
        assert_depths_match_file(&d);
    }

    #[test]
    fn indent_and_outdent_are_local() {
        let mut d = doc("- [ ] a\n- [ ] b\n  - [ ] b1\n- [ ] c\n");
        indent_item(&mut d, 1, &opts()).unwrap();
        let depths: Vec<usize> = d.items().map(|i| i.depth).collect();
        assert_eq!(depths, vec![0, 1, 1, 0]);
        assert_eq!(text(&d), "- [ ] a\n  - [ ] b\n  - [ ] b1\n- [ ] c\n");

        outdent_item(&mut d, 1, &opts()).unwrap();
        assert_eq!(text(&d), "- [ ] a\n- [ ] b\n  - [ ] b1\n- [ ] c\n");
        assert_eq!(outdent_item(&mut d, 0, &opts()), Err(ItemError::CannotOutdent));
        assert_eq!(indent_item(&mut d, 0, &opts()), Err(ItemError::CannotIndent));
    }

    #[test]
    fn indent_copies_sibling_indentation_and_shifts_body() {
        let mut d = doc("- [ ] a\n    - [ ] deep\n- [ ] b\n  body\n");
        indent_item(&mut d, 2, &opts()).unwrap();
        assert_eq!(text(&d), "- [ ] a\n    - [ ] deep\n    - [ ] b\n      body\n");
        // Re-parsing agrees with the model
        let again = doc(&text(&d));
        let depths: Vec<usize> = again.items().map(|i| i.depth).collect();
        assert_eq!(depths, vec![0, 1, 1]);
    }

    #[test]
    fn indent_refused_across_a_heading() {
        let mut d = doc("- [ ] a\n\n## Next\n\n- [ ] b\n");
        assert_eq!(indent_item(&mut d, 1, &opts()), Err(ItemError::CannotIndent));
    }

    #[test]
    fn move_is_remove_then_insert() {
        let mut d = doc("- [ ] 1\n- [x] 2\n- [ ] 3\n- [x] 4\n- [ ] 5\n");
        move_item(&mut d, 2, 4, &opts()).unwrap();
        assert_eq!(names(&d), vec!["1", "2", "4", "5", "3"]);
        move_item(&mut d, 4, 0, &opts()).unwrap();
        assert_eq!(names(&d), vec!["3", "1", "2", "4", "5"]);
    }

    #[test]
    fn move_parent_down_outdents_stranded_child() {
        let mut d = doc("- [ ] a\n  - [ ] a1\n- [ ] b\n");
        move_item(&mut d, 0, 1, &opts()).unwrap();
        assert_eq!(text(&d), "- [ ] a1\n- [ ] a\n- [ ] b\n");
        assert_eq!(depths(&d), vec![0, 0, 0]);
        assert_depths_match_file(&d);
    }

    #[test]
    fn move_child_below_another_item_keeps_it_nested() {
        let mut d = doc("- [ ] a\n  - [ ] a1\n  - [ ] a2\n- [ ] b\n");
        move_item(&mut d, 1, 2, &opts()).unwrap();
        assert_eq!(text(&d), "- [ ] a\n  - [ ] a2\n  - [ ] a1\n- [ ] b\n");
        assert_depths_match_file(&d);
    }

    #[test]
    fn move_crosses_headings_without_moving_them() {
        let mut d = doc("# A\n- [ ] a1\n# B\n- [ ] b1\n");
        move_item(&mut d, 0, 1, &opts()).unwrap();
        assert_eq!(text(&d), "# A\n- [ ] b1\n# B\n- [ ] a1\n");
        assert_eq!(d.item(1).unwrap().section_path, vec![1]);
    }

    #[test]
    fn sort_priority_is_stable_and_unprioritized_last() {
        let mut d = doc("- [ ] none1\n- [ ] low !p3\n- [ ] high !p1\n- [ ] none2\n- [ ] also high !p1\n");
        sort_items(&mut d, SortKey::Priority, ScopeMode::Document, &opts());
        assert_eq!(
            names(&d),
            vec!["high !p1", "also high !p1", "low !p3", "none1", "none2"]
        );
    }

    #[test]
    fn sort_moves_subtrees_together() {
        let mut d = doc("- [x] done\n  - [ ] child of done\n- [ ] open\n");
        let order = sort_items(&mut d, SortKey::Done, ScopeMode::Document, &opts());
        assert_eq!(order, vec![2, 0, 1]);
        assert_eq!(text(&d), "- [ ] open\n- [x] done\n  - [ ] child of done\n");
        assert_depths_match_file(&d);
    }

    #[test]
    fn sort_by_section_keeps_items_under_their_heading() {
        let mut d = doc("# One\n- [x] a\n- [ ] b\n# Two\n- [x] c\n- [ ] d\n");
        sort_items(&mut d, SortKey::Done, ScopeMode::Section, &opts());
        assert_eq!(text(&d), "# One\n- [ ] b\n- [x] a\n# Two\n- [ ] d\n- [x] c\n");

        let mut d = doc("# One\n- [x] a\n- [ ] b\n# Two\n- [x] c\n- [ ] d\n");
        sort_items(&mut d, SortKey::Done, ScopeMode::Document, &opts());
        assert_eq!(names(&d), vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn sort_due_puts_undated_last() {
        let mut d = doc("- [ ] none\n- [ ] late @due(2025-05-01)\n- [ ] early @due(2025-01-01)\n");
        sort_items(&mut d, SortKey::Due, ScopeMode::Document, &opts());
        assert_eq!(
            names(&d),
            vec!["early @due(2025-01-01)", "late @due(2025-05-01)", "none"]
        );
    }

    #[test]
    fn bulk_check_and_clear() {
        let mut d = doc("- [ ] a\n- [x] b\n- [ ] c\n");
        assert_eq!(set_all_checked(&mut d, true), 2);
        assert_eq!(set_all_checked(&mut d, false), 3);
        toggle_item(&mut d, 0).unwrap();
        toggle_item(&mut d, 2).unwrap();
        assert_eq!(clear_done(&mut d, &opts()), 2);
        assert_eq!(names(&d), vec!["b"]);
    }

    #[test]
    fn clear_done_outdents_open_children() {
        let mut d = doc("- [x] a\n  - [ ] a1\n- [ ] b\n");
        assert_eq!(clear_done(&mut d, &opts()), 1);
        assert_eq!(text(&d), "- [ ] a1\n- [ ] b\n");
        assert_depths_match_file(&d);
    }

    #[test]
    fn untouched_content_survives_mutations() {
        let source = "Intro\n\n```\n- [ ] code\n```\n\n- [ ] a\n- [ ] b\n\n> quote\n";
        let mut d = doc(source);
        toggle_item(&mut d, 0).unwrap();
        move_item(&mut d, 0, 1, &opts()).unwrap();
        add_item(&mut d, "c");
        delete_item(&mut d, 0, &opts()).unwrap();
        assert_eq!(
            text(&d),
            "Intro\n\n```\n- [ ] code\n```\n\n- [x] a\n- [ ] c\n\n> quote\n"
        );
    }
}
