use std::ops::Range;

use crate::model::config::{ParseOptions, ScopeMode};
use crate::model::document::Document;
use crate::ops::item_ops::{self, ItemError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

fn is_visible(visible: &[usize], index: usize) -> bool {
    visible.binary_search(&index).is_ok()
}

// ---------------------------------------------------------------------------
// Stepping
// ---------------------------------------------------------------------------

/// The next (or previous) visible index inside `scope`, or `cursor` when
/// there is none. `visible` must be ascending.
pub fn step(visible: &[usize], cursor: usize, direction: Direction, scope: &Range<usize>) -> usize {
    let found = match direction {
        Direction::Down => visible.iter().find(|&&i| i > cursor && scope.contains(&i)),
        Direction::Up => visible.iter().rev().find(|&&i| i < cursor && scope.contains(&i)),
    };
    found.copied().unwrap_or(cursor)
}

pub fn first_visible(visible: &[usize], scope: &Range<usize>) -> Option<usize> {
    visible.iter().copied().find(|i| scope.contains(i))
}

pub fn last_visible(visible: &[usize], scope: &Range<usize>) -> Option<usize> {
    visible.iter().rev().copied().find(|i| scope.contains(i))
}

/// Keep a cursor on a visible item: itself if visible, else the nearest
/// visible item after it, else the nearest before it.
pub fn clamp_cursor(visible: &[usize], cursor: usize) -> Option<usize> {
    visible
        .iter()
        .copied()
        .find(|&i| i >= cursor)
        .or_else(|| visible.last().copied())
}

// ---------------------------------------------------------------------------
// Reanchoring
// ---------------------------------------------------------------------------

/// Where the cursor was when its item disappeared from view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    /// Canonical index the item had (after a delete, the index the next
    /// item now occupies)
    pub index: usize,
    pub depth: usize,
    /// Whether the item was removed from the document rather than hidden
    pub removed: bool,
}

/// Pick the cursor position after the focused item was deleted or filtered
/// out. Preference order: next visible sibling, previous visible sibling,
/// visible parent, then the nearest visible item in either direction.
/// Candidates outside `scope` are ignored until the final fallback.
pub fn reanchor(doc: &Document, visible: &[usize], anchor: Anchor, scope: &Range<usize>) -> Option<usize> {
    let depth_of = |k: usize| doc.item(k).map_or(0, |i| i.depth);
    let after = if anchor.removed { anchor.index } else { anchor.index + 1 };
    let before = anchor.index.min(doc.len());
    let lower = scope.start.min(before);
    let upper = scope.end.min(doc.len());

    // Next sibling
    for k in after..upper {
        let d = depth_of(k);
        if d < anchor.depth {
            break;
        }
        if d == anchor.depth && is_visible(visible, k) {
            return Some(k);
        }
    }

    // Previous sibling
    for k in (lower..before).rev() {
        let d = depth_of(k);
        if d < anchor.depth {
            break;
        }
        if d == anchor.depth && is_visible(visible, k) {
            return Some(k);
        }
    }

    // Parent
    if let Some(parent) = (lower..before).rev().find(|&k| depth_of(k) < anchor.depth)
        && is_visible(visible, parent)
    {
        return Some(parent);
    }

    // Nearest, inside the scope first
    let in_scope = |i: &usize| scope.contains(i);
    visible
        .iter()
        .copied()
        .filter(in_scope)
        .find(|&i| i >= after)
        .or_else(|| visible.iter().rev().copied().filter(in_scope).find(|&i| i < before))
        .or_else(|| visible.iter().copied().find(|&i| i >= after))
        .or_else(|| visible.iter().rev().copied().find(|&i| i < before))
}

// ---------------------------------------------------------------------------
// Move sessions
// ---------------------------------------------------------------------------

/// An in-progress interactive move. Each step moves the held item one
/// canonical position; the live document is always the armed snapshot with
/// that single move applied, so depths only settle against the final slot.
/// Cancel restores the snapshot.
#[derive(Debug, Clone)]
pub struct MoveSession {
    /// Where the item started
    pub origin: usize,
    /// Where the item is now
    pub hold: usize,
    bounds: Range<usize>,
    snapshot: Document,
    options: ParseOptions,
}

impl MoveSession {
    pub fn arm(doc: &Document, index: usize, scope: ScopeMode, options: &ParseOptions) -> Result<Self, ItemError> {
        if index >= doc.len() {
            return Err(ItemError::IndexOutOfRange {
                index,
                len: doc.len(),
            });
        }
        Ok(MoveSession {
            origin: index,
            hold: index,
            bounds: item_ops::scope_of(doc, index, scope),
            snapshot: doc.clone(),
            options: *options,
        })
    }

    /// Move the held item one position. Returns false at the scope edge.
    pub fn step(&mut self, doc: &mut Document, direction: Direction) -> bool {
        let target = match direction {
            Direction::Up if self.hold > self.bounds.start => self.hold - 1,
            Direction::Down if self.hold + 1 < self.bounds.end => self.hold + 1,
            _ => return false,
        };
        let mut moved = self.snapshot.clone();
        if item_ops::move_item(&mut moved, self.origin, target, &self.options).is_err() {
            return false;
        }
        *doc = moved;
        self.hold = target;
        true
    }

    pub fn has_moved(&self) -> bool {
        self.hold != self.origin
    }

    /// Keep the live order. Returns the pre-move document (for undo) and
    /// the item's final index.
    pub fn commit(self) -> (Document, usize) {
        (self.snapshot, self.hold)
    }

    /// Discard the live order. Returns the restored document and the
    /// item's original index.
    pub fn cancel(self) -> (Document, usize) {
        (self.snapshot, self.origin)
    }
}
