use crate::model::document::Document;

/// Maximum number of entries in the undo stack
pub const UNDO_STACK_LIMIT: usize = 500;

/// The state restored by one undo step
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub document: Document,
    /// Canonical index of the cursor at the time of the snapshot
    pub cursor: Option<usize>,
}

/// Linear undo history for one editing session. There is no redo.
///
/// Snapshots are whole documents, but documents share unchanged nodes, so
/// an entry costs roughly one pointer per node plus the nodes the following
/// command replaced.
#[derive(Debug, Default)]
pub struct UndoStack {
    entries: Vec<Snapshot>,
}

impl UndoStack {
    pub fn new() -> Self {
        UndoStack::default()
    }

    /// Record the state before a mutating command. The oldest entry is
    /// dropped once the stack is full.
    pub fn push(&mut self, document: &Document, cursor: Option<usize>) {
        if self.entries.len() >= UNDO_STACK_LIMIT {
            self.entries.remove(0);
        }
        self.entries.push(Snapshot {
            document: document.clone(),
            cursor,
        });
    }

    pub fn pop(&mut self) -> Option<Snapshot> {
        self.entries.pop()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::ParseOptions;
    use crate::ops::item_ops;
    use crate::parse::{parse_document, serialize_document};

    fn doc(source: &str) -> Document {
        parse_document(source, &ParseOptions::default()).0
    }

    #[test]
    fn undo_restores_document_and_cursor() {
        let mut d = doc("# T\n\n- [ ] a\n- [ ] b\n");
        let mut stack = UndoStack::new();

        stack.push(&d, Some(1));
        item_ops::toggle_item(&mut d, 1).unwrap();
        stack.push(&d, Some(1));
        item_ops::delete_item(&mut d, 0, &ParseOptions::default()).unwrap();

        let snap = stack.pop().unwrap();
        assert_eq!(
            serialize_document(&snap.document, &ParseOptions::default()),
            "# T\n\n- [ ] a\n- [x] b\n"
        );
        let snap = stack.pop().unwrap();
        assert_eq!(snap.cursor, Some(1));
        assert_eq!(
            serialize_document(&snap.document, &ParseOptions::default()),
            "# T\n\n- [ ] a\n- [ ] b\n"
        );
        assert!(stack.pop().is_none());
    }

    #[test]
    fn stack_is_capped() {
        let d = doc("- [ ] a\n");
        let mut stack = UndoStack::new();
        for i in 0..UNDO_STACK_LIMIT + 10 {
            stack.push(&d, Some(i));
        }
        assert_eq!(stack.len(), UNDO_STACK_LIMIT);
        // The oldest entries were dropped
        let mut last = None;
        while let Some(s) = stack.pop() {
            last = s.cursor;
        }
        assert_eq!(last, Some(10));
    }

    #[test]
    fn clear_empties() {
        let mut stack = UndoStack::new();
        stack.push(&doc(""), None);
        stack.clear();
        assert!(stack.is_empty());
    }
}
