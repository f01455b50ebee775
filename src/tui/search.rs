//! Fuzzy jump to an item (`/`)

use crate::model::document::Document;

use super::command_actions::fuzzy_score;

/// An item matching the search query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    /// Canonical index of the item
    pub index: usize,
    pub score: i32,
    /// Matched character indices within the item's markdown text
    pub matched: Vec<usize>,
}

/// Score the items at `candidates` against `query`. Best score first; ties
/// keep document order. An empty query lists every candidate.
pub fn search_items(doc: &Document, candidates: &[usize], query: &str) -> Vec<SearchHit> {
    let mut hits: Vec<SearchHit> = candidates
        .iter()
        .filter_map(|&index| {
            let text = doc.item(index)?.markdown();
            let (score, matched) = fuzzy_score(query, &text)?;
            Some(SearchHit {
                index,
                score,
                matched,
            })
        })
        .collect();
    hits.sort_by(|a, b| b.score.cmp(&a.score));
    hits
}

/// State for the search overlay
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    pub input: String,
    /// Position in `results`
    pub selected: usize,
    pub results: Vec<SearchHit>,
    /// The items visible when the search opened
    candidates: Vec<usize>,
}

impl SearchState {
    pub fn new(doc: &Document, visible: &[usize]) -> Self {
        let mut state = SearchState {
            candidates: visible.to_vec(),
            ..Default::default()
        };
        state.update(doc);
        state
    }

    /// Re-run the query after the input changed
    pub fn update(&mut self, doc: &Document) {
        self.results = search_items(doc, &self.candidates, &self.input);
        self.selected = 0;
    }

    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }

    /// Canonical index of the highlighted result
    pub fn selected_index(&self) -> Option<usize> {
        self.results.get(self.selected).map(|hit| hit.index)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.results.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::ParseOptions;
    use crate::parse::parse_document;
    use pretty_assertions::assert_eq;

    fn doc(source: &str) -> Document {
        parse_document(source, &ParseOptions::default()).0
    }

    fn indices(hits: &[SearchHit]) -> Vec<usize> {
        hits.iter().map(|h| h.index).collect()
    }

    #[test]
    fn empty_query_lists_candidates_in_order() {
        let d = doc("- [ ] a\n- [ ] b\n- [ ] c\n");
        assert_eq!(indices(&search_items(&d, &[0, 2], "")), vec![0, 2]);
    }

    #[test]
    fn word_starts_rank_first() {
        let d = doc("- [ ] rebuild the parser\n- [ ] buy milk\n- [ ] write report\n");
        let hits = search_items(&d, &[0, 1, 2], "bu");
        assert_eq!(indices(&hits), vec![1, 0]);
        assert_eq!(hits[0].matched, vec![0, 1]);
    }

    #[test]
    fn hidden_items_are_not_searched() {
        let d = doc("- [x] milk\n- [ ] bread\n");
        assert!(search_items(&d, &[1], "milk").is_empty());
    }

    #[test]
    fn selection_is_clamped_and_reset() {
        let d = doc("- [ ] one\n- [ ] two\n");
        let mut state = SearchState::new(&d, &[0, 1]);
        assert_eq!(state.candidate_count(), 2);
        state.select_next();
        state.select_next();
        assert_eq!(state.selected_index(), Some(1));
        state.input = "on".into();
        state.update(&d);
        assert_eq!(state.selected, 0);
        assert_eq!(state.selected_index(), Some(0));
        state.select_prev();
        assert_eq!(state.selected, 0);
    }
}
