use std::collections::BTreeSet;

use chrono::{Days, NaiveDate};

use crate::model::document::Document;
use crate::model::item::ChecklistItem;

/// Restrict the view to items by due date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueFilter {
    /// Any item carrying a due date
    HasDue,
    /// Due before today
    Overdue,
    Today,
    /// Due today or within the next seven days
    Week,
}

impl DueFilter {
    pub fn name(self) -> &'static str {
        match self {
            DueFilter::HasDue => "due",
            DueFilter::Overdue => "overdue",
            DueFilter::Today => "today",
            DueFilter::Week => "week",
        }
    }

    fn matches(self, due: Option<NaiveDate>, today: NaiveDate) -> bool {
        let Some(due) = due else {
            return false;
        };
        match self {
            DueFilter::HasDue => true,
            DueFilter::Overdue => due < today,
            DueFilter::Today => due == today,
            DueFilter::Week => {
                let horizon = today.checked_add_days(Days::new(7)).unwrap_or(NaiveDate::MAX);
                due >= today && due <= horizon
            }
        }
    }
}

/// Active view filters. Categories combine by AND; the members of one
/// category combine by OR. Empty sets do not filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filters {
    pub hide_done: bool,
    /// Case-folded tag names
    pub tags: BTreeSet<String>,
    pub priorities: BTreeSet<u32>,
    pub due: Option<DueFilter>,
    /// Reference date for due filters
    pub today: NaiveDate,
}

impl Filters {
    pub fn new(today: NaiveDate) -> Self {
        Filters {
            hide_done: false,
            tags: BTreeSet::new(),
            priorities: BTreeSet::new(),
            due: None,
            today,
        }
    }

    /// True when any filter would hide something
    pub fn is_active(&self) -> bool {
        self.hide_done || !self.tags.is_empty() || !self.priorities.is_empty() || self.due.is_some()
    }

    /// Add the tag if absent, remove it if present
    pub fn toggle_tag(&mut self, tag: &str) {
        let tag = tag.trim_start_matches('#').to_lowercase();
        if !self.tags.remove(&tag) {
            self.tags.insert(tag);
        }
    }

    pub fn toggle_priority(&mut self, priority: u32) {
        if !self.priorities.remove(&priority) {
            self.priorities.insert(priority);
        }
    }

    /// Select `due`, or clear it when it is already selected
    pub fn toggle_due(&mut self, due: DueFilter) {
        self.due = if self.due == Some(due) { None } else { Some(due) };
    }

    pub fn matches(&self, item: &ChecklistItem) -> bool {
        (!self.hide_done || !item.checked)
            && (self.tags.is_empty() || item.tags.iter().any(|t| self.tags.contains(t)))
            && (self.priorities.is_empty()
                || item.priority.is_some_and(|p| self.priorities.contains(&p)))
            && self.due.is_none_or(|due| due.matches(item.due, self.today))
    }
}

/// Canonical indices of the items passing `filters`, ascending
pub fn visible<'a>(items: impl IntoIterator<Item = &'a ChecklistItem>, filters: &Filters) -> Vec<usize> {
    items
        .into_iter()
        .enumerate()
        .filter(|(_, item)| filters.matches(item))
        .map(|(i, _)| i)
        .collect()
}

/// `visible` over a whole document
pub fn visible_in(doc: &Document, filters: &Filters) -> Vec<usize> {
    visible(doc.items(), filters)
}

/// All distinct tags in the document, first-seen order
pub fn available_tags(doc: &Document) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for item in doc.items() {
        for tag in &item.tags {
            if !tags.contains(tag) {
                tags.push(tag.clone());
            }
        }
    }
    tags
}

/// All distinct priorities in the document, ascending
pub fn available_priorities(doc: &Document) -> Vec<u32> {
    doc.items()
        .filter_map(|i| i.priority)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
