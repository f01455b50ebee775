/// A command that can appear in the palette
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteCommand {
    pub name: &'static str,
    pub description: &'static str,
}

/// Fuzzy match result for a palette command
#[derive(Debug, Clone)]
pub struct ScoredCommand {
    pub command: PaletteCommand,
    pub score: i32,
    /// Matched character indices within the name
    pub matched: Vec<usize>,
}

/// Every palette command, in display order
pub const COMMANDS: &[PaletteCommand] = &[
    PaletteCommand {
        name: "check-all",
        description: "Mark all items as complete",
    },
    PaletteCommand {
        name: "uncheck-all",
        description: "Mark all items as incomplete",
    },
    PaletteCommand {
        name: "sort-done",
        description: "Move completed items to the bottom",
    },
    PaletteCommand {
        name: "sort-priority",
        description: "Sort by priority (!p1 first, none last)",
    },
    PaletteCommand {
        name: "sort-due",
        description: "Sort by due date (undated last)",
    },
    PaletteCommand {
        name: "filter-done",
        description: "Show or hide completed items",
    },
    PaletteCommand {
        name: "filter-due",
        description: "Only items with a due date",
    },
    PaletteCommand {
        name: "filter-overdue",
        description: "Only overdue items",
    },
    PaletteCommand {
        name: "filter-today",
        description: "Only items due today",
    },
    PaletteCommand {
        name: "filter-week",
        description: "Only items due within a week",
    },
    PaletteCommand {
        name: "clear-done",
        description: "Delete all completed items",
    },
    PaletteCommand {
        name: "read-only",
        description: "Toggle read-only mode (changes disabled)",
    },
    PaletteCommand {
        name: "save",
        description: "Save current state to file",
    },
    PaletteCommand {
        name: "force-save",
        description: "Save even if the file changed on disk",
    },
    PaletteCommand {
        name: "reload",
        description: "Reload from disk (clears undo history)",
    },
    PaletteCommand {
        name: "wrap",
        description: "Toggle word wrap for long lines",
    },
    PaletteCommand {
        name: "line-numbers",
        description: "Toggle relative line numbers",
    },
    PaletteCommand {
        name: "show-headings",
        description: "Toggle headings between items",
    },
    PaletteCommand {
        name: "set-max-visible",
        description: "Set max visible items for this session",
    },
];

// ---------------------------------------------------------------------------
// Fuzzy matching
// ---------------------------------------------------------------------------

/// Fuzzy score a query against a target string.
/// Returns None if no match, or Some((score, matched_indices)).
pub fn fuzzy_score(query: &str, target: &str) -> Option<(i32, Vec<usize>)> {
    if query.is_empty() {
        return Some((0, vec![]));
    }

    let query_lower: Vec<char> = query.chars().flat_map(|c| c.to_lowercase()).collect();
    let target_chars: Vec<char> = target.chars().collect();
    let target_lower: Vec<char> = target.chars().flat_map(|c| c.to_lowercase()).collect();

    let mut matched = Vec::with_capacity(query_lower.len());
    let mut from = 0;
    for &qc in &query_lower {
        let pos = target_lower.get(from..)?.iter().position(|&tc| tc == qc)?;
        matched.push(from + pos);
        from += pos + 1;
    }

    let mut score: i32 = 0;
    for (mi, &idx) in matched.iter().enumerate() {
        // Start of the text, of a word, or of a hyphenated part
        if idx == 0 || matches!(target_chars.get(idx - 1), Some('-' | ' ')) {
            score += 10;
        }
        if mi > 0 {
            let prev = matched[mi - 1];
            if idx == prev + 1 {
                score += 5;
            }
            score -= (idx - prev - 1) as i32;
        }
    }
    Some((score, matched))
}

/// Filter and score commands by name. Best score first; ties keep the
/// registry order.
pub fn filter_commands(query: &str) -> Vec<ScoredCommand> {
    let mut results: Vec<ScoredCommand> = COMMANDS
        .iter()
        .filter_map(|c| {
            let (score, matched) = fuzzy_score(query, c.name)?;
            Some(ScoredCommand {
                command: *c,
                score,
                matched,
            })
        })
        .collect();
    results.sort_by(|a, b| b.score.cmp(&a.score));
    results
}

// ---------------------------------------------------------------------------
// Command palette state
// ---------------------------------------------------------------------------

/// State for the command palette overlay
#[derive(Debug, Clone)]
pub struct CommandPaletteState {
    /// Filter text typed by the user
    pub input: String,
    /// Currently selected index in the filtered results
    pub selected: usize,
    pub results: Vec<ScoredCommand>,
}

impl Default for CommandPaletteState {
    fn default() -> Self {
        CommandPaletteState {
            input: String::new(),
            selected: 0,
            results: filter_commands(""),
        }
    }
}

impl CommandPaletteState {
    pub fn new() -> Self {
        CommandPaletteState::default()
    }

    /// Update results based on current input
    pub fn update_filter(&mut self) {
        self.results = filter_commands(&self.input);
        if self.results.is_empty() {
            self.selected = 0;
        } else {
            self.selected = self.selected.min(self.results.len() - 1);
        }
    }

    pub fn selected_name(&self) -> Option<&'static str> {
        self.results.get(self.selected).map(|r| r.command.name)
    }

    /// Replace the input with the selected command's name
    pub fn complete(&mut self) {
        if let Some(name) = self.selected_name() {
            self.input = name.to_string();
            self.update_filter();
            if let Some(i) = self.results.iter().position(|r| r.command.name == name) {
                self.selected = i;
            }
        }
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
