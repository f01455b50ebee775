use std::io;
use std::ops::Range;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::cli::commands::Cli;
use crate::io::config_io;
use crate::io::document_io::{DocumentError, DocumentFile, Loaded};
use crate::io::watcher::DocumentWatcher;
use crate::model::config::{Config, ParseOptions, ViewOverrides, ViewSettings};
use crate::model::document::Document;
use crate::model::item::ChecklistItem;
use crate::ops::filter::{self, Filters};
use crate::ops::item_ops::{self, ItemError};
use crate::ops::nav::{self, Anchor, MoveSession};

use super::command_actions::CommandPaletteState;
use super::search::SearchState;
use super::input;
use super::render;
use super::theme::Theme;
use super::undo::UndoStack;

// ---------------------------------------------------------------------------
// Modes
// ---------------------------------------------------------------------------

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// Typing the text of a new item
    Insert,
    /// Rewriting the text of the item under the cursor
    Edit,
    /// Holding an item; j/k reorder it
    Move,
    /// Command palette open
    Command,
    /// Fuzzy search over the visible items
    Search,
    /// Tag/priority/due filter menu open
    TagFilter,
    /// Typing a number for `set-max-visible`
    MaxVisibleInput,
    Help,
}

/// Inputs that change the mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    BeginInsert,
    BeginEdit,
    ArmMove,
    OpenPalette,
    OpenSearch,
    OpenFilter,
    OpenHelp,
    /// Chosen from the palette
    AskMaxVisible,
    Confirm,
    Cancel,
}

/// The mode transition table. `None` means the trigger is not accepted in
/// that mode.
pub fn transition(mode: Mode, trigger: Trigger) -> Option<Mode> {
    use Mode::*;
    use Trigger::*;
    match (mode, trigger) {
        (Navigate, BeginInsert) => Some(Insert),
        (Navigate, BeginEdit) => Some(Edit),
        (Navigate, ArmMove) => Some(Move),
        (Navigate, OpenPalette) => Some(Command),
        (Navigate, OpenSearch) => Some(Search),
        (Navigate, OpenFilter) => Some(TagFilter),
        (Navigate, OpenHelp) => Some(Help),
        (Command, AskMaxVisible) => Some(MaxVisibleInput),
        (Help, OpenHelp) => Some(Navigate),
        (Insert | Edit | Move | Command | Search | TagFilter | MaxVisibleInput | Help, Confirm | Cancel) => {
            Some(Navigate)
        }
        _ => None,
    }
}

/// What the line editor is editing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    /// A new item after this one (before the first item when `None`)
    NewAfter(Option<usize>),
    /// A new item at the end of the list
    Append,
    /// An existing item
    Item(usize),
    MaxVisible,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// One entry of the filter menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterEntry {
    Tag(String),
    Priority(u32),
    Due(filter::DueFilter),
}

/// Main application state
pub struct App {
    pub file: DocumentFile,
    pub doc: Document,
    pub options: ParseOptions,
    pub config: Config,
    pub settings: ViewSettings,
    pub filters: Filters,
    /// Canonical indices of the visible items, ascending
    pub visible: Vec<usize>,
    /// Canonical index of the focused item
    pub cursor: Option<usize>,
    /// First visible row of the list when there is no item cap
    pub scroll: usize,
    pub mode: Mode,
    pub undo: UndoStack,
    pub move_session: Option<MoveSession>,
    pub edit_buffer: String,
    /// Byte offset into `edit_buffer`
    pub edit_cursor: usize,
    pub edit_target: Option<EditTarget>,
    pub command_palette: Option<CommandPaletteState>,
    pub search: Option<SearchState>,
    pub filter_entries: Vec<FilterEntry>,
    pub filter_cursor: usize,
    pub status: Option<StatusMessage>,
    /// First `g` of `gg` seen
    pub pending_g: bool,
    /// Count typed before a motion (`5j`)
    pub count: Option<usize>,
    pub should_quit: bool,
    pub theme: Theme,
    pub watcher: Option<DocumentWatcher>,
}

impl App {
    pub fn new(
        mut file: DocumentFile,
        doc: Document,
        config: Config,
        overrides: &ViewOverrides,
        today: NaiveDate,
    ) -> Self {
        let options = ParseOptions::from(&config.format);
        let settings = ViewSettings::resolve(&config, &doc.metadata, overrides);
        file.read_only = settings.read_only;
        let mut filters = Filters::new(today);
        filters.hide_done = settings.filter_done;

        let mut app = App {
            file,
            doc,
            options,
            config,
            settings,
            filters,
            visible: Vec::new(),
            cursor: None,
            scroll: 0,
            mode: Mode::Navigate,
            undo: UndoStack::new(),
            move_session: None,
            edit_buffer: String::new(),
            edit_cursor: 0,
            edit_target: None,
            command_palette: None,
            search: None,
            filter_entries: Vec::new(),
            filter_cursor: 0,
            status: None,
            pending_g: false,
            count: None,
            should_quit: false,
            theme: Theme::default(),
            watcher: None,
        };
        app.refresh();
        app.cursor = app.visible.first().copied();
        app
    }

    /// Apply a mode trigger. Returns false (and stays put) when the table
    /// has no transition for it.
    pub fn enter(&mut self, trigger: Trigger) -> bool {
        match transition(self.mode, trigger) {
            Some(next) => {
                tracing::trace!(from = ?self.mode, to = ?next, ?trigger, "mode change");
                self.mode = next;
                true
            }
            None => {
                tracing::debug!(mode = ?self.mode, ?trigger, "ignored trigger");
                false
            }
        }
    }

    pub fn current_item(&self) -> Option<&ChecklistItem> {
        self.cursor.and_then(|i| self.doc.item(i))
    }

    /// Recompute the visible set and keep the cursor on a visible item
    pub fn refresh(&mut self) {
        self.filters.hide_done = self.settings.filter_done;
        self.visible = filter::visible_in(&self.doc, &self.filters);
        self.cursor = match self.cursor {
            Some(c) => nav::clamp_cursor(&self.visible, c),
            None => self.visible.first().copied(),
        };
    }

    /// Items the cursor may reach without leaving its section
    pub fn scope(&self) -> Range<usize> {
        match self.cursor {
            Some(c) if c < self.doc.len() => item_ops::scope_of(&self.doc, c, self.settings.scope),
            _ => 0..self.doc.len(),
        }
    }

    /// Refresh, then move the cursor off an item that was removed or hidden
    pub fn settle(&mut self, anchor: Anchor) {
        let scope = if anchor.index < self.doc.len() {
            item_ops::scope_of(&self.doc, anchor.index, self.settings.scope)
        } else {
            0..self.doc.len()
        };
        self.settle_in(anchor, scope);
    }

    /// `settle` bounded by a scope taken before the document changed. After
    /// a delete, the anchor index may already belong to the next section.
    pub fn settle_in(&mut self, anchor: Anchor, scope: Range<usize>) {
        self.visible = filter::visible_in(&self.doc, &self.filters);
        let still_there = !anchor.removed && self.visible.binary_search(&anchor.index).is_ok();
        self.cursor = if still_there {
            Some(anchor.index)
        } else {
            nav::reanchor(&self.doc, &self.visible, anchor, &scope)
        };
    }

    /// `settle` around a previously taken anchor, or refresh without one
    pub fn resettle(&mut self, anchor: Option<Anchor>) {
        match anchor {
            Some(a) => self.settle(a),
            None => self.refresh(),
        }
    }

    // -- status ------------------------------------------------------------

    pub fn set_status(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            is_error: false,
        });
    }

    pub fn set_error(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            is_error: true,
        });
    }

    // -- mutation ----------------------------------------------------------

    /// Run one mutating command: refuse it when read-only, snapshot for
    /// undo, apply, then save. A failed command, or one that leaves the
    /// document as it was, records no undo entry and writes nothing.
    pub fn mutate<T>(&mut self, f: impl FnOnce(&mut Document) -> Result<T, ItemError>) -> Option<T> {
        if !self.ensure_writable() {
            return None;
        }
        let before = self.doc.clone();
        match f(&mut self.doc) {
            Ok(value) => {
                if self.doc.same_content(&before) {
                    tracing::debug!("command left the document unchanged");
                    return Some(value);
                }
                self.undo.push(&before, self.cursor);
                self.persist();
                Some(value)
            }
            Err(e) => {
                self.set_error(e.to_string());
                None
            }
        }
    }

    /// False (with a status message) when the session is read-only
    pub fn ensure_writable(&mut self) -> bool {
        if self.settings.read_only {
            self.set_error("read-only: changes are disabled");
            return false;
        }
        true
    }

    /// Write the document, reporting (not raising) failures
    pub fn persist(&mut self) {
        if self.settings.read_only {
            return;
        }
        match self.file.save(&self.doc, &self.options) {
            Ok(()) => {}
            Err(DocumentError::WriteConflict { .. }) => {
                self.set_error("file changed on disk: :reload or :force-save");
            }
            Err(e) => {
                tracing::error!("save failed: {}", e);
                self.set_error(format!("save failed: {}", e));
            }
        }
    }

    pub fn force_save(&mut self) {
        match self.file.force_save(&self.doc, &self.options) {
            Ok(()) => self.set_status("saved"),
            Err(e) => self.set_error(e.to_string()),
        }
    }

    /// Explicit save from the palette
    pub fn save(&mut self) {
        match self.file.save(&self.doc, &self.options) {
            Ok(()) => self.set_status("saved"),
            Err(DocumentError::WriteConflict { .. }) => {
                self.set_error("file changed on disk: :reload or :force-save");
            }
            Err(e) => self.set_error(e.to_string()),
        }
    }

    pub fn undo(&mut self) {
        if !self.ensure_writable() {
            return;
        }
        let Some(snapshot) = self.undo.pop() else {
            self.set_status("nothing to undo");
            return;
        };
        self.doc = snapshot.document;
        self.cursor = snapshot.cursor;
        self.refresh();
        self.persist();
    }

    /// Re-read the file, dropping undo history and any pending move
    pub fn reload(&mut self) {
        match self.file.reload(&self.options) {
            Ok((doc, warning)) => {
                self.doc = doc;
                self.undo.clear();
                self.move_session = None;
                self.refresh();
                match warning {
                    Some(w) => self.set_error(format!("frontmatter: {}", w)),
                    None => self.set_status("reloaded"),
                }
            }
            Err(e) => self.set_error(e.to_string()),
        }
    }

    // -- view toggles ------------------------------------------------------

    pub fn set_read_only(&mut self, read_only: bool) {
        self.settings.read_only = read_only;
        self.file.read_only = read_only;
    }

    pub fn toggle_filter_done(&mut self) {
        let anchor = self.anchor();
        self.settings.filter_done = !self.settings.filter_done;
        self.filters.hide_done = self.settings.filter_done;
        self.resettle(anchor);
    }

    /// Anchor for the focused item, if any
    pub fn anchor(&self) -> Option<Anchor> {
        let index = self.cursor?;
        let depth = self.doc.item(index)?.depth;
        Some(Anchor {
            index,
            depth,
            removed: false,
        })
    }

    /// Rebuild the filter menu entries from the document
    pub fn rebuild_filter_entries(&mut self) {
        let mut entries: Vec<FilterEntry> = filter::available_tags(&self.doc)
            .into_iter()
            .map(FilterEntry::Tag)
            .collect();
        entries.extend(
            filter::available_priorities(&self.doc)
                .into_iter()
                .map(FilterEntry::Priority),
        );
        if self.doc.items().any(|i| i.due.is_some()) {
            use filter::DueFilter::*;
            entries.extend([HasDue, Overdue, Today, Week].into_iter().map(FilterEntry::Due));
        }
        self.filter_entries = entries;
        if self.filter_cursor >= self.filter_entries.len() {
            self.filter_cursor = 0;
        }
    }

    /// React to an external change picked up by the watcher
    pub fn poll_watcher(&mut self) {
        let changed = self.watcher.as_ref().is_some_and(|w| w.poll());
        if !changed {
            return;
        }
        // Our own atomic writes also raise events; the fingerprint tells
        // them apart.
        match self.file.changed_on_disk() {
            Ok(true) => {
                tracing::info!(path = %self.file.path.display(), "external change detected");
                self.set_error("file changed on disk: :reload or :force-save");
            }
            Ok(false) => {}
            Err(e) => self.set_error(e.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Run loop
// ---------------------------------------------------------------------------

/// Run the TUI application
pub fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = config_io::load_config(cli.config.as_deref())?;
    let options = ParseOptions::from(&config.format);
    let Loaded {
        file,
        document,
        warning,
    } = DocumentFile::open(&cli.file_path(), &options)?;

    let mut app = App::new(
        file,
        document,
        config,
        &cli.overrides(),
        Local::now().date_naive(),
    );
    if let Some(w) = warning {
        app.set_error(format!("frontmatter: {}", w));
    }
    match DocumentWatcher::start(&app.file.path) {
        Ok(w) => app.watcher = Some(w),
        Err(e) => tracing::warn!("file watcher unavailable: {}", e),
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
        }

        app.poll_watcher();

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
