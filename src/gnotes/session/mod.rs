//! # Interactive Session
//!
//! A modal state machine behind the full-screen view. The terminal layer
//! translates key events into [`Input`] values and calls
//! [`SessionController::handle`]; everything it needs to draw is read back
//! through accessors. No terminal types appear here, so every transition can
//! be tested with plain values.
//!
//! ```text
//!            ':'                        '/'
//!   CommandEntry ◄──── Normal ────► SearchEntry
//!        │  Enter/Esc   ▲  ▲   Enter/Esc  │
//!        └──────────────┘  └──────────────┘
//!                       │ '?' / :h
//!                       ▼
//!                  HelpOverlay (Esc)
//! ```
//!
//! Selection is stored as a note id. The index shown on screen is derived
//! from the visible set every time, so the selection follows its note
//! through filter and sort changes.

use crate::config::Config;
use crate::editor::ExternalEditor;
use crate::error::{NotesError, Result};
use crate::model::{parse_due, Note, NoteId, MAX_PRIORITY};
use crate::presenter::Columns;
use crate::query::{self, Column, SortKey};
use crate::store::{LocalCache, NoteStore, RemoteStore};

pub mod command;

pub use command::{Command, INVALID_COMMAND};


/// Key bindings shown by the help overlay.
pub const HELP: &[(&str, &str)] = &[
    ("j / ↓", "move down"),
    ("k / ↑", "move up"),
    ("g / Home", "first note"),
    ("G / End", "last note"),
    ("a", "add a note in the editor"),
    ("e / Enter", "edit the selected note"),
    ("d", "delete the selected note"),
    ("x / Space", "toggle done"),
    ("+ / -", "raise / lower priority"),
    ("t", "cycle the tag filter"),
    ("H", "show / hide done notes"),
    ("1-6", "sort by id, title, prio, due, created, updated"),
    ("/", "search, Enter keeps the filter"),
    ("Esc", "clear the search"),
    ("?", "this help"),
    (":q", "quit, refused with unsaved changes"),
    (":q!", "quit without saving"),
    (":w / :wq", "save / save and quit"),
    (":a <text>", "quick add"),
    (":t / :rt <tag>", "tag / untag the selected note"),
    (":p <0-5>", "set priority"),
    (":due [date]", "set or clear the due date"),
    (":sort <keys>", "sort by keys, e.g. -prio,due"),
];

const SORT_COLUMNS: [Column; 6] = [
    Column::Id,
    Column::Title,
    Column::Priority,
    Column::Due,
    Column::Created,
    Column::Updated,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Normal,
    CommandEntry,
    SearchEntry,
    HelpOverlay,
}

/// Terminal independent key events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Char(char),
    Enter,
    Esc,
    Backspace,
    Up,
    Down,
    Home,
    End,
}

/// What the event loop should do after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Failures inside a transition. Only failed saves end the session.
enum Failure {
    Recoverable(NotesError),
    Fatal(NotesError),
}

impl From<NotesError> for Failure {
    fn from(err: NotesError) -> Self {
        Failure::Recoverable(err)
    }
}

type Step = std::result::Result<Flow, Failure>;

pub struct SessionController<'a, R: RemoteStore, C: LocalCache> {
    store: &'a mut NoteStore<R, C>,
    editor: &'a mut dyn ExternalEditor,
    state: SessionState,
    columns: Columns,
    selected: Option<NoteId>,
    visible: Vec<NoteId>,
    sort_keys: Vec<SortKey>,
    tag_filter: Option<String>,
    show_done: bool,
    search: String,
    cmd: String,
    unsaved: bool,
    status: Option<String>,
}

impl<'a, R: RemoteStore, C: LocalCache> SessionController<'a, R, C> {
    pub fn new(store: &'a mut NoteStore<R, C>, editor: &'a mut dyn ExternalEditor) -> Self {
        let config = store.config();
        let mut columns = Columns::from_config(config);
        let sort_keys = config.default_sort_keys();
        for key in &sort_keys {
            columns.reveal(key.column);
        }

        let mut session = Self {
            store,
            editor,
            state: SessionState::Normal,
            columns,
            selected: None,
            visible: Vec::new(),
            sort_keys,
            tag_filter: None,
            show_done: false,
            search: String::new(),
            cmd: String::new(),
            unsaved: false,
            status: None,
        };
        session.recompute();
        session
    }

    /// Runs one transition. Operation errors end up in the status line;
    /// only a failed save is returned, with the session still dirty.
    pub fn handle(&mut self, input: Input) -> Result<Flow> {
        log::trace!("{:?} + {:?}", self.state, input);
        let step = match self.state {
            SessionState::Normal => self.handle_normal(input),
            SessionState::CommandEntry => self.handle_command_entry(input),
            SessionState::SearchEntry => Ok(self.handle_search_entry(input)),
            SessionState::HelpOverlay => Ok(self.handle_help(input)),
        };
        let flow = match step {
            Ok(flow) => flow,
            Err(Failure::Recoverable(err)) => {
                self.status = Some(err.to_string());
                Flow::Continue
            }
            Err(Failure::Fatal(err)) => {
                self.recompute();
                return Err(err);
            }
        };
        self.recompute();
        Ok(flow)
    }

    fn handle_normal(&mut self, input: Input) -> Step {
        match input {
            Input::Char('j') | Input::Down => self.move_by(1),
            Input::Char('k') | Input::Up => self.move_by(-1),
            Input::Char('g') | Input::Home => self.select_index(0),
            Input::Char('G') | Input::End => {
                self.select_index(self.visible.len().saturating_sub(1))
            }
            Input::Char('t') => self.cycle_tag_filter(),
            Input::Char('H') => self.show_done = !self.show_done,
            Input::Char(c @ '1'..='6') => {
                let column = SORT_COLUMNS[c as usize - '1' as usize];
                self.toggle_sort(column);
            }
            Input::Char('a') => self.add_with_editor()?,
            Input::Char('e') | Input::Enter => self.edit_selected()?,
            Input::Char('d') => self.delete_selected()?,
            Input::Char('x') | Input::Char(' ') => {
                self.update_selected(|note| {
                    note.toggle_done();
                })?;
            }
            Input::Char('+') => self.bump_priority(1)?,
            Input::Char('-') => self.bump_priority(-1)?,
            Input::Char(':') => self.enter(SessionState::CommandEntry, ':'),
            Input::Char('/') => self.enter(SessionState::SearchEntry, '/'),
            Input::Char('?') => self.state = SessionState::HelpOverlay,
            Input::Esc => self.search.clear(),
            _ => {}
        }
        Ok(Flow::Continue)
    }

    fn handle_command_entry(&mut self, input: Input) -> Step {
        match input {
            Input::Char(c) => self.cmd.push(c),
            Input::Backspace => self.backspace(),
            Input::Esc => self.leave_entry(),
            Input::Enter => {
                let line = std::mem::take(&mut self.cmd);
                self.state = SessionState::Normal;
                return self.run_command(Command::parse(&line)?);
            }
            _ => {}
        }
        Ok(Flow::Continue)
    }

    fn handle_search_entry(&mut self, input: Input) -> Flow {
        match input {
            Input::Char(c) => self.cmd.push(c),
            Input::Backspace => self.backspace(),
            Input::Esc => {
                self.leave_entry();
                return Flow::Continue;
            }
            Input::Enter => {
                // The search string stays active as a filter
                self.cmd.clear();
                self.state = SessionState::Normal;
                return Flow::Continue;
            }
            _ => {}
        }
        if self.state == SessionState::SearchEntry {
            self.search = self.cmd.strip_prefix('/').unwrap_or(&self.cmd).to_string();
        }
        Flow::Continue
    }

    fn handle_help(&mut self, input: Input) -> Flow {
        if matches!(input, Input::Esc | Input::Char('q') | Input::Char('?')) {
            self.state = SessionState::Normal;
        }
        Flow::Continue
    }

    fn enter(&mut self, state: SessionState, prompt: char) {
        self.cmd = prompt.to_string();
        self.state = state;
    }

    fn backspace(&mut self) {
        self.cmd.pop();
        if self.cmd.is_empty() {
            self.leave_entry();
        }
    }

    fn leave_entry(&mut self) {
        if self.state == SessionState::SearchEntry {
            self.search.clear();
        }
        self.cmd.clear();
        self.state = SessionState::Normal;
    }

    fn run_command(&mut self, command: Command) -> Step {
        match command {
            Command::Empty => {}
            Command::Quit => {
                if self.unsaved {
                    self.status = Some(
                        "There are unsaved changes. Use :w to save or :q! to discard them"
                            .to_string(),
                    );
                } else {
                    return Ok(Flow::Quit);
                }
            }
            Command::ForceQuit => return Ok(Flow::Quit),
            Command::Write => {
                self.save()?;
                self.status = Some(format!("Saved {} notes", self.store.len()));
            }
            Command::WriteQuit => {
                if self.unsaved {
                    self.save()?;
                }
                return Ok(Flow::Quit);
            }
            Command::Help => self.state = SessionState::HelpOverlay,
            Command::Add(text) => {
                let id = self.add_note(text);
                self.status = Some(format!("Added note {}", id));
            }
            Command::Tag(tag) => {
                self.update_selected(|note| {
                    note.add_tag(&tag);
                })?;
            }
            Command::Untag(tag) => {
                self.update_selected(|note| {
                    note.remove_tag(&tag);
                })?;
            }
            Command::Priority(priority) => {
                self.update_selected(|note| note.set_priority(priority))?;
            }
            Command::Due(None) => self.update_selected(Note::clear_due)?,
            Command::Due(Some(date)) => {
                let due = parse_due(&date, &self.store.config().due_format)?;
                self.update_selected(|note| note.set_due(due))?;
            }
            Command::Sort(keys) => {
                for key in &keys {
                    self.columns.reveal(key.column);
                }
                self.sort_keys = keys;
            }
        }
        Ok(Flow::Continue)
    }

    fn save(&mut self) -> std::result::Result<(), Failure> {
        self.store.save_notes().map_err(Failure::Fatal)?;
        self.unsaved = false;
        Ok(())
    }

    // --- selection ---

    fn move_by(&mut self, delta: isize) {
        let len = self.visible.len();
        if len == 0 {
            return;
        }
        let index = (self.selection_index() as isize + delta).rem_euclid(len as isize);
        self.select_index(index as usize);
    }

    fn select_index(&mut self, index: usize) {
        self.selected = self.visible.get(index).copied();
    }

    fn selected_id(&self) -> Result<NoteId> {
        self.selected
            .filter(|id| self.visible.contains(id))
            .ok_or_else(|| NotesError::Validation("No note selected".to_string()))
    }

    // --- filters and sorting ---

    fn cycle_tag_filter(&mut self) {
        // Ring: tags sorted descending, then "no filter"
        let tags: Vec<String> = self.store.get_tags().into_keys().rev().collect();
        let next = match &self.tag_filter {
            None => 0,
            Some(current) => tags.iter().position(|t| t == current).map_or(0, |i| i + 1),
        };
        self.tag_filter = tags.get(next).cloned();
        self.status = Some(match &self.tag_filter {
            Some(tag) => format!("Showing notes tagged {}", tag),
            None => "Showing all notes".to_string(),
        });
    }

    fn toggle_sort(&mut self, column: Column) {
        match self.sort_keys.iter().position(|k| k.column == column) {
            None => {
                self.sort_keys.push(SortKey::asc(column));
                self.columns.reveal(column);
            }
            Some(i) if !self.sort_keys[i].descending => self.sort_keys[i].descending = true,
            Some(i) => {
                self.sort_keys.remove(i);
            }
        }
    }

    // --- mutations ---

    fn add_note(&mut self, content: String) -> NoteId {
        let priority = self.store.config().default_priority;
        let id = self.store.add_note(Note::new(content).with_priority(priority));
        self.unsaved = true;
        self.selected = Some(id);
        id
    }

    fn add_with_editor(&mut self) -> Result<()> {
        let outcome = self.editor.edit("")?;
        if !outcome.changed || outcome.content.trim().is_empty() {
            self.status = Some("Empty note discarded".to_string());
            return Ok(());
        }
        let id = self.add_note(outcome.content);
        self.status = Some(format!("Added note {}", id));
        Ok(())
    }

    fn edit_selected(&mut self) -> Result<()> {
        let id = self.selected_id()?;
        let current = self.store.note_mut(id)?.content.clone();
        let outcome = self.editor.edit(&current)?;
        if outcome.changed {
            self.store.note_mut(id)?.set_content(outcome.content);
            self.unsaved = true;
        }
        Ok(())
    }

    fn delete_selected(&mut self) -> Result<()> {
        let id = self.selected_id()?;
        let index = self.selection_index();
        self.store.delete_note(id)?;
        self.unsaved = true;
        self.status = Some(format!("Deleted note {}", id));

        self.recompute();
        let len = self.visible.len();
        if len > 0 {
            self.select_index(if index == 0 { len - 1 } else { index - 1 });
        }
        Ok(())
    }

    fn bump_priority(&mut self, delta: i16) -> Result<()> {
        self.update_selected(|note| {
            let priority = (note.priority as i16 + delta).clamp(0, MAX_PRIORITY as i16);
            if priority as u8 != note.priority {
                note.set_priority(priority as u8);
            }
        })
    }

    fn update_selected<F: FnOnce(&mut Note)>(&mut self, f: F) -> Result<()> {
        let id = self.selected_id()?;
        let note = self.store.note_mut(id)?;
        let before = note.clone();
        f(note);
        if *note != before {
            self.unsaved = true;
        }
        Ok(())
    }

    /// Rebuilds the visible set and re-anchors the selection on its note.
    fn recompute(&mut self) {
        let all = self.store.note_refs();
        let mut notes = query::search(&self.search, &all);
        if !self.show_done {
            notes = query::filter_done(&notes);
        }
        if let Some(tag) = &self.tag_filter {
            notes = query::filter_by_tag(tag, &notes);
        }
        query::sort(&self.sort_keys, &mut notes);

        self.visible = notes.iter().map(|n| n.id).collect();
        if !self.selected.is_some_and(|id| self.visible.contains(&id)) {
            self.selected = self.visible.first().copied();
        }
    }

    // --- read side ---

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn visible_notes(&self) -> Vec<&Note> {
        self.visible
            .iter()
            .filter_map(|id| self.store.find_note(*id))
            .collect()
    }

    /// Position of the selected note in the visible set, 0 when nothing is selected.
    pub fn selection_index(&self) -> usize {
        self.selected
            .and_then(|id| self.visible.iter().position(|v| *v == id))
            .unwrap_or(0)
    }

    pub fn selected_note(&self) -> Option<&Note> {
        self.selected
            .filter(|id| self.visible.contains(id))
            .and_then(|id| self.store.find_note(id))
    }

    pub fn cmd_line(&self) -> &str {
        &self.cmd
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Called once the status has been drawn.
    pub fn clear_status(&mut self) {
        self.status = None;
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved
    }

    pub fn sort_keys(&self) -> &[SortKey] {
        &self.sort_keys
    }

    pub fn tag_filter(&self) -> Option<&str> {
        self.tag_filter.as_deref()
    }

    pub fn shows_done(&self) -> bool {
        self.show_done
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn columns(&self) -> Columns {
        self.columns
    }

    pub fn max_id(&self) -> NoteId {
        self.store.max_id()
    }

    pub fn config(&self) -> &Config {
        self.store.config()
    }
}
