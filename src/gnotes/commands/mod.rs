//! One-shot operations behind the CLI subcommands.
//!
//! Each submodule exposes a `run` function that works on a [`NoteStore`] (or
//! the config directory) and returns a [`CmdResult`]. Commands never print
//! and never save; the caller saves when [`CmdResult::changed`] is set.
//!
//! [`NoteStore`]: crate::store::NoteStore

use crate::config::Config;
use crate::model::{Note, NoteId};
use crate::query::SortKey;

pub mod add;
pub mod clear;
pub mod config;
pub mod done;
pub mod due;
pub mod edit;
pub mod list;
pub mod priority;
pub mod remove;
pub mod show;
pub mod tags;
pub mod urls;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }
}

/// How listed notes should be printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Listing {
    #[default]
    Table,
    Full,
}

#[derive(Debug, Default)]
pub struct CmdResult {
    /// The collection was modified and needs saving
    pub changed: bool,
    pub affected_ids: Vec<NoteId>,
    pub listed_notes: Vec<Note>,
    pub listing: Listing,
    /// Sort keys the listing was ordered by, so their columns can be shown
    pub sort_keys: Vec<SortKey>,
    pub tags: Vec<(String, usize)>,
    pub config: Option<Config>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    /// Records a modification of note `id`.
    pub fn touched(&mut self, id: NoteId) {
        self.changed = true;
        self.affected_ids.push(id);
    }

    pub fn with_listed_notes(mut self, notes: Vec<Note>, listing: Listing) -> Self {
        self.listed_notes = notes;
        self.listing = listing;
        self
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }}
