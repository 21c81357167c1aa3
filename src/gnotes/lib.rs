//! # gnotes Architecture
//!
//! gnotes is a todo/note manager whose whole collection lives in **one JSON
//! document** on a remote (a directory the user keeps in a cloud-synced folder).
//! The library is the note engine; the binary adds a one-shot CLI and a
//! full-screen terminal session on top of it.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Binary (cli/, tui/, wired by main.rs)                      │
//! │  - Parses arguments, prints, owns the terminal              │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!              │                                │
//!              ▼                                ▼
//! ┌──────────────────────────────┐  ┌──────────────────────────────┐
//! │  Commands (commands/*.rs)    │  │  Session (session/)          │
//! │  - One-shot operations       │  │  - Modal state machine       │
//! │  - Return CmdResult          │  │  - Selection, search, :cmds  │
//! └──────────────────────────────┘  └──────────────────────────────┘
//!              │                                │
//!              ▼                                ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Engine: model, query, presenter, store::NoteStore          │
//! │  - Notes, filters and sorts, column-aligned formatting      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage traits (store/)                                    │
//! │  - RemoteStore: DirRemote (production), MemoryRemote (test) │
//! │  - LocalCache:  FileCache (production), MemoryCache (test)  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Checksum-gated sync
//!
//! The remote document is only downloaded when its checksum differs from the
//! one cached locally. Saving always replaces the whole document; the last
//! writer wins.
//!
//! ## No I/O assumptions in the engine
//!
//! Everything below the binary takes Rust values and returns
//! [`error::Result`]. It never prints and never exits the process, so the
//! session controller can be driven by plain [`session::Input`] values in
//! tests.
//!
//! ## Module Overview
//!
//! - [`model`]: `Note`, due-date sentinel, titles
//! - [`store`]: `NoteStore` plus the remote and cache abstractions
//! - [`query`]: filtering, searching and multi-key sorting
//! - [`presenter`]: table and detail formatting with priority classes
//! - [`session`]: the interactive modal controller
//! - [`commands`]: one-shot operations used by the CLI
//! - [`config`]: persisted preferences and application paths
//! - [`editor`]: external editor integration
//! - [`checksum`]: SHA-256 content hashes
//! - [`logging`]: `env_logger` setup
//! - [`error`]: error types

pub mod checksum;
pub mod commands;
pub mod config;
pub mod editor;
pub mod error;
pub mod logging;
pub mod model;
pub mod presenter;
pub mod query;
pub mod session;
pub mod store;
