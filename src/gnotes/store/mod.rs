//! # Storage Layer
//!
//! The whole note collection is one JSON document on a remote. Two
//! abstractions sit underneath [`NoteStore`]:
//!
//! - [`RemoteStore`]: the transport that owns the canonical document
//!   (look up, create, download, upload). Documents are identified by a
//!   checksum so unchanged documents never need downloading.
//! - [`LocalCache`]: the last downloaded snapshot together with the checksum
//!   it had on the remote.
//!
//! ## Checksum-gated sync
//!
//! ```text
//!   LocalCache { checksum, snapshot }      RemoteDocument { checksum, handle }
//!                   │                                  │
//!                   └──────────── equal? ──────────────┘
//!                        yes: parse snapshot
//!                        no:  download, cache, parse
//! ```
//!
//! This is a validation-token cache, nothing is ever evicted.
//!
//! ## Implementations
//!
//! - [`dir::DirRemote`] / [`dir::FileCache`]: production. The remote is a
//!   directory (typically a cloud-synced folder) and the checksum is the
//!   SHA-256 of the document bytes.
//! - [`memory::MemoryRemote`] / [`memory::MemoryCache`]: tests, no filesystem.

use crate::error::Result;
use std::fmt;

pub mod dir;
pub mod memory;
pub mod notes;

pub use notes::NoteStore;

/// Name of the note collection document on the remote.
pub const DOCUMENT_NAME: &str = "notes.json";

/// Opaque reference to a document on a remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentHandle(pub String);

impl fmt::Display for DocumentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a remote reports about a document without downloading it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteDocument {
    pub checksum: String,
    pub handle: DocumentHandle,
}

/// Transport for the remote note document.
pub trait RemoteStore {
    /// Look up a document by name. `Ok(None)` if it does not exist.
    fn get_document(&self, name: &str) -> Result<Option<RemoteDocument>>;

    fn download(&self, handle: &DocumentHandle) -> Result<Vec<u8>>;

    /// Replace the document content entirely.
    fn upload(&mut self, handle: &DocumentHandle, bytes: &[u8]) -> Result<()>;

    /// Create an empty document.
    fn create(&mut self, name: &str) -> Result<RemoteDocument>;
}

/// Local side of the checksum-gated cache.
pub trait LocalCache {
    /// Checksum of the remote document the snapshot was taken from.
    fn checksum(&self) -> Option<&str>;

    /// The cached snapshot, `None` if nothing has been cached yet.
    fn load(&self) -> Result<Option<Vec<u8>>>;

    fn store(&mut self, checksum: &str, bytes: &[u8]) -> Result<()>;
}
