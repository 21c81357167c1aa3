use super::{DocumentHandle, LocalCache, NoteStore, RemoteDocument, RemoteStore};
use crate::checksum::ContentHash;
use crate::config::Config;
use crate::error::{NotesError, Result};
use std::cell::Cell;
use std::collections::HashMap;

/// In-memory remote for testing and development.
/// Does NOT persist data.
#[derive(Default)]
pub struct MemoryRemote {
    documents: HashMap<String, Vec<u8>>,
    downloads: Cell<usize>,
    fail_uploads: bool,
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, name: &str, bytes: &[u8]) -> Self {
        self.put_document(name, bytes);
        self
    }

    /// Simulates another machine writing the document.
    pub fn put_document(&mut self, name: &str, bytes: &[u8]) {
        self.documents.insert(name.to_string(), bytes.to_vec());
    }

    pub fn document_bytes(&self, name: &str) -> Option<Vec<u8>> {
        self.documents.get(name).cloned()
    }

    /// Number of downloads served so far.
    pub fn downloads(&self) -> usize {
        self.downloads.get()
    }

    pub fn fail_uploads(&mut self, fail: bool) {
        self.fail_uploads = fail;
    }

    fn describe(name: &str, bytes: &[u8]) -> RemoteDocument {
        RemoteDocument {
            checksum: ContentHash::compute(bytes).into_string(),
            handle: DocumentHandle(name.to_string()),
        }
    }
}

impl RemoteStore for MemoryRemote {
    fn get_document(&self, name: &str) -> Result<Option<RemoteDocument>> {
        Ok(self
            .documents
            .get(name)
            .map(|bytes| Self::describe(name, bytes)))
    }

    fn download(&self, handle: &DocumentHandle) -> Result<Vec<u8>> {
        self.downloads.set(self.downloads.get() + 1);
        self.documents
            .get(&handle.0)
            .cloned()
            .ok_or_else(|| NotesError::Remote(format!("no document {}", handle)))
    }

    fn upload(&mut self, handle: &DocumentHandle, bytes: &[u8]) -> Result<()> {
        if self.fail_uploads {
            return Err(NotesError::Remote("upload refused".to_string()));
        }
        self.documents.insert(handle.0.clone(), bytes.to_vec());
        Ok(())
    }

    fn create(&mut self, name: &str) -> Result<RemoteDocument> {
        let bytes = self.documents.entry(name.to_string()).or_default();
        Ok(Self::describe(name, bytes))
    }
}

/// In-memory [`LocalCache`].
#[derive(Debug, Default)]
pub struct MemoryCache {
    checksum: Option<String>,
    snapshot: Option<Vec<u8>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn primed(checksum: &str, bytes: &[u8]) -> Self {
        Self {
            checksum: Some(checksum.to_string()),
            snapshot: Some(bytes.to_vec()),
        }
    }
}

impl LocalCache for MemoryCache {
    fn checksum(&self) -> Option<&str> {
        self.checksum.as_deref()
    }

    fn load(&self) -> Result<Option<Vec<u8>>> {
        Ok(self.snapshot.clone())
    }

    fn store(&mut self, checksum: &str, bytes: &[u8]) -> Result<()> {
        self.checksum = Some(checksum.to_string());
        self.snapshot = Some(bytes.to_vec());
        Ok(())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub use fixtures::StoreFixture;

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::Note;

    pub type MemoryNoteStore = NoteStore<MemoryRemote, MemoryCache>;

    /// Builds an in-memory [`NoteStore`] with some notes already added.
    #[derive(Default)]
    pub struct StoreFixture {
        config: Config,
        notes: Vec<Note>,
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_config(mut self, config: Config) -> Self {
            self.config = config;
            self
        }

        pub fn with_note(mut self, content: &str) -> Self {
            self.notes.push(Note::new(content));
            self
        }

        pub fn with_full_note(mut self, note: Note) -> Self {
            self.notes.push(note);
            self
        }

        pub fn build(self) -> MemoryNoteStore {
            let mut store = NoteStore::init(MemoryRemote::new(), MemoryCache::new(), self.config)
                .expect("in-memory init cannot fail");
            for note in self.notes {
                store.add_note(note);
            }
            store
        }
    }
}
