use super::{LocalCache, RemoteDocument, RemoteStore, DOCUMENT_NAME};
use crate::config::Config;
use crate::error::{NotesError, Result};
use crate::model::{is_zero_time, Note, NoteId};
use chrono::Utc;
use std::collections::{BTreeMap, HashSet};

/// Owner of the note collection and of its remote bookkeeping.
///
/// Notes are kept in insertion order; any other order is a display concern.
/// `max_id` only ever grows, so ids are not reused within a session even
/// after deletes or a wholesale replacement by [`NoteStore::sync`].
pub struct NoteStore<R: RemoteStore, C: LocalCache> {
    notes: Vec<Note>,
    max_id: NoteId,
    remote: R,
    cache: C,
    document: RemoteDocument,
    config: Config,
}

impl<R: RemoteStore, C: LocalCache> NoteStore<R, C> {
    /// Resolves (or creates) the remote document and loads it.
    pub fn init(mut remote: R, cache: C, config: Config) -> Result<Self> {
        let document = match remote.get_document(DOCUMENT_NAME)? {
            Some(doc) => doc,
            None => {
                log::info!("no {} on remote, creating it", DOCUMENT_NAME);
                remote.create(DOCUMENT_NAME)?
            }
        };

        let mut store = Self {
            notes: Vec::new(),
            max_id: 0,
            remote,
            cache,
            document,
            config,
        };
        store.sync()?;
        Ok(store)
    }

    /// Reloads the collection, downloading only if the remote changed.
    ///
    /// A document that fails to parse is an error and the current collection
    /// is left as it was.
    pub fn sync(&mut self) -> Result<()> {
        let document = match self.remote.get_document(DOCUMENT_NAME)? {
            Some(doc) => doc,
            None => self.remote.create(DOCUMENT_NAME)?,
        };

        let cached = if self.cache.checksum() == Some(document.checksum.as_str()) {
            self.cache.load()?
        } else {
            None
        };

        let notes = match cached {
            Some(bytes) => {
                log::debug!("remote checksum {} unchanged, using cache", document.checksum);
                parse_notes(&bytes)?
            }
            None => {
                log::info!("downloading {} ({})", document.handle, document.checksum);
                let bytes = self.remote.download(&document.handle)?;
                let notes = parse_notes(&bytes)?;
                self.cache.store(&document.checksum, &bytes)?;
                notes
            }
        };

        self.replace_notes(notes);
        self.document = document;
        Ok(())
    }

    fn replace_notes(&mut self, notes: Vec<Note>) {
        let loaded_max = notes.iter().map(|n| n.id).max().unwrap_or(0);
        self.max_id = self.max_id.max(loaded_max);
        self.notes = notes;
    }

    /// Uploads the whole collection, replacing the remote document.
    ///
    /// There is no conflict check: edits made on the remote since the last
    /// sync are overwritten.
    pub fn save_notes(&mut self) -> Result<()> {
        let bytes = self.to_json()?;
        self.remote.upload(&self.document.handle, &bytes)?;

        let document = self.remote.get_document(DOCUMENT_NAME)?.ok_or_else(|| {
            NotesError::Remote(format!("{} vanished after upload", DOCUMENT_NAME))
        })?;
        self.cache.store(&document.checksum, &bytes)?;
        log::info!("saved {} notes ({})", self.notes.len(), document.checksum);
        self.document = document;
        Ok(())
    }

    /// Assigns the next id, stamps unset timestamps, applies default tags.
    pub fn add_note(&mut self, mut note: Note) -> NoteId {
        self.max_id += 1;
        note.id = self.max_id;

        let now = Utc::now();
        if is_zero_time(&note.created) {
            note.created = now;
        }
        if is_zero_time(&note.updated) {
            note.updated = now;
        }
        for tag in &self.config.default_tags {
            note.add_tag(tag);
        }

        self.notes.push(note);
        self.max_id
    }

    pub fn find_note(&self, id: NoteId) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    pub fn find_note_mut(&mut self, id: NoteId) -> Option<&mut Note> {
        self.notes.iter_mut().find(|n| n.id == id)
    }

    /// Like [`NoteStore::find_note_mut`] but a miss is a `NotFound` error.
    pub fn note_mut(&mut self, id: NoteId) -> Result<&mut Note> {
        self.find_note_mut(id).ok_or(NotesError::NotFound(id))
    }

    pub fn delete_note(&mut self, id: NoteId) -> Result<Note> {
        let pos = self
            .notes
            .iter()
            .position(|n| n.id == id)
            .ok_or(NotesError::NotFound(id))?;
        Ok(self.notes.remove(pos))
    }

    /// Removes every note. Ids handed out so far stay retired.
    pub fn clear(&mut self) -> usize {
        let count = self.notes.len();
        self.notes.clear();
        count
    }

    /// Tag usage counts across all notes.
    pub fn get_tags(&self) -> BTreeMap<String, usize> {
        let mut tags = BTreeMap::new();
        for tag in self.notes.iter().flat_map(|n| n.tags.iter()) {
            *tags.entry(tag.clone()).or_insert(0) += 1;
        }
        tags
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn note_refs(&self) -> Vec<&Note> {
        self.notes.iter().collect()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn max_id(&self) -> NoteId {
        self.max_id
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn document(&self) -> &RemoteDocument {
        &self.document
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn remote_mut(&mut self) -> &mut R {
        &mut self.remote
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(&self.notes).map_err(NotesError::Serialization)
    }
}

/// Parses a serialized collection. Zero bytes (a freshly created document)
/// is an empty collection; anything else must be a valid array of notes with
/// distinct ids.
pub fn parse_notes(bytes: &[u8]) -> Result<Vec<Note>> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }

    let notes: Vec<Note> =
        serde_json::from_slice(bytes).map_err(|e| NotesError::Parse(e.to_string()))?;

    let mut seen = HashSet::new();
    if let Some(dup) = notes.iter().find(|n| !seen.insert(n.id)) {
        return Err(NotesError::Parse(format!("duplicate note id {}", dup.id)));
    }
    Ok(notes)
}
