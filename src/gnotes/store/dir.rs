use super::{DocumentHandle, LocalCache, NoteStore, RemoteDocument, RemoteStore};
use crate::checksum::ContentHash;
use crate::config::{AppPaths, Config};
use crate::error::{NotesError, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// A remote that is just a directory, usually one kept in sync by a
/// cloud storage client.
#[derive(Debug, Clone)]
pub struct DirRemote {
    root: PathBuf,
}

impl DirRemote {
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.exists() {
            fs::create_dir_all(&root).map_err(NotesError::Io)?;
        }
        Ok(Self { root })
    }

    fn path_of(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

impl RemoteStore for DirRemote {
    fn get_document(&self, name: &str) -> Result<Option<RemoteDocument>> {
        let path = self.path_of(name);
        if !path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(&path).map_err(NotesError::Io)?;
        Ok(Some(RemoteDocument {
            checksum: ContentHash::compute(&bytes).into_string(),
            handle: DocumentHandle(name.to_string()),
        }))
    }

    fn download(&self, handle: &DocumentHandle) -> Result<Vec<u8>> {
        let path = self.path_of(&handle.0);
        fs::read(&path).map_err(|e| NotesError::Remote(format!("{}: {}", path.display(), e)))
    }

    fn upload(&mut self, handle: &DocumentHandle, bytes: &[u8]) -> Result<()> {
        let path = self.path_of(&handle.0);
        // Write next to the target so persist() is a same-filesystem rename
        let mut tmp = NamedTempFile::new_in(&self.root).map_err(NotesError::Io)?;
        tmp.write_all(bytes).map_err(NotesError::Io)?;
        tmp.as_file().sync_all().map_err(NotesError::Io)?;
        tmp.persist(&path)
            .map_err(|e| NotesError::Remote(format!("{}: {}", path.display(), e.error)))?;
        log::debug!("wrote {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }

    fn create(&mut self, name: &str) -> Result<RemoteDocument> {
        let path = self.path_of(name);
        if !path.exists() {
            fs::write(&path, b"").map_err(NotesError::Io)?;
        }
        self.get_document(name)?
            .ok_or_else(|| NotesError::Remote(format!("could not create {}", path.display())))
    }
}

/// Local snapshot on disk. The snapshot itself lives in the cache directory;
/// the checksum it was taken at is recorded as `cachedChecksum` in the
/// config file so `gnotes config` can show it.
#[derive(Debug)]
pub struct FileCache {
    snapshot_path: PathBuf,
    config_dir: PathBuf,
    checksum: Option<String>,
}

impl FileCache {
    const SNAPSHOT_NAME: &'static str = "notes.json";

    pub fn new<P, Q>(cache_dir: P, config_dir: Q, config: &Config) -> Self
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let checksum = Some(config.cached_checksum.clone()).filter(|c| !c.is_empty());
        Self {
            snapshot_path: cache_dir.as_ref().join(Self::SNAPSHOT_NAME),
            config_dir: config_dir.as_ref().to_path_buf(),
            checksum,
        }
    }
}

impl LocalCache for FileCache {
    fn checksum(&self) -> Option<&str> {
        self.checksum.as_deref()
    }

    fn load(&self) -> Result<Option<Vec<u8>>> {
        if !self.snapshot_path.exists() {
            return Ok(None);
        }
        fs::read(&self.snapshot_path).map(Some).map_err(NotesError::Io)
    }

    fn store(&mut self, checksum: &str, bytes: &[u8]) -> Result<()> {
        if let Some(dir) = self.snapshot_path.parent() {
            fs::create_dir_all(dir).map_err(NotesError::Io)?;
        }
        fs::write(&self.snapshot_path, bytes).map_err(NotesError::Io)?;

        // Re-read so settings changed by another process are not clobbered
        let mut config = Config::load(&self.config_dir)?;
        config.cached_checksum = checksum.to_string();
        config.save(&self.config_dir)?;

        self.checksum = Some(checksum.to_string());
        Ok(())
    }
}

pub type DirNoteStore = NoteStore<DirRemote, FileCache>;

/// Loads the config (writing defaults on first run) and opens the store it
/// points at.
pub fn open_store(paths: &AppPaths) -> Result<DirNoteStore> {
    let config = Config::init(&paths.config_dir)?;
    let remote_dir = paths.remote_dir(&config);
    log::debug!("remote directory {}", remote_dir.display());
    let remote = DirRemote::new(remote_dir)?;
    let cache = FileCache::new(&paths.cache_dir, &paths.config_dir, &config);
    NoteStore::init(remote, cache, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Note;
    use crate::store::DOCUMENT_NAME;
    use tempfile::TempDir;

    struct Dirs {
        _tmp: TempDir,
        remote: PathBuf,
        cache: PathBuf,
        config: PathBuf,
    }

    fn dirs() -> Dirs {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().to_path_buf();
        Dirs {
            remote: root.join("remote"),
            cache: root.join("cache"),
            config: root.join("config"),
            _tmp: tmp,
        }
    }

    fn open(d: &Dirs) -> DirNoteStore {
        let config = Config::init(&d.config).unwrap();
        let remote = DirRemote::new(&d.remote).unwrap();
        let cache = FileCache::new(&d.cache, &d.config, &config);
        NoteStore::init(remote, cache, config).unwrap()
    }

    #[test]
    fn first_open_creates_empty_document() {
        let d = dirs();
        let store = open(&d);
        assert!(store.is_empty());
        assert_eq!(fs::read(d.remote.join(DOCUMENT_NAME)).unwrap(), b"");
    }

    #[test]
    fn checksum_is_sha256_of_content() {
        let d = dirs();
        let mut remote = DirRemote::new(&d.remote).unwrap();
        let doc = remote.create("x.json").unwrap();
        remote.upload(&doc.handle, b"hello").unwrap();
        let doc = remote.get_document("x.json").unwrap().unwrap();
        assert_eq!(
            doc.checksum,
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn upload_leaves_no_temp_files() {
        let d = dirs();
        let mut remote = DirRemote::new(&d.remote).unwrap();
        let doc = remote.create(DOCUMENT_NAME).unwrap();
        remote.upload(&doc.handle, b"[]").unwrap();
        let entries: Vec<_> = fs::read_dir(&d.remote).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn save_records_checksum_in_config() {
        let d = dirs();
        let mut store = open(&d);
        store.add_note(Note::new("remember me"));
        store.save_notes().unwrap();

        let config = Config::load(&d.config).unwrap();
        assert_eq!(config.cached_checksum, store.document().checksum);
        assert_eq!(
            fs::read(d.cache.join("notes.json")).unwrap(),
            fs::read(d.remote.join(DOCUMENT_NAME)).unwrap()
        );
    }

    #[test]
    fn reopen_reads_saved_notes() {
        let d = dirs();
        {
            let mut store = open(&d);
            store.add_note(Note::new("one"));
            store.add_note(Note::new("two"));
            store.save_notes().unwrap();
        }
        let store = open(&d);
        assert_eq!(store.len(), 2);
        assert_eq!(store.max_id(), 2);
    }

    #[test]
    fn reopen_picks_up_remote_edits() {
        let d = dirs();
        {
            let mut store = open(&d);
            store.add_note(Note::new("local"));
            store.save_notes().unwrap();
        }
        let mut other = Note::new("synced in");
        other.id = 7;
        fs::write(
            d.remote.join(DOCUMENT_NAME),
            serde_json::to_vec(&vec![other]).unwrap(),
        )
        .unwrap();

        let store = open(&d);
        assert_eq!(store.len(), 1);
        assert_eq!(store.notes()[0].content, "synced in");
        assert_eq!(
            Config::load(&d.config).unwrap().cached_checksum,
            store.document().checksum
        );
    }

    #[test]
    fn open_store_uses_configured_remote_dir() {
        let d = dirs();
        let paths = AppPaths::under(d._tmp.path().to_path_buf());
        let elsewhere = d._tmp.path().join("synced");
        let mut config = Config::init(&paths.config_dir).unwrap();
        config.remote_dir = Some(elsewhere.clone());
        config.save(&paths.config_dir).unwrap();

        open_store(&paths).unwrap();
        assert!(elsewhere.join(DOCUMENT_NAME).exists());
        assert!(!paths.default_remote_dir.join(DOCUMENT_NAME).exists());
    }

    #[test]
    fn missing_snapshot_forces_download() {
        let d = dirs();
        {
            let mut store = open(&d);
            store.add_note(Note::new("a"));
            store.save_notes().unwrap();
        }
        fs::remove_file(d.cache.join("notes.json")).unwrap();
        assert_eq!(open(&d).len(), 1);
    }
}
