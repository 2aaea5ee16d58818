//! # Collection Persistence
//!
//! The session loads the collection once at start and saves it after every
//! collection mutation. Two stores ship:
//!
//! - [`TomlCollectionFile`]: a TOML file on disk, replaced atomically.
//! - [`InMemoryCollectionStore`]: process-local, for tests and headless runs.
//!
//! ## File format
//!
//! ```toml
//! version = 1
//!
//! [[swords]]
//! id = "local-3"
//! tier = 2
//! enhancement_count = 0
//! attack_power = 13
//! magic_power = 8
//! success_rate = 90
//! value = 1001500000
//! ```

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::collection::Collection;
use crate::error::{EconomyError, EconomyResult};
use crate::sword::Sword;

/// Current collection file version.
pub const COLLECTION_FILE_VERSION: u32 = 1;

/// Persistence collaborator for the collection.
pub trait CollectionStore {
    /// Loads the saved collection. An absent collection loads as empty.
    ///
    /// # Errors
    ///
    /// `Persistence` on I/O or decode failures, `InvalidConfig` on an
    /// unsupported file version, `InvalidSword` on a corrupt entry.
    fn load_collection(&self) -> EconomyResult<Collection>;

    /// Replaces the saved collection.
    ///
    /// # Errors
    ///
    /// `Persistence` if the collection could not be written.
    fn save_collection(&self, collection: &Collection) -> EconomyResult<()>;
}

impl<S: CollectionStore + ?Sized> CollectionStore for &S {
    fn load_collection(&self) -> EconomyResult<Collection> {
        (**self).load_collection()
    }

    fn save_collection(&self, collection: &Collection) -> EconomyResult<()> {
        (**self).save_collection(collection)
    }
}

impl<S: CollectionStore + ?Sized> CollectionStore for Box<S> {
    fn load_collection(&self) -> EconomyResult<Collection> {
        (**self).load_collection()
    }

    fn save_collection(&self, collection: &Collection) -> EconomyResult<()> {
        (**self).save_collection(collection)
    }
}

#[derive(Serialize, Deserialize)]
struct CollectionFile {
    version: u32,
    #[serde(default)]
    swords: Vec<Sword>,
}

/// Collection stored as a TOML file.
#[derive(Clone, Debug)]
pub struct TomlCollectionFile {
    path: PathBuf,
}

impl TomlCollectionFile {
    /// Store backed by `path`. Nothing is touched until the first call.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// File location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parses a collection document.
    ///
    /// # Errors
    ///
    /// See [`CollectionStore::load_collection`].
    pub fn parse(content: &str) -> EconomyResult<Collection> {
        let file: CollectionFile = toml::from_str(content)
            .map_err(|e| EconomyError::Persistence(format!("collection decode: {e}")))?;
        if file.version != COLLECTION_FILE_VERSION {
            return Err(EconomyError::InvalidConfig(format!(
                "unsupported collection version {} (expected {COLLECTION_FILE_VERSION})",
                file.version
            )));
        }
        Ok(file.swords.into_iter().collect())
    }

    /// Renders a collection document.
    ///
    /// # Errors
    ///
    /// `Persistence` if encoding fails.
    pub fn render(collection: &Collection) -> EconomyResult<String> {
        let file = CollectionFile {
            version: COLLECTION_FILE_VERSION,
            swords: collection.iter().copied().collect(),
        };
        toml::to_string(&file)
            .map_err(|e| EconomyError::Persistence(format!("collection encode: {e}")))
    }

    fn write_atomically(&self, content: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let temp_path = self.path.with_extension("tmp");
        {
            let mut file = fs::File::create(&temp_path)?;
            file.write_all(content.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&temp_path, &self.path)
    }
}

impl CollectionStore for TomlCollectionFile {
    fn load_collection(&self) -> EconomyResult<Collection> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No collection file, starting empty");
                return Ok(Collection::new());
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read collection");
                return Err(EconomyError::Persistence(format!(
                    "read {}: {e}",
                    self.path.display()
                )));
            }
        };
        let collection = Self::parse(&content)?;
        debug!(path = %self.path.display(), swords = collection.len(), "Collection loaded");
        Ok(collection)
    }

    fn save_collection(&self, collection: &Collection) -> EconomyResult<()> {
        let content = Self::render(collection)?;
        self.write_atomically(&content).map_err(|e| {
            warn!(path = %self.path.display(), error = %e, "Failed to write collection");
            EconomyError::Persistence(format!("write {}: {e}", self.path.display()))
        })?;
        debug!(path = %self.path.display(), swords = collection.len(), "Collection saved");
        Ok(())
    }
}

/// Process-local store. Clones share the same slot.
#[derive(Clone, Debug, Default)]
pub struct InMemoryCollectionStore {
    slot: Arc<Mutex<Collection>>,
    saves: Arc<Mutex<u64>>,
}

impl InMemoryCollectionStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with `collection`.
    #[must_use]
    pub fn with_collection(collection: Collection) -> Self {
        Self {
            slot: Arc::new(Mutex::new(collection)),
            saves: Arc::default(),
        }
    }

    /// Currently stored collection.
    #[must_use]
    pub fn snapshot(&self) -> Collection {
        self.slot.lock().clone()
    }

    /// Number of `save_collection` calls so far.
    #[must_use]
    pub fn save_count(&self) -> u64 {
        *self.saves.lock()
    }
}

impl CollectionStore for InMemoryCollectionStore {
    fn load_collection(&self) -> EconomyResult<Collection> {
        Ok(self.slot.lock().clone())
    }

    fn save_collection(&self, collection: &Collection) -> EconomyResult<()> {
        *self.slot.lock() = collection.clone();
        *self.saves.lock() += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use herosword_shared::{Mist, SwordId};

    use super::*;
    use crate::sword::{BaseStats, SwordParts};

    fn sample() -> Collection {
        let evolved = Sword::try_from(SwordParts {
            id: SwordId::Local(3),
            tier: 2,
            enhancement_count: 0,
            attack_power: 13,
            magic_power: 8,
            success_rate: 90,
            value: Mist::new(1_001_500_000),
        })
        .unwrap();
        Collection::from_iter([
            Sword::base(SwordId::Local(1), &BaseStats::default()),
            evolved,
        ])
    }

    #[test]
    fn test_file_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = TomlCollectionFile::new(dir.path().join("collection.toml"));

        store.save_collection(&sample()).unwrap();
        assert_eq!(store.load_collection().unwrap(), sample());
        assert!(!dir.path().join("collection.tmp").exists());
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = TomlCollectionFile::new(dir.path().join("nothing.toml"));
        assert!(store.load_collection().unwrap().is_empty());
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let store = TomlCollectionFile::new(dir.path().join("saves/player/collection.toml"));
        store.save_collection(&sample()).unwrap();
        assert_eq!(store.load_collection().unwrap().len(), 2);
    }

    #[test]
    fn test_overwrite_replaces_contents() {
        let dir = tempfile::tempdir().unwrap();
        let store = TomlCollectionFile::new(dir.path().join("collection.toml"));
        store.save_collection(&sample()).unwrap();
        let smaller = sample().without(SwordId::Local(1));
        store.save_collection(&smaller).unwrap();
        assert_eq!(store.load_collection().unwrap(), smaller);
    }

    #[test]
    fn test_unknown_version_rejected() {
        let result = TomlCollectionFile::parse("version = 2\n");
        assert!(matches!(result, Err(EconomyError::InvalidConfig(_))));
    }

    #[test]
    fn test_corrupt_entry_rejected() {
        let content = r#"
version = 1

[[swords]]
id = "local-1"
tier = 0
enhancement_count = 0
attack_power = 10
magic_power = 5
success_rate = 90
value = 1000000000
"#;
        assert!(TomlCollectionFile::parse(content).is_err());
    }

    #[test]
    fn test_parses_documented_format() {
        let content = r#"
version = 1

[[swords]]
id = "local-3"
tier = 2
enhancement_count = 0
attack_power = 13
magic_power = 8
success_rate = 90
value = 1001500000
"#;
        let collection = TomlCollectionFile::parse(content).unwrap();
        let sword = collection.latest(SwordId::Local(3)).unwrap();
        assert_eq!(sword.tier(), 2);
        assert_eq!(sword.display_name(), "knife");
    }

    #[test]
    fn test_in_memory_clones_share_state() {
        let store = InMemoryCollectionStore::new();
        let handle = store.clone();
        store.save_collection(&sample()).unwrap();
        assert_eq!(handle.load_collection().unwrap(), sample());
        assert_eq!(handle.save_count(), 1);
    }
}
