//! JSON file host for saved state.
//!
//! The whole registry is one file: `{"version": 1, "entries": {key: snapshot}}`.
//! Saves write a temporary file and rename it over the old one while holding
//! an exclusive lock on a sibling `.lock` file, so concurrent processes never
//! observe a torn file.

use std::collections::{BTreeMap, HashMap};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::saved_state::registry::{collect, SnapshotTable};
use crate::saved_state::{SavedStateError, SavedStateRegistry, Snapshot, SnapshotProvider};

const FILE_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct SavedStateFile {
    version: u32,
    #[serde(default)]
    entries: BTreeMap<String, Snapshot>,
}

/// Saved-state registry persisted to a JSON file.
pub struct FileSavedStateRegistry {
    path: PathBuf,
    table: Mutex<SnapshotTable>,
}

impl FileSavedStateRegistry {
    /// Returns the default saved-state file path.
    ///
    /// Uses `dirs::data_dir()/featureflow/saved_state.json`, falling back to
    /// the current directory if the data dir is unavailable.
    pub fn default_path() -> PathBuf {
        let data_dir = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        data_dir.join("featureflow").join("saved_state.json")
    }

    /// Open the registry, loading snapshots saved by a previous run.
    ///
    /// - A missing file yields an empty registry.
    /// - An unreadable or corrupt file is logged and treated as empty:
    ///   restoration falls back to default state rather than failing.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let saved = match load_entries(&path) {
            Ok(saved) => saved,
            Err(err) => {
                tracing::warn!(error = %err, "Ignoring unusable saved state file");
                HashMap::new()
            }
        };
        tracing::debug!(path = %path.display(), entries = saved.len(), "Saved state loaded");
        Self {
            path,
            table: Mutex::new(SnapshotTable::with_saved(saved)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Invoke every provider and write all snapshots to disk.
    ///
    /// Returns how many snapshots were refreshed. Snapshots whose provider is
    /// gone are written back unchanged.
    pub fn perform_save(&self) -> Result<usize, SavedStateError> {
        let providers = self.table.lock().providers();
        let collected = collect(providers);
        let count = collected.len();

        let file = {
            let mut table = self.table.lock();
            for (key, snapshot) in collected {
                table.store(key, snapshot);
            }
            SavedStateFile {
                version: FILE_VERSION,
                entries: table
                    .saved()
                    .iter()
                    .map(|(key, snapshot)| (key.clone(), snapshot.clone()))
                    .collect(),
            }
        };

        write_file(&self.path, &file)?;
        tracing::debug!(path = %self.path.display(), count, "Saved state written");
        Ok(count)
    }
}

impl SavedStateRegistry for FileSavedStateRegistry {
    fn get(&self, key: &str) -> Option<Snapshot> {
        self.table.lock().get(key)
    }

    fn register_provider(&self, key: &str, provider: SnapshotProvider) {
        self.table.lock().register(key, provider);
    }

    fn unregister_provider(&self, key: &str, provider: &SnapshotProvider) {
        self.table.lock().unregister(key, provider);
    }
}

fn load_entries(path: &Path) -> Result<HashMap<String, Snapshot>, SavedStateError> {
    if !path.exists() {
        return Ok(HashMap::new());
    }

    let content = fs::read_to_string(path).map_err(|source| SavedStateError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file: SavedStateFile =
        serde_json::from_str(&content).map_err(|source| SavedStateError::Decode {
            path: path.to_path_buf(),
            source,
        })?;

    if file.version != FILE_VERSION {
        return Err(SavedStateError::UnsupportedVersion {
            path: path.to_path_buf(),
            version: file.version,
        });
    }

    Ok(file.entries.into_iter().collect())
}

fn write_file(path: &Path, file: &SavedStateFile) -> Result<(), SavedStateError> {
    let io_err = |source: std::io::Error| SavedStateError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
    }

    let lock_path = path.with_extension("lock");
    let lock_file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&lock_path)
        .map_err(io_err)?;
    lock_file
        .lock_exclusive()
        .map_err(|source| SavedStateError::Lock {
            path: lock_path.clone(),
            source,
        })?;

    let content =
        serde_json::to_string_pretty(file).map_err(|source| SavedStateError::Serialize {
            path: path.to_path_buf(),
            source,
        })?;
    let tmp_path = path.with_extension("json.tmp");
    let result = File::create(&tmp_path)
        .and_then(|mut tmp| {
            tmp.write_all(content.as_bytes())?;
            tmp.sync_all()
        })
        .and_then(|()| fs::rename(&tmp_path, path))
        .map_err(io_err);

    if let Err(err) = FileExt::unlock(&lock_file) {
        tracing::trace!(error = %err, "Saved state lock release failed");
    }
    result
}
