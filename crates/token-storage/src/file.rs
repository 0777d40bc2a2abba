//! File-backed storage that survives process restarts.
//!
//! The whole key space is kept as one JSON object. Every mutation rewrites
//! the file through a temporary sibling and a rename so a crash never
//! leaves a half-written session behind.

use crate::{KeyValueStore, StorageError, StorageResult};
use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

/// JSON file storage, cached in memory after the first read.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    data: Mutex<HashMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`. A missing file is an empty store.
    ///
    /// An unreadable or corrupted file is treated as empty (and replaced on
    /// the next write) so a damaged session never blocks signing in again.
    pub fn open(path: &Path) -> StorageResult<Self> {
        let data = match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str::<HashMap<String, String>>(&content) {
                Ok(map) => map,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "Session file is corrupted, starting empty");
                    HashMap::new()
                }
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => HashMap::new(),
            Err(err) => return Err(StorageError::Io(err)),
        };

        debug!(path = %path.display(), entries = data.len(), "Opened file store");

        Ok(Self {
            path: path.to_path_buf(),
            data: Mutex::new(data),
        })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, HashMap<String, String>>> {
        self.data
            .lock()
            .map_err(|_| StorageError::Backend("file store lock poisoned".to_string()))
    }

    fn persist(&self, data: &HashMap<String, String>) -> StorageResult<()> {
        let content = serde_json::to_string_pretty(data)
            .map_err(|e| StorageError::Encoding(e.to_string()))?;
        write_atomic(&self.path, content.as_bytes())?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut data = self.lock()?;
        data.insert(key.to_string(), value.to_string());
        self.persist(&data)
    }

    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn delete(&self, key: &str) -> StorageResult<bool> {
        let mut data = self.lock()?;
        let existed = data.remove(key).is_some();
        if existed {
            self.persist(&data)?;
        }
        Ok(existed)
    }
}

fn write_atomic(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir)?;

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("session.json");
    let tmp_path = dir.join(format!(
        ".{}.tmp.{}",
        file_name,
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ));

    let result = (|| -> io::Result<()> {
        let mut options = fs::OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(&tmp_path)?;
        file.write_all(content)?;
        file.sync_all()?;
        fs::rename(&tmp_path, path)
    })();

    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}
