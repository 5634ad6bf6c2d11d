// ABOUTME: RecordStore persists one JSON record per container under the data directory.
// ABOUTME: Saves overwrite wholesale via temp-file rename; recovery skips unreadable records with a warning.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use slidecast_core::Container;
use thiserror::Error;
use ulid::Ulid;

/// Errors from durable record operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Filesystem layout for container records: `<home>/containers/<ulid>.json`,
/// file basename equal to the container id. In-memory state is always
/// authoritative; a record is a best-effort mirror, not a transaction.
pub struct RecordStore {
    dir: PathBuf,
}

impl RecordStore {
    /// Create a store rooted at the given home directory, creating the
    /// records subdirectory if needed.
    pub fn new(home: PathBuf) -> Result<Self, StoreError> {
        let dir = home.join("containers");
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, id: Ulid) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    /// Overwrite the container's record wholesale (write to .tmp, fsync,
    /// rename). Idempotent for identical state.
    pub fn save(&self, container: &Container) -> Result<(), StoreError> {
        let tmp_path = self.dir.join(format!("{}.json.tmp", container.id));
        let final_path = self.record_path(container.id);

        let json = serde_json::to_string_pretty(container)?;

        let mut file = File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
        drop(file);

        fs::rename(&tmp_path, &final_path)?;
        Ok(())
    }

    /// Read a single record by id.
    pub fn load(&self, id: Ulid) -> Result<Container, StoreError> {
        let contents = fs::read_to_string(self.record_path(id))?;
        let container: Container = serde_json::from_str(&contents)?;
        Ok(container)
    }

    /// Enumerate every record in the directory. Unreadable, structurally
    /// invalid, or misnamed records are skipped with a warning rather than
    /// failing startup. Persisted selections are clamped back into bounds.
    pub fn load_all(&self) -> Result<Vec<Container>, StoreError> {
        let mut containers = Vec::new();

        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }

            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default();
            let Ok(id) = stem.parse::<Ulid>() else {
                tracing::warn!("skipping non-ULID record in {}: {}", self.dir.display(), stem);
                continue;
            };

            match self.load(id) {
                Ok(mut container) => {
                    container.clamp_index();
                    containers.push(container);
                }
                Err(e) => {
                    tracing::warn!("skipping unreadable record {}: {}", path.display(), e);
                }
            }
        }

        Ok(containers)
    }

    /// Remove a container's record. Returns false if no record existed.
    pub fn delete(&self, id: Ulid) -> Result<bool, StoreError> {
        let path = self.record_path(id);
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(path)?;
        Ok(true)
    }

    pub fn record_exists(&self, id: Ulid) -> bool {
        self.record_path(id).exists()
    }
}
