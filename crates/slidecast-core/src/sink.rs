// ABOUTME: The SinkDirectory abstraction over externally-owned, name-keyed output targets.
// ABOUTME: Sinks are resolved fresh by name on every use; no handle is ever cached across calls.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Name-keyed lookup of external output targets. The targets are owned by
/// another part of the host system and can be renamed or deleted at any
/// time, so implementations must resolve the name on every call rather
/// than holding on to anything.
pub trait SinkDirectory: Send {
    /// Whether a sink with this name currently exists.
    fn exists(&self, name: &str) -> bool;

    /// Replace the sink's content wholesale. Returns false when the sink
    /// cannot be resolved; pushing the same text twice has no additional
    /// effect.
    fn push(&self, name: &str, text: &str) -> bool;
}

impl<T: SinkDirectory + Sync + ?Sized> SinkDirectory for Arc<T> {
    fn exists(&self, name: &str) -> bool {
        (**self).exists(name)
    }

    fn push(&self, name: &str, text: &str) -> bool {
        (**self).push(name, text)
    }
}

/// Sinks as plain files under a directory: a sink "exists" while its file
/// does, and a push rewrites the file. The files are created and removed by
/// whatever consumes them (e.g. a text source reading from disk).
pub struct FileSinkDirectory {
    root: PathBuf,
}

impl FileSinkDirectory {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

impl SinkDirectory for FileSinkDirectory {
    fn exists(&self, name: &str) -> bool {
        self.path_for(name).is_file()
    }

    fn push(&self, name: &str, text: &str) -> bool {
        let path = self.path_for(name);
        if !path.is_file() {
            return false;
        }
        match std::fs::write(&path, text) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("failed to write sink file {}: {}", path.display(), e);
                false
            }
        }
    }
}

/// In-memory sink directory for tests and embedding. Sinks must be
/// registered before a push to them resolves, mirroring external ownership.
#[derive(Default)]
pub struct MemorySinkDirectory {
    names: Mutex<HashSet<String>>,
    contents: Mutex<HashMap<String, String>>,
}

impl MemorySinkDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, name: &str) {
        self.names.lock().expect("sink registry poisoned").insert(name.to_string());
    }

    pub fn unregister(&self, name: &str) {
        self.names.lock().expect("sink registry poisoned").remove(name);
    }

    /// Last text pushed to the named sink, if any.
    pub fn last(&self, name: &str) -> Option<String> {
        self.contents
            .lock()
            .expect("sink contents poisoned")
            .get(name)
            .cloned()
    }
}

impl SinkDirectory for MemorySinkDirectory {
    fn exists(&self, name: &str) -> bool {
        self.names.lock().expect("sink registry poisoned").contains(name)
    }

    fn push(&self, name: &str, text: &str) -> bool {
        if !self.exists(name) {
            return false;
        }
        self.contents
            .lock()
            .expect("sink contents poisoned")
            .insert(name.to_string(), text.to_string());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn memory_sink_requires_registration() {
        let dir = MemorySinkDirectory::new();

        assert!(!dir.exists("caption"));
        assert!(!dir.push("caption", "hello"));
        assert!(dir.last("caption").is_none());

        dir.register("caption");
        assert!(dir.exists("caption"));
        assert!(dir.push("caption", "hello"));
        assert_eq!(dir.last("caption").as_deref(), Some("hello"));
    }

    #[test]
    fn memory_sink_push_replaces_content() {
        let dir = MemorySinkDirectory::new();
        dir.register("caption");

        dir.push("caption", "first");
        dir.push("caption", "second");
        assert_eq!(dir.last("caption").as_deref(), Some("second"));
    }

    #[test]
    fn shared_directory_handle_works_as_a_boxed_trait_object() {
        fn assert_send<T: Send + ?Sized>(_: &T) {}

        let dir = Arc::new(MemorySinkDirectory::new());
        dir.register("caption");

        let boxed: Box<dyn SinkDirectory> = Box::new(Arc::clone(&dir));
        assert_send(&*boxed);
        assert!(boxed.exists("caption"));
        assert!(boxed.push("caption", "shared"));
        assert_eq!(dir.last("caption").as_deref(), Some("shared"));
    }

    #[test]
    fn file_sink_resolves_only_existing_files() {
        let tmp = TempDir::new().unwrap();
        let dir = FileSinkDirectory::new(tmp.path().to_path_buf());

        assert!(!dir.exists("out.txt"));
        assert!(!dir.push("out.txt", "text"));

        std::fs::write(tmp.path().join("out.txt"), "").unwrap();
        assert!(dir.exists("out.txt"));
        assert!(dir.push("out.txt", "text"));
        assert_eq!(
            std::fs::read_to_string(tmp.path().join("out.txt")).unwrap(),
            "text"
        );
    }

    #[test]
    fn file_sink_loses_removed_files() {
        let tmp = TempDir::new().unwrap();
        let dir = FileSinkDirectory::new(tmp.path().to_path_buf());
        std::fs::write(tmp.path().join("out.txt"), "").unwrap();
        assert!(dir.exists("out.txt"));

        std::fs::remove_file(tmp.path().join("out.txt")).unwrap();
        assert!(!dir.exists("out.txt"));
        assert!(!dir.push("out.txt", "late"));
    }
}
