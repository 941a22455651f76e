// src/fs/mock.rs

use super::FileSystem;
use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone)]
struct MockFile {
    content: Vec<u8>,
    modified: SystemTime,
}

#[derive(Debug, Default)]
struct MockState {
    files: HashMap<PathBuf, MockFile>,
    space: HashMap<PathBuf, u64>,
    // Logical clock so every write gets a distinct, increasing mtime.
    clock: u64,
}

/// In-memory filesystem for tests.
///
/// Clones share the same underlying state, so a test can keep one handle to
/// edit files while the code under test reads through another.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    state: Arc<Mutex<MockState>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or overwrite a file, bumping its modification time.
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let mut state = self.state.lock().unwrap();
        state.clock += 1;
        let modified = UNIX_EPOCH + Duration::from_secs(state.clock);
        state.files.insert(
            path.as_ref().to_path_buf(),
            MockFile {
                content: content.into(),
                modified,
            },
        );
    }

    /// Bump the modification time without changing the content.
    pub fn touch(&self, path: impl AsRef<Path>) {
        let mut state = self.state.lock().unwrap();
        state.clock += 1;
        let modified = UNIX_EPOCH + Duration::from_secs(state.clock);
        if let Some(file) = state.files.get_mut(path.as_ref()) {
            file.modified = modified;
        }
    }

    pub fn remove_file(&self, path: impl AsRef<Path>) {
        let mut state = self.state.lock().unwrap();
        state.files.remove(path.as_ref());
    }

    pub fn set_available_space(&self, dir: impl AsRef<Path>, bytes: u64) {
        let mut state = self.state.lock().unwrap();
        state.space.insert(dir.as_ref().to_path_buf(), bytes);
    }
}

impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        let state = self.state.lock().unwrap();
        match state.files.get(path) {
            Some(file) => String::from_utf8(file.content.clone())
                .map_err(|e| anyhow!("Invalid UTF-8: {}", e)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn modified(&self, path: &Path) -> Result<SystemTime> {
        let state = self.state.lock().unwrap();
        state
            .files
            .get(path)
            .map(|f| f.modified)
            .ok_or_else(|| anyhow!("File not found: {:?}", path))
    }

    fn available_space(&self, path: &Path) -> Result<u64> {
        let state = self.state.lock().unwrap();
        state
            .space
            .get(path)
            .copied()
            .ok_or_else(|| anyhow!("No such directory: {:?}", path))
    }
}
