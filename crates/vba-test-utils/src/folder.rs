//! [`TestFolder`] for module folders on disk.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use vba_fs::NormalizedPath;

/// A temporary folder with helpers for writing and inspecting module files.
pub struct TestFolder {
    temp_dir: TempDir,
}

impl Default for TestFolder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestFolder {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Root as a [`NormalizedPath`], ready to hand to the engine.
    pub fn normalized(&self) -> NormalizedPath {
        NormalizedPath::new(self.root())
    }

    /// Absolute path of `relative`.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    /// Write `content` to `relative`, creating parent folders.
    pub fn write(&self, relative: &str, content: &str) -> &Self {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content)
            .unwrap_or_else(|e| panic!("TestFolder::write: {}: {e}", path.display()));
        self
    }

    pub fn mkdir(&self, relative: &str) -> &Self {
        fs::create_dir_all(self.path(relative)).unwrap();
        self
    }

    pub fn read(&self, relative: &str) -> String {
        let path = self.path(relative);
        fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("TestFolder::read: {}: {e}", path.display()))
    }

    /// Names of the regular files directly inside `relative` ("" for root).
    pub fn file_names(&self, relative: &str) -> BTreeSet<String> {
        let dir = if relative.is_empty() {
            self.root().to_path_buf()
        } else {
            self.path(relative)
        };
        fs::read_dir(&dir)
            .unwrap_or_else(|e| panic!("TestFolder::file_names: {}: {e}", dir.display()))
            .map(|entry| entry.unwrap())
            .filter(|entry| entry.file_type().unwrap().is_file())
            .map(|entry| entry.file_name().to_string_lossy().to_string())
            .collect()
    }

    /// Assert that `relative` exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_exists(&self, relative: &str) {
        let full_path = self.path(relative);
        assert!(
            full_path.exists(),
            "Expected path to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `relative` does not exist.
    pub fn assert_missing(&self, relative: &str) {
        let full_path = self.path(relative);
        assert!(
            !full_path.exists(),
            "Expected path to be absent: {}",
            full_path.display()
        );
    }
}
