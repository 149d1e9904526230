//! Forward-slash paths

use std::fmt;
use std::path::{Path, PathBuf};

/// A path stored with forward slashes.
///
/// Module folders are usually authored on Windows, so paths coming from
/// stored settings or the command line may carry backslashes. Everything
/// is kept with forward slashes and converted to the platform-native form
/// only at I/O boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedPath {
    inner: String,
}

impl NormalizedPath {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            inner: path.as_ref().to_string_lossy().replace('\\', "/"),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// The path in the form the OS expects.
    pub fn to_native(&self) -> PathBuf {
        self.inner.split('/').collect::<Vec<_>>().join(std::path::MAIN_SEPARATOR_STR).into()
    }

    /// Append a relative segment.
    ///
    /// An empty segment yields the path unchanged, so the root document's
    /// subpath `""` resolves to the target folder itself.
    pub fn join(&self, segment: &str) -> Self {
        let segment = segment.replace('\\', "/");
        let segment = segment.trim_start_matches('/');
        let inner = match (self.inner.as_str(), segment) {
            (_, "") => self.inner.clone(),
            ("", segment) => segment.to_string(),
            (base, segment) => format!("{}/{}", base.trim_end_matches('/'), segment),
        };
        Self { inner }
    }

    /// The containing folder, `None` for a bare name.
    pub fn parent(&self) -> Option<Self> {
        let (dir, _) = self.inner.trim_end_matches('/').rsplit_once('/')?;
        let inner = if dir.is_empty() { "/" } else { dir };
        Some(Self {
            inner: inner.to_string(),
        })
    }

    /// Last component of the path.
    pub fn file_name(&self) -> Option<&str> {
        match self.inner.trim_end_matches('/').rsplit('/').next() {
            Some("") | None => None,
            name => name,
        }
    }

    /// File name without its last extension. A leading dot does not start
    /// an extension.
    pub fn file_stem(&self) -> Option<&str> {
        let name = self.file_name()?;
        Some(split_extension(name).0)
    }

    /// Last extension, without the dot.
    pub fn extension(&self) -> Option<&str> {
        split_extension(self.file_name()?).1
    }

    pub fn exists(&self) -> bool {
        self.to_native().exists()
    }

    pub fn is_file(&self) -> bool {
        self.to_native().is_file()
    }
}

fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => (&name[..idx], Some(&name[idx + 1..])),
        _ => (name, None),
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner)
    }
}
