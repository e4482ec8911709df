use std::path::{Path, PathBuf};

/// One local file chosen for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    local_path: PathBuf,
    base_directory: PathBuf,
    remote_path: String,
}

impl FileRecord {
    pub fn new(local_path: impl Into<PathBuf>, base_directory: impl Into<PathBuf>) -> Self {
        let local_path = local_path.into();
        let base_directory = base_directory.into();
        let remote_path = derive_remote_path(
            &local_path.to_string_lossy(),
            &base_directory.to_string_lossy(),
        );
        Self { local_path, base_directory, remote_path }
    }

    pub fn local_path(&self) -> &Path {
        &self.local_path
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// Path relative to the scanned root, forward slashes, no leading slash.
    pub fn remote_path(&self) -> &str {
        &self.remote_path
    }
}

/// Strip `base` from the front of `local`, convert backslashes and drop one
/// leading slash.
pub fn derive_remote_path(local: &str, base: &str) -> String {
    let rel = local.strip_prefix(base).unwrap_or(local).replace('\\', "/");
    match rel.strip_prefix('/') {
        Some(stripped) => stripped.to_string(),
        None => rel,
    }
}
