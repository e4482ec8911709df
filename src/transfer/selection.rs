use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use tracing::info;
use walkdir::WalkDir;

use super::record::FileRecord;
use crate::TransferError;
use crate::config::UploadConfig;
use crate::util::compact_path_for_display;

/// A regular file found under the source root.
#[derive(Debug, Clone)]
pub struct LocalEntry {
    pub path: PathBuf,
    pub modified: SystemTime,
}

/// Bucket a file falls into by its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileClass {
    Eligible,
    Ignored,
    Unexpected,
}

#[derive(Serialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SelectionCounters {
    pub files_on_disk: usize,
    pub too_old: usize,
    pub wrong_type: usize,
    pub ignored: usize,
}

#[derive(Debug, Default)]
pub struct Selection {
    /// Reverse of discovery order.
    pub records: Vec<FileRecord>,
    pub counters: SelectionCounters,
}

/// Lowercase text after the last `.` of the file name. A dot file such as
/// `.htaccess` is all extension.
pub fn file_extension(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_string_lossy();
    let pos = name.rfind('.')?;
    Some(name[pos + 1..].to_ascii_lowercase())
}

/// Extension as written on disk, with its leading dot. Empty when the name
/// has no dot or ends with one.
pub fn shown_extension(path: &Path) -> String {
    let name = match path.file_name() {
        Some(n) => n.to_string_lossy(),
        None => return String::new(),
    };
    match name.rfind('.') {
        Some(pos) if pos + 1 < name.len() => name[pos..].to_string(),
        _ => String::new(),
    }
}

/// List regular files under `root`, at most `max_depth` levels down, sorted by
/// name within each directory. Symbolic links are followed, so a link to a
/// file is listed as that file.
pub fn walk_local(root: &Path, max_depth: usize) -> Result<Vec<LocalEntry>, TransferError> {
    if !root.is_dir() {
        return Err(TransferError::SourceMissing(root.display().to_string()));
    }
    let walker =
        WalkDir::new(root).follow_links(true).min_depth(1).max_depth(max_depth).sort_by_file_name();
    let mut entries = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::debug!("[scan] skipping unreadable entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let modified = entry.metadata().ok().and_then(|m| m.modified().ok()).unwrap_or(UNIX_EPOCH);
        entries.push(LocalEntry { path: entry.into_path(), modified });
    }
    Ok(entries)
}

pub struct SelectionPolicy {
    eligible: Vec<String>,
    ignored: Vec<String>,
    max_age_hours: f64,
    max_depth: usize,
    display_width: usize,
}

impl SelectionPolicy {
    pub fn from_config(config: &UploadConfig) -> Self {
        Self {
            eligible: config.eligible_extensions.clone(),
            ignored: config.ignored_extensions.clone(),
            max_age_hours: config.max_age_hours,
            max_depth: config.max_depth,
            display_width: config.display_width,
        }
    }

    pub fn classify(&self, extension: Option<&str>) -> FileClass {
        match extension {
            Some(ext) if self.eligible.iter().any(|e| e == ext) => FileClass::Eligible,
            Some(ext) if self.ignored.iter().any(|e| e == ext) => FileClass::Ignored,
            _ => FileClass::Unexpected,
        }
    }

    /// Walk `root` and pick the files to upload.
    pub fn select(&self, root: &Path) -> Result<Selection, TransferError> {
        let entries = walk_local(root, self.max_depth)?;
        Ok(self.select_entries(root, entries, SystemTime::now()))
    }

    /// Classify already-discovered files as of `now`.
    pub fn select_entries(
        &self,
        base_directory: &Path,
        entries: impl IntoIterator<Item = LocalEntry>,
        now: SystemTime,
    ) -> Selection {
        let mut selection = Selection::default();
        for entry in entries {
            selection.counters.files_on_disk += 1;
            let shown = compact_path_for_display(&entry.path, self.display_width);
            let extension = file_extension(&entry.path);
            match self.classify(extension.as_deref()) {
                FileClass::Eligible => {
                    // a modification time in the future counts as brand new
                    let age_hours = now
                        .duration_since(entry.modified)
                        .map(|d| d.as_secs_f64() / 3600.0)
                        .unwrap_or(0.0);
                    if age_hours < self.max_age_hours {
                        selection.records.push(FileRecord::new(entry.path, base_directory));
                        info!("File added: {}", shown);
                    } else {
                        selection.counters.too_old += 1;
                        info!("File unchanged: {}", shown);
                    }
                }
                FileClass::Ignored => {
                    selection.counters.ignored += 1;
                    info!("Ignoring file: {}", shown);
                }
                FileClass::Unexpected => {
                    selection.counters.wrong_type += 1;
                    let ext = shown_extension(&entry.path);
                    info!("Unexpected file extension: {} on file {}", ext, shown);
                }
            }
        }
        // every accepted file was added at the front of the list
        selection.records.reverse();
        selection
    }
}
