use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::ftp_like::{Credentials, FtpLike};
use crate::{MkdirError, TransferError};

/// One call received by [`RecordingFtp`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FtpCall {
    MakeDir(String),
    Store { url: String, local: PathBuf },
}

// In-memory FtpLike that records calls and fails on configured URLs
#[derive(Debug, Default)]
pub struct RecordingFtp {
    pub calls: Vec<FtpCall>,
    failing_dirs: HashSet<String>,
    failing_stores: HashSet<String>,
    pub finished: bool,
}

impl RecordingFtp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_make_dir(mut self, dir_url: &str) -> Self {
        self.failing_dirs.insert(dir_url.to_string());
        self
    }

    pub fn fail_store(mut self, file_url: &str) -> Self {
        self.failing_stores.insert(file_url.to_string());
        self
    }

    pub fn made_dirs(&self) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                FtpCall::MakeDir(d) => Some(d.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn stored_urls(&self) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                FtpCall::Store { url, .. } => Some(url.clone()),
                _ => None,
            })
            .collect()
    }
}

impl FtpLike for RecordingFtp {
    fn make_dir(
        &mut self,
        dir_url: &str,
        _credentials: &Credentials,
    ) -> Result<String, MkdirError> {
        self.calls.push(FtpCall::MakeDir(dir_url.to_string()));
        if self.failing_dirs.contains(dir_url) {
            return Err(MkdirError::Rejected(
                dir_url.to_string(),
                "550 simulated mkdir failure".to_string(),
            ));
        }
        Ok(format!("257 \"{}\" created", dir_url))
    }

    fn store(
        &mut self,
        file_url: &str,
        local: &Path,
        _credentials: &Credentials,
    ) -> Result<u64, TransferError> {
        self.calls.push(FtpCall::Store { url: file_url.to_string(), local: local.to_path_buf() });
        if self.failing_stores.contains(file_url) {
            return Err(TransferError::Store(
                file_url.to_string(),
                "553 simulated store failure".to_string(),
            ));
        }
        Ok(std::fs::metadata(local).map(|m| m.len()).unwrap_or(0))
    }

    fn finish(&mut self) {
        self.finished = true;
    }
}
