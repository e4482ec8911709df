use tracing::{info, warn};

use super::cache::{FailedDirPolicy, RemoteDirectoryCache};
use super::ftp_like::{Credentials, FtpLike};
use crate::TransferError;

/// Ancestor directories of a remote file URL, shortest first, host excluded.
///
/// `ftp://host/a/b/c/file.txt` yields `ftp://host/a`, `ftp://host/a/b` and
/// `ftp://host/a/b/c`. A URL with fewer than three `/`-separated parts yields
/// nothing.
pub fn directory_chain(target: &str) -> Result<Vec<String>, TransferError> {
    let parts: Vec<&str> = target.split('/').collect();
    if parts.len() < 3 {
        return Ok(Vec::new());
    }
    if !parts[0].ends_with(':') || !parts[1].is_empty() {
        return Err(TransferError::InvalidAddress(target.to_string()));
    }

    let mut dir = format!("{}/", parts[0]);
    let mut chain = Vec::new();
    for (i, segment) in parts.iter().enumerate().take(parts.len() - 1).skip(2) {
        dir.push('/');
        dir.push_str(segment);
        // index 2 is the bare authority
        if i < 3 {
            continue;
        }
        chain.push(dir.clone());
    }
    Ok(chain)
}

/// Creates the remote directories a file needs, each at most once per run.
#[derive(Debug, Default)]
pub struct DirectoryProvisioner {
    cache: RemoteDirectoryCache,
}

impl DirectoryProvisioner {
    pub fn new(policy: FailedDirPolicy) -> Self {
        Self { cache: RemoteDirectoryCache::new(policy) }
    }

    pub fn cache(&self) -> &RemoteDirectoryCache {
        &self.cache
    }

    /// Never fails: every problem is written to the transcript and the caller
    /// continues with the transfer.
    pub fn ensure_directories(
        &mut self,
        ftp: &mut dyn FtpLike,
        target: &str,
        credentials: &Credentials,
    ) {
        if let Err(e) = self.try_ensure(ftp, target, credentials) {
            warn!("Failed in create directory method: {}", target);
            warn!("{}: {}", e.kind(), e);
        }
    }

    fn try_ensure(
        &mut self,
        ftp: &mut dyn FtpLike,
        target: &str,
        credentials: &Credentials,
    ) -> Result<(), TransferError> {
        for dir in directory_chain(target)? {
            if self.cache.contains(&dir) {
                continue;
            }
            info!("Create dir: {}", dir);
            let outcome = ftp.make_dir(&dir, credentials);
            match &outcome {
                Ok(reply) => info!("{}", reply),
                Err(e) => {
                    warn!("Failed to create directory on target machine: {}", dir);
                    warn!("{}: {}", e.kind(), e);
                }
            }
            self.cache.record(&dir, &outcome);
        }
        Ok(())
    }
}
