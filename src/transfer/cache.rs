use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::MkdirError;

/// What to remember after a directory creation attempt.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FailedDirPolicy {
    /// Every attempt is remembered; a failed directory is not tried again this run.
    #[default]
    MarkAttempted,
    /// Only successful creations are remembered; failures are retried by the next file.
    RetryOnFailure,
}

impl FailedDirPolicy {
    pub fn remember<T>(self, outcome: &Result<T, MkdirError>) -> bool {
        match self {
            FailedDirPolicy::MarkAttempted => true,
            FailedDirPolicy::RetryOnFailure => outcome.is_ok(),
        }
    }
}

/// Remote directories already handled in this run, in the order they were added.
#[derive(Debug, Default, Clone)]
pub struct RemoteDirectoryCache {
    seen: HashSet<String>,
    order: Vec<String>,
    policy: FailedDirPolicy,
}

impl RemoteDirectoryCache {
    pub fn new(policy: FailedDirPolicy) -> Self {
        Self { policy, ..Default::default() }
    }

    pub fn contains(&self, dir: &str) -> bool {
        self.seen.contains(dir)
    }

    /// Record the outcome of a creation attempt. Returns whether `dir` is now cached.
    pub fn record<T>(&mut self, dir: &str, outcome: &Result<T, MkdirError>) -> bool {
        if self.seen.contains(dir) {
            return true;
        }
        if !self.policy.remember(outcome) {
            return false;
        }
        self.seen.insert(dir.to_string());
        self.order.push(dir.to_string());
        true
    }

    pub fn policy(&self) -> FailedDirPolicy {
        self.policy
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }
}
