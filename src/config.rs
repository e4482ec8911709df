use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::transfer::cache::FailedDirPolicy;
use crate::transfer::session::SessionSettings;

/// Run settings. Every field may be omitted from the JSON file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct UploadConfig {
    /// Eligible files modified less than this many hours ago are uploaded.
    pub max_age_hours: f64,
    pub max_depth: usize,
    /// Character width of the compacted paths shown in the transcript.
    pub display_width: usize,
    pub eligible_extensions: Vec<String>,
    pub ignored_extensions: Vec<String>,
    pub failed_dir_policy: FailedDirPolicy,
    pub connect_timeout_secs: u64,
    pub io_timeout_secs: u64,
    pub default_port: u16,
}

impl Default for UploadConfig {
    fn default() -> Self {
        let owned = |xs: &[&str]| xs.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        UploadConfig {
            max_age_hours: 1.0,
            max_depth: 20,
            display_width: 40,
            eligible_extensions: owned(&[
                "html", "css", "xml", "js", "json", "rss", "jpg", "gif", "png",
            ]),
            ignored_extensions: owned(&["htaccess", "ico"]),
            failed_dir_policy: FailedDirPolicy::default(),
            connect_timeout_secs: 10,
            io_timeout_secs: 30,
            default_port: 21,
        }
    }
}

impl UploadConfig {
    /// `~/.fmu/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".fmu").join("config.json"))
    }

    pub fn read_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config file {}", path.display()))?;
        let mut cfg: UploadConfig = serde_json::from_str(&content)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        cfg.normalize_extensions();
        Ok(cfg)
    }

    /// An explicitly named file must load; the default location is optional and
    /// falls back to built-in values when it is missing or broken.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(p) = explicit {
            return Self::read_from(p);
        }
        match Self::default_path() {
            Some(p) if p.exists() => match Self::read_from(&p) {
                Ok(cfg) => Ok(cfg),
                Err(e) => {
                    tracing::warn!("{:#}; using built-in defaults", e);
                    Ok(Self::default())
                }
            },
            _ => Ok(Self::default()),
        }
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            io_timeout: Duration::from_secs(self.io_timeout_secs),
            default_port: self.default_port,
        }
    }

    // extensions are compared lowercase and without the leading dot
    fn normalize_extensions(&mut self) {
        for list in [&mut self.eligible_extensions, &mut self.ignored_extensions] {
            for ext in list.iter_mut() {
                *ext = ext.trim_start_matches('.').to_ascii_lowercase();
            }
        }
    }
}
