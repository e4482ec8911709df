// transfer module: file selection, remote directory provisioning and upload
pub mod cache;
pub mod ftp_like;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;
pub mod orchestrator;
pub mod provision;
pub mod record;
pub mod selection;
pub mod session;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Local;
use tracing::info;

use crate::config::UploadConfig;
use crate::util::{format_timestamp, print_json_summary, print_report};

pub use self::cache::{FailedDirPolicy, RemoteDirectoryCache};
pub use self::ftp_like::{Credentials, FtpClient, FtpLike};
pub use self::orchestrator::{UploadOrchestrator, UploadOutcome, UploadReport};
pub use self::provision::DirectoryProvisioner;
pub use self::record::FileRecord;
pub use self::selection::{Selection, SelectionCounters, SelectionPolicy};

/// Arguments for `run_upload`, grouped to avoid a long parameter list.
#[derive(Debug, Clone)]
pub struct RunArgs {
    pub target: String,
    pub credentials: Credentials,
    pub source: PathBuf,
    pub json: bool,
}

/// Everything a finished run produced.
#[derive(Debug)]
pub struct RunSummary {
    pub counters: SelectionCounters,
    pub selected: usize,
    pub report: UploadReport,
    pub elapsed_secs: f64,
}

/// Scan `source` and upload the selected files with a real FTP client.
pub fn run_upload(config: &UploadConfig, args: RunArgs) -> Result<RunSummary> {
    let client = FtpClient::new(config.session_settings());
    run_upload_with(config, args, client)
}

/// Same as [`run_upload`] with any `FtpLike` implementation.
///
/// Only a missing source directory returns `Err`; once uploading starts every
/// failure is logged and recorded in the report.
pub fn run_upload_with<F: FtpLike>(
    config: &UploadConfig,
    args: RunArgs,
    ftp: F,
) -> Result<RunSummary> {
    let RunArgs { target, credentials, source, json } = args;
    let source = std::path::absolute(&source)
        .with_context(|| format!("cannot resolve source directory {}", source.display()))?;
    if !source.is_dir() {
        return Err(crate::TransferError::SourceMissing(source.display().to_string()).into());
    }

    let selection = SelectionPolicy::from_config(config).select(&source)?;
    let Selection { records, counters } = selection;
    info!("Files on disk: {}", counters.files_on_disk);
    info!("Too old to include: {}", counters.too_old);
    info!("Wrong type: {}", counters.wrong_type);

    info!("Start time: {}", format_timestamp(&Local::now()));
    let start = Instant::now();

    let mut orchestrator = UploadOrchestrator::new(ftp, config.failed_dir_policy);
    let report = orchestrator.upload_all(&records, &target, &credentials);
    tracing::debug!(
        "[run] {} remote directories handled",
        orchestrator.provisioner().cache().len()
    );
    orchestrator.finish();

    info!("End time: {}", format_timestamp(&Local::now()));
    let summary = RunSummary {
        counters,
        selected: records.len(),
        report,
        elapsed_secs: start.elapsed().as_secs_f64(),
    };

    print_report(&summary.report);
    if json {
        print_json_summary(&summary);
    }
    Ok(summary)
}
