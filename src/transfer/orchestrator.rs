use serde::Serialize;
use tracing::{info, warn};

use super::cache::FailedDirPolicy;
use super::ftp_like::{Credentials, FtpLike};
use super::provision::DirectoryProvisioner;
use super::record::FileRecord;
use crate::TransferError;
use crate::util::progress_label;

/// Result of one file's upload attempt.
#[derive(Debug)]
pub struct UploadOutcome {
    pub remote_path: String,
    pub result: Result<u64, TransferError>,
}

impl UploadOutcome {
    pub fn succeeded(&self) -> bool {
        self.result.is_ok()
    }
}

/// Per-file outcomes in processing order.
#[derive(Debug, Default)]
pub struct UploadReport {
    pub outcomes: Vec<UploadOutcome>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct FailedUpload {
    pub remote_path: String,
    pub error: String,
}

impl UploadReport {
    pub fn uploaded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.succeeded()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.uploaded()
    }

    pub fn bytes(&self) -> u64 {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok()).sum()
    }

    pub fn failures(&self) -> Vec<FailedUpload> {
        self.outcomes
            .iter()
            .filter_map(|o| match &o.result {
                Err(e) => {
                    Some(FailedUpload { remote_path: o.remote_path.clone(), error: e.to_string() })
                }
                Ok(_) => None,
            })
            .collect()
    }
}

/// `base` with exactly one trailing slash, followed by `remote_path`.
pub fn remote_target(base: &str, remote_path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), remote_path)
}

/// Uploads records one after another. Directory provisioning always runs
/// before the transfer, and a failure only affects its own file.
pub struct UploadOrchestrator<F: FtpLike> {
    ftp: F,
    provisioner: DirectoryProvisioner,
}

impl<F: FtpLike> UploadOrchestrator<F> {
    pub fn new(ftp: F, policy: FailedDirPolicy) -> Self {
        Self { ftp, provisioner: DirectoryProvisioner::new(policy) }
    }

    pub fn ftp(&self) -> &F {
        &self.ftp
    }

    pub fn provisioner(&self) -> &DirectoryProvisioner {
        &self.provisioner
    }

    pub fn upload_all(
        &mut self,
        records: &[FileRecord],
        remote_base: &str,
        credentials: &Credentials,
    ) -> UploadReport {
        let total = records.len();
        let mut report = UploadReport::default();
        for (i, record) in records.iter().enumerate() {
            info!("{}: Uploading {}", progress_label(i + 1, total), record.remote_path());
            let result = self.upload_one(record, remote_base, credentials);
            report
                .outcomes
                .push(UploadOutcome { remote_path: record.remote_path().to_string(), result });
        }
        report
    }

    pub fn upload_one(
        &mut self,
        record: &FileRecord,
        remote_base: &str,
        credentials: &Credentials,
    ) -> Result<u64, TransferError> {
        let target = remote_target(remote_base, record.remote_path());
        self.provisioner.ensure_directories(&mut self.ftp, &target, credentials);
        let result = self.ftp.store(&target, record.local_path(), credentials);
        if let Err(e) = &result {
            warn!("Failed to upload \"{}\": \"{}\"", record.remote_path(), e);
        }
        result
    }

    /// Close the connection and hand back the client.
    pub fn finish(mut self) -> F {
        self.ftp.finish();
        self.ftp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::capture::transcript_of;
    use crate::transfer::mock::RecordingFtp;

    #[test]
    fn target_has_exactly_one_separator() {
        assert_eq!(remote_target("ftp://h/site", "a/b.png"), "ftp://h/site/a/b.png");
        assert_eq!(remote_target("ftp://h/site/", "a/b.png"), "ftp://h/site/a/b.png");
        assert_eq!(remote_target("ftp://h/site//", "x.css"), "ftp://h/site/x.css");
    }

    #[test]
    fn report_counts_successes_failures_and_bytes() {
        let report = UploadReport {
            outcomes: vec![
                UploadOutcome { remote_path: "a".into(), result: Ok(10) },
                UploadOutcome {
                    remote_path: "b".into(),
                    result: Err(TransferError::Store("ftp://h/b".into(), "553 no".into())),
                },
                UploadOutcome { remote_path: "c".into(), result: Ok(5) },
            ],
        };
        assert_eq!(report.uploaded(), 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.bytes(), 15);
        assert_eq!(
            report.failures(),
            vec![FailedUpload { remote_path: "b".into(), error: "553 no".into() }]
        );
    }

    #[test]
    fn directories_are_provisioned_before_each_store() {
        let mut orch = UploadOrchestrator::new(RecordingFtp::new(), FailedDirPolicy::default());
        let rec = FileRecord::new("/src/css/site.css", "/src");
        let creds = Credentials::new("u", "p");
        orch.upload_one(&rec, "ftp://host/www", &creds).unwrap();
        let ftp = orch.finish();
        assert!(ftp.finished);
        assert_eq!(ftp.made_dirs(), vec!["ftp://host/www", "ftp://host/www/css"]);
        assert_eq!(ftp.stored_urls(), vec!["ftp://host/www/css/site.css"]);
    }

    #[test]
    fn transcript_shows_progress_and_every_failure() {
        let records = vec![
            FileRecord::new("/src/img/a.png", "/src"),
            FileRecord::new("/src/b.html", "/src"),
        ];
        let ftp = RecordingFtp::new()
            .fail_make_dir("ftp://host/www/img")
            .fail_store("ftp://host/www/b.html");
        let mut orch = UploadOrchestrator::new(ftp, FailedDirPolicy::default());
        let creds = Credentials::new("u", "p");

        let (report, lines) =
            transcript_of(|| orch.upload_all(&records, "ftp://host/www", &creds));

        assert_eq!(
            lines,
            vec![
                "001/002: Uploading img/a.png",
                "Create dir: ftp://host/www",
                "257 \"ftp://host/www\" created",
                "Create dir: ftp://host/www/img",
                "Failed to create directory on target machine: ftp://host/www/img",
                "FtpError: 550 simulated mkdir failure",
                "002/002: Uploading b.html",
                "Failed to upload \"b.html\": \"553 simulated store failure\"",
            ]
        );
        assert_eq!(report.uploaded(), 1);
        assert_eq!(report.failed(), 1);
    }
}
