use std::path::Path;

use chrono::{DateTime, TimeZone};
use tracing::{debug, info};

use crate::transfer::{RunSummary, UploadReport};

/// Try to enable ANSI escape sequence support on Windows consoles.
/// Returns true if enabling succeeded, false otherwise.
#[cfg(windows)]
pub fn try_enable_ansi_on_windows() -> bool {
    enable_ansi_support::enable_ansi_support().is_ok()
}

// ANSI is normally available outside Windows; nothing to enable.
#[cfg(not(windows))]
pub fn try_enable_ansi_on_windows() -> bool {
    false
}

/// Convert a byte count into a human readable string using IEC units (KiB/MiB/GiB).
pub fn human_bytes(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;
    let b = bytes as f64;
    if b >= GB {
        format!("{:.2} GiB", b / GB)
    } else if b >= MB {
        format!("{:.2} MiB", b / MB)
    } else if b >= KB {
        format!("{:.2} KiB", b / KB)
    } else {
        format!("{} B", bytes)
    }
}

/// Shorten a path to at most `width` characters, keeping its start and the
/// file name: `/very/l.../file.html`. When even the file name does not fit,
/// only its tail is kept behind `...`.
pub fn compact_path_for_display(path: &Path, width: usize) -> String {
    const ELLIPSIS: &str = "...";
    let full = path.to_string_lossy().replace('\\', "/");
    let len = full.chars().count();
    if len <= width {
        return full;
    }
    let name = full.rsplit('/').next().unwrap_or(&full);
    let name_len = name.chars().count();
    if name_len + ELLIPSIS.len() >= width {
        let keep = width.saturating_sub(ELLIPSIS.len());
        let tail: String = name.chars().skip(name_len - keep).collect();
        return format!("{}{}", ELLIPSIS, tail);
    }
    // room left for the head, minus the separator before the name
    let budget = width - name_len - ELLIPSIS.len() - 1;
    let head: String = full.chars().take(budget).collect();
    format!("{}{}/{}", head, ELLIPSIS, name)
}

/// `NNN/TTT`, both zero padded to three digits.
pub fn progress_label(current: usize, total: usize) -> String {
    format!("{:03}/{:03}", current, total)
}

/// `yyyy-MM-dd hh:mm:ss` with a 12-hour clock.
pub fn format_timestamp<Tz: TimeZone>(t: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    t.format("%Y-%m-%d %I:%M:%S").to_string()
}

/// Write the per-file outcome summary to the transcript.
pub fn print_report(report: &UploadReport) {
    info!("Uploaded: {}", report.uploaded());
    info!("Failed: {}", report.failed());
    debug!("Bytes sent: {}", human_bytes(report.bytes()));
    for f in report.failures() {
        info!("  failed: {}", f.remote_path);
    }
}

/// Print a single-line JSON summary for machine consumption.
pub fn print_json_summary(summary: &RunSummary) {
    let obj = serde_json::json!({
        "files_on_disk": summary.counters.files_on_disk,
        "too_old": summary.counters.too_old,
        "wrong_type": summary.counters.wrong_type,
        "ignored": summary.counters.ignored,
        "selected": summary.selected,
        "uploaded": summary.report.uploaded(),
        "failed": summary.report.failed(),
        "bytes": summary.report.bytes(),
        "elapsed_secs": summary.elapsed_secs,
        "failures": summary.report.failures(),
    });
    if let Ok(line) = serde_json::to_string(&obj) {
        println!("{}", line);
    }
}
