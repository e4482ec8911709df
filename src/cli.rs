use std::path::PathBuf;

use clap::Parser;

use crate::config::UploadConfig;
use crate::transfer::FailedDirPolicy;

#[derive(Parser, Debug)]
#[clap(author, version, long_about = None)]
#[clap(
    about = "Upload recently changed web files from a local folder to an FTP server",
    arg_required_else_help(true)
)]
pub struct Cli {
    #[clap(help = "Target address (ftp://ftp.mysite.com/myfolder - existing files will be overwritten)")]
    pub target: String,
    #[clap(help = "FTP username")]
    pub username: String,
    #[clap(help = "FTP password")]
    pub password: String,
    #[clap(help = "Source directory (\"C:\\MyFiles\")")]
    pub source: PathBuf,
    #[clap(help = "Log filename (\"C:\\Temp\\FtpMultiUpload.log\" - will be overwritten)")]
    pub log_file: PathBuf,

    #[clap(long, help = "Read settings from this JSON file instead of ~/.fmu/config.json")]
    pub config: Option<PathBuf>,
    #[clap(long = "max-age-hours", help = "Only upload files changed within this many hours")]
    pub max_age_hours: Option<f64>,
    #[clap(long = "max-depth", help = "Deepest directory level scanned below the source")]
    pub max_depth: Option<usize>,
    #[clap(long = "retry-failed-dirs", help = "Try a failed remote directory again for later files")]
    pub retry_failed_dirs: bool,
    #[clap(long, help = "Also print a one-line JSON summary")]
    pub json: bool,
    #[clap(short, long, help = "Include protocol diagnostics in the transcript")]
    pub verbose: bool,
}

impl Cli {
    /// Command-line flags take precedence over file settings.
    pub fn apply_overrides(&self, config: &mut UploadConfig) {
        if let Some(h) = self.max_age_hours {
            config.max_age_hours = h;
        }
        if let Some(d) = self.max_depth {
            config.max_depth = d;
        }
        if self.retry_failed_dirs {
            config.failed_dir_policy = FailedDirPolicy::RetryOnFailure;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: [&str; 6] = ["fmu", "ftp://h/site", "user", "secret", "/src", "/tmp/run.log"];

    #[test]
    fn five_positionals_parse() {
        let cli = Cli::try_parse_from(BASE).unwrap();
        assert_eq!(cli.target, "ftp://h/site");
        assert_eq!(cli.password, "secret");
        assert_eq!(cli.log_file, PathBuf::from("/tmp/run.log"));
        assert!(!cli.json);
    }

    #[test]
    fn wrong_argument_count_is_rejected() {
        assert!(Cli::try_parse_from(BASE[..5].iter().copied()).is_err());
        let mut extra = BASE.to_vec();
        extra.push("surplus");
        assert!(Cli::try_parse_from(extra).is_err());
    }

    #[test]
    fn flags_override_config() {
        let mut args = BASE.to_vec();
        args.extend(["--max-age-hours", "0.5", "--retry-failed-dirs"]);
        let cli = Cli::try_parse_from(args).unwrap();
        let mut cfg = UploadConfig::default();
        cli.apply_overrides(&mut cfg);
        assert_eq!(cfg.max_age_hours, 0.5);
        assert_eq!(cfg.max_depth, 20);
        assert_eq!(cfg.failed_dir_policy, FailedDirPolicy::RetryOnFailure);
    }
}
