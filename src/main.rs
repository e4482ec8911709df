use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use owo_colors::OwoColorize;

use ftp_multi_upload::cli::Cli;
use ftp_multi_upload::config::UploadConfig;
use ftp_multi_upload::logging;
use ftp_multi_upload::transfer::{self, Credentials, RunArgs};
use ftp_multi_upload::util::try_enable_ansi_on_windows;

fn run(cli: Cli) -> Result<()> {
    let mut config = UploadConfig::resolve(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);
    tracing::debug!("[run] settings: {:?}", config);

    let args = RunArgs {
        target: cli.target,
        credentials: Credentials::new(cli.username, cli.password),
        source: cli.source,
        json: cli.json,
    };
    transfer::run_upload(&config, args)?;
    Ok(())
}

fn main() -> ExitCode {
    // clap prints usage and exits with status 2 on a wrong argument count
    let cli = Cli::parse();

    let guard = match logging::init_transcript(&cli.log_file, cli.verbose) {
        Ok(g) => g,
        Err(e) => {
            let _ = try_enable_ansi_on_windows();
            eprintln!("{}", format!("{:#}", e).red());
            return ExitCode::FAILURE;
        }
    };

    let code = match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    };
    // flush the log file before the process exits
    drop(guard);
    code
}
