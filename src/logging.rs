use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, fmt};

// Message-only lines so console and log file read the same.
fn transcript_layer<S, W>(writer: W) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    fmt::layer()
        .with_writer(writer)
        .without_time()
        .with_level(false)
        .with_target(false)
        .with_ansi(false)
}

/// `RUST_LOG` wins; otherwise `info`, or `debug` with `--verbose`.
pub fn transcript_filter(verbose: bool) -> EnvFilter {
    let default = if verbose { "debug" } else { "info" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Subscriber writing every event to both `console` and `file`.
pub fn transcript_subscriber<C, F>(
    console: C,
    file: F,
    filter: EnvFilter,
) -> impl Subscriber + Send + Sync + 'static
where
    C: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    F: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::registry()
        .with(transcript_layer(console))
        .with(transcript_layer(file))
        .with(filter)
}

/// Create (truncate) the log file and install the global transcript.
/// The returned guard flushes the file when dropped and must live for the whole run.
pub fn init_transcript(log_path: &Path, verbose: bool) -> Result<WorkerGuard> {
    let file = File::create(log_path)
        .with_context(|| format!("cannot create log file {}", log_path.display()))?;
    let (file_writer, guard) = tracing_appender::non_blocking(file);
    let subscriber = transcript_subscriber(std::io::stdout, file_writer, transcript_filter(verbose));
    tracing::subscriber::set_global_default(subscriber)
        .context("a global tracing subscriber is already installed")?;
    Ok(guard)
}

/// Collects transcript lines in memory for unit tests.
#[cfg(test)]
pub(crate) mod capture {
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::fmt::MakeWriter;

    use super::transcript_subscriber;

    #[derive(Clone, Default)]
    pub(crate) struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl Buffer {
        pub(crate) fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'w> MakeWriter<'w> for Buffer {
        type Writer = Buffer;

        fn make_writer(&'w self) -> Self::Writer {
            self.clone()
        }
    }

    /// Run `f` under an `info` transcript and return the console lines.
    pub(crate) fn transcript_of<R>(f: impl FnOnce() -> R) -> (R, Vec<String>) {
        let console = Buffer::default();
        let sub = transcript_subscriber(console.clone(), std::io::sink, EnvFilter::new("info"));
        let out = tracing::subscriber::with_default(sub, f);
        let lines = console.contents().lines().map(str::to_string).collect();
        (out, lines)
    }
}
