//! Structured JSONL logging to a file plus compact output on stderr.
//!
//! - **JSONL to file** (`<log_dir>/hotclip.jsonl`): one JSON object per event
//! - **Compact to stderr**: human-readable for developers
//!
//! # Usage
//!
//! ```rust,ignore
//! use hotclip::{config, logging};
//!
//! let config = config::load_config(&config::default_config_path());
//! // Keep the guard alive for the duration of the program
//! let _guard = logging::init(&config.log_dir_path());
//!
//! tracing::info!(domain = "clipboard", evicted = 3, "Clipboard retention complete");
//! ```
//!
//! # JSONL Output Format
//!
//! ```json
//! {"timestamp":"2026-01-05T10:30:45.123Z","level":"INFO","target":"hotclip::store","fields":{"message":"Store opened","domain":"apps","path":"/home/ada/.hotclip/db/apps.sqlite"}}
//! ```

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

pub const LOG_FILE_NAME: &str = "hotclip.jsonl";

/// Filter used when `RUST_LOG` is unset or invalid
const DEFAULT_FILTER: &str = "info";

/// Guard that must be kept alive for the duration of the program.
/// Dropping this guard will flush and close the log file.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
    log_path: PathBuf,
}

impl LoggingGuard {
    /// Path of the JSONL file being written
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }
}

/// Path of the JSONL log inside `log_dir`
pub fn log_path(log_dir: &Path) -> PathBuf {
    log_dir.join(LOG_FILE_NAME)
}

/// Install the global subscriber.
///
/// Panics if a global subscriber is already set; use [`try_init`] when that
/// is possible.
pub fn init(log_dir: &Path) -> LoggingGuard {
    let (subscriber, file_guard, log_path) = build(log_dir);
    subscriber.init();
    started(&log_path);
    LoggingGuard {
        _file_guard: file_guard,
        log_path,
    }
}

/// Install the global subscriber, failing if one is already set
pub fn try_init(log_dir: &Path) -> anyhow::Result<LoggingGuard> {
    let (subscriber, file_guard, log_path) = build(log_dir);
    subscriber
        .try_init()
        .context("A global tracing subscriber is already installed")?;
    started(&log_path);
    Ok(LoggingGuard {
        _file_guard: file_guard,
        log_path,
    })
}

fn started(log_path: &Path) {
    tracing::info!(
        event_type = "lifecycle",
        action = "started",
        log_path = %log_path.display(),
        "Logging initialized"
    );
}

fn build(log_dir: &Path) -> (impl Subscriber + Send + Sync + 'static, WorkerGuard, PathBuf) {
    if let Err(e) = fs::create_dir_all(log_dir) {
        eprintln!("[hotclip] Failed to create log directory: {}", e);
    }
    let log_path = log_path(log_dir);

    let file: Box<dyn Write + Send> = match OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => Box::new(file),
        Err(e) => {
            eprintln!("[hotclip] Failed to open log file {}: {}", log_path.display(), e);
            Box::new(io::sink())
        }
    };

    // Writes happen on a background thread so store calls never wait on disk
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let json_layer = fmt::layer()
        .json()
        .with_writer(non_blocking_file)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_target(true)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false)
        .with_span_events(FmtSpan::NONE);

    let stderr_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(true)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(false)
        .compact();

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(stderr_layer);

    (subscriber, file_guard, log_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_path_in_dir() {
        assert_eq!(
            log_path(Path::new("/tmp/hotclip-logs")),
            PathBuf::from("/tmp/hotclip-logs/hotclip.jsonl")
        );
    }

    #[test]
    fn test_events_written_as_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let log_dir = dir.path().join("logs");

        let (subscriber, guard, path) = build(&log_dir);
        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(domain = "shell", stored = 3, "jsonl smoke test");
        });
        drop(guard);

        let contents = fs::read_to_string(&path).unwrap();
        let line = contents
            .lines()
            .find(|l| l.contains("jsonl smoke test"))
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(line).unwrap();
        assert_eq!(value["level"], "WARN");
        assert_eq!(value["fields"]["domain"], "shell");
        assert_eq!(value["fields"]["stored"], 3);
    }
}
