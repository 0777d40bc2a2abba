//! Logging initialization.
//!
//! Human-readable compact output goes to stderr. When a log file is given,
//! every event is also appended there as one JSON object per line.

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `level` when set. Calling this twice is
/// harmless: the second call leaves the first subscriber in place.
///
/// # Example
///
/// ```ignore
/// init_logging("info", Some(&paths.log_file()));
/// tracing::info!("Client started");
/// ```
pub fn init_logging(level: &str, log_file: Option<&Path>) {
    let level = parse_level(level);
    let make_filter = || {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()))
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .with_writer(io::stderr)
        .with_filter(make_filter());

    let file_layer = log_file.and_then(|path| match open_log_file(path) {
        Ok(file) => Some(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_writer(Mutex::new(file))
                .with_filter(make_filter()),
        ),
        Err(err) => {
            eprintln!("warning: could not open log file {}: {}", path.display(), err);
            None
        }
    });

    let installed = tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(
            level = %level,
            log_file = ?log_file.map(|p| p.display().to_string()),
            "logging initialized"
        );
    }
}

fn open_log_file(path: &Path) -> io::Result<std::fs::File> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Parse a log level string into a tracing Level.
pub fn parse_level(level: &str) -> tracing::Level {
    match level.trim().to_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "warn" | "warning" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_level_all_variants() {
        assert_eq!(parse_level("trace"), tracing::Level::TRACE);
        assert_eq!(parse_level("debug"), tracing::Level::DEBUG);
        assert_eq!(parse_level("info"), tracing::Level::INFO);
        assert_eq!(parse_level("warn"), tracing::Level::WARN);
        assert_eq!(parse_level("warning"), tracing::Level::WARN);
        assert_eq!(parse_level("error"), tracing::Level::ERROR);
    }

    #[test]
    fn parse_level_case_and_whitespace_insensitive() {
        assert_eq!(parse_level("TRACE"), tracing::Level::TRACE);
        assert_eq!(parse_level(" Debug "), tracing::Level::DEBUG);
        assert_eq!(parse_level("WARNING"), tracing::Level::WARN);
    }

    #[test]
    fn parse_level_unknown_defaults_to_info() {
        assert_eq!(parse_level(""), tracing::Level::INFO);
        assert_eq!(parse_level("verbose"), tracing::Level::INFO);
        assert_eq!(parse_level("fatal"), tracing::Level::INFO);
    }

    #[test]
    fn open_log_file_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("medassist.jsonl");

        open_log_file(&path).unwrap();

        assert!(path.exists());
    }

    #[test]
    fn init_logging_twice_does_not_panic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("medassist.jsonl");

        init_logging("debug", Some(&path));
        init_logging("info", None);
        tracing::info!("still logging");
    }
}
