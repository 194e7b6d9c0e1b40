//! File logging for the terminal UI.
//!
//! The TUI owns stdout, so events only go to `<log_dir>/<log_file>`, which is
//! cleared on every start. Filtering follows `RUST_LOG` and defaults to `info`.

use std::fs;
use std::io;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Keeps the non-blocking writer alive; dropping it flushes the log file.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

pub fn init_logging(log_dir: &Path, log_file: &str) -> Result<LoggingGuard, io::Error> {
    fs::create_dir_all(log_dir)?;
    fs::write(log_dir.join(log_file), "")?;

    let file_appender = tracing_appender::rolling::never(log_dir, log_file);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_target(false);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .try_init()
        .map_err(io::Error::other)?;

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creates_directory_and_clears_file() {
        let dir = std::env::temp_dir().join(format!("region-map-logs-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("test.log"), "stale").unwrap();

        // A global subscriber may already be installed by another test; the
        // file preparation happens before that check either way.
        let _ = init_logging(&dir, "test.log");

        assert!(dir.join("test.log").exists());
        let content = fs::read_to_string(dir.join("test.log")).unwrap();
        assert!(!content.contains("stale"));

        let _ = fs::remove_dir_all(&dir);
    }
}
