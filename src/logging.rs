//! Logging setup for ledger-cli
//!
//! The terminal belongs to the TUI, so logs only ever go to a file under the
//! log directory. Verbosity is chosen with the following priority:
//!
//! 1. **`LEDGER_LOG`** - ledger-cli specific filter (`debug`, or full directive syntax)
//! 2. **`RUST_LOG`** - standard tracing environment variable
//! 3. **`--verbose`** - `debug` for this crate
//! 4. **Default** - `warn` globally, `info` for this crate

use std::env;
use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use crate::config::paths::LedgerPaths;
use crate::error::LedgerError;

const LOG_FILE_NAME: &str = "ledger.log";

/// Returned from [`init`]; must be held alive to ensure log file flushing.
pub struct LogGuard {
    _file_guard: WorkerGuard,
    pub log_file: PathBuf,
}

/// Initialize file logging.
///
/// Safe to call more than once; a second global subscriber is simply not installed.
pub fn init(paths: &LedgerPaths, verbose: bool) -> Result<LogGuard, LedgerError> {
    let log_dir = paths.log_dir();
    std::fs::create_dir_all(&log_dir)
        .map_err(|e| LedgerError::Io(format!("Failed to create log directory: {}", e)))?;

    let file_appender = tracing_appender::rolling::never(&log_dir, LOG_FILE_NAME);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_target(true);

    let _ = Registry::default()
        .with(create_filter(verbose))
        .with(file_layer)
        .try_init();

    Ok(LogGuard {
        _file_guard: file_guard,
        log_file: log_dir.join(LOG_FILE_NAME),
    })
}

/// Build the [`EnvFilter`] according to the priority in the module docs.
fn create_filter(verbose: bool) -> EnvFilter {
    if let Ok(ledger_log) = env::var("LEDGER_LOG") {
        return expand_ledger_log(&ledger_log);
    }

    if let Ok(rust_log) = env::var("RUST_LOG") {
        return EnvFilter::new(rust_log);
    }

    if verbose {
        EnvFilter::new("warn,ledger_cli=debug,ledger=debug")
    } else {
        EnvFilter::new("warn,ledger_cli=info,ledger=info")
    }
}

/// `LEDGER_LOG=debug` becomes `warn,ledger_cli=debug,...`; directive syntax is used as-is.
fn expand_ledger_log(level: &str) -> EnvFilter {
    if level.contains('=') || level.contains(',') {
        return EnvFilter::new(level);
    }
    EnvFilter::new(format!("warn,ledger_cli={level},ledger={level}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_creates_log_directory() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());

        let guard = init(&paths, false).unwrap();
        assert!(paths.log_dir().exists());
        assert_eq!(guard.log_file, paths.log_dir().join("ledger.log"));
    }

    #[test]
    fn test_expand_plain_level() {
        let filter = expand_ledger_log("trace");
        assert!(filter.to_string().contains("ledger_cli=trace"));
    }
}
