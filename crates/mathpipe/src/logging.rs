use anyhow::{anyhow, Result};
use mathpipe_config::LogConfig;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Log files larger than this are removed on startup.
const MAX_LOG_FILE_SIZE: u64 = 8 * 1024 * 1024;

/// Install the global subscriber.
///
/// Logs go to `log_path`, `$MATHPIPE_LOG_PATH` or the configured log file, in
/// this order, and to stderr when none is given. The returned guard must be
/// held until the program exits.
pub fn init(log_path: Option<PathBuf>, config: &LogConfig) -> Result<Option<WorkerGuard>> {
    let maybe_log = if let Some(log_path) = log_path {
        Some(log_path)
    } else if let Ok(log_path) = std::env::var("MATHPIPE_LOG_PATH").map(PathBuf::from) {
        Some(log_path)
    } else {
        config.log_file.as_ref().map(PathBuf::from)
    };

    let Some(log_path) = maybe_log else {
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(env_filter(config))
            .with_writer(std::io::stderr)
            .with_ansi(std::io::stderr().is_terminal())
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
        return Ok(None);
    };

    if let Ok(metadata) = std::fs::metadata(&log_path) {
        if log_path.is_file() && metadata.len() > MAX_LOG_FILE_SIZE {
            std::fs::remove_file(&log_path)?;
        }
    }

    let file_name = log_path
        .file_name()
        .ok_or_else(|| anyhow!("no file name in {log_path:?}"))?;

    let directory = log_path
        .parent()
        .ok_or_else(|| anyhow!("{log_path:?} has no parent"))?;

    let file_appender = tracing_appender::rolling::never(directory, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_line_number(true)
        .with_writer(non_blocking)
        .with_ansi(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(Some(guard))
}

/// `RUST_LOG` wins over the configured `max-level` and `log-target`.
fn env_filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives(config)))
}

fn directives(config: &LogConfig) -> String {
    if config.log_target.is_empty() {
        config.max_level.clone()
    } else {
        format!("{},{}", config.max_level, config.log_target)
    }
}
