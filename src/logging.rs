use std::path::Path;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_rolling_file::{RollingConditionBase, RollingFileAppender};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer};

use crate::config::LoggingConfig;

/// Guard wrapper that ensures buffered log lines reach the file on drop
pub struct LogGuard(Option<WorkerGuard>);

impl Drop for LogGuard {
    fn drop(&mut self) {
        if let Some(guard) = self.0.take() {
            drop(guard);
            // The worker thread needs a moment to finish flushing
            std::thread::sleep(std::time::Duration::from_millis(200));
        }
    }
}

/// Initialize logging to console and optionally to a rolling file.
///
/// `verbose` forces debug-level console output regardless of the
/// configured level. Returns a LogGuard that must be kept alive for the
/// duration of the program.
pub fn init_logging(
    config: Option<&LoggingConfig>,
    verbose: bool,
) -> Result<LogGuard, anyhow::Error> {
    let level = if verbose {
        Level::DEBUG
    } else {
        configured_level(config)
    };

    let console = fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .with_filter(tracing_subscriber::filter::LevelFilter::from_level(level));

    let Some(config) = config else {
        tracing_subscriber::registry().with(console).init();
        return Ok(LogGuard(None));
    };

    if let Some(parent) = Path::new(&config.path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file_appender = RollingFileAppender::new(
        &config.path,
        RollingConditionBase::new().max_size(config.size * 1024 * 1024),
        config.max_files,
    )
    .map_err(|e| anyhow::anyhow!("Failed to create rolling file appender: {}", e))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let file = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_filter(tracing_subscriber::filter::LevelFilter::from_level(level));

    tracing_subscriber::registry().with(console).with(file).init();

    Ok(LogGuard(Some(guard)))
}

fn configured_level(config: Option<&LoggingConfig>) -> Level {
    let Some(config) = config else {
        return Level::INFO;
    };

    match config.level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}
