//! Logging initialization
//!
//! Console logging through `RUST_LOG`-style filtering, plus optional daily
//! rolling file output (`dcman.log`) when a log directory is configured.

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

/// File name of the rolling application log
const LOG_FILE_NAME: &str = "dcman.log";

#[derive(Debug, Clone, Default)]
pub struct LoggingConfig {
    /// Directory for rolling file output; `None` disables file logging
    pub dir: Option<PathBuf>,
    /// Default level when `RUST_LOG` is unset, e.g. "info"
    pub level: String,
}

/// Initialize the global subscriber.
///
/// The returned guard must stay alive for the process lifetime, otherwise
/// buffered file output is lost.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let default_level = if config.level.is_empty() {
        "info"
    } else {
        &config.level
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("dcman={default_level},warn")));

    let console_layer = fmt::layer().with_target(true);

    let (file_layer, guard) = match &config.dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let appender = RollingFileAppender::new(Rotation::DAILY, dir, LOG_FILE_NAME);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false).boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(guard)
}
