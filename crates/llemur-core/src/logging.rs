//! Tracing subscriber bootstrap shared by all llemur commands

use crate::error::{ConfigError, ConfigResult};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Keeps the file writer flushing until dropped at the end of `main`.
#[must_use]
pub struct LogGuard {
    _file: Option<WorkerGuard>,
}

/// Parse a level name such as `warn` or `debug`.
pub fn parse_level(level: &str) -> ConfigResult<LevelFilter> {
    level
        .trim()
        .parse::<LevelFilter>()
        .map_err(|_| ConfigError::LogLevel(level.to_string()))
}

/// Install the global subscriber.
///
/// `RUST_LOG` always takes precedence; otherwise `verbose` selects DEBUG and
/// `level` is used as the default directive. When `file` is given, log lines
/// are also appended to that file without ANSI colors.
pub fn init(level: &str, verbose: bool, file: Option<&Path>) -> ConfigResult<LogGuard> {
    let default_level = if verbose {
        LevelFilter::DEBUG
    } else {
        parse_level(level)?
    };

    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    let (file_layer, guard) = match file {
        Some(path) => {
            let (writer, guard) = tracing_appender::non_blocking(file_appender(path)?);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(file_layer)
        .try_init()
        .map_err(|e| ConfigError::Logging(e.to_string()))?;

    Ok(LogGuard { _file: guard })
}

fn file_appender(path: &Path) -> ConfigResult<RollingFileAppender> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let name = path.file_name().ok_or_else(|| {
        ConfigError::Logging(format!("log file has no file name: {}", path.display()))
    })?;

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(name.to_string_lossy().to_string())
        .build(dir)
        .map_err(|e| ConfigError::Logging(e.to_string()))
}
