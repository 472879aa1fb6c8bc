use crate::error::{Result as ServerErrorResult, ServerError};

use frodo_config::LoggingConfig;

use std::time::SystemTime;

use fern::Dispatch;
use fern::colors::{Color, ColoredLevelConfig};
use log::info;

/// Initialize the global logger.
///
/// Logs go to `logging.file` when set (plain, appended), else stdout,
/// coloured when `logging.colored` is on. No tracing subscriber is installed,
/// so `tracing` events from dependencies arrive here as `log` records.
#[track_caller]
pub fn initialize(logging: &LoggingConfig) -> ServerErrorResult<()> {
    let level_filter = logging.level.0;

    let output = match &logging.file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| ServerError::logger(format!("Failed to open log file {path}: {e}")))?;

            plain_format().chain(file)
        }
        None if logging.colored => {
            let colors = ColoredLevelConfig::new()
                .trace(Color::Magenta)
                .debug(Color::Blue)
                .info(Color::Green)
                .warn(Color::Yellow)
                .error(Color::Red);

            Dispatch::new()
                .format(move |out, message, record| {
                    out.finish(format_args!(
                        "[{date} - {level}] {message} [{file}:{line}]",
                        date = humantime::format_rfc3339(SystemTime::now()),
                        level = colors.color(record.level()),
                        message = message,
                        file = record.file().unwrap_or("unknown"),
                        line = record.line().unwrap_or(0),
                    ))
                })
                .chain(std::io::stdout())
        }
        None => plain_format().chain(std::io::stdout()),
    };

    Dispatch::new()
        .level(level_filter)
        .chain(output)
        .apply()
        .map_err(|e| ServerError::logger(format!("Failed to initialize logger: {e}")))?;

    match &logging.file {
        Some(path) => info!("Logger initialized: level={level_filter}, file={path}"),
        None => info!("Logger initialized: level={level_filter}, stdout"),
    }

    Ok(())
}

/// Uncoloured format for files and non-TTY stdout (systemd, docker logs)
fn plain_format() -> Dispatch {
    Dispatch::new().format(|out, message, record| {
        out.finish(format_args!(
            "[{date} - {level}] {message} [{file}:{line}]",
            date = humantime::format_rfc3339(SystemTime::now()),
            level = record.level(),
            message = message,
            file = record.file().unwrap_or("unknown"),
            line = record.line().unwrap_or(0),
        ))
    })
}
