use crate::model::config::Config;
use crate::model::error::Error;
use crate::model::error::system::SystemError;
use chrono::Local;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

struct LocalTimer {
    format: String,
}

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", Local::now().format(&self.format))
    }
}

pub struct Logging;

impl Logging {
    /// Installs the global subscriber: one layer to stdout, one appending to
    /// `log_file`. The returned guard flushes the file writer on drop and must
    /// live as long as the process logs.
    pub fn initialize(log_file: &Path, config: &Config) -> Result<WorkerGuard, Error> {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&config.log_level))
            .map_err(|err| SystemError::InvalidConfig {
                reason: format!("log_level: {err}"),
            })?;

        let (file_writer, guard) = tracing_appender::non_blocking(Self::file_appender(log_file)?);

        let console_layer = fmt::layer()
            .with_timer(LocalTimer {
                format: config.timestamp_format.clone(),
            })
            .with_target(false);
        let file_layer = fmt::layer()
            .with_timer(LocalTimer {
                format: config.timestamp_format.clone(),
            })
            .with_target(false)
            .with_ansi(false)
            .with_writer(file_writer);

        tracing_subscriber::registry()
            .with(filter)
            .with(console_layer)
            .with(file_layer)
            .try_init()
            .map_err(|err| SystemError::LoggingInitFailed {
                path: log_file.to_path_buf(),
                reason: err.to_string(),
            })?;

        log_panics::init();
        Ok(guard)
    }

    /// Opens `log_file` for appending, creating it and its parent directories.
    pub fn file_appender(log_file: &Path) -> Result<RollingFileAppender, Error> {
        let file_name = log_file
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| SystemError::LoggingInitFailed {
                path: log_file.to_path_buf(),
                reason: "log file path has no file name".to_string(),
            })?;
        let directory = match log_file.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let appender = RollingFileAppender::builder()
            .rotation(Rotation::NEVER)
            .filename_prefix(file_name)
            .build(directory)
            .map_err(|err| SystemError::LoggingInitFailed {
                path: log_file.to_path_buf(),
                reason: err.to_string(),
            })?;
        Ok(appender)
    }
}
