use crate::model::error::Error;
use crate::model::error::config::ConfigError;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

/// Immutable description of what to mirror and how often.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncJob {
    pub source: PathBuf,
    pub replica: PathBuf,
    pub log_file: PathBuf,
    pub interval: Duration,
}

impl SyncJob {
    pub fn new(
        source: impl Into<PathBuf>,
        replica: impl Into<PathBuf>,
        log_file: impl Into<PathBuf>,
        interval_seconds: u64,
    ) -> Result<Self, Error> {
        if interval_seconds == 0 {
            Err(ConfigError::InvalidInterval)?
        }
        Ok(Self {
            source: source.into(),
            replica: replica.into(),
            log_file: log_file.into(),
            interval: Duration::from_secs(interval_seconds),
        })
    }

    /// Checks both roots before a cycle touches anything.
    ///
    /// The replica root is never created here; it is expected to exist already.
    pub async fn validate(&self) -> Result<(), Error> {
        if !is_directory(&self.source).await {
            Err(ConfigError::SourceNotFound {
                path: self.source.clone(),
            })?
        }
        if !is_directory(&self.replica).await {
            Err(ConfigError::ReplicaNotFound {
                path: self.replica.clone(),
            })?
        }
        if is_empty_directory(&self.source).await {
            Err(ConfigError::EmptySource {
                path: self.source.clone(),
            })?
        }
        Ok(())
    }
}

async fn is_directory(path: &Path) -> bool {
    fs::metadata(path)
        .await
        .map(|metadata| metadata.is_dir())
        .unwrap_or(false)
}

async fn is_empty_directory(path: &Path) -> bool {
    match fs::read_dir(path).await {
        Ok(mut entries) => matches!(entries.next_entry().await, Ok(None)),
        Err(_) => false,
    }
}
