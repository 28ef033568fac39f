use macros::loggable;
use std::path::PathBuf;

loggable! {
    IOError {
        #[error("Semaphore has been closed")]
        SemaphoreClosed => tracing::Level::ERROR,

        #[error("Failed to create directory: {path} ({reason})")]
        CreateDirectoryFailed { path: PathBuf, reason: String } => tracing::Level::WARN,

        #[error("Failed to read directory: {path} ({reason})")]
        ReadDirectoryFailed { path: PathBuf, reason: String } => tracing::Level::WARN,

        #[error("Failed to read file: {path} ({reason})")]
        ReadFileFailed { path: PathBuf, reason: String } => tracing::Level::WARN,

        #[error("Failed to copy file: From {src} To {dst} ({reason})")]
        CopyFileFailed { src: PathBuf, dst: PathBuf, reason: String } => tracing::Level::WARN,

        #[error("Failed to delete directory: {path} ({reason})")]
        DeleteDirectoryFailed { path: PathBuf, reason: String } => tracing::Level::WARN,

        #[error("Failed to delete file: {path} ({reason})")]
        DeleteFileFailed { path: PathBuf, reason: String } => tracing::Level::WARN,

        #[error("Failed to get file metadata: {path} ({reason})")]
        GetMetadataFailed { path: PathBuf, reason: String } => tracing::Level::WARN,

        #[error("Failed to set file metadata: {path} ({reason})")]
        SetMetadataFailed { path: PathBuf, reason: String } => tracing::Level::WARN,
    }
}
