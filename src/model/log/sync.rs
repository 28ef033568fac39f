use macros::loggable;
use std::path::PathBuf;

loggable! {
    SyncLog {
        #[error("Sync {src} folder with {dst} folder")]
        CycleStarted { src: PathBuf, dst: PathBuf } => tracing::Level::INFO,

        #[error("Sync completed: {operations} operations, {failures} failures")]
        CycleCompleted { operations: usize, failures: usize } => tracing::Level::INFO,

        #[error("Replica already matches source")]
        NothingChanged => tracing::Level::DEBUG,

        #[error("Copy entire source folder {src} to replica folder {dst}")]
        CopyTree { src: PathBuf, dst: PathBuf } => tracing::Level::INFO,

        #[error("Copy file {src} to {dst}")]
        CopyFile { src: PathBuf, dst: PathBuf } => tracing::Level::INFO,

        #[error("Create directory {path}")]
        CreateDirectory { path: PathBuf } => tracing::Level::INFO,

        #[error("Remove file {path}")]
        RemoveFile { path: PathBuf } => tracing::Level::INFO,

        #[error("Remove directory {path}")]
        RemoveDirectory { path: PathBuf } => tracing::Level::INFO,

        #[error("Skip already visited directory {path}")]
        SkipVisited { path: PathBuf } => tracing::Level::DEBUG,
    }
}
