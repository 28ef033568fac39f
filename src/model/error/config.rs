use macros::loggable;
use std::path::PathBuf;

loggable! {
    ConfigError {
        #[error("Source directory {path} does not exist")]
        SourceNotFound { path: PathBuf } => tracing::Level::ERROR,

        #[error("Replica directory {path} does not exist")]
        ReplicaNotFound { path: PathBuf } => tracing::Level::ERROR,

        /// The source exists but holds no entries. Treated as a configuration
        /// mistake rather than a request to empty the replica.
        #[error("Source folder {path} is empty. There is nothing to sync")]
        EmptySource { path: PathBuf } => tracing::Level::ERROR,

        #[error("Synchronization interval must be at least one second")]
        InvalidInterval => tracing::Level::ERROR,
    }
}
