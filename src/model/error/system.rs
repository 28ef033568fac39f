use macros::loggable;
use std::path::PathBuf;

loggable! {
    SystemError {
        #[error("Configuration not found: {path} ({reason})")]
        ConfigNotFound { path: PathBuf, reason: String } => tracing::Level::ERROR,

        #[error("Invalid configuration: {reason}")]
        InvalidConfig { reason: String } => tracing::Level::ERROR,

        #[error("Failed to initialize logging to {path}: {reason}")]
        LoggingInitFailed { path: PathBuf, reason: String } => tracing::Level::ERROR,

        #[error("Failed to listen for the termination signal: {reason}")]
        SignalListenFailed { reason: String } => tracing::Level::ERROR,

        #[error("Failed to send shutdown signal")]
        ShutdownSignalFailed => tracing::Level::ERROR,

        #[error("Thread panicked: {reason}")]
        ThreadPanic { reason: String } => tracing::Level::ERROR,
    }
}
