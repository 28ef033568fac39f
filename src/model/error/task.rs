use macros::loggable;

loggable! {
    TaskError {
        #[error("Illegal run state: a synchronization cycle is already running")]
        IllegalRunState => tracing::Level::WARN,
    }
}
