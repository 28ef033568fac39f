pub mod comparison_mode;
pub mod config;
pub mod diff_result;
pub mod entry_kind;
pub mod error;
pub mod log;
pub mod operation;
pub mod sync_job;
pub mod sync_state;
