pub mod file_hash;
pub mod logging;
pub mod sync_guard;
