//! One-way periodic folder synchronization.
//!
//! A [`SyncEngine`](core::sync_engine::SyncEngine) brings a replica folder in
//! line with a source folder: entries missing from the source are removed,
//! new and changed entries are copied over. A
//! [`SyncTimer`](core::sync_timer::SyncTimer) repeats that on a fixed interval
//! without ever running two cycles at once.

pub mod cli;
pub mod core;
pub mod interface;
pub mod model;
pub mod utils;
