pub mod app_config;
pub mod comparator;
pub mod copier;
pub mod io_manager;
pub mod sync_engine;
pub mod sync_timer;
pub mod system;
