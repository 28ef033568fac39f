use clap::Parser;
use std::path::PathBuf;

/// Keeps a replica folder identical to a source folder, one way, on a timer
#[derive(Parser, Debug)]
#[command(name = "replica-sync")]
#[command(version)]
#[command(about = "Periodic one-way folder synchronization")]
#[command(long_about = None)]
pub struct Cli {
    /// Source folder; read only
    pub source: PathBuf,

    /// Replica folder; must already exist
    pub replica: PathBuf,

    /// Log file; records are appended
    pub log_file: PathBuf,

    /// Seconds between the starts of two synchronization cycles
    #[arg(value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: u64,

    /// Optional TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
