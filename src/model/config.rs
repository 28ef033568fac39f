use crate::model::comparison_mode::ComparisonMode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
pub struct ConfigTable {
    #[serde(rename = "Config", default)]
    pub config: Config,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub max_file_operations: usize,
    pub comparison_mode: ComparisonMode,
    pub timestamp_format: String,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_file_operations: 64,
            comparison_mode: ComparisonMode::default(),
            timestamp_format: "%Y-%m-%d %H:%M:%S%.3f".to_string(),
            log_level: "info".to_string(),
        }
    }
}
