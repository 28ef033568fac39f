use crate::model::config::{Config, ConfigTable};
use crate::model::error::Error;
use crate::model::error::system::SystemError;
use chrono::format::{Item, StrftimeItems};
use std::fs;
use std::ops::Deref;
use std::path::Path;

#[derive(Debug, Default)]
pub struct AppConfig {
    config: Config,
}

impl AppConfig {
    /// Loads `path` when given, otherwise uses the built-in defaults.
    pub fn new(path: Option<&Path>) -> Result<Self, Error> {
        let config = match path {
            Some(path) => Self::load_config_file(path)?,
            None => Config::default(),
        };
        Self::from_config(config)
    }

    pub fn from_config(config: Config) -> Result<Self, Error> {
        Self::validate(&config)?;
        Ok(Self { config })
    }

    fn load_config_file(path: &Path) -> Result<Config, Error> {
        let toml_string = fs::read_to_string(path).map_err(|err| SystemError::ConfigNotFound {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
        Self::parse(&toml_string)
    }

    fn parse(toml_string: &str) -> Result<Config, Error> {
        let config = toml::from_str::<ConfigTable>(toml_string)
            .map_err(|err| SystemError::InvalidConfig {
                reason: err.to_string(),
            })?
            .config;
        Ok(config)
    }

    fn validate(config: &Config) -> Result<(), Error> {
        if config.max_file_operations == 0 {
            Err(SystemError::InvalidConfig {
                reason: "max_file_operations must be at least 1".to_string(),
            })?
        }
        if StrftimeItems::new(&config.timestamp_format).any(|item| matches!(item, Item::Error)) {
            Err(SystemError::InvalidConfig {
                reason: format!("timestamp_format {:?} is not a valid strftime format", config.timestamp_format),
            })?
        }
        Ok(())
    }
}

impl Deref for AppConfig {
    type Target = Config;

    fn deref(&self) -> &Self::Target {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::comparison_mode::{ComparisonMode, HashType};
    use tempfile::TempDir;

    #[test]
    fn missing_table_uses_defaults() {
        let config = AppConfig::parse("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn partial_table_keeps_other_defaults() {
        let config = AppConfig::parse("[Config]\nmax_file_operations = 4\n").unwrap();
        assert_eq!(config.max_file_operations, 4);
        assert_eq!(config.comparison_mode, ComparisonMode::Standard);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn comparison_modes_parse() {
        let quick = AppConfig::parse("[Config]\ncomparison_mode = \"Quick\"\n").unwrap();
        assert_eq!(quick.comparison_mode, ComparisonMode::Quick);

        let thorough =
            AppConfig::parse("[Config]\ncomparison_mode = { Thorough = \"Blake3\" }\n").unwrap();
        assert_eq!(
            thorough.comparison_mode,
            ComparisonMode::Thorough(HashType::Blake3)
        );
    }

    #[test]
    fn unknown_mode_is_invalid() {
        let result = AppConfig::parse("[Config]\ncomparison_mode = \"Sloppy\"\n");
        assert!(matches!(
            result,
            Err(Error::System(SystemError::InvalidConfig { .. }))
        ));
    }

    #[test]
    fn zero_file_operations_is_invalid() {
        let config = Config {
            max_file_operations: 0,
            ..Config::default()
        };
        assert!(AppConfig::from_config(config).is_err());
    }

    #[test]
    fn broken_timestamp_format_is_invalid() {
        let config = Config {
            timestamp_format: "%Y %".to_string(),
            ..Config::default()
        };
        assert!(AppConfig::from_config(config).is_err());
    }

    #[test]
    fn missing_file_is_config_not_found() {
        let dir = TempDir::new().unwrap();
        let result = AppConfig::new(Some(dir.path().join("config.toml").as_path()));
        assert!(matches!(
            result,
            Err(Error::System(SystemError::ConfigNotFound { .. }))
        ));
    }

    #[test]
    fn file_is_loaded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[Config]\ncomparison_mode = \"Quick\"\n").unwrap();

        let app_config = AppConfig::new(Some(path.as_path())).unwrap();
        assert_eq!(app_config.comparison_mode, ComparisonMode::Quick);
    }

    #[test]
    fn no_file_means_defaults() {
        let app_config = AppConfig::new(None).unwrap();
        assert_eq!(app_config.max_file_operations, 64);
    }
}
