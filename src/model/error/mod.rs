pub mod config;
pub mod io;
pub mod system;
pub mod task;

use crate::model::error::config::ConfigError;
use crate::model::error::io::IOError;
use crate::model::error::system::SystemError;
use crate::model::error::task::TaskError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Config(ConfigError),
    #[error(transparent)]
    IO(IOError),
    #[error(transparent)]
    System(SystemError),
    #[error(transparent)]
    Task(TaskError),
}

impl Error {
    pub fn level(&self) -> tracing::Level {
        match self {
            Error::Config(error) => error.level(),
            Error::IO(error) => error.level(),
            Error::System(error) => error.level(),
            Error::Task(error) => error.level(),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(error: ConfigError) -> Self {
        Self::Config(error)
    }
}

impl From<IOError> for Error {
    fn from(error: IOError) -> Self {
        Self::IO(error)
    }
}

impl From<SystemError> for Error {
    fn from(error: SystemError) -> Self {
        Self::System(error)
    }
}

impl From<TaskError> for Error {
    fn from(error: TaskError) -> Self {
        Self::Task(error)
    }
}
