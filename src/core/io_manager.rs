use crate::core::app_config::AppConfig;
use crate::interface::file_system::FileSystemTrait;
use async_trait::async_trait;
use std::ops::Deref;
use std::sync::Arc;
use tokio::sync::Semaphore;

pub struct FileSystem {
    semaphore: Arc<Semaphore>,
}

#[async_trait]
impl FileSystemTrait for FileSystem {
    fn new(semaphore: Arc<Semaphore>) -> Self {
        FileSystem { semaphore }
    }

    fn semaphore(&self) -> Arc<Semaphore> {
        self.semaphore.clone()
    }
}

pub struct IOManager {
    file_system: FileSystem,
}

impl IOManager {
    pub fn new(config: Arc<AppConfig>) -> Self {
        let max_file_operations = config.max_file_operations;
        let semaphore = Arc::new(Semaphore::new(max_file_operations));
        Self {
            file_system: FileSystem::new(semaphore),
        }
    }

    pub fn terminate(&self) {
        self.file_system.semaphore().close();
    }
}

impl Deref for IOManager {
    type Target = FileSystem;

    fn deref(&self) -> &Self::Target {
        &self.file_system
    }
}
