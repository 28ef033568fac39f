use crate::model::error::Error;
use crate::model::log::sync::SyncLog;
use std::path::PathBuf;

/// One mutation applied to the replica.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    CopyTree { source: PathBuf, replica: PathBuf },
    CopyFile { source: PathBuf, destination: PathBuf },
    CreateDirectory { path: PathBuf },
    RemoveFile { path: PathBuf },
    RemoveDirectory { path: PathBuf },
}

impl Operation {
    pub fn is_removal(&self) -> bool {
        matches!(self, Operation::RemoveFile { .. } | Operation::RemoveDirectory { .. })
    }

    pub fn to_log(&self) -> SyncLog {
        match self.clone() {
            Operation::CopyTree { source, replica } => SyncLog::CopyTree {
                src: source,
                dst: replica,
            },
            Operation::CopyFile {
                source,
                destination,
            } => SyncLog::CopyFile {
                src: source,
                dst: destination,
            },
            Operation::CreateDirectory { path } => SyncLog::CreateDirectory { path },
            Operation::RemoveFile { path } => SyncLog::RemoveFile { path },
            Operation::RemoveDirectory { path } => SyncLog::RemoveDirectory { path },
        }
    }
}

/// What one cycle did, in the order it did it.
#[derive(Debug, Clone, Default)]
pub struct OperationLog {
    pub operations: Vec<Operation>,
    pub failures: Vec<Error>,
}

impl OperationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty() && self.failures.is_empty()
    }
}
