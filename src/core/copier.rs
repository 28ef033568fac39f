use crate::core::io_manager::IOManager;
use crate::interface::file_system::FileSystemTrait;
use crate::model::diff_result::DiffResult;
use crate::model::entry_kind::EntryKind;
use crate::model::error::Error;
use crate::model::log::sync::SyncLog;
use crate::model::operation::{Operation, OperationLog};
use macros::log;
use std::collections::{BTreeSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Applies mutations to the replica. Never writes under the source root.
pub struct Copier {
    io_manager: Arc<IOManager>,
}

impl Copier {
    pub fn new(io_manager: Arc<IOManager>) -> Self {
        Self { io_manager }
    }

    /// Copies the whole source tree into an empty replica as one logged event.
    pub async fn direct_copy(&self, source: &Path, replica: &Path) -> OperationLog {
        let mut operation_log = OperationLog::new();
        let operation = Operation::CopyTree {
            source: source.to_path_buf(),
            replica: replica.to_path_buf(),
        };
        log!(operation.to_log());
        operation_log.operations.push(operation);

        self.copy_tree(source, replica, Vec::new(), &mut operation_log, false)
            .await;
        operation_log
    }

    /// Frees every replica path the source no longer has, every path whose
    /// kind changed and every replica link, so the copy phase never collides
    /// with an old entry or writes through a link.
    ///
    /// Returns the differing paths that could not be cleared; the copy phase
    /// must skip them.
    pub async fn remove_entries(
        &self,
        diff: &DiffResult,
        source: &Path,
        replica: &Path,
        operation_log: &mut OperationLog,
    ) -> BTreeSet<PathBuf> {
        for relative in &diff.only_in_replica {
            self.remove(&replica.join(relative), operation_log).await;
        }

        let mut blocked = BTreeSet::new();
        for relative in &diff.differing {
            let source_path = source.join(relative);
            let replica_path = replica.join(relative);
            let source_kind = match self.io_manager.entry_kind(&source_path).await {
                Ok(kind) => kind,
                Err(err) => {
                    Self::fail(operation_log, err);
                    blocked.insert(relative.clone());
                    continue;
                }
            };
            // A replica entry that vanished since the diff needs no removal.
            let Ok(replica_metadata) = self.io_manager.symlink_metadata(&replica_path).await
            else {
                continue;
            };
            if (replica_metadata.is_symlink()
                || EntryKind::from(&replica_metadata) != source_kind)
                && !self.remove(&replica_path, operation_log).await
            {
                blocked.insert(relative.clone());
            }
        }
        blocked
    }

    /// Creates or overwrites every path that is new or changed in the source.
    pub async fn diff_copy(
        &self,
        diff: &DiffResult,
        source: &Path,
        replica: &Path,
        blocked: &BTreeSet<PathBuf>,
        operation_log: &mut OperationLog,
    ) {
        for relative in diff.to_copy() {
            if blocked.contains(relative) {
                continue;
            }
            let source_path = source.join(relative);
            let replica_path = replica.join(relative);

            let source_kind = match self.io_manager.entry_kind(&source_path).await {
                Ok(kind) => kind,
                Err(err) => {
                    Self::fail(operation_log, err);
                    continue;
                }
            };

            if let Some(parent) = replica_path.parent() {
                if self.io_manager.metadata(parent).await.is_err()
                    && !self.create_directory(parent, operation_log, true).await
                {
                    continue;
                }
            }

            match source_kind {
                EntryKind::File => {
                    self.copy_file(&source_path, &replica_path, operation_log, true)
                        .await;
                }
                EntryKind::Directory => {
                    if !self.create_directory(&replica_path, operation_log, true).await {
                        continue;
                    }
                    let ancestors = Self::ancestors(source, relative).await;
                    self.copy_tree(&source_path, &replica_path, ancestors, operation_log, true)
                        .await;
                }
            }
        }
    }

    /// Breadth-first copy of the contents of `source_dir` into the existing
    /// `replica_dir`. `ancestors` holds the canonical paths of the directories
    /// above `source_dir`; a directory that resolves to one of its own
    /// ancestors is created empty and not entered.
    async fn copy_tree(
        &self,
        source_dir: &Path,
        replica_dir: &Path,
        ancestors: Vec<PathBuf>,
        operation_log: &mut OperationLog,
        record: bool,
    ) {
        let mut queue = VecDeque::from([(
            source_dir.to_path_buf(),
            replica_dir.to_path_buf(),
            ancestors,
        )]);

        while let Some((current_source, current_replica, mut ancestors)) = queue.pop_front() {
            if let Ok(canonical) = tokio::fs::canonicalize(&current_source).await {
                if ancestors.contains(&canonical) {
                    log!(SyncLog::SkipVisited {
                        path: current_source
                    });
                    continue;
                }
                ancestors.push(canonical);
            }

            let entries = match self.io_manager.list_directory(&current_source).await {
                Ok(entries) => entries,
                Err(err) => {
                    Self::fail(operation_log, err);
                    continue;
                }
            };

            for entry in entries {
                let Some(name) = entry.file_name() else {
                    continue;
                };
                let destination = current_replica.join(name);
                match self.io_manager.entry_kind(&entry).await {
                    Ok(EntryKind::Directory) => {
                        if self.create_directory(&destination, operation_log, record).await {
                            queue.push_back((entry, destination, ancestors.clone()));
                        }
                    }
                    Ok(EntryKind::File) => {
                        self.copy_file(&entry, &destination, operation_log, record)
                            .await;
                    }
                    Err(err) => Self::fail(operation_log, err),
                }
            }
        }
    }

    async fn copy_file(
        &self,
        source: &Path,
        destination: &Path,
        operation_log: &mut OperationLog,
        record: bool,
    ) -> bool {
        match self.io_manager.copy_file(source, destination).await {
            Ok(()) => {
                if record {
                    Self::record(
                        operation_log,
                        Operation::CopyFile {
                            source: source.to_path_buf(),
                            destination: destination.to_path_buf(),
                        },
                    );
                }
                true
            }
            Err(err) => {
                Self::fail(operation_log, err);
                false
            }
        }
    }

    async fn create_directory(
        &self,
        path: &Path,
        operation_log: &mut OperationLog,
        record: bool,
    ) -> bool {
        match self.io_manager.create_directory(path).await {
            Ok(()) => {
                if record {
                    Self::record(
                        operation_log,
                        Operation::CreateDirectory {
                            path: path.to_path_buf(),
                        },
                    );
                }
                true
            }
            Err(err) => {
                Self::fail(operation_log, err);
                false
            }
        }
    }

    async fn remove(&self, path: &Path, operation_log: &mut OperationLog) -> bool {
        match self.io_manager.delete_entry(path).await {
            Ok(EntryKind::File) => {
                Self::record(
                    operation_log,
                    Operation::RemoveFile {
                        path: path.to_path_buf(),
                    },
                );
                true
            }
            Ok(EntryKind::Directory) => {
                Self::record(
                    operation_log,
                    Operation::RemoveDirectory {
                        path: path.to_path_buf(),
                    },
                );
                true
            }
            Err(err) => {
                Self::fail(operation_log, err);
                false
            }
        }
    }

    /// Canonical paths of the source root and every directory above `relative`.
    /// Entering any of them again from inside `relative` would loop.
    async fn ancestors(source: &Path, relative: &Path) -> Vec<PathBuf> {
        let mut ancestors = Vec::new();
        let mut current = source.to_path_buf();
        if let Ok(canonical) = tokio::fs::canonicalize(&current).await {
            ancestors.push(canonical);
        }
        if let Some(parent) = relative.parent() {
            for component in parent.components() {
                current.push(component);
                if let Ok(canonical) = tokio::fs::canonicalize(&current).await {
                    ancestors.push(canonical);
                }
            }
        }
        ancestors
    }

    fn record(operation_log: &mut OperationLog, operation: Operation) {
        log!(operation.to_log());
        operation_log.operations.push(operation);
    }

    fn fail(operation_log: &mut OperationLog, error: Error) {
        log!(error);
        operation_log.failures.push(error);
    }
}
