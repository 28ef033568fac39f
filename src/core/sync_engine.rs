use crate::core::app_config::AppConfig;
use crate::core::comparator::Comparator;
use crate::core::copier::Copier;
use crate::core::io_manager::IOManager;
use crate::interface::file_system::FileSystemTrait;
use crate::model::error::Error;
use crate::model::log::sync::SyncLog;
use crate::model::operation::OperationLog;
use crate::model::sync_job::SyncJob;
use crate::model::sync_state::SyncState;
use crate::utils::sync_guard::SyncGuard;
use macros::log;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub struct SyncEngine {
    job: Arc<SyncJob>,
    app_config: Arc<AppConfig>,
    io_manager: Arc<IOManager>,
    comparator: Comparator,
    copier: Copier,
    syncing: AtomicBool,
}

impl SyncEngine {
    pub fn new(job: Arc<SyncJob>, app_config: Arc<AppConfig>, io_manager: Arc<IOManager>) -> Self {
        Self {
            job,
            app_config,
            comparator: Comparator::new(io_manager.clone()),
            copier: Copier::new(io_manager.clone()),
            io_manager,
            syncing: AtomicBool::new(false),
        }
    }

    pub fn job(&self) -> &SyncJob {
        &self.job
    }

    pub fn state(&self) -> SyncState {
        if self.syncing.load(Ordering::Acquire) {
            SyncState::Syncing
        } else {
            SyncState::Idle
        }
    }

    /// Runs one full cycle: validate, then either bulk copy into an empty
    /// replica or diff and apply removals before copies.
    ///
    /// Per-entry failures do not abort the cycle; they are logged and returned
    /// in [`OperationLog::failures`]. Only validation and an unreadable root are
    /// returned as `Err`.
    pub async fn run_once(&self) -> Result<OperationLog, Error> {
        let _guard = SyncGuard::acquire(&self.syncing)?;
        let job = &self.job;

        job.validate().await?;
        log!(SyncLog::CycleStarted {
            src: job.source.clone(),
            dst: job.replica.clone(),
        });

        let operation_log = if self.io_manager.is_empty_directory(&job.replica).await? {
            self.copier.direct_copy(&job.source, &job.replica).await
        } else {
            self.apply_diff().await?
        };

        if operation_log.is_empty() {
            log!(SyncLog::NothingChanged);
        }
        log!(SyncLog::CycleCompleted {
            operations: operation_log.operations.len(),
            failures: operation_log.failures.len(),
        });
        Ok(operation_log)
    }

    async fn apply_diff(&self) -> Result<OperationLog, Error> {
        let job = &self.job;
        let mut operation_log = OperationLog::new();

        let (diff, errors) = self
            .comparator
            .compare_directory(&job.source, &job.replica, self.app_config.comparison_mode)
            .await?;
        for error in errors {
            log!(error);
            operation_log.failures.push(error);
        }
        if diff.is_empty() {
            return Ok(operation_log);
        }

        let blocked = self
            .copier
            .remove_entries(&diff, &job.source, &job.replica, &mut operation_log)
            .await;
        self.copier
            .diff_copy(&diff, &job.source, &job.replica, &blocked, &mut operation_log)
            .await;
        Ok(operation_log)
    }
}
