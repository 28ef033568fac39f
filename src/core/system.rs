use crate::cli::Cli;
use crate::core::app_config::AppConfig;
use crate::core::io_manager::IOManager;
use crate::core::sync_engine::SyncEngine;
use crate::core::sync_timer::SyncTimer;
use crate::interface::runnable::Runnable;
use crate::model::error::Error;
use crate::model::error::system::SystemError;
use crate::model::log::system::SystemLog;
use crate::model::sync_job::SyncJob;
use crate::utils::logging::Logging;
use macros::log;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

pub struct System;

impl System {
    /// Sets everything up, synchronizes until a termination signal arrives,
    /// then shuts down after the cycle in flight.
    ///
    /// Returns an error before the first cycle when the configuration, the log
    /// file, or either folder is unusable.
    pub async fn run(cli: Cli) -> Result<(), Error> {
        let app_config = Arc::new(AppConfig::new(cli.config.as_deref())?);
        let job = SyncJob::new(cli.source, cli.replica, cli.log_file, cli.interval)?;
        let _log_guard = Logging::initialize(&job.log_file, &app_config)?;

        let (io_manager, timer) = match Self::initialize(job, app_config).await {
            Ok(started) => started,
            Err(err) => {
                log!(err);
                return Err(err);
            }
        };

        log!(SystemLog::Online {
            seconds: timer.engine().job().interval.as_secs()
        });
        let (shutdown, handle) = timer.run();

        match Self::wait_for_signal().await {
            Ok(()) => log!(SystemLog::SignalReceived),
            Err(err) => {
                // Without a signal listener the only way out is being killed.
                log!(err);
                std::future::pending::<()>().await;
            }
        }

        Self::terminate(io_manager, shutdown, handle).await;
        Ok(())
    }

    async fn initialize(
        job: SyncJob,
        app_config: Arc<AppConfig>,
    ) -> Result<(Arc<IOManager>, Arc<SyncTimer>), Error> {
        log!(SystemLog::Initializing);
        job.validate().await?;
        let io_manager = Arc::new(IOManager::new(app_config.clone()));
        let engine = SyncEngine::new(Arc::new(job), app_config, io_manager.clone());
        let timer = Arc::new(SyncTimer::new(engine));
        log!(SystemLog::InitializeComplete);
        Ok((io_manager, timer))
    }

    async fn terminate(
        io_manager: Arc<IOManager>,
        shutdown: oneshot::Sender<()>,
        handle: JoinHandle<()>,
    ) {
        log!(SystemLog::Terminating);
        if shutdown.send(()).is_err() {
            log!(SystemError::ShutdownSignalFailed);
        }
        if let Err(err) = handle.await {
            log!(SystemError::ThreadPanic {
                reason: err.to_string()
            });
        }
        io_manager.terminate();
        log!(SystemLog::TerminateComplete);
    }

    #[cfg(unix)]
    async fn wait_for_signal() -> Result<(), Error> {
        use tokio::signal::unix::{SignalKind, signal};

        let listen_failed = |err: std::io::Error| SystemError::SignalListenFailed {
            reason: err.to_string(),
        };
        let mut terminate = signal(SignalKind::terminate()).map_err(listen_failed)?;
        tokio::select! {
            result = tokio::signal::ctrl_c() => result.map_err(listen_failed)?,
            _ = terminate.recv() => {}
        }
        Ok(())
    }

    #[cfg(not(unix))]
    async fn wait_for_signal() -> Result<(), Error> {
        tokio::signal::ctrl_c()
            .await
            .map_err(|err| SystemError::SignalListenFailed {
                reason: err.to_string(),
            })?;
        Ok(())
    }
}
