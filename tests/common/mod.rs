#![allow(dead_code)]

use replica_sync::core::app_config::AppConfig;
use replica_sync::core::io_manager::IOManager;
use replica_sync::core::sync_engine::SyncEngine;
use replica_sync::model::comparison_mode::ComparisonMode;
use replica_sync::model::config::Config;
use replica_sync::model::sync_job::SyncJob;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::fmt::MakeWriter;

/// Relative path to file content, `None` for directories.
pub type Snapshot = BTreeMap<PathBuf, Option<Vec<u8>>>;

pub fn snapshot(root: &Path) -> Snapshot {
    let mut tree = BTreeMap::new();
    collect(root, root, &mut tree);
    tree
}

fn collect(root: &Path, directory: &Path, tree: &mut Snapshot) {
    for entry in fs::read_dir(directory).unwrap() {
        let path = entry.unwrap().path();
        let relative = path.strip_prefix(root).unwrap().to_path_buf();
        if path.is_dir() {
            tree.insert(relative, None);
            collect(root, &path, tree);
        } else {
            tree.insert(relative, Some(fs::read(&path).unwrap()));
        }
    }
}

pub fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

pub fn mkdir(root: &Path, relative: &str) {
    fs::create_dir_all(root.join(relative)).unwrap();
}

pub fn engine(source: &Path, replica: &Path, interval_seconds: u64) -> SyncEngine {
    engine_with_mode(source, replica, interval_seconds, ComparisonMode::default())
}

pub fn engine_with_mode(
    source: &Path,
    replica: &Path,
    interval_seconds: u64,
    comparison_mode: ComparisonMode,
) -> SyncEngine {
    let job = SyncJob::new(source, replica, replica.join("unused.log"), interval_seconds).unwrap();
    let app_config = Arc::new(
        AppConfig::from_config(Config {
            comparison_mode,
            ..Config::default()
        })
        .unwrap(),
    );
    let io_manager = Arc::new(IOManager::new(app_config.clone()));
    SyncEngine::new(Arc::new(job), app_config, io_manager)
}

/// Polls `condition` every 20 ms until it holds or `timeout` passes.
pub async fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    condition()
}

/// In-memory sink for formatted log records.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn lines(&self) -> Vec<String> {
        let buffer = self.0.lock().unwrap();
        String::from_utf8_lossy(&buffer)
            .lines()
            .map(str::to_string)
            .collect()
    }
}

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
