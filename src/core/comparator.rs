use crate::core::io_manager::IOManager;
use crate::interface::file_system::FileSystemTrait;
use crate::model::comparison_mode::ComparisonMode;
use crate::model::diff_result::DiffResult;
use crate::model::entry_kind::EntryKind;
use crate::model::error::Error;
use crate::model::log::sync::SyncLog;
use macros::log;
use std::collections::{BTreeMap, VecDeque};
use std::ffi::OsString;
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Read-only walk over a source/replica pair.
pub struct Comparator {
    io_manager: Arc<IOManager>,
}

struct Level {
    diff: DiffResult,
    subdirectories: Vec<PathBuf>,
    errors: Vec<Error>,
}

impl Comparator {
    pub fn new(io_manager: Arc<IOManager>) -> Self {
        Self { io_manager }
    }

    /// Classifies every entry that is not identical on both sides.
    ///
    /// Directories present on both sides are descended breadth first and never
    /// reported themselves. Source links are followed; a replica link is always
    /// reported as differing so it gets replaced by a real entry. Entries that
    /// cannot be inspected are returned as errors next to the diff and left out
    /// of it; only a failure to list the two roots aborts the walk.
    pub async fn compare_directory(
        &self,
        source: &Path,
        replica: &Path,
        comparison_mode: ComparisonMode,
    ) -> Result<(DiffResult, Vec<Error>), Error> {
        let mut diff = DiffResult::new();
        let mut errors = Vec::new();
        let mut queue = VecDeque::from([(PathBuf::new(), Vec::new())]);

        while let Some((relative, mut ancestors)) = queue.pop_front() {
            let source_dir = source.join(&relative);
            if let Ok(canonical) = tokio::fs::canonicalize(&source_dir).await {
                // Only a directory that contains itself is a cycle.
                if ancestors.contains(&canonical) {
                    log!(SyncLog::SkipVisited { path: source_dir });
                    continue;
                }
                ancestors.push(canonical);
            }

            let replica_dir = replica.join(&relative);
            match self
                .compare_level(&source_dir, &replica_dir, &relative, comparison_mode)
                .await
            {
                Ok(level) => {
                    diff.merge(level.diff);
                    queue.extend(
                        level
                            .subdirectories
                            .into_iter()
                            .map(|subdirectory| (subdirectory, ancestors.clone())),
                    );
                    errors.extend(level.errors);
                }
                Err(err) if relative.as_os_str().is_empty() => return Err(err),
                Err(err) => errors.push(err),
            }
        }

        Ok((diff, errors))
    }

    async fn compare_level(
        &self,
        source_dir: &Path,
        replica_dir: &Path,
        relative: &Path,
        comparison_mode: ComparisonMode,
    ) -> Result<Level, Error> {
        let source_entries = self.entry_names(source_dir).await?;
        let replica_entries = self.entry_names(replica_dir).await?;

        let mut level = Level {
            diff: DiffResult::new(),
            subdirectories: Vec::new(),
            errors: Vec::new(),
        };

        for (name, source_path) in &source_entries {
            let relative_path = relative.join(name);
            let Some(replica_path) = replica_entries.get(name) else {
                level.diff.only_in_source.insert(relative_path);
                continue;
            };

            let source_metadata = match self.io_manager.metadata(source_path).await {
                Ok(metadata) => metadata,
                Err(err) => {
                    level.errors.push(err);
                    continue;
                }
            };
            // Anything at the replica name that cannot be read as a plain file
            // or directory gets replaced.
            let replica_metadata = match self.io_manager.symlink_metadata(replica_path).await {
                Ok(metadata) if !metadata.is_symlink() => metadata,
                _ => {
                    level.diff.differing.insert(relative_path);
                    continue;
                }
            };

            match (
                EntryKind::from(&source_metadata),
                EntryKind::from(&replica_metadata),
            ) {
                (EntryKind::Directory, EntryKind::Directory) => {
                    level.subdirectories.push(relative_path);
                }
                (EntryKind::File, EntryKind::File) => {
                    match self
                        .files_differ(
                            source_path,
                            &source_metadata,
                            replica_path,
                            &replica_metadata,
                            comparison_mode,
                        )
                        .await
                    {
                        Ok(true) => {
                            level.diff.differing.insert(relative_path);
                        }
                        Ok(false) => {}
                        Err(err) => level.errors.push(err),
                    }
                }
                _ => {
                    level.diff.differing.insert(relative_path);
                }
            }
        }

        for name in replica_entries.keys() {
            if !source_entries.contains_key(name) {
                level.diff.only_in_replica.insert(relative.join(name));
            }
        }

        Ok(level)
    }

    async fn entry_names(&self, directory: &Path) -> Result<BTreeMap<OsString, PathBuf>, Error> {
        let entries = self.io_manager.list_directory(directory).await?;
        Ok(entries
            .into_iter()
            .filter_map(|path| path.file_name().map(|name| (name.to_owned(), path.clone())))
            .collect())
    }

    async fn files_differ(
        &self,
        source_path: &Path,
        source_metadata: &Metadata,
        replica_path: &Path,
        replica_metadata: &Metadata,
        comparison_mode: ComparisonMode,
    ) -> Result<bool, Error> {
        if source_metadata.len() != replica_metadata.len() {
            return Ok(true);
        }
        let same_modified = matches!(
            (source_metadata.modified(), replica_metadata.modified()),
            (Ok(source_time), Ok(replica_time)) if source_time == replica_time
        );

        match comparison_mode {
            ComparisonMode::Quick => Ok(!same_modified),
            ComparisonMode::Standard => {
                if same_modified {
                    Ok(false)
                } else {
                    let same = self.io_manager.same_content(source_path, replica_path).await?;
                    Ok(!same)
                }
            }
            ComparisonMode::Thorough(hash_type) => {
                let source_hash = self.io_manager.hash_file(source_path, hash_type).await?;
                let replica_hash = self.io_manager.hash_file(replica_path, hash_type).await?;
                Ok(source_hash != replica_hash)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::app_config::AppConfig;
    use crate::model::comparison_mode::HashType;
    use std::fs;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    fn comparator() -> Comparator {
        Comparator::new(Arc::new(IOManager::new(Arc::new(AppConfig::default()))))
    }

    fn set_modified(path: &Path, time: SystemTime) {
        fs::File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(time)
            .unwrap();
    }

    fn paths(items: &[&str]) -> Vec<PathBuf> {
        items.iter().map(PathBuf::from).collect()
    }

    async fn diff(source: &Path, replica: &Path, mode: ComparisonMode) -> DiffResult {
        let (diff, errors) = comparator()
            .compare_directory(source, replica, mode)
            .await
            .unwrap();
        assert!(errors.is_empty(), "{errors:?}");
        diff
    }

    #[tokio::test]
    async fn classifies_entries_on_each_side() {
        let source = TempDir::new().unwrap();
        let replica = TempDir::new().unwrap();
        fs::write(source.path().join("new.txt"), "new").unwrap();
        fs::create_dir(source.path().join("new_dir")).unwrap();
        fs::write(source.path().join("new_dir").join("inner.txt"), "x").unwrap();
        fs::write(replica.path().join("stale.txt"), "stale").unwrap();
        fs::create_dir(replica.path().join("stale_dir")).unwrap();

        let diff = diff(source.path(), replica.path(), ComparisonMode::Standard).await;

        assert_eq!(
            diff.only_in_source.into_iter().collect::<Vec<_>>(),
            paths(&["new.txt", "new_dir"])
        );
        assert_eq!(
            diff.only_in_replica.into_iter().collect::<Vec<_>>(),
            paths(&["stale.txt", "stale_dir"])
        );
        assert!(diff.differing.is_empty());
    }

    #[tokio::test]
    async fn descends_into_shared_directories() {
        let source = TempDir::new().unwrap();
        let replica = TempDir::new().unwrap();
        fs::create_dir_all(source.path().join("a").join("b")).unwrap();
        fs::create_dir_all(replica.path().join("a").join("b")).unwrap();
        fs::write(source.path().join("a").join("b").join("deep.txt"), "v2").unwrap();
        fs::write(replica.path().join("a").join("b").join("deep.txt"), "v1").unwrap();
        fs::write(replica.path().join("a").join("gone.txt"), "x").unwrap();

        let diff = diff(source.path(), replica.path(), ComparisonMode::Standard).await;

        assert!(diff.only_in_source.is_empty());
        assert_eq!(
            diff.only_in_replica.into_iter().collect::<Vec<_>>(),
            paths(&["a/gone.txt"])
        );
        assert_eq!(
            diff.differing.into_iter().collect::<Vec<_>>(),
            paths(&["a/b/deep.txt"])
        );
    }

    #[tokio::test]
    async fn type_mismatch_is_differing() {
        let source = TempDir::new().unwrap();
        let replica = TempDir::new().unwrap();
        fs::write(source.path().join("was_dir"), "file now").unwrap();
        fs::create_dir(replica.path().join("was_dir")).unwrap();
        fs::create_dir(source.path().join("was_file")).unwrap();
        fs::write(replica.path().join("was_file"), "file before").unwrap();

        let diff = diff(source.path(), replica.path(), ComparisonMode::Standard).await;

        assert_eq!(
            diff.differing.into_iter().collect::<Vec<_>>(),
            paths(&["was_dir", "was_file"])
        );
        assert!(diff.only_in_source.is_empty());
        assert!(diff.only_in_replica.is_empty());
    }

    #[tokio::test]
    async fn identical_trees_produce_empty_diff() {
        let source = TempDir::new().unwrap();
        let replica = TempDir::new().unwrap();
        let time = SystemTime::now() - Duration::from_secs(60);
        for root in [source.path(), replica.path()] {
            fs::create_dir(root.join("sub")).unwrap();
            fs::write(root.join("sub").join("b.txt"), "world").unwrap();
            set_modified(&root.join("sub").join("b.txt"), time);
        }

        for mode in [
            ComparisonMode::Quick,
            ComparisonMode::Standard,
            ComparisonMode::Thorough(HashType::Sha256),
        ] {
            assert!(diff(source.path(), replica.path(), mode).await.is_empty());
        }
    }

    #[tokio::test]
    async fn standard_falls_back_to_content() {
        let source = TempDir::new().unwrap();
        let replica = TempDir::new().unwrap();
        fs::write(source.path().join("same.txt"), "same").unwrap();
        fs::write(replica.path().join("same.txt"), "same").unwrap();
        fs::write(source.path().join("changed.txt"), "v2").unwrap();
        fs::write(replica.path().join("changed.txt"), "v1").unwrap();
        set_modified(
            &replica.path().join("same.txt"),
            SystemTime::now() - Duration::from_secs(600),
        );
        set_modified(
            &replica.path().join("changed.txt"),
            SystemTime::now() - Duration::from_secs(600),
        );

        let diff = diff(source.path(), replica.path(), ComparisonMode::Standard).await;

        assert_eq!(
            diff.differing.into_iter().collect::<Vec<_>>(),
            paths(&["changed.txt"])
        );
    }

    #[tokio::test]
    async fn quick_trusts_size_and_time() {
        let source = TempDir::new().unwrap();
        let replica = TempDir::new().unwrap();
        let time = SystemTime::now() - Duration::from_secs(60);
        fs::write(source.path().join("a.txt"), "v2").unwrap();
        fs::write(replica.path().join("a.txt"), "v1").unwrap();
        set_modified(&source.path().join("a.txt"), time);
        set_modified(&replica.path().join("a.txt"), time);

        let quick = diff(source.path(), replica.path(), ComparisonMode::Quick).await;
        assert!(quick.is_empty());

        let thorough = diff(
            source.path(),
            replica.path(),
            ComparisonMode::Thorough(HashType::Blake3),
        )
        .await;
        assert_eq!(thorough.differing.len(), 1);
    }

    #[tokio::test]
    async fn size_change_is_differing_in_every_mode() {
        let source = TempDir::new().unwrap();
        let replica = TempDir::new().unwrap();
        fs::write(source.path().join("a.txt"), "longer").unwrap();
        fs::write(replica.path().join("a.txt"), "short").unwrap();

        for mode in [
            ComparisonMode::Quick,
            ComparisonMode::Standard,
            ComparisonMode::Thorough(HashType::Md5),
        ] {
            assert_eq!(diff(source.path(), replica.path(), mode).await.differing.len(), 1);
        }
    }

    #[tokio::test]
    async fn missing_root_is_an_error() {
        let source = TempDir::new().unwrap();
        let replica = source.path().join("missing");
        fs::write(source.path().join("a.txt"), "a").unwrap();

        let result = comparator()
            .compare_directory(source.path(), &replica, ComparisonMode::Standard)
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn comparison_leaves_both_trees_untouched() {
        let source = TempDir::new().unwrap();
        let replica = TempDir::new().unwrap();
        fs::write(source.path().join("a.txt"), "a").unwrap();
        fs::write(replica.path().join("b.txt"), "b").unwrap();

        diff(source.path(), replica.path(), ComparisonMode::Standard).await;

        assert_eq!(fs::read_to_string(source.path().join("a.txt")).unwrap(), "a");
        assert_eq!(fs::read_to_string(replica.path().join("b.txt")).unwrap(), "b");
        assert!(!replica.path().join("a.txt").exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn replica_link_is_differing_even_when_content_matches() {
        let source = TempDir::new().unwrap();
        let replica = TempDir::new().unwrap();
        fs::write(source.path().join("a.txt"), "same").unwrap();
        fs::write(source.path().join("b.txt"), "same").unwrap();
        std::os::unix::fs::symlink(
            source.path().join("a.txt"),
            replica.path().join("a.txt"),
        )
        .unwrap();
        std::os::unix::fs::symlink(source.path().join("gone"), replica.path().join("b.txt"))
            .unwrap();

        let diff = diff(source.path(), replica.path(), ComparisonMode::Standard).await;

        assert_eq!(
            diff.differing.into_iter().collect::<Vec<_>>(),
            paths(&["a.txt", "b.txt"])
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn sibling_alias_is_walked_like_any_directory() {
        let source = TempDir::new().unwrap();
        let replica = TempDir::new().unwrap();
        fs::create_dir(source.path().join("real")).unwrap();
        fs::write(source.path().join("real").join("data.txt"), "data").unwrap();
        std::os::unix::fs::symlink(source.path().join("real"), source.path().join("link"))
            .unwrap();
        fs::create_dir(replica.path().join("link")).unwrap();
        fs::create_dir(replica.path().join("real")).unwrap();

        let diff = diff(source.path(), replica.path(), ComparisonMode::Standard).await;

        assert_eq!(
            diff.only_in_source.into_iter().collect::<Vec<_>>(),
            paths(&["link/data.txt", "real/data.txt"])
        );
    }
}
