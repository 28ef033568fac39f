use crate::model::comparison_mode::HashType;
use crate::model::entry_kind::EntryKind;
use crate::model::error::Error;
use crate::model::error::io::IOError;
use crate::utils::file_hash;
use async_trait::async_trait;
use std::fs::Metadata;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::ReadDirStream;

const COMPARE_CHUNK: usize = 64 * 1024;

/// Filesystem access for the sync engine. Every call holds one semaphore
/// permit while it touches the disk.
#[async_trait]
pub trait FileSystemTrait: Send + Sync {
    fn new(semaphore: Arc<Semaphore>) -> Self
    where
        Self: Sized;

    fn semaphore(&self) -> Arc<Semaphore>;

    async fn permit(&self) -> Result<OwnedSemaphorePermit, Error> {
        let permit = self
            .semaphore()
            .acquire_owned()
            .await
            .map_err(|_| IOError::SemaphoreClosed)?;
        Ok(permit)
    }

    /// Immediate children of `path`, sorted by name.
    async fn list_directory(&self, path: &Path) -> Result<Vec<PathBuf>, Error> {
        let _permit = self.permit().await?;
        let read_failed = |err: std::io::Error| IOError::ReadDirectoryFailed {
            path: path.to_path_buf(),
            reason: err.to_string(),
        };
        let reader = fs::read_dir(path).await.map_err(read_failed)?;
        let mut entries = ReadDirStream::new(reader);
        let mut result = Vec::new();
        while let Some(entry) = entries.next().await {
            result.push(entry.map_err(read_failed)?.path());
        }
        result.sort();
        Ok(result)
    }

    async fn is_empty_directory(&self, path: &Path) -> Result<bool, Error> {
        let _permit = self.permit().await?;
        let read_failed = |err: std::io::Error| IOError::ReadDirectoryFailed {
            path: path.to_path_buf(),
            reason: err.to_string(),
        };
        let mut reader = fs::read_dir(path).await.map_err(read_failed)?;
        Ok(reader.next_entry().await.map_err(read_failed)?.is_none())
    }

    /// Metadata with symbolic links followed.
    async fn metadata(&self, path: &Path) -> Result<Metadata, Error> {
        let _permit = self.permit().await?;
        let metadata = fs::metadata(path)
            .await
            .map_err(|err| IOError::GetMetadataFailed {
                path: path.to_path_buf(),
                reason: err.to_string(),
            })?;
        Ok(metadata)
    }

    /// Metadata of the entry itself; a symbolic link is not followed.
    async fn symlink_metadata(&self, path: &Path) -> Result<Metadata, Error> {
        let _permit = self.permit().await?;
        let metadata = fs::symlink_metadata(path)
            .await
            .map_err(|err| IOError::GetMetadataFailed {
                path: path.to_path_buf(),
                reason: err.to_string(),
            })?;
        Ok(metadata)
    }

    async fn entry_kind(&self, path: &Path) -> Result<EntryKind, Error> {
        let metadata = self.metadata(path).await?;
        Ok(EntryKind::from(&metadata))
    }

    async fn create_directory(&self, path: &Path) -> Result<(), Error> {
        let _permit = self.permit().await?;
        fs::create_dir_all(path)
            .await
            .map_err(|err| IOError::CreateDirectoryFailed {
                path: path.to_path_buf(),
                reason: err.to_string(),
            })?;
        Ok(())
    }

    /// Copies `source` over `destination` and stamps the destination with the
    /// source modification time.
    async fn copy_file(&self, source: &Path, destination: &Path) -> Result<(), Error> {
        let _permit = self.permit().await?;
        let copy_failed = |err: std::io::Error| IOError::CopyFileFailed {
            src: source.to_path_buf(),
            dst: destination.to_path_buf(),
            reason: err.to_string(),
        };

        let modified = fs::metadata(source)
            .await
            .and_then(|metadata| metadata.modified())
            .map_err(copy_failed)?;

        match fs::copy(source, destination).await {
            Ok(_) => {}
            // A read-only copy left by an earlier cycle cannot be truncated in place.
            Err(err) if err.kind() == ErrorKind::PermissionDenied => {
                fs::remove_file(destination).await.map_err(|_| copy_failed(err))?;
                fs::copy(source, destination).await.map_err(copy_failed)?;
            }
            Err(err) => return Err(copy_failed(err).into()),
        }

        let set_failed = |err: std::io::Error| IOError::SetMetadataFailed {
            path: destination.to_path_buf(),
            reason: err.to_string(),
        };
        let file = fs::File::open(destination)
            .await
            .map_err(set_failed)?
            .into_std()
            .await;
        tokio::task::spawn_blocking(move || file.set_modified(modified))
            .await
            .map_err(|err| IOError::SetMetadataFailed {
                path: destination.to_path_buf(),
                reason: err.to_string(),
            })?
            .map_err(set_failed)?;
        Ok(())
    }

    async fn delete_directory(&self, path: &Path) -> Result<(), Error> {
        let _permit = self.permit().await?;
        fs::remove_dir_all(path)
            .await
            .map_err(|err| IOError::DeleteDirectoryFailed {
                path: path.to_path_buf(),
                reason: err.to_string(),
            })?;
        Ok(())
    }

    async fn delete_file(&self, path: &Path) -> Result<(), Error> {
        let _permit = self.permit().await?;
        fs::remove_file(path)
            .await
            .map_err(|err| IOError::DeleteFileFailed {
                path: path.to_path_buf(),
                reason: err.to_string(),
            })?;
        Ok(())
    }

    /// Removes whatever sits at `path` without following a final symbolic link.
    async fn delete_entry(&self, path: &Path) -> Result<EntryKind, Error> {
        let is_directory = self.symlink_metadata(path).await?.is_dir();
        if is_directory {
            self.delete_directory(path).await?;
            Ok(EntryKind::Directory)
        } else {
            self.delete_file(path).await?;
            Ok(EntryKind::File)
        }
    }

    async fn same_content(&self, first: &Path, second: &Path) -> Result<bool, Error> {
        let _permit = self.permit().await?;
        let open = |path: &Path| {
            let path = path.to_path_buf();
            async move {
                fs::File::open(&path)
                    .await
                    .map_err(|err| IOError::ReadFileFailed {
                        path,
                        reason: err.to_string(),
                    })
            }
        };
        let mut first_file = open(first).await?;
        let mut second_file = open(second).await?;

        let mut first_buffer = vec![0u8; COMPARE_CHUNK];
        let mut second_buffer = vec![0u8; COMPARE_CHUNK];
        loop {
            let first_read = fill(&mut first_file, &mut first_buffer, first).await?;
            let second_read = fill(&mut second_file, &mut second_buffer, second).await?;
            if first_read != second_read || first_buffer[..first_read] != second_buffer[..second_read] {
                return Ok(false);
            }
            if first_read < COMPARE_CHUNK {
                return Ok(true);
            }
        }
    }

    async fn hash_file(&self, path: &Path, hash_type: HashType) -> Result<Vec<u8>, Error> {
        let _permit = self.permit().await?;
        let owned = path.to_path_buf();
        let hash = tokio::task::spawn_blocking(move || file_hash::hash_file(&owned, hash_type))
            .await
            .map_err(|err| IOError::ReadFileFailed {
                path: path.to_path_buf(),
                reason: err.to_string(),
            })??;
        Ok(hash)
    }
}

/// Reads until `buffer` is full or the reader is exhausted.
async fn fill<R: AsyncRead + Unpin>(
    reader: &mut R,
    buffer: &mut [u8],
    path: &Path,
) -> Result<usize, Error> {
    let mut filled = 0;
    while filled < buffer.len() {
        let read = reader
            .read(&mut buffer[filled..])
            .await
            .map_err(|err| IOError::ReadFileFailed {
                path: path.to_path_buf(),
                reason: err.to_string(),
            })?;
        if read == 0 {
            break;
        }
        filled += read;
    }
    Ok(filled)
}
