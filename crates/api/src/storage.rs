//! Flat-directory storage for uploaded vessel files.
//!
//! Files are written once under a generated name and never modified or
//! deleted by the service. Files are opened with `create_new`, so an existing
//! file is never overwritten even if two generated names were to collide.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use bugrelay_core::upload::{generate_stored_filename, UploadPolicy};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, AppResult};

/// Attempts at generating a fresh name when the file already exists.
const MAX_NAME_ATTEMPTS: usize = 3;

/// Metadata of a file written to the upload directory.
#[derive(Debug, Clone)]
pub struct StoredUpload {
    pub original_filename: String,
    pub stored_filename: String,
    pub size: usize,
    pub extension: String,
    pub path: PathBuf,
}

/// The upload directory together with the policy applied to every file.
#[derive(Debug)]
pub struct UploadStore {
    dir: PathBuf,
    policy: UploadPolicy,
}

impl UploadStore {
    /// Open the store, creating the directory if it does not exist.
    pub async fn open(dir: impl Into<PathBuf>, policy: UploadPolicy) -> std::io::Result<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self { dir, policy })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn policy(&self) -> &UploadPolicy {
        &self.policy
    }

    /// Validate and write a file.
    ///
    /// Extension and size are checked before anything touches the disk.
    pub async fn store(&self, original_filename: &str, data: &[u8]) -> AppResult<StoredUpload> {
        let extension = self.policy.validate_extension(original_filename)?;
        self.policy.check_size(data.len())?;

        for _ in 0..MAX_NAME_ATTEMPTS {
            let stored_filename = generate_stored_filename(original_filename);
            let path = self.dir.join(&stored_filename);

            let mut file = match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(AppError::InternalError(e.to_string())),
            };

            if let Err(e) = write_all(&mut file, data).await {
                // Leave no partial file behind.
                let _ = tokio::fs::remove_file(&path).await;
                return Err(AppError::InternalError(e.to_string()));
            }

            tracing::info!(
                original_filename,
                stored_filename = %stored_filename,
                size = data.len(),
                "Vessel file stored",
            );

            return Ok(StoredUpload {
                original_filename: original_filename.to_string(),
                stored_filename,
                size: data.len(),
                extension,
                path,
            });
        }

        Err(AppError::InternalError(format!(
            "Could not allocate a unique filename for '{original_filename}'"
        )))
    }
}

async fn write_all(file: &mut tokio::fs::File, data: &[u8]) -> std::io::Result<()> {
    file.write_all(data).await?;
    file.flush().await
}
