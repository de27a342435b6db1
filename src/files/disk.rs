use crate::files::error::FileStoreError;
use crate::files::store::FileStore;
use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use std::path::PathBuf;
use tokio::fs;
use tracing::{debug, error, info};

/// Local-disk implementation of the FileStore trait.
///
/// Files land in a dedicated uploads directory under a name combining the
/// current millisecond timestamp and the sanitized original filename. The
/// write is not transactional with the database insert that references it.
pub struct DiskFileStore {
    root: PathBuf,
}

impl DiskFileStore {
    /// Create a new DiskFileStore rooted at the given directory, creating
    /// it if absent
    pub async fn new(root: impl Into<PathBuf>) -> Result<Self, FileStoreError> {
        let root = root.into();

        fs::create_dir_all(&root).await.map_err(|e| {
            error!("Failed to create uploads directory {:?}: {}", root, e);
            FileStoreError::CreateDirError(root.display().to_string(), e.to_string())
        })?;

        info!("Uploads directory ready at {:?}", root);
        Ok(DiskFileStore { root })
    }

    fn unique_name(original_name: &str) -> String {
        format!(
            "{}-{}",
            Utc::now().timestamp_millis(),
            sanitize_filename(original_name)
        )
    }
}

/// Strip client-supplied directory components, keeping the bare file name
fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name).trim();
    if base.is_empty() || base == "." || base == ".." {
        "upload".to_string()
    } else {
        base.to_string()
    }
}

#[async_trait]
impl FileStore for DiskFileStore {
    async fn store(&self, original_name: &str, data: Bytes) -> Result<String, FileStoreError> {
        let path = self.root.join(Self::unique_name(original_name));
        debug!("Writing {} bytes to {:?}", data.len(), path);

        fs::write(&path, &data).await.map_err(|e| {
            error!("Failed to write uploaded file {:?}: {}", path, e);
            FileStoreError::WriteError(path.display().to_string(), e.to_string())
        })?;

        info!("Stored upload as {:?}", path);
        Ok(path.to_string_lossy().into_owned())
    }

    #[cfg(test)]
    async fn contains(&self, stored_path: &str) -> Result<bool, FileStoreError> {
        fs::try_exists(stored_path)
            .await
            .map_err(|e| FileStoreError::Other(anyhow::anyhow!("{e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::sanitize_filename;

    #[test]
    fn sanitize_keeps_plain_names() {
        assert_eq!(sanitize_filename("receipt.png"), "receipt.png");
    }

    #[test]
    fn sanitize_strips_directory_components() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\Users\\x\\shot.jpg"), "shot.jpg");
    }

    #[test]
    fn sanitize_replaces_empty_and_dot_names() {
        assert_eq!(sanitize_filename(""), "upload");
        assert_eq!(sanitize_filename("uploads/"), "upload");
        assert_eq!(sanitize_filename(".."), "upload");
    }
}
