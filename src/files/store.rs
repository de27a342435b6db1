use crate::files::error::FileStoreError;
use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;

/// FileStore trait defining the interface for persisting uploaded
/// attachments
#[async_trait]
pub trait FileStore: Send + Sync + 'static {
    /// Store one uploaded file under a collision-resistant name and return
    /// the path it can be referenced by.
    ///
    /// * `original_name` - The client-supplied file name; only its final
    ///   component is kept
    /// * `data` - The full file contents
    async fn store(&self, original_name: &str, data: Bytes) -> Result<String, FileStoreError>;

    /// Check whether a previously returned path still resolves (test-only)
    #[cfg(test)]
    async fn contains(&self, stored_path: &str) -> Result<bool, FileStoreError>;
}

/// Implementation of FileStore trait for Arc<T> where T implements FileStore
///
/// This allows sharing a store instance between the HTTP state and tests.
#[async_trait]
impl<T: FileStore + ?Sized> FileStore for Arc<T> {
    async fn store(&self, original_name: &str, data: Bytes) -> Result<String, FileStoreError> {
        (**self).store(original_name, data).await
    }

    #[cfg(test)]
    async fn contains(&self, stored_path: &str) -> Result<bool, FileStoreError> {
        (**self).contains(stored_path).await
    }
}
