use crate::files::error::FileStoreError;
use crate::files::store::FileStore;
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

/// `FakeFileStore` is an in-memory implementation of the `FileStore` trait
/// for testing purposes. Stored paths use a sequence number instead of a
/// timestamp so they stay unique and predictable within a test.
#[derive(Clone)]
pub struct FakeFileStore {
    data: Arc<Mutex<HashMap<String, Bytes>>>,
    next_seq: Arc<AtomicU64>,
    fail_next: Arc<AtomicBool>,
}

#[allow(dead_code)]
impl FakeFileStore {
    /// Create a new empty FakeFileStore
    pub fn new() -> Self {
        FakeFileStore {
            data: Arc::new(Mutex::new(HashMap::new())),
            next_seq: Arc::new(AtomicU64::new(1)),
            fail_next: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Make the next `store` call fail with a write error
    pub fn fake_fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    /// Number of files stored so far
    pub async fn fake_stored_count(&self) -> usize {
        self.data.lock().await.len()
    }

    /// Contents stored under a path, if any
    pub async fn fake_get(&self, stored_path: &str) -> Option<Bytes> {
        self.data.lock().await.get(stored_path).cloned()
    }
}

#[async_trait]
impl FileStore for FakeFileStore {
    async fn store(&self, original_name: &str, data: Bytes) -> Result<String, FileStoreError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(FileStoreError::WriteError(
                original_name.to_string(),
                "fake write failure".to_string(),
            ));
        }

        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
        let stored_path = format!("uploads/{}-{}", seq, original_name);

        let mut files = self.data.lock().await;
        files.insert(stored_path.clone(), data);
        Ok(stored_path)
    }

    #[cfg(test)]
    async fn contains(&self, stored_path: &str) -> Result<bool, FileStoreError> {
        Ok(self.data.lock().await.contains_key(stored_path))
    }
}

#[cfg(test)]
impl Default for FakeFileStore {
    fn default() -> Self {
        Self::new()
    }
}
