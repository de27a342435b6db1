use thiserror::Error;

/// Errors that can occur when persisting uploaded files
#[derive(Error, Debug)]
pub enum FileStoreError {
    #[error("Failed to create uploads directory {0}: {1}")]
    CreateDirError(String, String),

    #[error("Failed to write file {0}: {1}")]
    WriteError(String, String),

    #[error("Other file storage error: {0}")]
    Other(#[from] anyhow::Error),
}
