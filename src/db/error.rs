use thiserror::Error;

/// Errors that can occur when interacting with the registration database
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Failed to connect to database: {0}")]
    ConnectionError(String),

    #[error("Query execution failed: {0}")]
    QueryError(String),

    #[error("A registration with the same unique field already exists")]
    UniqueViolation,

    #[error("Other database error: {0}")]
    Other(#[from] anyhow::Error),
}
