use crate::db::error::DatabaseError;
use crate::db::models::UniqueField;
use crate::files::error::FileStoreError;
use thiserror::Error;

/// Errors surfaced by the registration submission pipeline.
///
/// Display strings are client-facing; the HTTP boundary returns them
/// verbatim in the response message.
#[derive(Error, Debug)]
pub enum RegistrationError {
    #[error("Payment screenshot is required.")]
    MissingFile,

    #[error("The {0} field is required.")]
    MissingField(&'static str),

    #[error("This {0} is already registered.")]
    DuplicateField(UniqueField),

    #[error("A registration with these details already exists.")]
    DuplicateRegistration,

    #[error("An error occurred during registration.")]
    Internal(#[source] anyhow::Error),
}

impl From<DatabaseError> for RegistrationError {
    fn from(err: DatabaseError) -> Self {
        match err {
            // A unique violation at insert time means a concurrent
            // submission won the race between lookup and insert; at this
            // layer no per-field detail is available.
            DatabaseError::UniqueViolation => RegistrationError::DuplicateRegistration,
            other => RegistrationError::Internal(other.into()),
        }
    }
}

impl From<FileStoreError> for RegistrationError {
    fn from(err: FileStoreError) -> Self {
        RegistrationError::Internal(err.into())
    }
}
