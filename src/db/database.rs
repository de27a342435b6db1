use crate::db::error::DatabaseError;
use crate::db::models::{NewRegistration, Registration};
use async_trait::async_trait;
use std::sync::Arc;

/// Database trait defining the interface for persisting and counting
/// registrations
#[async_trait]
pub trait Database: Send + Sync + 'static {
    /// Find existing registrations that collide with the given unique fields
    ///
    /// Returns every record matching `email` OR `phone` OR `reg_no` OR
    /// `roll_no`. This pre-insert lookup exists for friendly per-field
    /// conflict messages; the unique constraints enforced by [`insert`] are
    /// the correctness guarantee.
    ///
    /// [`insert`]: Database::insert
    async fn find_conflicts(
        &self,
        email: &str,
        phone: &str,
        reg_no: &str,
        roll_no: &str,
    ) -> Result<Vec<Registration>, DatabaseError>;

    /// Insert a new registration, assigning its id and creation timestamp
    ///
    /// Fails with [`DatabaseError::UniqueViolation`] when a unique
    /// constraint rejects the row, i.e. a concurrent submission won the
    /// race between lookup and insert.
    async fn insert(&self, new: NewRegistration) -> Result<Registration, DatabaseError>;

    /// Total number of persisted registrations
    async fn count(&self) -> Result<i64, DatabaseError>;

    /// Remove all registrations (test-only)
    #[cfg(test)]
    async fn clear(&self) -> Result<(), DatabaseError>;
}

/// Implementation of Database trait for Arc<T> where T implements Database
///
/// This allows sharing database instances across threads and components
/// efficiently.
#[async_trait]
impl<T: Database + ?Sized> Database for Arc<T> {
    async fn find_conflicts(
        &self,
        email: &str,
        phone: &str,
        reg_no: &str,
        roll_no: &str,
    ) -> Result<Vec<Registration>, DatabaseError> {
        (**self).find_conflicts(email, phone, reg_no, roll_no).await
    }

    async fn insert(&self, new: NewRegistration) -> Result<Registration, DatabaseError> {
        (**self).insert(new).await
    }

    async fn count(&self) -> Result<i64, DatabaseError> {
        (**self).count().await
    }

    #[cfg(test)]
    async fn clear(&self) -> Result<(), DatabaseError> {
        (**self).clear().await
    }
}
