use crate::db::database::Database;
use crate::db::error::DatabaseError;
use crate::db::models::{NewRegistration, Registration};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// A fake in-memory implementation of the Database trait for testing.
///
/// Uniqueness is enforced inside `insert` under a single lock, mirroring the
/// atomicity of the real unique constraints. The pre-insert lookup can be
/// blinded to simulate a submission racing past the check.
#[derive(Clone)]
pub struct FakeDatabase {
    records: Arc<RwLock<Vec<Registration>>>,
    hide_conflicts: Arc<AtomicBool>,
    fail_inserts: Arc<AtomicBool>,
}

#[allow(dead_code)]
impl FakeDatabase {
    /// Create a new empty FakeDatabase
    pub fn new() -> Self {
        FakeDatabase {
            records: Arc::new(RwLock::new(Vec::new())),
            hide_conflicts: Arc::new(AtomicBool::new(false)),
            fail_inserts: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Make `find_conflicts` report nothing, so a duplicate submission
    /// reaches the insert and loses there instead
    pub fn fake_hide_conflicts(&self) {
        self.hide_conflicts.store(true, Ordering::SeqCst);
    }

    /// Make every insert fail with a query error
    pub fn fake_fail_inserts(&self) {
        self.fail_inserts.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl Database for FakeDatabase {
    async fn find_conflicts(
        &self,
        email: &str,
        phone: &str,
        reg_no: &str,
        roll_no: &str,
    ) -> Result<Vec<Registration>, DatabaseError> {
        if self.hide_conflicts.load(Ordering::SeqCst) {
            return Ok(Vec::new());
        }

        let records = self.records.read().unwrap();
        Ok(records
            .iter()
            .filter(|r| {
                r.email == email || r.phone == phone || r.reg_no == reg_no || r.roll_no == roll_no
            })
            .cloned()
            .collect())
    }

    async fn insert(&self, new: NewRegistration) -> Result<Registration, DatabaseError> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(DatabaseError::QueryError(
                "fake insert failure".to_string(),
            ));
        }

        let mut records = self.records.write().unwrap();

        // Check-and-insert under one lock, like the real unique constraints
        let collides = records.iter().any(|r| {
            r.email == new.email
                || r.phone == new.phone
                || r.reg_no == new.reg_no
                || r.roll_no == new.roll_no
        });
        if collides {
            return Err(DatabaseError::UniqueViolation);
        }

        let registration = Registration {
            id: Uuid::new_v4(),
            name: new.name,
            roll_no: new.roll_no,
            reg_no: new.reg_no,
            year: new.year,
            phone: new.phone,
            email: new.email,
            payment_screenshot: new.payment_screenshot,
            created_at: Utc::now(),
        };
        records.push(registration.clone());
        Ok(registration)
    }

    async fn count(&self) -> Result<i64, DatabaseError> {
        let records = self.records.read().unwrap();
        Ok(records.len() as i64)
    }

    #[cfg(test)]
    async fn clear(&self) -> Result<(), DatabaseError> {
        self.records.write().unwrap().clear();
        Ok(())
    }
}

#[cfg(test)]
impl Default for FakeDatabase {
    fn default() -> Self {
        Self::new()
    }
}
