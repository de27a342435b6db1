use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A persisted registration from the registrations table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Registration {
    pub id: Uuid,
    pub name: String,
    pub roll_no: String,
    pub reg_no: String,
    pub year: String,
    pub phone: String,
    pub email: String,
    pub payment_screenshot: String,
    pub created_at: DateTime<Utc>,
}

/// Field values for a registration that has not been persisted yet.
///
/// The id and creation timestamp are assigned at insert time, so a
/// `NewRegistration` never carries them.
#[derive(Debug, Clone)]
pub struct NewRegistration {
    pub name: String,
    pub roll_no: String,
    pub reg_no: String,
    pub year: String,
    pub phone: String,
    pub email: String,
    pub payment_screenshot: String,
}

/// The four fields that must stay distinct across all registrations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Email,
    Phone,
    RegNo,
    RollNo,
}

impl UniqueField {
    /// Conflict reporting order: email wins over phone, phone over the
    /// registration number, and that over the roll number.
    pub const PRIORITY: [UniqueField; 4] =
        [Self::Email, Self::Phone, Self::RegNo, Self::RollNo];

    /// Human-readable field name used in client-facing messages
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Phone => "phone number",
            Self::RegNo => "registration number",
            Self::RollNo => "roll number",
        }
    }
}

impl fmt::Display for UniqueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
