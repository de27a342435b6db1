use crate::db::models::{NewRegistration, Registration, UniqueField};
use crate::db::Database;
use crate::registration::error::RegistrationError;
use std::sync::Arc;
use tracing::{info, warn};

/// Form fields from one submission, prior to validation
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub name: String,
    pub roll_no: String,
    pub reg_no: String,
    pub year: String,
    pub phone: String,
    pub email: String,
}

/// Validates and persists registration submissions.
///
/// The pre-insert conflict lookup is best-effort, for per-field error
/// messages; the database unique constraints decide races.
pub struct RegistrationService<D: Database> {
    database: Arc<D>,
}

impl<D: Database> RegistrationService<D> {
    /// Creates a new service over the given database
    pub fn new(database: D) -> Self {
        RegistrationService {
            database: Arc::new(database),
        }
    }

    /// Validate one submission and persist it.
    ///
    /// `stored_file` is the path the payment screenshot was stored under,
    /// or None when the submission carried no attachment. The attachment
    /// check runs first: a missing file is reported even when the form
    /// fields are invalid too.
    pub async fn submit(
        &self,
        form: RegistrationForm,
        stored_file: Option<String>,
    ) -> Result<Registration, RegistrationError> {
        let payment_screenshot = match stored_file {
            Some(path) if !path.is_empty() => path,
            _ => {
                warn!("Submission rejected: no payment screenshot attached");
                return Err(RegistrationError::MissingFile);
            }
        };

        require_field(&form.name, "name")?;
        require_field(&form.roll_no, "roll number")?;
        require_field(&form.reg_no, "registration number")?;
        require_field(&form.year, "year")?;
        require_field(&form.phone, "phone number")?;
        require_field(&form.email, "email")?;

        let conflicts = self
            .database
            .find_conflicts(&form.email, &form.phone, &form.reg_no, &form.roll_no)
            .await?;
        if let Some(field) = conflicting_field(&form, &conflicts) {
            info!("Submission rejected: {} already registered", field);
            return Err(RegistrationError::DuplicateField(field));
        }

        let created = self
            .database
            .insert(NewRegistration {
                name: form.name,
                roll_no: form.roll_no,
                reg_no: form.reg_no,
                year: form.year,
                phone: form.phone,
                email: form.email,
                payment_screenshot,
            })
            .await?;

        info!("Registered {} ({})", created.name, created.email);
        Ok(created)
    }

    /// Total number of persisted registrations, computed fresh per call
    pub async fn count(&self) -> Result<i64, RegistrationError> {
        Ok(self.database.count().await?)
    }
}

fn require_field(value: &str, name: &'static str) -> Result<(), RegistrationError> {
    if value.trim().is_empty() {
        warn!("Submission rejected: missing {}", name);
        return Err(RegistrationError::MissingField(name));
    }
    Ok(())
}

/// Pick the single conflict to report when unique fields collide; email
/// wins over phone, phone over reg_no, reg_no over roll_no
fn conflicting_field(form: &RegistrationForm, existing: &[Registration]) -> Option<UniqueField> {
    UniqueField::PRIORITY.into_iter().find(|field| {
        existing.iter().any(|r| match field {
            UniqueField::Email => r.email == form.email,
            UniqueField::Phone => r.phone == form.phone,
            UniqueField::RegNo => r.reg_no == form.reg_no,
            UniqueField::RollNo => r.roll_no == form.roll_no,
        })
    })
}
