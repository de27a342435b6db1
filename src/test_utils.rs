use crate::db::NewRegistration;
use crate::registration::RegistrationForm;

/// Check if a test is enabled via environment variable
fn is_test_enabled(env_var: &str) -> bool {
    std::env::var(env_var)
        .map(|v| v.to_lowercase() == "true")
        .unwrap_or(false)
}

/// Check if PostgreSQL-backed tests are enabled via environment variable
pub fn is_db_enabled() -> bool {
    is_test_enabled("ENABLE_DB_TESTS")
}

/// Connection URL for the test database
pub fn database_url() -> String {
    std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "postgres://localhost/registrations_test".to_string())
}

/// A complete, valid form whose unique fields are derived from `tag`
pub fn sample_form(tag: &str) -> RegistrationForm {
    RegistrationForm {
        name: format!("Student {tag}"),
        roll_no: format!("roll-{tag}"),
        reg_no: format!("reg-{tag}"),
        year: "2".to_string(),
        phone: format!("phone-{tag}"),
        email: format!("{tag}@example.com"),
    }
}

/// A complete NewRegistration with the same tagging scheme as
/// [`sample_form`]
pub fn sample_new_registration(tag: &str) -> NewRegistration {
    let form = sample_form(tag);
    NewRegistration {
        name: form.name,
        roll_no: form.roll_no,
        reg_no: form.reg_no,
        year: form.year,
        phone: form.phone,
        email: form.email,
        payment_screenshot: format!("uploads/1-receipt-{tag}.png"),
    }
}
