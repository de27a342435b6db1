pub mod error;
pub mod service;
#[cfg(test)]
mod tests;

pub use error::RegistrationError;
pub use service::{RegistrationForm, RegistrationService};
