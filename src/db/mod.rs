pub mod database;
pub mod error;
pub mod fake;
pub mod models;
pub mod postgres;

pub use database::Database;
pub use error::DatabaseError;
pub use fake::FakeDatabase;
pub use models::{NewRegistration, Registration, UniqueField};
pub use postgres::PostgresDatabase;
