pub mod handlers;
pub mod protocol;

pub use handlers::{router, AppState};
