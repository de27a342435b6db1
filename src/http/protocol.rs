use serde::{Deserialize, Serialize};

/// Envelope returned by the registration endpoint; clients display
/// `message` verbatim
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub message: String,
}

/// Body of GET /registrations/count on success
#[derive(Debug, Serialize, Deserialize)]
pub struct CountResponse {
    pub count: i64,
}

/// Body of GET /registrations/count on storage failure
#[derive(Debug, Serialize, Deserialize)]
pub struct CountErrorResponse {
    pub error: String,
}

/// Body of GET /status/uptime
#[derive(Debug, Serialize, Deserialize)]
pub struct UptimeResponse {
    pub uptime: u64,
}
