use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;
use tower_http::services::ServeDir;
use tracing::{debug, error, warn};

use crate::db::Database;
use crate::files::{FileStore, FileStoreError};
use crate::http::protocol::{CountErrorResponse, CountResponse, SubmitResponse, UptimeResponse};
use crate::registration::{RegistrationError, RegistrationForm, RegistrationService};
use crate::status::Uptime;

/// Shared state handed to every handler
pub struct AppState<D: Database, F: FileStore> {
    pub service: RegistrationService<D>,
    pub files: Arc<F>,
    pub uptime: Uptime,
}

/// Build the application router: the registration API plus read-only
/// static serving of the landing page and the uploads directory
pub fn router<D: Database, F: FileStore>(
    state: Arc<AppState<D, F>>,
    static_dir: &str,
    uploads_dir: &str,
) -> Router {
    Router::new()
        .route("/register", post(register_handler::<D, F>))
        .route("/registrations/count", get(count_handler::<D, F>))
        .route("/status/uptime", get(uptime_handler::<D, F>))
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        .fallback_service(ServeDir::new(static_dir).append_index_html_on_directories(true))
        .with_state(state)
}

/// POST /register: one multipart submission with the form fields and the
/// payment screenshot
pub async fn register_handler<D: Database, F: FileStore>(
    State(state): State<Arc<AppState<D, F>>>,
    mut multipart: Multipart,
) -> Response {
    let (form, stored_file) =
        match read_submission(state.files.as_ref(), &mut multipart).await {
            Ok(read) => read,
            Err(SubmissionReadError::Malformed) => {
                return submit_error(StatusCode::BAD_REQUEST, "Malformed form submission.");
            }
            Err(SubmissionReadError::Store(err)) => {
                error!("Failed to store uploaded file: {}", err);
                return submit_error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An error occurred during registration.",
                );
            }
        };

    match state.service.submit(form, stored_file).await {
        Ok(_) => (
            StatusCode::CREATED,
            Json(SubmitResponse {
                success: true,
                message: "Registration successful!".to_string(),
            }),
        )
            .into_response(),
        Err(err) => {
            let status = error_status(&err);
            if status == StatusCode::INTERNAL_SERVER_ERROR {
                error!("Registration failed: {:?}", err);
            }
            submit_error(status, &err.to_string())
        }
    }
}

/// GET /registrations/count
pub async fn count_handler<D: Database, F: FileStore>(
    State(state): State<Arc<AppState<D, F>>>,
) -> Response {
    match state.service.count().await {
        Ok(count) => (StatusCode::OK, Json(CountResponse { count })).into_response(),
        Err(err) => {
            error!("Failed to fetch registration count: {:?}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(CountErrorResponse {
                    error: "Could not fetch registration count.".to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// GET /status/uptime
pub async fn uptime_handler<D: Database, F: FileStore>(
    State(state): State<Arc<AppState<D, F>>>,
) -> Json<UptimeResponse> {
    Json(UptimeResponse {
        uptime: state.uptime.seconds(),
    })
}

/// Map a pipeline error onto the status code the client sees
pub fn error_status(err: &RegistrationError) -> StatusCode {
    match err {
        RegistrationError::MissingFile | RegistrationError::MissingField(_) => {
            StatusCode::BAD_REQUEST
        }
        RegistrationError::DuplicateField(_) | RegistrationError::DuplicateRegistration => {
            StatusCode::CONFLICT
        }
        RegistrationError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

enum SubmissionReadError {
    Malformed,
    Store(FileStoreError),
}

/// Drain the multipart stream into form fields and the stored screenshot.
///
/// The screenshot is written to the file store as soon as its part is
/// read; a later validation failure leaves the stored file behind.
async fn read_submission<F: FileStore>(
    files: &F,
    multipart: &mut Multipart,
) -> Result<(RegistrationForm, Option<String>), SubmissionReadError> {
    let mut form = RegistrationForm::default();
    let mut stored_file = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        warn!("Malformed multipart payload: {}", e);
        SubmissionReadError::Malformed
    })? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == "screenshot" {
            let original_name = field.file_name().unwrap_or("screenshot").to_string();
            let data = field.bytes().await.map_err(|e| {
                warn!("Failed to read uploaded file: {}", e);
                SubmissionReadError::Malformed
            })?;
            let path = files
                .store(&original_name, data)
                .await
                .map_err(SubmissionReadError::Store)?;
            stored_file = Some(path);
            continue;
        }

        let slot = match name.as_str() {
            "name" => &mut form.name,
            "rollNo" => &mut form.roll_no,
            "regNo" => &mut form.reg_no,
            "year" => &mut form.year,
            "phone" => &mut form.phone,
            "email" => &mut form.email,
            other => {
                debug!("Ignoring unknown form field: {}", other);
                continue;
            }
        };
        *slot = field.text().await.map_err(|e| {
            warn!("Failed to read form field {}: {}", name, e);
            SubmissionReadError::Malformed
        })?;
    }

    Ok((form, stored_file))
}

fn submit_error(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(SubmitResponse {
            success: false,
            message: message.to_string(),
        }),
    )
        .into_response()
}
