use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use pagewright_core::error::CoreError;
use pagewright_db::RepoError;
use serde_json::json;

/// Unique constraint on page paths; violations surface as `ERR_PAGE_EXISTS`.
const PAGE_PATH_CONSTRAINT: &str = "uq_pages_path";

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce `{ "error", "code" }` JSON bodies.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `pagewright_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Core(core) => AppError::Core(core),
            RepoError::Database(db) => AppError::Database(db),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => classify_core_error(core),
            AppError::Database(err) => classify_sqlx_error(err),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "ERR_BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "ERR_INTERNAL",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let mut body = json!({
            "error": message,
            "code": code,
        });

        // Clients re-fetch from the revision that beat them.
        if let AppError::Core(CoreError::VersionConflict {
            current_revision_id,
            ..
        }) = &self
        {
            body["current_revision_id"] = json!(current_revision_id);
        }

        (status, axum::Json(body)).into_response()
    }
}

fn classify_core_error(core: &CoreError) -> (StatusCode, &'static str, String) {
    let code = core.code();
    match core {
        CoreError::NotFound { entity, key } => (
            StatusCode::NOT_FOUND,
            code,
            format!("{entity} '{key}' not found"),
        ),
        CoreError::VersionConflict { page_id, .. } => (
            StatusCode::CONFLICT,
            code,
            format!("Page {page_id} was changed by someone else; reload and retry"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, code, msg.clone()),
        CoreError::PermissionDenied(msg) => (StatusCode::FORBIDDEN, code, msg.clone()),
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, code, msg.clone()),
        CoreError::DuplicatePath(path) => (
            StatusCode::CONFLICT,
            code,
            format!("A page already exists at '{path}'"),
        ),
        CoreError::MultipleResults(msg) | CoreError::Internal(msg) => {
            tracing::error!(error = %msg, code, "Internal core error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                code,
                "An internal error occurred".to_string(),
            )
        }
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - A unique violation on the page path maps to 409 `ERR_PAGE_EXISTS`.
/// - Other unique violations (constraint name starting with `uq_`) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "ERR_NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint == PAGE_PATH_CONSTRAINT {
                    return (
                        StatusCode::CONFLICT,
                        "ERR_PAGE_EXISTS",
                        "A page already exists at that path".to_string(),
                    );
                }
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "ERR_CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "ERR_INTERNAL",
                "An internal error occurred".to_string(),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "ERR_INTERNAL",
                "An internal error occurred".to_string(),
            )
        }
    }
}
