//! Tests for `AppError` to HTTP response mapping.
//!
//! These call `IntoResponse` directly; no server or database is involved.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use pagewright_api::error::AppError;
use pagewright_core::error::CoreError;
use pagewright_db::RepoError;

async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn not_found_error_returns_404() {
    let err = AppError::Core(CoreError::not_found("Page", "/docs"));
    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "ERR_NOT_FOUND");
    assert_eq!(json["error"], "Page '/docs' not found");
}

#[tokio::test]
async fn version_conflict_carries_current_revision() {
    let err = AppError::Core(CoreError::VersionConflict {
        page_id: 3,
        current_revision_id: Some(17),
    });
    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "ERR_VERSION_CONFLICT");
    assert_eq!(json["current_revision_id"], 17);
}

#[tokio::test]
async fn duplicate_path_returns_409_page_exists() {
    let err = AppError::Core(CoreError::DuplicatePath("/taken".into()));
    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "ERR_PAGE_EXISTS");
}

#[tokio::test]
async fn validation_error_returns_400() {
    let err = AppError::Core(CoreError::Validation("Title must not be empty".into()));
    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "ERR_VALIDATION_FAILED");
    assert_eq!(json["error"], "Title must not be empty");
}

#[tokio::test]
async fn permission_errors_map_to_401_and_403() {
    let (status, json) =
        error_to_response(AppError::Core(CoreError::Unauthorized("token".into()))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "ERR_UNAUTHORIZED");

    let (status, json) =
        error_to_response(AppError::Core(CoreError::PermissionDenied("nope".into()))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["code"], "ERR_PERMISSION_DENIED");
}

#[tokio::test]
async fn multiple_results_is_sanitized_500() {
    let err = AppError::Core(CoreError::MultipleResults("two pages at /x".into()));
    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "ERR_MULTIPLE_RESULTS");
    assert_eq!(json["error"], "An internal error occurred");
}

#[tokio::test]
async fn internal_error_sanitizes_message() {
    let err = AppError::InternalError("secret database credentials leaked".into());
    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "ERR_INTERNAL");
    assert_eq!(json["error"], "An internal error occurred");
}

#[tokio::test]
async fn row_not_found_returns_404() {
    let (status, json) = error_to_response(AppError::Database(sqlx::Error::RowNotFound)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "ERR_NOT_FOUND");
}

#[tokio::test]
async fn repo_errors_unwrap_to_their_cause() {
    let err: AppError = RepoError::Core(CoreError::Validation("bad".into())).into();
    let (status, _) = error_to_response(err).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let err: AppError = RepoError::Database(sqlx::Error::RowNotFound).into();
    let (status, _) = error_to_response(err).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
