//! Handlers for reading and writing pages.
//!
//! Every handler resolves the caller's permission at the target path before
//! looking at the page itself.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use pagewright_core::error::CoreError;
use pagewright_core::path::normalize_path;
use pagewright_core::permission::Action;
use pagewright_db::models::page::{CreatePage, EditPage, MovePage};
use pagewright_db::repositories::PageRepo;

use crate::error::{AppError, AppResult};
use crate::extract::WikiPath;
use crate::middleware::auth::Caller;
use crate::middleware::permission::{ensure_admin, ensure_allowed, ensure_can_assign, PURGE_TOKEN};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /pages/{*path}
///
/// The page with its current revision. Deleted pages are not found.
pub async fn get_page(
    caller: Caller,
    State(state): State<AppState>,
    WikiPath(path): WikiPath,
) -> AppResult<impl IntoResponse> {
    ensure_allowed(&state.pool, &path, Action::View, &caller).await?;
    let page = PageRepo::find_current_by_path(&state.pool, &path).await?;
    Ok(Json(DataResponse { data: page }))
}

/// POST /pages/{*path}
///
/// Create a page, or bring back a deleted one at the same path.
pub async fn create_page(
    caller: Caller,
    State(state): State<AppState>,
    WikiPath(path): WikiPath,
    Json(input): Json<CreatePage>,
) -> AppResult<impl IntoResponse> {
    ensure_allowed(&state.pool, &path, Action::Modify, &caller).await?;
    ensure_can_assign(input.view_rule.as_ref(), Action::View, &caller)?;
    ensure_can_assign(input.modify_rule.as_ref(), Action::Modify, &caller)?;

    let page = PageRepo::create(&state.pool, &path, &input, caller.account_id()).await?;

    tracing::info!(
        account_id = ?caller.account_id(),
        page_id = page.page.id,
        path = %page.page.path,
        "Page created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: page })))
}

/// PATCH /pages/{*path}
///
/// Edit through the arbiter. A body change must carry the `revision_id` it
/// was based on; a stale one yields 409 with the current revision id.
pub async fn edit_page(
    caller: Caller,
    State(state): State<AppState>,
    WikiPath(path): WikiPath,
    Json(input): Json<EditPage>,
) -> AppResult<impl IntoResponse> {
    ensure_allowed(&state.pool, &path, Action::Modify, &caller).await?;
    ensure_can_assign(input.view_rule.as_ref(), Action::View, &caller)?;
    ensure_can_assign(input.modify_rule.as_ref(), Action::Modify, &caller)?;

    let existing = PageRepo::find_by_path(&state.pool, &path)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Page", &path)))?;

    let page = PageRepo::edit(&state.pool, existing.id, &input, caller.account_id()).await?;

    tracing::info!(
        account_id = ?caller.account_id(),
        page_id = page.page.id,
        revision_id = page.revision.id,
        "Page edited"
    );

    Ok(Json(DataResponse { data: page }))
}

/// DELETE /pages/{*path}
///
/// Soft delete: appends a deletion revision, history is kept.
pub async fn delete_page(
    caller: Caller,
    State(state): State<AppState>,
    WikiPath(path): WikiPath,
) -> AppResult<impl IntoResponse> {
    ensure_allowed(&state.pool, &path, Action::Modify, &caller).await?;
    let revision = PageRepo::soft_delete(&state.pool, &path, caller.account_id()).await?;

    tracing::info!(
        account_id = ?caller.account_id(),
        page_id = revision.page_id,
        path = %path,
        "Page deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// OPTIONS /pages/{*path}
///
/// The effective `{view, modify}` rules at the path. Needs no permission.
pub async fn page_permissions(
    State(state): State<AppState>,
    WikiPath(path): WikiPath,
) -> AppResult<impl IntoResponse> {
    let rules = PageRepo::resolve_permissions(&state.pool, &path).await?;
    Ok(Json(DataResponse { data: rules }))
}

/// PUT /move/{*path}
///
/// Move a page to `new_path`. Needs modify permission at both paths.
pub async fn move_page(
    caller: Caller,
    State(state): State<AppState>,
    WikiPath(path): WikiPath,
    Json(input): Json<MovePage>,
) -> AppResult<impl IntoResponse> {
    let new_path = normalize_path(&input.new_path)?;
    ensure_allowed(&state.pool, &path, Action::Modify, &caller).await?;
    ensure_allowed(&state.pool, &new_path, Action::Modify, &caller).await?;

    let page = PageRepo::move_page(&state.pool, &path, &new_path).await?;

    tracing::info!(
        account_id = ?caller.account_id(),
        page_id = page.page.id,
        from = %path,
        to = %new_path,
        "Page moved"
    );

    Ok(Json(DataResponse { data: page }))
}

/// DELETE /purge/{*path}
///
/// Remove a page with its revisions and comments. Requires `wikiAdmin/purge`.
pub async fn purge_page(
    caller: Caller,
    State(state): State<AppState>,
    WikiPath(path): WikiPath,
) -> AppResult<impl IntoResponse> {
    ensure_admin(PURGE_TOKEN, &caller)?;
    let page = PageRepo::purge(&state.pool, &path).await?;

    tracing::warn!(
        account_id = ?caller.account_id(),
        page_id = page.id,
        path = %path,
        "Page purged"
    );

    Ok(StatusCode::NO_CONTENT)
}
