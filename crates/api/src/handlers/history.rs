//! Handlers for page history, single revisions and revision diffs.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use pagewright_core::diff::{diff_bodies, DiffLine};
use pagewright_core::error::CoreError;
use pagewright_core::permission::Action;
use pagewright_core::types::DbId;
use pagewright_db::models::revision::Revision;
use pagewright_db::repositories::{PageRepo, RevisionRepo};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::extract::WikiPath;
use crate::middleware::auth::Caller;
use crate::middleware::permission::ensure_allowed;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DiffParams {
    pub from: DbId,
    pub to: DbId,
}

/// Line diff between two revisions of one page.
#[derive(Debug, Serialize)]
pub struct RevisionDiff {
    pub page_id: DbId,
    pub from: DbId,
    pub to: DbId,
    pub lines: Vec<DiffLine>,
}

/// Fetch a revision that must belong to `page_id`.
async fn revision_of_page(pool: &PgPool, page_id: DbId, revision_id: DbId) -> AppResult<Revision> {
    RevisionRepo::find_by_id(pool, revision_id)
        .await?
        .filter(|r| r.page_id == page_id)
        .ok_or_else(|| AppError::Core(CoreError::not_found("Revision", revision_id)))
}

/// GET /history/{*path}
///
/// The page and every revision, newest first, deletions included.
pub async fn get_history(
    caller: Caller,
    State(state): State<AppState>,
    WikiPath(path): WikiPath,
) -> AppResult<impl IntoResponse> {
    ensure_allowed(&state.pool, &path, Action::View, &caller).await?;
    let history = PageRepo::find_history_by_path(&state.pool, &path).await?;
    Ok(Json(DataResponse { data: history }))
}

/// GET /revisions/{id}
///
/// A single revision, gated by view permission on the page that owns it.
/// A denied caller gets the same 404 as for an unknown id.
pub async fn get_revision(
    caller: Caller,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let not_found = || AppError::Core(CoreError::not_found("Revision", id));
    let revision = RevisionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(not_found)?;
    let page = PageRepo::find_by_id(&state.pool, revision.page_id)
        .await?
        .ok_or_else(not_found)?;

    // Revisions the caller may not view look exactly like missing ones.
    ensure_allowed(&state.pool, &page.path, Action::View, &caller)
        .await
        .map_err(|err| match err {
            AppError::Core(CoreError::Unauthorized(_) | CoreError::PermissionDenied(_)) => {
                not_found()
            }
            other => other,
        })?;
    Ok(Json(DataResponse { data: revision }))
}

/// GET /diff/{*path}?from=&to=
pub async fn diff_revisions(
    caller: Caller,
    State(state): State<AppState>,
    WikiPath(path): WikiPath,
    Query(params): Query<DiffParams>,
) -> AppResult<impl IntoResponse> {
    ensure_allowed(&state.pool, &path, Action::View, &caller).await?;
    let page = PageRepo::find_by_path(&state.pool, &path)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Page", &path)))?;

    let from = revision_of_page(&state.pool, page.id, params.from).await?;
    let to = revision_of_page(&state.pool, page.id, params.to).await?;

    let diff = RevisionDiff {
        page_id: page.id,
        from: from.id,
        to: to.id,
        lines: diff_bodies(from.body.as_deref(), to.body.as_deref())?,
    };
    Ok(Json(DataResponse { data: diff }))
}
