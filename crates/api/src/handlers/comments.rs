//! Handlers for page comments.
//!
//! Comments hang off live pages: listing or posting on a deleted page is
//! not found. Only the author (or a `wikiAdmin/comments` holder) may change
//! or remove a comment.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use pagewright_core::comment::{
    ensure_can_change_comment, validate_comment_body, validate_comment_title,
};
use pagewright_core::error::CoreError;
use pagewright_core::permission::Action;
use pagewright_core::types::DbId;
use pagewright_db::models::comment::{Comment, CreateComment, UpdateComment};
use pagewright_db::repositories::{CommentRepo, PageRepo};

use crate::error::{AppError, AppResult};
use crate::extract::WikiPath;
use crate::middleware::auth::{AuthUser, Caller};
use crate::middleware::permission::ensure_allowed;
use crate::response::DataResponse;
use crate::state::AppState;

/// Load a comment the authenticated caller may change.
async fn ensure_changeable(state: &AppState, id: DbId, user: &AuthUser) -> AppResult<Comment> {
    let comment = CommentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Comment", id)))?;

    let page = PageRepo::find_by_id(&state.pool, comment.page_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Comment", id)))?;
    ensure_allowed(&state.pool, &page.path, Action::View, &Caller::from(user.clone())).await?;

    ensure_can_change_comment(comment.account_id, user.account_id, user)?;
    Ok(comment)
}

/// GET /comments/page/{*path}
pub async fn list_comments(
    caller: Caller,
    State(state): State<AppState>,
    WikiPath(path): WikiPath,
) -> AppResult<impl IntoResponse> {
    ensure_allowed(&state.pool, &path, Action::View, &caller).await?;
    let page = PageRepo::find_current_by_path(&state.pool, &path).await?;
    let comments = CommentRepo::list_by_page(&state.pool, page.page.id).await?;
    Ok(Json(DataResponse { data: comments }))
}

/// POST /comments/page/{*path}
pub async fn create_comment(
    user: AuthUser,
    State(state): State<AppState>,
    WikiPath(path): WikiPath,
    Json(input): Json<CreateComment>,
) -> AppResult<impl IntoResponse> {
    validate_comment_title(&input.title)?;
    validate_comment_body(&input.body)?;

    ensure_allowed(&state.pool, &path, Action::View, &Caller::from(user.clone())).await?;
    let page = PageRepo::find_current_by_path(&state.pool, &path).await?;

    let comment = CommentRepo::create(&state.pool, page.page.id, user.account_id, &input).await?;

    tracing::info!(
        account_id = user.account_id,
        page_id = page.page.id,
        comment_id = comment.id,
        "Comment created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: comment })))
}

/// PATCH /comments/{id}
pub async fn update_comment(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateComment>,
) -> AppResult<impl IntoResponse> {
    if let Some(title) = &input.title {
        validate_comment_title(title)?;
    }
    if let Some(body) = &input.body {
        validate_comment_body(body)?;
    }
    ensure_changeable(&state, id, &user).await?;

    let comment = CommentRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Comment", id)))?;

    tracing::info!(account_id = user.account_id, comment_id = id, "Comment updated");
    Ok(Json(DataResponse { data: comment }))
}

/// DELETE /comments/{id}
pub async fn delete_comment(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_changeable(&state, id, &user).await?;

    if !CommentRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::not_found("Comment", id)));
    }

    tracing::info!(account_id = user.account_id, comment_id = id, "Comment deleted");
    Ok(StatusCode::NO_CONTENT)
}
