//! Handlers for the caller's own account.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use pagewright_core::error::CoreError;
use pagewright_db::models::account::UpdateAccountSettings;
use pagewright_db::repositories::AccountRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /accounts/me
pub async fn get_me(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let account = AccountRepo::find_by_id(&state.pool, user.account_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Account", user.account_id)))?;
    Ok(Json(DataResponse { data: account }))
}

/// PATCH /accounts/me/settings
///
/// Replaces the whole settings object.
pub async fn update_settings(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateAccountSettings>,
) -> AppResult<impl IntoResponse> {
    if !input.settings.is_object() {
        return Err(AppError::Core(CoreError::Validation(
            "settings must be a JSON object".into(),
        )));
    }

    let account = AccountRepo::update_settings(&state.pool, user.account_id, &input.settings)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Account", user.account_id)))?;

    tracing::info!(account_id = user.account_id, "Account settings updated");
    Ok(Json(DataResponse { data: account }))
}
