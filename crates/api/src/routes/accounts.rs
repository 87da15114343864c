use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::accounts;
use crate::state::AppState;

/// Account routes.
///
/// ```text
/// GET   /accounts/me            get_me
/// PATCH /accounts/me/settings   update_settings
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/accounts/me", get(accounts::get_me))
        .route("/accounts/me/settings", patch(accounts::update_settings))
}
