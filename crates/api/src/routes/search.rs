use axum::routing::get;
use axum::Router;

use crate::handlers::search;
use crate::state::AppState;

/// Search routes.
///
/// ```text
/// GET /search?q&limit&offset   search_pages
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/search", get(search::search_pages))
}
