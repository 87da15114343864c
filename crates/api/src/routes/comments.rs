use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::comments;
use crate::state::AppState;

/// Comment routes.
///
/// ```text
/// GET    /comments/page[/{*path}]   list_comments
/// POST   /comments/page[/{*path}]   create_comment
/// PATCH  /comments/{id}             update_comment
/// DELETE /comments/{id}             delete_comment
/// ```
pub fn router() -> Router<AppState> {
    let on_page = || get(comments::list_comments).post(comments::create_comment);
    Router::new()
        .route("/comments/page", on_page())
        .route("/comments/page/{*path}", on_page())
        .route(
            "/comments/{id}",
            patch(comments::update_comment).delete(comments::delete_comment),
        )
}
