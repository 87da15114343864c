pub mod accounts;
pub mod comments;
pub mod health;
pub mod pages;
pub mod search;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /pages[/{*path}]              get, create, edit, soft delete, rules (OPTIONS)
/// /history[/{*path}]            page with all revisions
/// /diff[/{*path}]?from&to       line diff between two revisions
/// /revisions/{id}               single revision
/// /move/{*path}                 move (PUT, body {new_path})
/// /purge[/{*path}]              hard delete (wikiAdmin/purge)
///
/// /search?q&limit&offset        permission-filtered full-text search
///
/// /comments/page[/{*path}]      list, create
/// /comments/{id}                edit, delete (author or wikiAdmin/comments)
///
/// /accounts/me                  caller's account
/// /accounts/me/settings         replace settings (PATCH)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(pages::router())
        .merge(comments::router())
        .merge(search::router())
        .merge(accounts::router())
}
