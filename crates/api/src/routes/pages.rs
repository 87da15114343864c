//! Route definitions for pages, their history and page-level admin actions.
//!
//! Page paths are the URL tail. Each path-taking route is registered twice
//! because a catch-all never matches the empty tail of the root page.

use axum::routing::{delete, get, put, MethodRouter};
use axum::Router;

use crate::handlers::{history, pages};
use crate::state::AppState;

fn page_methods() -> MethodRouter<AppState> {
    get(pages::get_page)
        .post(pages::create_page)
        .patch(pages::edit_page)
        .delete(pages::delete_page)
        .options(pages::page_permissions)
}

/// Page routes.
///
/// ```text
/// GET     /pages[/{*path}]         get_page
/// POST    /pages[/{*path}]         create_page
/// PATCH   /pages[/{*path}]         edit_page
/// DELETE  /pages[/{*path}]         delete_page
/// OPTIONS /pages[/{*path}]         page_permissions
/// GET     /history[/{*path}]       get_history
/// GET     /diff[/{*path}]          diff_revisions
/// GET     /revisions/{id}          get_revision
/// PUT     /move/{*path}            move_page
/// DELETE  /purge[/{*path}]         purge_page
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/pages", page_methods())
        .route("/pages/{*path}", page_methods())
        .route("/history", get(history::get_history))
        .route("/history/{*path}", get(history::get_history))
        .route("/diff", get(history::diff_revisions))
        .route("/diff/{*path}", get(history::diff_revisions))
        .route("/revisions/{id}", get(history::get_revision))
        .route("/move/{*path}", put(pages::move_page))
        .route("/purge", delete(pages::purge_page))
        .route("/purge/{*path}", delete(pages::purge_page))
}
