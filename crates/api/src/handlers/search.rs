//! Handler for permission-filtered page search.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use pagewright_db::models::search::SearchParams;
use pagewright_db::repositories::SearchRepo;

use crate::error::AppResult;
use crate::middleware::auth::Caller;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /search?q=&limit=&offset=
///
/// Hits the caller cannot view are dropped, so counts vary per caller.
pub async fn search_pages(
    caller: Caller,
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<impl IntoResponse> {
    let hits = SearchRepo::search_pages(&state.pool, &params, &caller).await?;
    Ok(Json(DataResponse { data: hits }))
}
