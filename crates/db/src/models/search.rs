//! Search result models.

use pagewright_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Query parameters for page search.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// A raw ranked match, before permission filtering.
#[derive(Debug, Clone, FromRow)]
pub struct PageSearchRow {
    pub page_id: DbId,
    pub path: String,
    pub title: String,
    pub revision_id: DbId,
    pub rank: f32,
    pub title_snippet: String,
    pub body_snippet: String,
}

/// The page a search hit points at.
#[derive(Debug, Clone, Serialize)]
pub struct SearchPage {
    pub id: DbId,
    pub path: String,
    pub title: String,
    pub revision_id: DbId,
}

/// Highlighted snippets for a hit.
#[derive(Debug, Clone, Serialize)]
pub struct SearchMatch {
    pub title: String,
    pub body: String,
}

/// A permission-filtered search hit.
#[derive(Debug, Clone, Serialize)]
pub struct PageSearchHit {
    #[serde(rename = "match")]
    pub matched: SearchMatch,
    pub page: SearchPage,
    pub rank: f32,
}

impl From<PageSearchRow> for PageSearchHit {
    fn from(row: PageSearchRow) -> Self {
        Self {
            matched: SearchMatch {
                title: row.title_snippet,
                body: row.body_snippet,
            },
            page: SearchPage {
                id: row.page_id,
                path: row.path,
                title: row.title,
                revision_id: row.revision_id,
            },
            rank: row.rank,
        }
    }
}
