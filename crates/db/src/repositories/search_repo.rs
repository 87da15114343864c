//! Repository for permission-filtered full-text page search.
//!
//! Ranking happens in PostgreSQL over the page title (weight A) and the
//! current revision body (weight B). Visibility is decided afterwards in
//! Rust with one [`PermissionIndex`](pagewright_core::permission::PermissionIndex)
//! per batch, so hit counts differ between callers.

use pagewright_core::permission::{Action, PermissionChecker};
use pagewright_core::search::{
    build_tsquery, clamp_limit, clamp_offset, DEFAULT_SEARCH_LIMIT, HEADLINE_OPTIONS,
    MAX_SEARCH_LIMIT,
};
use sqlx::PgPool;

use crate::error::RepoResult;
use crate::models::search::{PageSearchHit, PageSearchRow, SearchParams};
use crate::repositories::page_repo::PageRepo;

/// Number of ranked rows pulled per round while filtering.
const BATCH_SIZE: i64 = MAX_SEARCH_LIMIT;

/// Provides full-text search over pages.
pub struct SearchRepo;

impl SearchRepo {
    /// Search pages the caller may view.
    ///
    /// `offset` and `limit` count visible hits only. An empty or fully
    /// unsanitizable query yields no hits.
    pub async fn search_pages(
        pool: &PgPool,
        params: &SearchParams,
        caller: &impl PermissionChecker,
    ) -> RepoResult<Vec<PageSearchHit>> {
        let Some(tsquery) = params.q.as_deref().and_then(build_tsquery) else {
            return Ok(Vec::new());
        };
        let limit = clamp_limit(params.limit, DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT);
        let mut to_skip = clamp_offset(params.offset);

        let mut hits: Vec<PageSearchHit> = Vec::new();
        let mut hidden = 0usize;
        let mut db_offset = 0;
        loop {
            let rows = Self::fetch_ranked(pool, &tsquery, BATCH_SIZE, db_offset).await?;
            let fetched = rows.len() as i64;
            let index =
                PageRepo::permission_index(pool, rows.iter().map(|r| r.path.as_str())).await?;

            for row in rows {
                if !index.resolve(&row.path, Action::View).allows(Action::View, caller) {
                    hidden += 1;
                    continue;
                }
                if to_skip > 0 {
                    to_skip -= 1;
                    continue;
                }
                hits.push(row.into());
                if hits.len() as i64 == limit {
                    break;
                }
            }

            if hits.len() as i64 == limit || fetched < BATCH_SIZE {
                break;
            }
            db_offset += BATCH_SIZE;
        }

        tracing::debug!(query = %tsquery, hits = hits.len(), hidden, "Page search");
        Ok(hits)
    }

    /// Ranked matches for a prepared tsquery, before any permission check.
    ///
    /// Pages whose current revision is a deletion never match.
    pub async fn fetch_ranked(
        pool: &PgPool,
        tsquery: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PageSearchRow>, sqlx::Error> {
        let sql = "\
            SELECT p.id AS page_id, p.path, p.title, r.id AS revision_id, \
                   ts_rank(p.title_vector || r.search_vector, to_tsquery('english', $1)) AS rank, \
                   ts_headline('english', p.title, to_tsquery('english', $1), $2) AS title_snippet, \
                   ts_headline('english', r.body, to_tsquery('english', $1), $2) AS body_snippet \
            FROM pages p \
            CROSS JOIN LATERAL ( \
                SELECT id, body, search_vector FROM revisions \
                WHERE page_id = p.id \
                ORDER BY edited_at DESC, id DESC \
                LIMIT 1 \
            ) r \
            WHERE r.body IS NOT NULL \
              AND (p.title_vector || r.search_vector) @@ to_tsquery('english', $1) \
            ORDER BY rank DESC, p.id ASC \
            LIMIT $3 OFFSET $4";

        sqlx::query_as::<_, PageSearchRow>(sql)
            .bind(tsquery)
            .bind(HEADLINE_OPTIONS)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }
}
