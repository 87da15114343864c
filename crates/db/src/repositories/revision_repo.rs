//! Repository for the `revisions` table.
//!
//! Revisions are append-only: there is no update method, and the table
//! rejects UPDATE statements outright.

use pagewright_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::revision::Revision;

/// Column list for revisions queries.
const COLUMNS: &str = "id, page_id, body, account_id, summary, edited_at";

/// Ordering that puts the current revision first.
const NEWEST_FIRST: &str = "ORDER BY edited_at DESC, id DESC";

/// Provides append and read operations for page revisions.
pub struct RevisionRepo;

impl RevisionRepo {
    /// Append a revision. `body = None` records a deletion.
    pub async fn insert<'e>(
        executor: impl PgExecutor<'e>,
        page_id: DbId,
        body: Option<&str>,
        account_id: Option<DbId>,
        summary: Option<&str>,
    ) -> Result<Revision, sqlx::Error> {
        let query = format!(
            "INSERT INTO revisions (page_id, body, account_id, summary)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Revision>(&query)
            .bind(page_id)
            .bind(body)
            .bind(account_id)
            .bind(summary)
            .fetch_one(executor)
            .await
    }

    /// The current revision of a page: latest `edited_at`, then highest id.
    pub async fn find_current<'e>(
        executor: impl PgExecutor<'e>,
        page_id: DbId,
    ) -> Result<Option<Revision>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM revisions WHERE page_id = $1 {NEWEST_FIRST} LIMIT 1");
        sqlx::query_as::<_, Revision>(&query)
            .bind(page_id)
            .fetch_optional(executor)
            .await
    }

    /// All revisions of a page, current first.
    pub async fn list_by_page<'e>(
        executor: impl PgExecutor<'e>,
        page_id: DbId,
    ) -> Result<Vec<Revision>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM revisions WHERE page_id = $1 {NEWEST_FIRST}");
        sqlx::query_as::<_, Revision>(&query)
            .bind(page_id)
            .fetch_all(executor)
            .await
    }

    /// Find a revision by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Revision>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM revisions WHERE id = $1");
        sqlx::query_as::<_, Revision>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
