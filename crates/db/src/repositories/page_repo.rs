//! Repository for the `pages` table.
//!
//! Owns the three operations that must be atomic against concurrent writers:
//! create, edit (the optimistic-concurrency arbiter), and move. Each runs in
//! one transaction that first locks the page row with `FOR UPDATE`, so two
//! editors of the same page serialize and the second one observes the first
//! one's revision.
//!
//! Permission resolution also lives here because it only needs page rows:
//! the ancestor paths of the queried path are enumerated in Rust and fetched
//! with `path = ANY($1)`, so no database string matching is involved.

use std::collections::BTreeSet;

use pagewright_core::error::{at_most_one, CoreError};
use pagewright_core::path::{ancestor_paths, normalize_path, ROOT_PATH};
use pagewright_core::permission::{
    Action, EffectiveRule, PermissionIndex, PermissionRule, ResolvedPermissions,
};
use pagewright_core::revision::{decide_edit, EditDecision};
use pagewright_core::types::DbId;
use pagewright_core::wiki::{validate_body, validate_summary, validate_title};
use sqlx::{PgConnection, PgExecutor, PgPool};

use crate::error::{is_unique_violation, RepoError, RepoResult};
use crate::models::page::{CreatePage, CurrentPage, EditPage, Page, PageHistory};
use crate::models::revision::Revision;
use crate::repositories::revision_repo::RevisionRepo;

/// Column list for pages queries.
const COLUMNS: &str = "id, path, title, view_rule, modify_rule, created_at, updated_at";

/// Unique constraint on `pages.path`.
const PATH_CONSTRAINT: &str = "uq_pages_path";

const ENTITY: &str = "Page";

/// Summary recorded on the first revision when the caller gives none.
const INITIAL_SUMMARY: &str = "Initial version";

/// Summary recorded on soft-delete revisions.
const DELETE_SUMMARY: &str = "Deleted";

/// Provides page storage, permission resolution and the edit arbiter.
pub struct PageRepo;

impl PageRepo {
    // -----------------------------------------------------------------------
    // Lookups
    // -----------------------------------------------------------------------

    /// Find a page by ID, deleted or not.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Page>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pages WHERE id = $1");
        sqlx::query_as::<_, Page>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a page by its normalized path, deleted or not.
    pub async fn find_by_path<'e>(
        executor: impl PgExecutor<'e>,
        path: &str,
    ) -> RepoResult<Option<Page>> {
        let query = format!("SELECT {COLUMNS} FROM pages WHERE path = $1");
        let rows = sqlx::query_as::<_, Page>(&query)
            .bind(path)
            .fetch_all(executor)
            .await?;
        Ok(at_most_one(rows, "page per path")?)
    }

    /// Fetch every page whose path is in `paths`.
    pub async fn find_by_paths(pool: &PgPool, paths: &[String]) -> Result<Vec<Page>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pages WHERE path = ANY($1)");
        sqlx::query_as::<_, Page>(&query)
            .bind(paths)
            .fetch_all(pool)
            .await
    }

    async fn lock_by_id(conn: &mut PgConnection, id: DbId) -> Result<Option<Page>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pages WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Page>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    async fn lock_by_path(conn: &mut PgConnection, path: &str) -> RepoResult<Option<Page>> {
        let query = format!("SELECT {COLUMNS} FROM pages WHERE path = $1 FOR UPDATE");
        let rows = sqlx::query_as::<_, Page>(&query)
            .bind(path)
            .fetch_all(conn)
            .await?;
        Ok(at_most_one(rows, "page per path")?)
    }

    // -----------------------------------------------------------------------
    // Permission resolution
    // -----------------------------------------------------------------------

    /// Build a permission index covering every ancestor of every given path.
    ///
    /// Paths must be normalized. One query serves any number of paths.
    pub async fn permission_index<'a>(
        pool: &PgPool,
        paths: impl IntoIterator<Item = &'a str>,
    ) -> RepoResult<PermissionIndex> {
        let wanted: BTreeSet<String> = paths.into_iter().flat_map(ancestor_paths).collect();
        if wanted.is_empty() {
            return Ok(PermissionIndex::new());
        }
        let wanted: Vec<String> = wanted.into_iter().collect();

        let mut index = PermissionIndex::new();
        for page in Self::find_by_paths(pool, &wanted).await? {
            let rules = page.rules()?;
            index.insert(page.path, rules);
        }
        Ok(index)
    }

    /// Resolve the effective rule for `action` on `path`.
    ///
    /// The path need not name an existing page; only its ancestors are
    /// consulted then. With no explicit rule anywhere the result is public.
    pub async fn resolve_permission(
        pool: &PgPool,
        path: &str,
        action: Action,
    ) -> RepoResult<EffectiveRule> {
        let path = normalize_path(path)?;
        let index = Self::permission_index(pool, [path.as_str()]).await?;
        Ok(index.resolve(&path, action))
    }

    /// Resolve both the view and the modify rule for `path`.
    pub async fn resolve_permissions(pool: &PgPool, path: &str) -> RepoResult<ResolvedPermissions> {
        let path = normalize_path(path)?;
        let index = Self::permission_index(pool, [path.as_str()]).await?;
        Ok(index.resolve_both(&path))
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// The page at `path` with its current revision.
    ///
    /// A page whose current revision is a deletion is reported as not found.
    pub async fn find_current_by_path(pool: &PgPool, path: &str) -> RepoResult<CurrentPage> {
        let path = normalize_path(path)?;
        let page = Self::find_by_path(pool, &path)
            .await?
            .ok_or_else(|| CoreError::not_found(ENTITY, &path))?;

        let revision = RevisionRepo::find_current(pool, page.id)
            .await?
            .filter(|r| !r.is_deleted())
            .ok_or_else(|| CoreError::not_found(ENTITY, &path))?;

        Ok(CurrentPage { page, revision })
    }

    /// The page at `path` with every revision, deletions included.
    pub async fn find_history_by_path(pool: &PgPool, path: &str) -> RepoResult<PageHistory> {
        let path = normalize_path(path)?;
        let page = Self::find_by_path(pool, &path)
            .await?
            .ok_or_else(|| CoreError::not_found(ENTITY, &path))?;
        let revisions = RevisionRepo::list_by_page(pool, page.id).await?;
        Ok(PageHistory { page, revisions })
    }

    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    /// Create the page at `path` with its first revision.
    ///
    /// If a page exists there but is deleted, it is brought back instead: its
    /// title and rules are replaced and a new revision is appended, keeping the
    /// page's id and history.
    pub async fn create(
        pool: &PgPool,
        path: &str,
        input: &CreatePage,
        account_id: Option<DbId>,
    ) -> RepoResult<CurrentPage> {
        let path = normalize_path(path)?;
        validate_title(&input.title)?;
        validate_body(&input.body)?;
        validate_summary(input.summary.as_deref())?;

        let view_rule = input.view_rule.as_ref().unwrap_or(&PermissionRule::Inherit);
        let modify_rule = input.modify_rule.as_ref().unwrap_or(&PermissionRule::Inherit);
        let summary = input.summary.as_deref().unwrap_or(INITIAL_SUMMARY);

        let mut tx = pool.begin().await?;

        let page = match Self::lock_by_path(&mut tx, &path).await? {
            Some(existing) => {
                let current = RevisionRepo::find_current(&mut *tx, existing.id).await?;
                if current.is_some_and(|r| !r.is_deleted()) {
                    return Err(CoreError::DuplicatePath(path).into());
                }
                let query = format!(
                    "UPDATE pages SET title = $1, view_rule = $2, modify_rule = $3
                     WHERE id = $4
                     RETURNING {COLUMNS}"
                );
                sqlx::query_as::<_, Page>(&query)
                    .bind(&input.title)
                    .bind(view_rule.as_str())
                    .bind(modify_rule.as_str())
                    .bind(existing.id)
                    .fetch_one(&mut *tx)
                    .await?
            }
            None => {
                let query = format!(
                    "INSERT INTO pages (path, title, view_rule, modify_rule)
                     VALUES ($1, $2, $3, $4)
                     RETURNING {COLUMNS}"
                );
                sqlx::query_as::<_, Page>(&query)
                    .bind(&path)
                    .bind(&input.title)
                    .bind(view_rule.as_str())
                    .bind(modify_rule.as_str())
                    .fetch_one(&mut *tx)
                    .await
                    .map_err(|e| path_conflict(e, &path))?
            }
        };

        let revision = RevisionRepo::insert(
            &mut *tx,
            page.id,
            Some(input.body.as_str()),
            account_id,
            Some(summary),
        )
        .await?;

        tx.commit().await?;

        tracing::debug!(page_id = page.id, path = %page.path, revision_id = revision.id, "Page created");
        Ok(CurrentPage { page, revision })
    }

    /// Apply an edit if it is based on the current revision.
    ///
    /// Runs as one transaction: lock the page, read its current revision,
    /// decide, then update metadata and append a revision as needed. Any
    /// failure leaves the page and its history untouched.
    pub async fn edit(
        pool: &PgPool,
        page_id: DbId,
        input: &EditPage,
        account_id: Option<DbId>,
    ) -> RepoResult<CurrentPage> {
        if let Some(title) = &input.title {
            validate_title(title)?;
        }
        if let Some(Some(body)) = &input.body {
            validate_body(body)?;
        }
        validate_summary(input.summary.as_deref())?;

        let mut tx = pool.begin().await?;

        let page = Self::lock_by_id(&mut tx, page_id)
            .await?
            .ok_or_else(|| CoreError::not_found(ENTITY, page_id))?;

        if let Some(requested) = &input.path {
            if normalize_path(requested)? != page.path {
                return Err(CoreError::Validation(
                    "The path cannot be changed by an edit; move the page instead".into(),
                )
                .into());
            }
        }

        let current = RevisionRepo::find_current(&mut *tx, page.id).await?;
        let decision = decide_edit(
            page.id,
            current.as_ref().map(Revision::as_current),
            input.body.as_ref().map(|b| b.as_deref()),
            input.revision_id,
        )
        .inspect_err(|err| {
            if let CoreError::VersionConflict {
                current_revision_id,
                ..
            } = err
            {
                tracing::info!(
                    page_id,
                    base_revision_id = ?input.revision_id,
                    current_revision_id = ?current_revision_id,
                    "Edit rejected: stale base revision"
                );
            }
        })?;

        let page = if input.title.is_some() || input.changes_rules() {
            let query = format!(
                "UPDATE pages SET
                    title = COALESCE($1, title),
                    view_rule = COALESCE($2, view_rule),
                    modify_rule = COALESCE($3, modify_rule)
                 WHERE id = $4
                 RETURNING {COLUMNS}"
            );
            sqlx::query_as::<_, Page>(&query)
                .bind(&input.title)
                .bind(input.view_rule.as_ref().map(PermissionRule::as_str))
                .bind(input.modify_rule.as_ref().map(PermissionRule::as_str))
                .bind(page.id)
                .fetch_one(&mut *tx)
                .await?
        } else {
            page
        };

        let revision = match decision {
            EditDecision::AppendRevision => {
                let body = input.body.as_ref().and_then(|b| b.as_deref());
                RevisionRepo::insert(
                    &mut *tx,
                    page.id,
                    body,
                    account_id,
                    input.summary.as_deref(),
                )
                .await?
            }
            EditDecision::MetadataOnly => current.ok_or_else(|| {
                CoreError::Internal(format!("page {} has no revisions", page.id))
            })?,
        };

        tx.commit().await?;

        tracing::debug!(
            page_id = page.id,
            revision_id = revision.id,
            appended = decision == EditDecision::AppendRevision,
            "Page edited"
        );
        Ok(CurrentPage { page, revision })
    }

    /// Rename a page. Revisions, comments and the page id are untouched.
    ///
    /// Deleted pages can be moved too; the returned revision is then the
    /// deletion marker.
    pub async fn move_page(
        pool: &PgPool,
        old_path: &str,
        new_path: &str,
    ) -> RepoResult<CurrentPage> {
        let old_path = normalize_path(old_path)?;
        let new_path = normalize_path(new_path)?;
        if old_path == new_path {
            return Err(CoreError::Validation(
                "The destination path is the same as the current path".into(),
            )
            .into());
        }
        if old_path == ROOT_PATH {
            return Err(CoreError::Validation("The root page cannot be moved".into()).into());
        }

        let mut tx = pool.begin().await?;

        let page = Self::lock_by_path(&mut tx, &old_path)
            .await?
            .ok_or_else(|| CoreError::not_found(ENTITY, &old_path))?;

        if Self::find_by_path(&mut *tx, &new_path).await?.is_some() {
            return Err(CoreError::DuplicatePath(new_path).into());
        }

        let query = format!("UPDATE pages SET path = $1 WHERE id = $2 RETURNING {COLUMNS}");
        let moved = sqlx::query_as::<_, Page>(&query)
            .bind(&new_path)
            .bind(page.id)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| path_conflict(e, &new_path))?;

        let revision = RevisionRepo::find_current(&mut *tx, moved.id)
            .await?
            .ok_or_else(|| CoreError::Internal(format!("page {} has no revisions", moved.id)))?;

        tx.commit().await?;

        tracing::debug!(page_id = moved.id, from = %old_path, to = %new_path, "Page moved");
        Ok(CurrentPage {
            page: moved,
            revision,
        })
    }

    /// Mark the page at `path` as deleted by appending a null-body revision.
    ///
    /// The page row and its history stay in place. Deleting an already
    /// deleted page reports not found.
    pub async fn soft_delete(
        pool: &PgPool,
        path: &str,
        account_id: Option<DbId>,
    ) -> RepoResult<Revision> {
        let path = normalize_path(path)?;
        let mut tx = pool.begin().await?;

        let page = Self::lock_by_path(&mut tx, &path)
            .await?
            .ok_or_else(|| CoreError::not_found(ENTITY, &path))?;

        let current = RevisionRepo::find_current(&mut *tx, page.id).await?;
        if current.as_ref().map_or(true, Revision::is_deleted) {
            return Err(CoreError::not_found(ENTITY, &path).into());
        }

        let revision =
            RevisionRepo::insert(&mut *tx, page.id, None, account_id, Some(DELETE_SUMMARY))
                .await?;

        tx.commit().await?;

        tracing::debug!(page_id = page.id, path = %path, revision_id = revision.id, "Page soft-deleted");
        Ok(revision)
    }

    /// Remove the page at `path` with all its revisions and comments.
    pub async fn purge(pool: &PgPool, path: &str) -> RepoResult<Page> {
        let path = normalize_path(path)?;
        let query = format!("DELETE FROM pages WHERE path = $1 RETURNING {COLUMNS}");
        let page = sqlx::query_as::<_, Page>(&query)
            .bind(&path)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| CoreError::not_found(ENTITY, &path))?;

        tracing::debug!(page_id = page.id, path = %path, "Page purged");
        Ok(page)
    }
}

/// Map a unique violation on the path constraint to a duplicate-path error.
fn path_conflict(err: sqlx::Error, path: &str) -> RepoError {
    if is_unique_violation(&err, PATH_CONSTRAINT) {
        CoreError::DuplicatePath(path.to_string()).into()
    } else {
        err.into()
    }
}
