//! Repository for the `accounts` table.

use pagewright_core::types::DbId;
use sqlx::PgPool;

use crate::models::account::{Account, CreateAccount};

/// Column list for accounts queries.
const COLUMNS: &str = "id, username, email, permissions, settings, created_at, updated_at";

/// Provides provisioning and profile operations for accounts.
pub struct AccountRepo;

impl AccountRepo {
    /// Provision a new account.
    pub async fn create(pool: &PgPool, input: &CreateAccount) -> Result<Account, sqlx::Error> {
        let query = format!(
            "INSERT INTO accounts (username, email, permissions)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Account>(&query)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.permissions)
            .fetch_one(pool)
            .await
    }

    /// Find an account by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Account>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM accounts WHERE id = $1");
        sqlx::query_as::<_, Account>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Replace an account's settings object. Returns `None` if it does not exist.
    pub async fn update_settings(
        pool: &PgPool,
        id: DbId,
        settings: &serde_json::Value,
    ) -> Result<Option<Account>, sqlx::Error> {
        let query = format!("UPDATE accounts SET settings = $1 WHERE id = $2 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Account>(&query)
            .bind(settings)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
