//! Account model and DTOs.

use pagewright_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `accounts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Account {
    pub id: DbId,
    pub username: String,
    pub email: String,
    /// Granted permissions as `domain/token` strings.
    pub permissions: Vec<String>,
    pub settings: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for provisioning an account.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAccount {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub permissions: Vec<String>,
}

/// DTO for replacing an account's settings object.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAccountSettings {
    pub settings: serde_json::Value,
}
