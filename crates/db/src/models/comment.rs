//! Page comment model and DTOs.

use pagewright_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `comments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Comment {
    pub id: DbId,
    pub page_id: DbId,
    pub account_id: DbId,
    pub title: String,
    pub body: String,
    pub created_at: Timestamp,
    pub edited_at: Timestamp,
}

/// DTO for creating a comment.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateComment {
    pub title: String,
    pub body: String,
}

/// DTO for editing a comment in place.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateComment {
    pub title: Option<String>,
    pub body: Option<String>,
}
