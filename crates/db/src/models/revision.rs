//! Page revision model.
//!
//! Revisions are immutable body snapshots, appended on every accepted body
//! change. A `None` body records that the page was deleted.

use pagewright_core::revision::CurrentRevision;
use pagewright_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `revisions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Revision {
    pub id: DbId,
    pub page_id: DbId,
    pub body: Option<String>,
    pub account_id: Option<DbId>,
    pub summary: Option<String>,
    pub edited_at: Timestamp,
}

impl Revision {
    pub fn is_deleted(&self) -> bool {
        self.body.is_none()
    }

    pub fn as_current(&self) -> CurrentRevision<'_> {
        CurrentRevision {
            id: self.id,
            body: self.body.as_deref(),
        }
    }
}
