//! Page model and DTOs.

use pagewright_core::error::CoreError;
use pagewright_core::permission::{PageRules, PermissionRule};
use pagewright_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::double_option;
use super::revision::Revision;

/// A row from the `pages` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Page {
    pub id: DbId,
    pub path: String,
    pub title: String,
    pub view_rule: String,
    pub modify_rule: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Page {
    /// Parse the stored rule columns.
    pub fn rules(&self) -> Result<PageRules, CoreError> {
        let parse = |raw: &str| {
            PermissionRule::parse(raw).map_err(|e| {
                CoreError::Internal(format!("page {} has an invalid stored rule: {e}", self.id))
            })
        };
        Ok(PageRules {
            view_rule: parse(&self.view_rule)?,
            modify_rule: parse(&self.modify_rule)?,
        })
    }
}

/// A page together with its current revision.
///
/// Ordinary reads only ever hand out pages whose current body is present;
/// edits may return a page whose current revision marks it deleted.
#[derive(Debug, Clone, Serialize)]
pub struct CurrentPage {
    #[serde(flatten)]
    pub page: Page,
    pub revision: Revision,
}

/// A page with its full revision history, newest first.
#[derive(Debug, Clone, Serialize)]
pub struct PageHistory {
    #[serde(flatten)]
    pub page: Page,
    pub revisions: Vec<Revision>,
}

/// DTO for creating a page. The path is supplied separately.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePage {
    pub title: String,
    pub body: String,
    pub view_rule: Option<PermissionRule>,
    pub modify_rule: Option<PermissionRule>,
    pub summary: Option<String>,
}

/// DTO for editing a page through the edit arbiter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EditPage {
    /// Must be absent or equal to the current path; moves use [`MovePage`].
    pub path: Option<String>,
    pub title: Option<String>,
    /// Absent: keep the body. `null`: delete the page. Text: new body.
    #[serde(default, deserialize_with = "double_option")]
    pub body: Option<Option<String>>,
    pub view_rule: Option<PermissionRule>,
    pub modify_rule: Option<PermissionRule>,
    /// The revision the client last saw; required when the body changes.
    pub revision_id: Option<DbId>,
    pub summary: Option<String>,
}

impl EditPage {
    pub fn changes_rules(&self) -> bool {
        self.view_rule.is_some() || self.modify_rule.is_some()
    }
}

/// DTO for moving a page to a new path.
#[derive(Debug, Clone, Deserialize)]
pub struct MovePage {
    pub new_path: String,
}
