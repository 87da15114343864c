//! Revision ordering and the edit arbiter's compare-and-swap rule.
//!
//! Revisions are append-only body snapshots. The current revision of a page is
//! the one with the latest `edited_at`, ties broken by the highest id. A body
//! of `None` marks the page as deleted at that point in its history.
//!
//! An edit that changes the body must name the revision it was based on; if
//! that is not the current revision the edit is rejected as a conflict and the
//! caller has to re-fetch. Edits that leave the body alone never conflict.

use crate::error::CoreError;
use crate::types::DbId;

/// What the arbiter decided to do with an accepted edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditDecision {
    /// Only metadata (if anything) changes; no revision is written.
    MetadataOnly,
    /// The body changes; a new revision is appended.
    AppendRevision,
}

/// The identity and body of a page's current revision.
#[derive(Debug, Clone, Copy)]
pub struct CurrentRevision<'a> {
    pub id: DbId,
    pub body: Option<&'a str>,
}

/// Decide whether an edit may proceed.
///
/// * `proposed_body`: `None` leaves the body alone, `Some(None)` deletes,
///   `Some(Some(text))` replaces it.
/// * `base_revision_id`: the revision the client last saw.
///
/// Returns [`CoreError::VersionConflict`] when the body changes and the base
/// is stale, and [`CoreError::Validation`] when the body changes without a
/// base at all.
pub fn decide_edit(
    page_id: DbId,
    current: Option<CurrentRevision<'_>>,
    proposed_body: Option<Option<&str>>,
    base_revision_id: Option<DbId>,
) -> Result<EditDecision, CoreError> {
    let current_body = current.and_then(|c| c.body);
    let body_changes = match proposed_body {
        None => false,
        Some(proposed) => proposed != current_body,
    };
    if !body_changes {
        return Ok(EditDecision::MetadataOnly);
    }

    let Some(current) = current else {
        // A page without any revision has nothing to be stale against.
        return Ok(EditDecision::AppendRevision);
    };

    match base_revision_id {
        None => Err(CoreError::Validation(
            "revision_id is required when changing the body".into(),
        )),
        Some(base) if base == current.id => Ok(EditDecision::AppendRevision),
        Some(_) => Err(CoreError::VersionConflict {
            page_id,
            current_revision_id: Some(current.id),
        }),
    }
}
