//! Comment validation and ownership rules.

use crate::error::CoreError;
use crate::permission::{Permission, PermissionChecker, PermissionDomain};
use crate::types::DbId;

pub const MAX_COMMENT_TITLE_LEN: usize = 200;
pub const MAX_COMMENT_BODY_LEN: usize = 20_000;

/// Admin token that lets a caller edit or delete anyone's comment.
pub const MODERATE_TOKEN: &str = "comments";

pub fn validate_comment_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation(
            "Comment title must not be empty".into(),
        ));
    }
    if title.chars().count() > MAX_COMMENT_TITLE_LEN {
        return Err(CoreError::Validation(format!(
            "Comment title must be at most {MAX_COMMENT_TITLE_LEN} characters"
        )));
    }
    Ok(())
}

pub fn validate_comment_body(body: &str) -> Result<(), CoreError> {
    if body.trim().is_empty() {
        return Err(CoreError::Validation(
            "Comment body must not be empty".into(),
        ));
    }
    if body.len() > MAX_COMMENT_BODY_LEN {
        return Err(CoreError::Validation(format!(
            "Comment body must be at most {MAX_COMMENT_BODY_LEN} bytes"
        )));
    }
    Ok(())
}

/// Authors may change their own comments; moderators may change any.
pub fn ensure_can_change_comment(
    author_id: DbId,
    caller_id: DbId,
    caller: &impl PermissionChecker,
) -> Result<(), CoreError> {
    if author_id == caller_id
        || caller.has_perm(&Permission::new(PermissionDomain::Admin, MODERATE_TOKEN))
    {
        return Ok(());
    }
    Err(CoreError::PermissionDenied(
        "Only the author may change this comment".into(),
    ))
}
