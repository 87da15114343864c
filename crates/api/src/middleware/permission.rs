//! Page permission gate.
//!
//! Handlers call these before touching a page. Resolution works for paths
//! without a page, so the same check gates creation.

use pagewright_core::error::CoreError;
use pagewright_core::permission::{
    Action, Permission, PermissionChecker, PermissionDomain, PermissionRule,
};
use pagewright_db::repositories::PageRepo;
use sqlx::PgPool;

use super::auth::Caller;
use crate::error::{AppError, AppResult};

/// Admin token required to purge pages.
pub const PURGE_TOKEN: &str = "purge";

/// Require `caller` to satisfy the effective `action` rule at `path`.
///
/// `path` must be normalized.
pub async fn ensure_allowed(
    pool: &PgPool,
    path: &str,
    action: Action,
    caller: &Caller,
) -> AppResult<()> {
    let rule = PageRepo::resolve_permission(pool, path, action).await?;
    if rule.allows(action, caller) {
        return Ok(());
    }
    tracing::debug!(
        path,
        action = action.as_str(),
        rule = rule.as_str(),
        account_id = ?caller.account_id(),
        "Permission denied"
    );
    Err(denied(caller, format!("You may not {} '{path}'", action.as_str())))
}

/// Require `caller` to satisfy any named rule they are about to assign.
///
/// Public and inherit rules can always be set.
pub fn ensure_can_assign(
    rule: Option<&PermissionRule>,
    action: Action,
    caller: &Caller,
) -> AppResult<()> {
    let Some(PermissionRule::Token(token)) = rule else {
        return Ok(());
    };
    if caller.has_perm(&Permission::new(action.into(), token.as_str())) {
        return Ok(());
    }
    Err(denied(
        caller,
        format!(
            "Setting the {} rule to '{token}' requires holding that permission",
            action.as_str()
        ),
    ))
}

/// Require an admin permission such as `wikiAdmin/purge`.
pub fn ensure_admin(token: &str, caller: &Caller) -> AppResult<()> {
    if caller.has_perm(&Permission::new(PermissionDomain::Admin, token)) {
        return Ok(());
    }
    Err(denied(caller, format!("wikiAdmin/{token} required")))
}

/// Anonymous callers are asked to authenticate; others are refused.
fn denied(caller: &Caller, message: String) -> AppError {
    if caller.is_anonymous() {
        AppError::Core(CoreError::Unauthorized(message))
    } else {
        AppError::Core(CoreError::PermissionDenied(message))
    }
}
