//! JWT-based authentication extractors for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use pagewright_core::error::CoreError;
use pagewright_core::permission::{Permission, PermissionChecker, PermissionSet};
use pagewright_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated account extracted from a JWT Bearer token.
///
/// Use this in handlers that need an identity (comments, account settings):
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(account_id = user.account_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The account's internal database id (from `claims.sub`).
    pub account_id: DbId,
    pub username: String,
    /// Permissions parsed from the `perms` claim.
    pub permissions: PermissionSet,
}

impl PermissionChecker for AuthUser {
    fn has_perm(&self, required: &Permission) -> bool {
        self.permissions.has_perm(required)
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        bearer_user(parts, state)?.ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Missing Authorization header".into(),
            ))
        })
    }
}

/// The caller of a page operation: an authenticated account or anonymous.
///
/// A missing `Authorization` header yields an anonymous caller holding no
/// permissions; a present but invalid token is still rejected with 401.
#[derive(Debug, Clone, Default)]
pub struct Caller {
    pub user: Option<AuthUser>,
}

impl Caller {
    pub fn account_id(&self) -> Option<DbId> {
        self.user.as_ref().map(|u| u.account_id)
    }

    pub fn is_anonymous(&self) -> bool {
        self.user.is_none()
    }
}

impl From<AuthUser> for Caller {
    fn from(user: AuthUser) -> Self {
        Caller { user: Some(user) }
    }
}

impl PermissionChecker for Caller {
    fn has_perm(&self, required: &Permission) -> bool {
        match &self.user {
            Some(user) => user.has_perm(required),
            None => PermissionSet::anonymous().has_perm(required),
        }
    }
}

impl FromRequestParts<AppState> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Caller {
            user: bearer_user(parts, state)?,
        })
    }
}

/// Decode the bearer token, if any. `Ok(None)` means no header was sent.
fn bearer_user(parts: &Parts, state: &AppState) -> Result<Option<AuthUser>, AppError> {
    let Some(header) = parts.headers.get(AUTHORIZATION) else {
        return Ok(None);
    };

    let token = header
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

    let claims = validate_token(token, &state.config.jwt).map_err(|_| {
        AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
    })?;

    let (permissions, rejected) = PermissionSet::from_claims(&claims.perms);
    if !rejected.is_empty() {
        tracing::warn!(
            account_id = claims.sub,
            rejected = ?rejected,
            "Ignoring malformed permission claims"
        );
    }

    Ok(Some(AuthUser {
        account_id: claims.sub,
        username: claims.username,
        permissions,
    }))
}
