//! Authentication extractors and the page permission gate.
//!
//! - [`auth::AuthUser`]: requires a valid JWT Bearer token.
//! - [`auth::Caller`]: accepts anonymous requests, rejects invalid tokens.
//! - [`permission`]: checks a caller against the resolved page rules.

pub mod auth;
pub mod permission;
