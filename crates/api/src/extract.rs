//! Request extractors specific to page routes.

use axum::extract::rejection::RawPathParamsRejection;
use axum::extract::{FromRequestParts, RawPathParams};
use axum::http::request::Parts;
use pagewright_core::path::normalize_path;

use crate::error::AppError;

/// Name of the catch-all route parameter holding a page path.
pub const PATH_PARAM: &str = "path";

/// A normalized page path taken from the URL tail.
///
/// Routes mount page handlers twice: once bare (the root page `/`) and once
/// with a `{*path}` catch-all. Either way the handler receives the same
/// normalized form, e.g. `/docs/intro`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WikiPath(pub String);

impl<S: Send + Sync> FromRequestParts<S> for WikiPath {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let raw = match RawPathParams::from_request_parts(parts, state).await {
            Ok(params) => params
                .iter()
                .find(|(name, _)| *name == PATH_PARAM)
                .map(|(_, value)| value.to_string())
                .unwrap_or_default(),
            Err(RawPathParamsRejection::MissingPathParams(_)) => String::new(),
            Err(rejection) => return Err(AppError::BadRequest(rejection.body_text())),
        };
        Ok(WikiPath(normalize_path(&raw)?))
    }
}
