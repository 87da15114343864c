use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} '{key}'")]
    NotFound { entity: &'static str, key: String },

    /// The edit was based on a revision that is no longer current.
    #[error("Version conflict on page {page_id}: current revision is {current_revision_id:?}")]
    VersionConflict {
        page_id: DbId,
        current_revision_id: Option<DbId>,
    },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Page already exists: {0}")]
    DuplicatePath(String),

    /// A lookup that must be unique returned more than one row.
    #[error("Multiple results: {0}")]
    MultipleResults(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for a [`CoreError::NotFound`] keyed by any displayable value.
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        CoreError::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    /// Stable machine-readable error code surfaced to API clients.
    pub fn code(&self) -> &'static str {
        match self {
            CoreError::NotFound { .. } => "ERR_NOT_FOUND",
            CoreError::VersionConflict { .. } => "ERR_VERSION_CONFLICT",
            CoreError::Validation(_) => "ERR_VALIDATION_FAILED",
            CoreError::PermissionDenied(_) => "ERR_PERMISSION_DENIED",
            CoreError::Unauthorized(_) => "ERR_UNAUTHORIZED",
            CoreError::DuplicatePath(_) => "ERR_PAGE_EXISTS",
            CoreError::MultipleResults(_) => "ERR_MULTIPLE_RESULTS",
            CoreError::Internal(_) => "ERR_INTERNAL",
        }
    }
}

/// Collapse a result set that must hold at most one row.
///
/// More than one row means a uniqueness invariant was broken in the store,
/// which is reported as [`CoreError::MultipleResults`] rather than silently
/// picking a row.
pub fn at_most_one<T>(mut rows: Vec<T>, what: &str) -> Result<Option<T>, CoreError> {
    match rows.len() {
        0 => Ok(None),
        1 => Ok(rows.pop()),
        n => Err(CoreError::MultipleResults(format!(
            "expected at most one {what}, found {n}"
        ))),
    }
}
