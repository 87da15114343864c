//! Page path normalization and segment-aware ancestry.
//!
//! Page paths are `/`-separated, always start with a slash, and never end in
//! one except for the root page `/`. Ancestry is decided on whole segments:
//! `/normal` is an ancestor of `/normal/user` but not of `/normal-user`.

use crate::error::CoreError;

/// Path of the root page.
pub const ROOT_PATH: &str = "/";

/// Maximum byte length of a normalized path.
pub const MAX_PATH_LEN: usize = 1024;

/// Maximum number of segments below the root.
pub const MAX_PATH_DEPTH: usize = 64;

/// Normalize a user-supplied page path.
///
/// Adds a missing leading slash, collapses repeated slashes, and drops a
/// trailing slash. Rejects `.`/`..` segments, control characters, and paths
/// exceeding [`MAX_PATH_LEN`] or [`MAX_PATH_DEPTH`].
pub fn normalize_path(raw: &str) -> Result<String, CoreError> {
    let trimmed = raw.trim();
    if trimmed.chars().any(char::is_control) {
        return Err(CoreError::Validation(
            "Path must not contain control characters".into(),
        ));
    }

    let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();

    if let Some(bad) = segments.iter().find(|s| **s == "." || **s == "..") {
        return Err(CoreError::Validation(format!(
            "Path segment '{bad}' is not allowed"
        )));
    }
    if segments.len() > MAX_PATH_DEPTH {
        return Err(CoreError::Validation(format!(
            "Path must have at most {MAX_PATH_DEPTH} segments"
        )));
    }

    let normalized = format!("/{}", segments.join("/"));
    if normalized.len() > MAX_PATH_LEN {
        return Err(CoreError::Validation(format!(
            "Path must be at most {MAX_PATH_LEN} bytes"
        )));
    }
    Ok(normalized)
}

/// Split a normalized path into its segments. The root has none.
fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Every path from `path` itself up to the root, most specific first.
///
/// ```
/// use pagewright_core::path::ancestor_paths;
/// assert_eq!(ancestor_paths("/a/b"), vec!["/a/b", "/a", "/"]);
/// assert_eq!(ancestor_paths("/"), vec!["/"]);
/// ```
pub fn ancestor_paths(path: &str) -> Vec<String> {
    let segs = segments(path);
    (0..=segs.len())
        .rev()
        .map(|n| format!("/{}", segs[..n].join("/")))
        .collect()
}
