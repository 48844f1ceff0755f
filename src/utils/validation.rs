//! Limits and name checks applied while resolving catalogue references.

use thiserror::Error;

/// Longest linked document name accepted when building `<name>.cat` paths
pub const MAX_DOCUMENT_NAME_LENGTH: usize = 255;

/// Entry links are followed one level deep unless configured otherwise
pub const DEFAULT_LINK_DEPTH: usize = 1;

/// Hard cap on entry-link traversal depth, guarding against reference cycles
pub const MAX_LINK_DEPTH: usize = 8;

/// Clamp a requested traversal depth to `1..=MAX_LINK_DEPTH`.
///
/// # Examples
///
/// ```
/// use army_sheet::utils::validation::{clamp_link_depth, MAX_LINK_DEPTH};
///
/// assert_eq!(clamp_link_depth(0), 1);
/// assert_eq!(clamp_link_depth(3), 3);
/// assert_eq!(clamp_link_depth(1_000), MAX_LINK_DEPTH);
/// ```
#[must_use]
pub fn clamp_link_depth(depth: usize) -> usize {
    depth.clamp(1, MAX_LINK_DEPTH)
}

/// True if `id` can key a shared-definition index
#[must_use]
pub fn is_valid_identifier(id: &str) -> bool {
    !id.trim().is_empty()
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Document name is empty")]
    EmptyName,
    #[error("Document name too long (max {} characters)", MAX_DOCUMENT_NAME_LENGTH)]
    NameTooLong,
    #[error("Document name contains path separators or control characters")]
    InvalidName,
}

/// Validate a linked document name before it is joined onto a directory.
///
/// Names come from `catalogueLink` attributes of untrusted documents, so
/// anything that could escape the directory is rejected.
///
/// # Errors
///
/// Returns `ValidationError::EmptyName` for blank names,
/// `ValidationError::NameTooLong` past the length limit, and
/// `ValidationError::InvalidName` for traversal or control characters.
pub fn validate_document_name(name: &str) -> Result<&str, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if name.len() > MAX_DOCUMENT_NAME_LENGTH {
        return Err(ValidationError::NameTooLong);
    }
    if name.contains("..") || name.contains('/') || name.contains('\\') {
        return Err(ValidationError::InvalidName);
    }
    if name.chars().any(char::is_control) {
        return Err(ValidationError::InvalidName);
    }
    Ok(name)
}
