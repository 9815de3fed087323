//! Error types for the bookmark state store.
//!
//! This module defines the centralized error type [`BookmarkError`] and a type alias
//! [`Result`] for convenient error handling throughout the crate. All errors are
//! implemented using the `thiserror` crate for automatic `Error` trait implementation.
//!
//! Only [`BookmarkError::StructuralContract`] is raised by the state operations
//! themselves. Messy data inside a well-shaped state (null entries, stale cache
//! keys, malformed URLs) is tolerated and never surfaces as an error.

use thiserror::Error;

/// The main error type for bookmark state operations.
///
/// # Examples
///
/// ```
/// use bookmark_state::BookmarkError;
///
/// let err = BookmarkError::StructuralContract("found a list".to_string());
/// assert!(err.to_string().starts_with("state must contain a map of bookmarks"));
/// ```
#[derive(Debug, Error)]
pub enum BookmarkError {
    /// The state's `bookmarks` section is missing or is not a keyed map.
    ///
    /// This is an integration error on the caller's side and is never
    /// recovered locally. The string describes the shape that was found.
    #[error("state must contain a map of bookmarks ({0})")]
    StructuralContract(String),

    /// A state tree could not be decoded from or encoded to JSON.
    #[error("State parse error: {0}")]
    Parse(String),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized `Result` type for bookmark state operations.
pub type Result<T> = std::result::Result<T, BookmarkError>;
