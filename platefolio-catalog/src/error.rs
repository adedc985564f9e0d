//! Error types for the application layer.

use platefolio_model::ValidationError;
use platefolio_store::StoreError;
use thiserror::Error;

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors surfaced to the user by catalog operations.
///
/// Every failure is local to the action that triggered it; none is fatal
/// to the session. The public-facing kinds are deliberately coarse:
/// `NotFound` covers "absent" and "not visible to you" alike, so the
/// response never leaks whether a private record exists.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The action requires a signed-in identity and none is present.
    #[error("sign in to do this")]
    NotSignedIn,

    /// Referenced profile/collection absent, or not visible to the
    /// requester. One uniform message for both.
    #[error("not found")]
    NotFound,

    /// Another profile already holds this handle (case-insensitively).
    #[error("handle '{0}' is already taken")]
    HandleTaken(String),

    /// Another of the owner's collections already uses this slug.
    #[error("slug '{0}' is already taken")]
    SlugTaken(String),

    /// The plate is already linked into this collection.
    #[error("plate is already in this collection")]
    AlreadyInCollection,

    /// Input rejected before anything was submitted to the store.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Store failure. The raw message is surfaced as-is; no retry.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
