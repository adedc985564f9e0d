//! Core type definitions for Platefolio.
//!
//! This crate defines the fundamental, store-agnostic types used throughout
//! the catalog core:
//! - Owner, plate, and collection identifiers (UUID v7)
//!
//! All domain records (profiles, plates, collections, memberships) live in
//! `platefolio-model`, not here.

mod ids;

pub use ids::{CollectionId, OwnerId, PlateId};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid UUID: {0}")]
    InvalidUuid(#[from] uuid::Error),
}
