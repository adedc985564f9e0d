//! SQLite storage layer for Platefolio.
//!
//! The catalog store holds the four record kinds (profiles, plates,
//! collections, memberships) behind row-filtered operations:
//!
//! - Every mutation carries the owner's id in its WHERE clause, so a
//!   caller can only touch rows it owns.
//! - Every read takes a filter built by the visibility policy
//!   (`platefolio_model::visibility`), so private rows are excluded at
//!   query time rather than filtered after the fetch.
//! - Uniqueness (global case-insensitive handles, per-owner slugs, one
//!   membership per (plate, collection) pair) is enforced by schema
//!   constraints and surfaced as a distinct error kind.

mod catalog_store;
mod error;

pub use catalog_store::CatalogStore;
pub use error::{StoreError, StoreResult};
