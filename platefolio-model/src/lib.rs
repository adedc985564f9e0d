//! Domain model for Platefolio.
//!
//! Defines the records and the pure logic the rest of the system composes:
//! - [`Profile`], [`Plate`], [`Collection`], [`Membership`]: the four
//!   record kinds held by the catalog store
//! - [`PlateDraft`] / [`CollectionDraft`]: validated user input
//! - [`slug`]: the shared handle/slug normalizer
//! - [`visibility`]: read-access policy and the query filters it dictates
//!
//! Nothing in this crate performs I/O. The store adapter
//! (`platefolio-store`) persists these records; the catalog service
//! (`platefolio-catalog`) applies the policy before and while querying.

mod clock;
mod collection;
mod plate;
mod profile;
pub mod slug;
pub mod visibility;

pub use clock::now_millis;
pub use collection::{Collection, CollectionDraft, Membership};
pub use plate::{Plate, PlateDraft};
pub use profile::Profile;

/// A user-input failure caught before anything is submitted to the store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("validation failed: {0}")]
pub struct ValidationError(pub String);
