//! Application layer for Platefolio.
//!
//! Composes the domain model, the visibility policy, and the catalog store
//! into the operations users actually perform:
//! - [`identity`]: the seam to the external auth collaborator, with
//!   explicit identity-change subscription
//! - [`CatalogService`]: every user-facing operation, from saving a plate
//!   to rendering a public collection page
//! - [`views`]: plain read-through view structs (never cached; writers
//!   re-fetch)
//! - [`seo`]: sitemap/robots renderers for the crawler-facing endpoints
//!
//! Each operation is one synchronous round trip to the store, awaited to
//! completion; there are no background workers, retries, or queues.

mod error;
pub mod identity;
pub mod seo;
mod service;
pub mod views;

pub use error::{CatalogError, CatalogResult};
pub use identity::{IdentityProvider, SessionIdentity, SubscriptionId};
pub use seo::SeoRenderer;
pub use service::CatalogService;
