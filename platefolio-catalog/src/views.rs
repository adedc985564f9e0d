//! Read-through view structs handed to the presentation layer.
//!
//! Views are plain snapshots built per request; nothing here is cached or
//! invalidated. After a write, the caller asks the service again.

use platefolio_model::{Collection, Plate};

/// The home page: the owner's full catalog when signed in, a public
/// sample when anonymous.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HomeView {
    /// All of the signed-in owner's plates, newest first.
    Owner { plates: Vec<Plate> },
    /// Recent public plates across all owners.
    Anonymous { plates: Vec<Plate> },
}

impl HomeView {
    /// The plates to render, whichever variant this is.
    #[must_use]
    pub fn plates(&self) -> &[Plate] {
        match self {
            HomeView::Owner { plates } | HomeView::Anonymous { plates } => plates,
        }
    }
}

/// The owner-only collection page (`/c/{collectionId}`), private plates
/// included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionDetail {
    pub collection: Collection,
    pub plates: Vec<Plate>,
}

/// A public profile page (`/u/{handle}`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileView {
    /// The canonical handle as stored, not as typed in the address bar.
    pub handle: String,
    pub display_name: Option<String>,
    pub collections: Vec<Collection>,
    pub plates: Vec<Plate>,
}

/// A public collection page (`/u/{handle}/{slug}`), public plates only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicCollectionView {
    pub handle: String,
    pub collection: Collection,
    pub plates: Vec<Plate>,
}
