use crate::plate::trim_optional;
use crate::{slug, ValidationError};
use platefolio_types::{CollectionId, OwnerId, PlateId};
use serde::{Deserialize, Serialize};

/// A named collection of plates.
///
/// The optional `slug` is the normalized form of a user-supplied string and
/// is unique per owner (not globally); together with the owner's handle it
/// addresses the public page `/u/{handle}/{slug}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub id: CollectionId,
    pub owner: OwnerId,
    pub name: String,
    pub description: Option<String>,
    pub slug: Option<String>,
    pub is_public: bool,
    /// Milliseconds since the Unix epoch; lists are ordered newest-first.
    pub created_at: i64,
}

impl Collection {
    /// Builds a collection from validated input, stamping owner and
    /// creation time.
    #[must_use]
    pub fn from_draft(draft: CollectionDraft, owner: OwnerId) -> Self {
        Self {
            id: CollectionId::new(),
            owner,
            name: draft.name,
            description: draft.description,
            slug: draft.slug,
            is_public: draft.is_public,
            created_at: crate::now_millis(),
        }
    }
}

/// User input for a new collection, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionDraft {
    pub name: String,
    pub description: Option<String>,
    /// Free text; normalized by `validate`. `Some("")`-like inputs (empty
    /// after normalization) are rejected rather than stored as an
    /// unreachable slug.
    pub slug: Option<String>,
    pub is_public: bool,
}

impl CollectionDraft {
    /// Normalizes the draft in place and rejects invalid input.
    pub fn validate(mut self) -> Result<Self, ValidationError> {
        self.name = self.name.trim().to_string();
        if self.name.is_empty() {
            return Err(ValidationError("name required".to_string()));
        }
        self.description = self.description.and_then(trim_optional);
        self.slug = match self.slug {
            Some(raw) => Some(slug::normalize_required(&raw)?),
            None => None,
        };
        Ok(self)
    }
}

/// The link placing one plate inside one collection.
///
/// The `(plate, collection)` pair is unique; inserting it twice is a
/// constraint violation, never a silent no-op. `owner` is denormalized so
/// every membership query can carry the owner filter directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub plate: PlateId,
    pub collection: CollectionId,
    pub owner: OwnerId,
    /// Milliseconds since the Unix epoch; collection pages order
    /// newest-linked-first.
    pub added_at: i64,
}

impl Membership {
    /// A new link stamped with the current time.
    #[must_use]
    pub fn new(plate: PlateId, collection: CollectionId, owner: OwnerId) -> Self {
        Self {
            plate,
            collection,
            owner,
            added_at: crate::now_millis(),
        }
    }
}
