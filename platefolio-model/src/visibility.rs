//! Read-access policy.
//!
//! Pure decisions over already-fetched records, plus the query filters
//! those decisions dictate. The store must receive the filter and never
//! return rows the requester may not read: private rows are excluded at
//! query time, not filtered after the fetch.

use crate::{Collection, Plate, Profile};
use platefolio_types::OwnerId;
use serde::{Deserialize, Serialize};

/// Who is asking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Requester {
    Anonymous,
    Owner(OwnerId),
}

impl Requester {
    /// The resolved identity, if any.
    #[must_use]
    pub fn owner(&self) -> Option<OwnerId> {
        match self {
            Requester::Anonymous => None,
            Requester::Owner(id) => Some(*id),
        }
    }

    /// True if the requester is exactly this owner.
    #[must_use]
    pub fn is_owner(&self, owner: OwnerId) -> bool {
        *self == Requester::Owner(owner)
    }
}

/// Owner may always read their own plate; everyone else needs `is_public`.
#[must_use]
pub fn can_read_plate(requester: Requester, plate: &Plate) -> bool {
    requester.is_owner(plate.owner) || plate.is_public
}

/// Owner may always read their own collection; everyone else needs
/// `is_public`. Collection visibility never cascades to member plates.
#[must_use]
pub fn can_read_collection(requester: Requester, collection: &Collection) -> bool {
    requester.is_owner(collection.owner) || collection.is_public
}

/// Profiles are visible unless explicitly hidden (see
/// [`Profile::is_visible`] for why this is more permissive than the
/// plate/collection rule).
#[must_use]
pub fn can_read_profile(requester: Requester, profile: &Profile) -> bool {
    requester.is_owner(profile.id) || profile.is_visible()
}

/// Row filter for plate reads. Every field is ANDed into the query's
/// WHERE clause; results are ordered newest-first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlateFilter {
    pub owner: Option<OwnerId>,
    pub is_public: Option<bool>,
    pub limit: Option<usize>,
}

impl PlateFilter {
    /// All of one owner's plates, public and private. Only valid when the
    /// requester *is* that owner.
    #[must_use]
    pub fn mine(owner: OwnerId) -> Self {
        Self {
            owner: Some(owner),
            is_public: None,
            limit: None,
        }
    }

    /// Every public plate, across all owners.
    #[must_use]
    pub fn all_public() -> Self {
        Self {
            owner: None,
            is_public: Some(true),
            limit: None,
        }
    }

    /// The most recent public plates, across all owners.
    #[must_use]
    pub fn recent_public(limit: usize) -> Self {
        Self::all_public().with_limit(limit)
    }

    /// The rows of `owner`'s plates that `requester` may read: everything
    /// for the owner themselves, public rows only for anyone else.
    #[must_use]
    pub fn visible_to(requester: Requester, owner: OwnerId) -> Self {
        Self {
            owner: Some(owner),
            is_public: if requester.is_owner(owner) {
                None
            } else {
                Some(true)
            },
            limit: None,
        }
    }

    /// Caps the number of rows returned.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Row filter for collection reads, ANDed into the WHERE clause.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectionFilter {
    pub owner: Option<OwnerId>,
    pub is_public: Option<bool>,
}

impl CollectionFilter {
    /// All of one owner's collections. Only valid when the requester *is*
    /// that owner.
    #[must_use]
    pub fn mine(owner: OwnerId) -> Self {
        Self {
            owner: Some(owner),
            is_public: None,
        }
    }

    /// The rows of `owner`'s collections that `requester` may read.
    #[must_use]
    pub fn visible_to(requester: Requester, owner: OwnerId) -> Self {
        Self {
            owner: Some(owner),
            is_public: if requester.is_owner(owner) {
                None
            } else {
                Some(true)
            },
        }
    }
}
