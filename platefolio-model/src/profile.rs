use platefolio_types::OwnerId;
use serde::{Deserialize, Serialize};

/// An owner's profile.
///
/// Created implicitly the first time its owner signs in; never deleted in
/// normal operation. The `handle` is the canonical, globally unique slug
/// that addresses the owner's public page (`/u/{handle}`); it is always
/// stored in normalized form (see [`crate::slug::normalize`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: OwnerId,
    pub handle: Option<String>,
    pub display_name: Option<String>,
    /// Tri-state on purpose: only an explicit `false` hides the profile.
    pub is_public: Option<bool>,
}

impl Profile {
    /// A fresh profile for an owner who has never configured anything.
    #[must_use]
    pub fn new(id: OwnerId) -> Self {
        Self {
            id,
            handle: None,
            display_name: None,
            is_public: None,
        }
    }

    /// Whether the profile page may be shown to non-owners.
    ///
    /// Unset is treated as visible: claiming a handle is the opt-in, and
    /// only an explicit `is_public = false` revokes it. This is more
    /// permissive than the plate/collection rule, which defaults private.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.is_public != Some(false)
    }
}
