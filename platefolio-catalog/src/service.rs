//! The catalog service: every user-facing operation.
//!
//! Holds explicitly constructed, injected collaborators (no global store
//! client). Each operation resolves the caller's identity, builds the
//! filters the visibility policy dictates, and makes one round trip to the
//! store. Unauthorized rows are excluded in the query itself, never
//! fetched and discarded.

use crate::error::{CatalogError, CatalogResult};
use crate::identity::IdentityProvider;
use crate::views::{CollectionDetail, HomeView, ProfileView, PublicCollectionView};
use platefolio_model::visibility::{self, CollectionFilter, PlateFilter, Requester};
use platefolio_model::{slug, Collection, CollectionDraft, Membership, Plate, PlateDraft};
use platefolio_store::{CatalogStore, StoreError};
use platefolio_types::{CollectionId, OwnerId, PlateId};
use std::sync::Arc;
use tracing::{debug, info};

/// How many public plates the anonymous home page and the public profile
/// page show.
const RECENT_PUBLIC_LIMIT: usize = 20;

pub struct CatalogService {
    store: Arc<CatalogStore>,
    identity: Arc<dyn IdentityProvider>,
}

impl CatalogService {
    /// Builds a service around an existing store and identity provider.
    pub fn new(store: Arc<CatalogStore>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self { store, identity }
    }

    fn requester(&self) -> Requester {
        match self.identity.current() {
            Some(owner) => Requester::Owner(owner),
            None => Requester::Anonymous,
        }
    }

    fn owner(&self) -> CatalogResult<OwnerId> {
        self.identity.current().ok_or(CatalogError::NotSignedIn)
    }

    // ── Home ─────────────────────────────────────────────────────

    /// The home page: the owner's catalog, or a public sample when
    /// anonymous. Ensures the owner's profile exists on first visit.
    pub fn home_view(&self) -> CatalogResult<HomeView> {
        match self.identity.current() {
            Some(owner) => {
                self.store.ensure_profile(owner)?;
                let plates = self.store.read_plates(&PlateFilter::mine(owner))?;
                Ok(HomeView::Owner { plates })
            }
            None => {
                let plates = self
                    .store
                    .read_plates(&PlateFilter::recent_public(RECENT_PUBLIC_LIMIT))?;
                Ok(HomeView::Anonymous { plates })
            }
        }
    }

    // ── Plates ───────────────────────────────────────────────────

    /// Validates and saves a new plate. The owner comes from the resolved
    /// identity, never from the draft.
    pub fn add_plate(&self, draft: PlateDraft) -> CatalogResult<Plate> {
        let owner = self.owner()?;
        let draft = draft.validate()?;
        self.store.ensure_profile(owner)?;
        let plate = Plate::from_draft(draft, owner);
        self.store.insert_plate(&plate)?;
        info!(plate = %plate.id, "plate saved");
        Ok(plate)
    }

    /// Deletes one of the owner's plates (and its membership links).
    pub fn delete_plate(&self, plate: PlateId) -> CatalogResult<()> {
        let owner = self.owner()?;
        self.store
            .delete_plate(owner, plate)
            .map_err(not_found_or_store)
    }

    // ── Collections ──────────────────────────────────────────────

    /// Validates and saves a new collection. A duplicate slug among the
    /// owner's collections is reported as `SlugTaken`.
    pub fn create_collection(&self, draft: CollectionDraft) -> CatalogResult<Collection> {
        let owner = self.owner()?;
        let draft = draft.validate()?;
        self.store.ensure_profile(owner)?;
        let collection = Collection::from_draft(draft, owner);
        match self.store.insert_collection(&collection) {
            Ok(()) => {
                info!(collection = %collection.id, "collection created");
                Ok(collection)
            }
            Err(StoreError::UniquenessViolation(_)) => Err(CatalogError::SlugTaken(
                collection.slug.clone().unwrap_or_default(),
            )),
            Err(e) => Err(e.into()),
        }
    }

    /// Deletes one of the owner's collections (and its membership links).
    pub fn delete_collection(&self, collection: CollectionId) -> CatalogResult<()> {
        let owner = self.owner()?;
        self.store
            .delete_collection(owner, collection)
            .map_err(not_found_or_store)
    }

    /// The owner-only collection page, private plates included. `NotFound`
    /// when the collection is not the caller's, whether or not it exists.
    pub fn collection_detail(&self, collection: CollectionId) -> CatalogResult<CollectionDetail> {
        let owner = self.owner()?;
        let collection = self
            .store
            .get_collection(owner, collection)?
            .ok_or(CatalogError::NotFound)?;
        let plates = self
            .store
            .read_membership_plates(collection.id, Some(owner), false)?;
        Ok(CollectionDetail { collection, plates })
    }

    // ── Memberships ──────────────────────────────────────────────

    /// Links a plate into a collection. The caller must own both sides;
    /// a duplicate link is reported as `AlreadyInCollection`.
    pub fn link_plate(&self, plate: PlateId, collection: CollectionId) -> CatalogResult<()> {
        let owner = self.owner()?;
        match self
            .store
            .insert_membership(&Membership::new(plate, collection, owner))
        {
            Ok(()) => Ok(()),
            Err(StoreError::UniquenessViolation(_)) => Err(CatalogError::AlreadyInCollection),
            Err(e) => Err(not_found_or_store(e)),
        }
    }

    /// Removes a plate from a collection.
    pub fn unlink_plate(&self, plate: PlateId, collection: CollectionId) -> CatalogResult<()> {
        let owner = self.owner()?;
        self.store
            .delete_membership(owner, plate, collection)
            .map_err(not_found_or_store)
    }

    // ── Profile ──────────────────────────────────────────────────

    /// Normalizes and claims a handle; returns the canonical form that was
    /// persisted. Empty-after-normalization input never reaches the store.
    pub fn set_handle(&self, raw: &str) -> CatalogResult<String> {
        let owner = self.owner()?;
        let handle = slug::normalize_required(raw)?;
        self.store.ensure_profile(owner)?;
        match self.store.update_profile_handle(owner, &handle) {
            Ok(()) => {
                info!(handle, "handle claimed");
                Ok(handle)
            }
            Err(StoreError::UniquenessViolation(_)) => Err(CatalogError::HandleTaken(handle)),
            Err(e) => Err(e.into()),
        }
    }

    /// Sets the owner's display name (empty input clears it).
    pub fn set_display_name(&self, raw: &str) -> CatalogResult<()> {
        let owner = self.owner()?;
        self.store.ensure_profile(owner)?;
        let trimmed = raw.trim();
        let value = if trimmed.is_empty() { None } else { Some(trimmed) };
        Ok(self.store.update_profile_display_name(owner, value)?)
    }

    /// Sets the owner's profile visibility flag.
    pub fn set_profile_visibility(&self, is_public: bool) -> CatalogResult<()> {
        let owner = self.owner()?;
        self.store.ensure_profile(owner)?;
        Ok(self.store.set_profile_visibility(owner, is_public)?)
    }

    // ── Public pages ─────────────────────────────────────────────

    /// The browse page (`/public`): every public plate across all owners,
    /// newest first, uncapped.
    pub fn public_plates(&self) -> CatalogResult<Vec<Plate>> {
        Ok(self.store.read_plates(&PlateFilter::all_public())?)
    }

    /// One owner's plate list addressed by raw owner id (`/u/{owner}`,
    /// which works even before a handle is claimed). Public rows only,
    /// except the owner themselves also sees their private plates.
    pub fn owner_plates(&self, owner: OwnerId) -> CatalogResult<Vec<Plate>> {
        let requester = self.requester();
        Ok(self
            .store
            .read_plates(&PlateFilter::visible_to(requester, owner))?)
    }

    /// The public profile page (`/u/{handle}`).
    ///
    /// Resolves the handle case-insensitively (uniqueness up to case is a
    /// store constraint), gates on profile visibility, then reads public
    /// collections and recent public plates through policy-built filters.
    /// Every missing or denied link collapses into the same `NotFound`.
    pub fn public_profile(&self, handle: &str) -> CatalogResult<ProfileView> {
        let requester = self.requester();
        let profile = self
            .store
            .lookup_profile_by_handle(handle)?
            .ok_or(CatalogError::NotFound)?;
        if !visibility::can_read_profile(requester, &profile) {
            debug!(handle, "profile hidden from requester");
            return Err(CatalogError::NotFound);
        }
        let collections = self
            .store
            .read_collections(&CollectionFilter::visible_to(requester, profile.id))?;
        let plates = self.store.read_plates(
            &PlateFilter::visible_to(requester, profile.id).with_limit(RECENT_PUBLIC_LIMIT),
        )?;
        Ok(ProfileView {
            handle: profile.handle.unwrap_or_else(|| handle.to_string()),
            display_name: profile.display_name,
            collections,
            plates,
        })
    }

    /// The public collection page (`/u/{handle}/{slug}`).
    ///
    /// Handle → owner, (owner, slug, public) → collection, then the
    /// membership join restricted to public plates inside the query.
    /// "Handle unknown", "collection unknown", and "collection private"
    /// are indistinguishable to the caller.
    pub fn public_collection(
        &self,
        handle: &str,
        slug: &str,
    ) -> CatalogResult<PublicCollectionView> {
        let requester = self.requester();
        let profile = self
            .store
            .lookup_profile_by_handle(handle)?
            .ok_or(CatalogError::NotFound)?;
        if !visibility::can_read_profile(requester, &profile) {
            debug!(handle, "profile hidden from requester");
            return Err(CatalogError::NotFound);
        }
        let collection = self
            .store
            .find_public_collection(profile.id, slug)?
            .ok_or_else(|| {
                debug!(handle, slug, "no public collection at this address");
                CatalogError::NotFound
            })?;
        let plates = self
            .store
            .read_membership_plates(collection.id, None, true)?;
        Ok(PublicCollectionView {
            handle: profile.handle.unwrap_or_else(|| handle.to_string()),
            collection,
            plates,
        })
    }
}

/// Absent rows become the uniform `NotFound`; everything else stays a
/// store error.
fn not_found_or_store(e: StoreError) -> CatalogError {
    match e {
        StoreError::NotFound(_) => CatalogError::NotFound,
        other => CatalogError::Store(other),
    }
}
