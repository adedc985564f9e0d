use platefolio_catalog::{CatalogError, CatalogService, SessionIdentity};
use platefolio_catalog::views::HomeView;
use platefolio_model::{CollectionDraft, PlateDraft};
use platefolio_store::CatalogStore;
use platefolio_types::{CollectionId, OwnerId, PlateId};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn setup() -> (Arc<SessionIdentity>, CatalogService) {
    let store = Arc::new(CatalogStore::open_in_memory().unwrap());
    let identity = Arc::new(SessionIdentity::new());
    let service = CatalogService::new(store, identity.clone());
    (identity, service)
}

fn plate_draft(country: &str, is_public: bool) -> PlateDraft {
    PlateDraft {
        country_code: country.to_string(),
        is_public,
        ..PlateDraft::default()
    }
}

fn collection_draft(name: &str, slug: &str, is_public: bool) -> CollectionDraft {
    CollectionDraft {
        name: name.to_string(),
        slug: Some(slug.to_string()),
        is_public,
        ..CollectionDraft::default()
    }
}

// ── Sign-in gating ───────────────────────────────────────────────

#[test]
fn writes_require_identity() {
    let (_identity, service) = setup();

    assert!(matches!(
        service.add_plate(plate_draft("US", false)),
        Err(CatalogError::NotSignedIn)
    ));
    assert!(matches!(
        service.create_collection(collection_draft("x", "x", false)),
        Err(CatalogError::NotSignedIn)
    ));
    assert!(matches!(
        service.set_handle("nathan"),
        Err(CatalogError::NotSignedIn)
    ));
    assert!(matches!(
        service.link_plate(PlateId::new(), CollectionId::new()),
        Err(CatalogError::NotSignedIn)
    ));
    assert!(matches!(
        service.collection_detail(CollectionId::new()),
        Err(CatalogError::NotSignedIn)
    ));
}

// ── Home ─────────────────────────────────────────────────────────

#[test]
fn home_view_shows_owner_catalog_or_public_sample() {
    let (identity, service) = setup();
    let owner = OwnerId::new();

    identity.sign_in(owner);
    service.add_plate(plate_draft("US", false)).unwrap();
    service.add_plate(plate_draft("CA", true)).unwrap();

    // Owner sees everything, private included.
    let mine = service.home_view().unwrap();
    assert!(matches!(mine, HomeView::Owner { .. }));
    assert_eq!(mine.plates().len(), 2);

    // Anonymous sees only the public sample.
    identity.sign_out();
    let sample = service.home_view().unwrap();
    assert!(matches!(sample, HomeView::Anonymous { .. }));
    assert_eq!(sample.plates().len(), 1);
    assert_eq!(sample.plates()[0].country_code, "CA");
}

// ── Public plate lists ───────────────────────────────────────────

#[test]
fn browse_page_lists_every_public_plate_without_a_cap() {
    let (identity, service) = setup();
    identity.sign_in(OwnerId::new());
    for _ in 0..25 {
        service.add_plate(plate_draft("US", true)).unwrap();
    }
    service.add_plate(plate_draft("CA", false)).unwrap();

    identity.sign_out();
    let plates = service.public_plates().unwrap();
    assert_eq!(plates.len(), 25);
    assert!(plates.iter().all(|p| p.is_public));
}

#[test]
fn owner_plate_list_by_id_respects_visibility() {
    let (identity, service) = setup();
    let owner = OwnerId::new();

    identity.sign_in(owner);
    let public_plate = service.add_plate(plate_draft("US", true)).unwrap();
    service.add_plate(plate_draft("CA", false)).unwrap();

    // The owner sees both rows; everyone else only the public one.
    assert_eq!(service.owner_plates(owner).unwrap().len(), 2);

    identity.sign_out();
    let visible = service.owner_plates(owner).unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, public_plate.id);
}

// ── The end-to-end public collection scenario ────────────────────

#[test]
fn anonymous_requester_sees_one_public_plate_on_the_public_page() {
    let (identity, service) = setup();
    let owner = OwnerId::new();
    identity.sign_in(owner);

    let handle = service.set_handle("Nathan").unwrap();
    assert_eq!(handle, "nathan");

    let plate = service
        .add_plate(PlateDraft {
            country_code: "US".to_string(),
            region_code: Some("NY".to_string()),
            year: Some(1977),
            serial: None,
            is_public: true,
        })
        .unwrap();
    let collection = service
        .create_collection(collection_draft("NY 70s", "ny-70s", true))
        .unwrap();
    service.link_plate(plate.id, collection.id).unwrap();

    identity.sign_out();
    let view = service.public_collection("nathan", "ny-70s").unwrap();
    assert_eq!(view.handle, "nathan");
    assert_eq!(view.collection.name, "NY 70s");
    assert_eq!(view.plates.len(), 1);
    assert_eq!(view.plates[0].label(), "US-NY 1977");
}

#[test]
fn public_collection_never_lists_private_plates() {
    let (identity, service) = setup();
    identity.sign_in(OwnerId::new());

    service.set_handle("nathan").unwrap();
    let public_plate = service.add_plate(plate_draft("US", true)).unwrap();
    let private_plate = service.add_plate(plate_draft("CA", false)).unwrap();
    let collection = service
        .create_collection(collection_draft("Mixed", "mixed", true))
        .unwrap();
    service.link_plate(public_plate.id, collection.id).unwrap();
    service.link_plate(private_plate.id, collection.id).unwrap();

    identity.sign_out();
    let view = service.public_collection("nathan", "mixed").unwrap();
    assert_eq!(view.plates.len(), 1);
    assert_eq!(view.plates[0].id, public_plate.id);
}

// ── Uniform not-found ────────────────────────────────────────────

#[test]
fn missing_and_private_pages_are_indistinguishable() {
    let (identity, service) = setup();
    identity.sign_in(OwnerId::new());
    service.set_handle("nathan").unwrap();
    service
        .create_collection(collection_draft("Secret", "secret", false))
        .unwrap();
    identity.sign_out();

    // Unknown handle, unknown slug, and existing-but-private collection
    // all collapse into the same error.
    let unknown_handle = service.public_collection("nobody", "secret").unwrap_err();
    let unknown_slug = service.public_collection("nathan", "nothing").unwrap_err();
    let private_collection = service.public_collection("nathan", "secret").unwrap_err();

    assert!(matches!(unknown_handle, CatalogError::NotFound));
    assert!(matches!(unknown_slug, CatalogError::NotFound));
    assert!(matches!(private_collection, CatalogError::NotFound));
}

// ── Handles ──────────────────────────────────────────────────────

#[test]
fn set_handle_normalizes_before_claiming() {
    let (identity, service) = setup();
    identity.sign_in(OwnerId::new());

    let handle = service.set_handle("  Nathan's Plates!! ").unwrap();
    assert_eq!(handle, "nathan-s-plates");

    identity.sign_out();
    let view = service.public_profile("nathan-s-plates").unwrap();
    assert_eq!(view.handle, "nathan-s-plates");
}

#[test]
fn unusable_handle_is_blocked_before_submission() {
    let (identity, service) = setup();
    identity.sign_in(OwnerId::new());

    assert!(matches!(
        service.set_handle("!!??"),
        Err(CatalogError::Validation(_))
    ));
}

#[test]
fn second_owner_claiming_the_same_handle_is_rejected() {
    let (identity, service) = setup();
    let first = OwnerId::new();
    let second = OwnerId::new();

    identity.sign_in(first);
    service.set_handle("nathan").unwrap();

    identity.sign_in(second);
    let err = service.set_handle("Nathan").unwrap_err();
    assert!(matches!(err, CatalogError::HandleTaken(_)));

    // Exactly one profile holds the handle.
    identity.sign_out();
    let view = service.public_profile("nathan").unwrap();
    assert_eq!(view.handle, "nathan");
}

// ── Collections & memberships ────────────────────────────────────

#[test]
fn duplicate_slug_is_reported_as_taken() {
    let (identity, service) = setup();
    identity.sign_in(OwnerId::new());

    service
        .create_collection(collection_draft("NY 70s", "ny-70s", true))
        .unwrap();
    let err = service
        .create_collection(collection_draft("Other", "NY 70s", false))
        .unwrap_err();
    assert!(matches!(err, CatalogError::SlugTaken(_)));
}

#[test]
fn linking_twice_is_reported_as_already_added() {
    let (identity, service) = setup();
    identity.sign_in(OwnerId::new());

    let plate = service.add_plate(plate_draft("US", true)).unwrap();
    let collection = service
        .create_collection(collection_draft("Mine", "mine", true))
        .unwrap();
    service.link_plate(plate.id, collection.id).unwrap();

    let err = service.link_plate(plate.id, collection.id).unwrap_err();
    assert!(matches!(err, CatalogError::AlreadyInCollection));
}

#[test]
fn linking_someone_elses_collection_is_not_found() {
    let (identity, service) = setup();
    let owner = OwnerId::new();
    let stranger = OwnerId::new();

    identity.sign_in(owner);
    let collection = service
        .create_collection(collection_draft("Mine", "mine", true))
        .unwrap();

    identity.sign_in(stranger);
    let plate = service.add_plate(plate_draft("US", true)).unwrap();
    let err = service.link_plate(plate.id, collection.id).unwrap_err();
    assert!(matches!(err, CatalogError::NotFound));
}

#[test]
fn collection_detail_is_owner_only_and_includes_private_plates() {
    let (identity, service) = setup();
    let owner = OwnerId::new();

    identity.sign_in(owner);
    let private_plate = service.add_plate(plate_draft("US", false)).unwrap();
    let collection = service
        .create_collection(collection_draft("Mine", "mine", false))
        .unwrap();
    service.link_plate(private_plate.id, collection.id).unwrap();

    let detail = service.collection_detail(collection.id).unwrap();
    assert_eq!(detail.plates.len(), 1);
    assert_eq!(detail.plates[0].id, private_plate.id);

    // A different owner gets the uniform not-found, not a permission hint.
    identity.sign_in(OwnerId::new());
    let err = service.collection_detail(collection.id).unwrap_err();
    assert!(matches!(err, CatalogError::NotFound));
}

#[test]
fn unlink_removes_the_plate_from_the_detail_view() {
    let (identity, service) = setup();
    identity.sign_in(OwnerId::new());

    let plate = service.add_plate(plate_draft("US", true)).unwrap();
    let collection = service
        .create_collection(collection_draft("Mine", "mine", true))
        .unwrap();
    service.link_plate(plate.id, collection.id).unwrap();
    service.unlink_plate(plate.id, collection.id).unwrap();

    let detail = service.collection_detail(collection.id).unwrap();
    assert!(detail.plates.is_empty());

    // Unlinking again is a clean not-found.
    let err = service.unlink_plate(plate.id, collection.id).unwrap_err();
    assert!(matches!(err, CatalogError::NotFound));
}

// ── Public profile ───────────────────────────────────────────────

#[test]
fn public_profile_lists_public_content_only() {
    let (identity, service) = setup();
    identity.sign_in(OwnerId::new());

    service.set_handle("nathan").unwrap();
    service.add_plate(plate_draft("US", true)).unwrap();
    service.add_plate(plate_draft("CA", false)).unwrap();
    service
        .create_collection(collection_draft("Public", "pub", true))
        .unwrap();
    service
        .create_collection(collection_draft("Private", "priv", false))
        .unwrap();

    identity.sign_out();
    let view = service.public_profile("NATHAN").unwrap();
    assert_eq!(view.handle, "nathan");
    assert_eq!(view.plates.len(), 1);
    assert_eq!(view.plates[0].country_code, "US");
    assert_eq!(view.collections.len(), 1);
    assert_eq!(view.collections[0].name, "Public");
}

#[test]
fn explicitly_hidden_profile_is_not_found_for_others() {
    let (identity, service) = setup();
    let owner = OwnerId::new();

    identity.sign_in(owner);
    service.set_handle("ghost").unwrap();
    service.set_profile_visibility(false).unwrap();

    identity.sign_out();
    assert!(matches!(
        service.public_profile("ghost"),
        Err(CatalogError::NotFound)
    ));

    // The owner still reaches their own page.
    identity.sign_in(owner);
    assert!(service.public_profile("ghost").is_ok());
}

// ── Plate lifecycle ──────────────────────────────────────────────

#[test]
fn deleted_plate_disappears_from_every_view() {
    let (identity, service) = setup();
    identity.sign_in(OwnerId::new());

    service.set_handle("nathan").unwrap();
    let plate = service.add_plate(plate_draft("US", true)).unwrap();
    let collection = service
        .create_collection(collection_draft("Mine", "mine", true))
        .unwrap();
    service.link_plate(plate.id, collection.id).unwrap();
    service.delete_plate(plate.id).unwrap();

    assert!(service.home_view().unwrap().plates().is_empty());

    identity.sign_out();
    let public_view = service.public_collection("nathan", "mine").unwrap();
    assert!(public_view.plates.is_empty());
}

#[test]
fn plate_draft_validation_is_enforced_at_the_service() {
    let (identity, service) = setup();
    identity.sign_in(OwnerId::new());

    assert!(matches!(
        service.add_plate(plate_draft("   ", true)),
        Err(CatalogError::Validation(_))
    ));
}
