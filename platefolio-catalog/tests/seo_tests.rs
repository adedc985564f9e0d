use platefolio_catalog::{CatalogService, SeoRenderer, SessionIdentity};
use platefolio_model::{CollectionDraft, PlateDraft};
use platefolio_store::CatalogStore;
use platefolio_types::OwnerId;
use pretty_assertions::assert_eq;
use std::sync::Arc;

const BASE: &str = "https://app.platefolio.example";

fn setup() -> (Arc<SessionIdentity>, CatalogService, SeoRenderer) {
    let store = Arc::new(CatalogStore::open_in_memory().unwrap());
    let identity = Arc::new(SessionIdentity::new());
    let service = CatalogService::new(store.clone(), identity.clone());
    let seo = SeoRenderer::new(store, BASE);
    (identity, service, seo)
}

// ── robots.txt & index ───────────────────────────────────────────

#[test]
fn robots_points_at_the_sitemap_index() {
    let (_identity, _service, seo) = setup();
    let robots = seo.robots_txt();

    assert!(robots.starts_with("User-agent: *\nAllow: /\n"));
    assert!(robots.contains(&format!("Sitemap: {BASE}/sitemap.xml")));
}

#[test]
fn index_lists_both_sitemaps() {
    let (_identity, _service, seo) = setup();
    let index = seo.sitemap_index();

    assert!(index.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(index.contains(&format!("<loc>{BASE}/sitemaps/profiles.xml</loc>")));
    assert!(index.contains(&format!("<loc>{BASE}/sitemaps/collections.xml</loc>")));
    assert!(index.trim_end().ends_with("</sitemapindex>"));
}

#[test]
fn trailing_slash_in_base_url_is_tolerated() {
    let store = Arc::new(CatalogStore::open_in_memory().unwrap());
    let seo = SeoRenderer::new(store, format!("{BASE}/"));
    assert!(seo.robots_txt().contains(&format!("Sitemap: {BASE}/sitemap.xml")));
}

// ── Empty store ──────────────────────────────────────────────────

#[test]
fn empty_store_yields_valid_empty_urlsets() {
    let (_identity, _service, seo) = setup();

    for body in [seo.profiles_sitemap(), seo.collections_sitemap()] {
        assert!(body.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(body.contains("<urlset"));
        assert!(body.trim_end().ends_with("</urlset>"));
        assert!(!body.contains("<url>"));
    }
}

// ── Populated store ──────────────────────────────────────────────

#[test]
fn profiles_sitemap_lists_advertisable_handles_with_lastmod() {
    let (identity, service, seo) = setup();

    identity.sign_in(OwnerId::new());
    service.set_handle("nathan").unwrap();

    identity.sign_in(OwnerId::new());
    service.set_handle("ghost").unwrap();
    service.set_profile_visibility(false).unwrap();

    // Signed in but handleless: not addressable, not listed.
    identity.sign_in(OwnerId::new());
    service.home_view().unwrap();

    let body = seo.profiles_sitemap();
    assert!(body.contains(&format!("<loc>{BASE}/u/nathan</loc>")));
    assert!(!body.contains("/u/ghost"));
    assert!(body.contains("<lastmod>"));
    assert!(body.contains("<changefreq>daily</changefreq>"));
    assert!(body.contains("<priority>0.6</priority>"));
    assert_eq!(body.matches("<url>").count(), 1);
}

#[test]
fn collections_sitemap_lists_public_slugged_collections_only() {
    let (identity, service, seo) = setup();

    identity.sign_in(OwnerId::new());
    service.set_handle("nathan").unwrap();
    service
        .create_collection(CollectionDraft {
            name: "NY 70s".to_string(),
            slug: Some("NY 70s".to_string()),
            is_public: true,
            ..CollectionDraft::default()
        })
        .unwrap();
    service
        .create_collection(CollectionDraft {
            name: "Secret".to_string(),
            slug: Some("secret".to_string()),
            is_public: false,
            ..CollectionDraft::default()
        })
        .unwrap();
    service
        .create_collection(CollectionDraft {
            name: "Slugless".to_string(),
            is_public: true,
            ..CollectionDraft::default()
        })
        .unwrap();

    let body = seo.collections_sitemap();
    assert!(body.contains(&format!("<loc>{BASE}/u/nathan/ny-70s</loc>")));
    assert!(!body.contains("secret"));
    assert_eq!(body.matches("<url>").count(), 1);
}

#[test]
fn sitemaps_only_list_content_for_handled_owners() {
    let (identity, service, seo) = setup();

    // Public collection, but its owner never claimed a handle: the page
    // has no address, so the sitemap must not invent one.
    identity.sign_in(OwnerId::new());
    service
        .create_collection(CollectionDraft {
            name: "Orphan".to_string(),
            slug: Some("orphan".to_string()),
            is_public: true,
            ..CollectionDraft::default()
        })
        .unwrap();

    let body = seo.collections_sitemap();
    assert!(!body.contains("<url>"));
}

#[test]
fn plates_never_appear_in_sitemaps() {
    let (identity, service, seo) = setup();

    identity.sign_in(OwnerId::new());
    service.set_handle("nathan").unwrap();
    service
        .add_plate(PlateDraft {
            country_code: "US".to_string(),
            is_public: true,
            ..PlateDraft::default()
        })
        .unwrap();

    // Plates have no public address of their own.
    let body = seo.collections_sitemap();
    assert!(!body.contains("<url>"));
}
