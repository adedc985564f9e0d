//! Crawler-facing endpoints: robots.txt and the sitemap family.
//!
//! These degrade gracefully: if the store is unreachable, the sitemaps
//! come back structurally valid and empty rather than erroring at the
//! crawler. Only public, addressable content is ever listed.

use chrono::DateTime;
use platefolio_store::CatalogStore;
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::warn;

const URLSET_OPEN: &str = concat!(
    "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
    "<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
);
const URLSET_CLOSE: &str = "</urlset>";
const EMPTY_URLSET: &str = concat!(
    "<?xml version=\"1.0\" encoding=\"UTF-8\"?>",
    "<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\"></urlset>",
);

/// Renders the machine-readable endpoints from store state.
pub struct SeoRenderer {
    store: Arc<CatalogStore>,
    base_url: String,
}

impl SeoRenderer {
    /// `base_url` is the public origin, e.g. `https://app.platefolio.com`
    /// (a trailing slash is tolerated).
    pub fn new(store: Arc<CatalogStore>, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { store, base_url }
    }

    /// `robots.txt`: allow everything, point at the sitemap index.
    #[must_use]
    pub fn robots_txt(&self) -> String {
        format!(
            "User-agent: *\nAllow: /\n\nSitemap: {}/sitemap.xml\n",
            self.base_url
        )
    }

    /// The sitemap index pointing at the two concrete sitemaps.
    #[must_use]
    pub fn sitemap_index(&self) -> String {
        let base = &self.base_url;
        let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        out.push_str("<sitemapindex xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n");
        for name in ["profiles", "collections"] {
            let _ = writeln!(out, "  <sitemap>");
            let _ = writeln!(out, "    <loc>{base}/sitemaps/{name}.xml</loc>");
            let _ = writeln!(out, "  </sitemap>");
        }
        out.push_str("</sitemapindex>");
        out
    }

    /// `<urlset>` of every advertisable public profile page.
    #[must_use]
    pub fn profiles_sitemap(&self) -> String {
        let rows = match self.store.public_handles() {
            Ok(rows) => rows,
            Err(e) => {
                warn!(error = %e, "profiles sitemap degraded to empty");
                return EMPTY_URLSET.to_string();
            }
        };

        let mut out = String::from(URLSET_OPEN);
        for (handle, lastmod_ms) in rows {
            self.push_url(&mut out, &format!("/u/{handle}"), lastmod_ms);
        }
        out.push_str(URLSET_CLOSE);
        out
    }

    /// `<urlset>` of every advertisable public collection page.
    #[must_use]
    pub fn collections_sitemap(&self) -> String {
        let rows = match self.store.public_collection_refs() {
            Ok(rows) => rows,
            Err(e) => {
                warn!(error = %e, "collections sitemap degraded to empty");
                return EMPTY_URLSET.to_string();
            }
        };

        let mut out = String::from(URLSET_OPEN);
        for (handle, slug, lastmod_ms) in rows {
            self.push_url(&mut out, &format!("/u/{handle}/{slug}"), lastmod_ms);
        }
        out.push_str(URLSET_CLOSE);
        out
    }

    fn push_url(&self, out: &mut String, path: &str, lastmod_ms: i64) {
        let loc = xml_escape(&format!("{}{}", self.base_url, path));
        let _ = writeln!(out, "  <url>");
        let _ = writeln!(out, "    <loc>{loc}</loc>");
        if let Some(date) = lastmod_date(lastmod_ms) {
            let _ = writeln!(out, "    <lastmod>{date}</lastmod>");
        }
        let _ = writeln!(out, "    <changefreq>daily</changefreq>");
        let _ = writeln!(out, "    <priority>0.6</priority>");
        let _ = writeln!(out, "  </url>");
    }
}

/// W3C date (`YYYY-MM-DD`) from epoch milliseconds; `None` when out of
/// chrono's representable range.
fn lastmod_date(ms: i64) -> Option<String> {
    DateTime::from_timestamp_millis(ms).map(|dt| dt.date_naive().to_string())
}

fn xml_escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}
