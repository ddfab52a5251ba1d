//! URL entry builders for each logical page family.
//!
//! The category, store, and static-page lists are constant tables rather
//! than control flow, so they can be tested and extended independently of
//! the formatting logic.

use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::debug;

use sitemapgen_shared::{AlternateLink, ChangeFreq, Product, SiteConfig, UrlEntry};

use crate::slug::slugify;

// ---------------------------------------------------------------------------
// Constant tables
// ---------------------------------------------------------------------------

/// Fixed category pages: (name, priority). Slugs derive from the names.
pub const CATEGORIES: [(&str, f32); 8] = [
    ("Almacén", 0.9),
    ("Bebidas", 0.9),
    ("Limpieza", 0.85),
    ("Perfumería", 0.85),
    ("Carnes", 0.9),
    ("Verdu", 0.9),
    ("Lacteos", 0.85),
    ("Mascotas", 0.8),
];

/// Fixed supermarket pages: (name, slug). Slugs are pre-assigned.
pub const STORES: [(&str, &str); 5] = [
    ("Coto", "coto"),
    ("Carrefour", "carrefour"),
    ("Día", "dia"),
    ("Jumbo", "jumbo"),
    ("Mas Online", "mas-online"),
];

/// Fixed utility/legal pages: (path, priority, change frequency).
pub const STATIC_PAGES: [(&str, f32, ChangeFreq); 7] = [
    ("/buscar", 0.7, ChangeFreq::Weekly),
    ("/comparar-precios", 0.75, ChangeFreq::Weekly),
    ("/como-ahorrar", 0.65, ChangeFreq::Monthly),
    ("/ofertas-semana", 0.8, ChangeFreq::Weekly),
    ("/historial-precios", 0.7, ChangeFreq::Weekly),
    ("/contacto", 0.4, ChangeFreq::Monthly),
    ("/terminos", 0.3, ChangeFreq::Monthly),
];

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// The home page entry: top priority, self-referential alternate link.
pub fn home_entry(site: &SiteConfig, today: NaiveDate) -> UrlEntry {
    let loc = format!("{}/", site.base_url);
    UrlEntry {
        lastmod: Some(today.to_string()),
        changefreq: None,
        priority: Some(1.0),
        alternates: vec![AlternateLink {
            hreflang: site.hreflang.clone(),
            href: loc.clone(),
        }],
        loc,
    }
}

/// One entry per category in [`CATEGORIES`], slugged from the name.
pub fn category_entries(site: &SiteConfig, today: NaiveDate) -> Vec<UrlEntry> {
    CATEGORIES
        .iter()
        .map(|(name, priority)| UrlEntry {
            loc: format!("{}/{}", site.base_url, slugify(name)),
            lastmod: Some(today.to_string()),
            changefreq: Some(ChangeFreq::Daily),
            priority: Some(*priority),
            alternates: Vec::new(),
        })
        .collect()
}

/// One entry per supermarket in [`STORES`], under `/supermercado/<slug>`.
pub fn store_entries(site: &SiteConfig, today: NaiveDate) -> Vec<UrlEntry> {
    STORES
        .iter()
        .map(|(_, slug)| UrlEntry {
            loc: format!("{}/supermercado/{slug}", site.base_url),
            lastmod: Some(today.to_string()),
            changefreq: Some(ChangeFreq::Daily),
            priority: Some(0.85),
            alternates: Vec::new(),
        })
        .collect()
}

/// One entry per utility page in [`STATIC_PAGES`].
pub fn static_page_entries(site: &SiteConfig, today: NaiveDate) -> Vec<UrlEntry> {
    STATIC_PAGES
        .iter()
        .map(|(path, priority, freq)| UrlEntry {
            loc: format!("{}{path}", site.base_url),
            lastmod: Some(today.to_string()),
            changefreq: Some(*freq),
            priority: Some(*priority),
            alternates: Vec::new(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Product entries
// ---------------------------------------------------------------------------

/// Product entries plus structured skip counts, so callers and tests can
/// observe what was dropped without parsing log output.
#[derive(Debug, Default)]
pub struct ProductEntries {
    /// Entries in first-seen catalog order.
    pub entries: Vec<UrlEntry>,
    /// Records dropped because name or category slugged to empty.
    pub skipped_empty_slug: usize,
    /// Records dropped because an earlier record claimed the same path.
    pub skipped_duplicate: usize,
}

/// Build product entries from fetched records.
///
/// Paths are `<category-slug>/<product-slug>`; first-seen wins on
/// duplicates, and records whose name or category normalizes to an empty
/// slug are skipped.
pub fn product_entries(
    site: &SiteConfig,
    products: &[Product],
    today: NaiveDate,
) -> ProductEntries {
    let mut result = ProductEntries::default();
    let mut seen_paths: HashSet<String> = HashSet::new();

    for product in products {
        let category_slug = slugify(&product.category);
        let product_slug = slugify(&product.name);

        if category_slug.is_empty() || product_slug.is_empty() {
            debug!(name = %product.name, category = %product.category, "skipping record with empty slug");
            result.skipped_empty_slug += 1;
            continue;
        }

        let path = format!("{category_slug}/{product_slug}");
        if !seen_paths.insert(path.clone()) {
            result.skipped_duplicate += 1;
            continue;
        }

        result.entries.push(UrlEntry {
            loc: format!("{}/{path}", site.base_url),
            lastmod: Some(product_lastmod(product.last_updated.as_deref(), today)),
            changefreq: Some(ChangeFreq::Weekly),
            priority: Some(0.6),
            alternates: Vec::new(),
        });
    }

    result
}

/// Resolve a product's `<lastmod>` date.
///
/// A timestamp with a `T` separator is truncated to its date component; a
/// plain date string passes through; a missing or empty value falls back
/// to today.
fn product_lastmod(last_updated: Option<&str>, today: NaiveDate) -> String {
    match last_updated {
        Some(raw) if !raw.is_empty() => match raw.split_once('T') {
            Some((date, _)) => date.to_string(),
            None => raw.to_string(),
        },
        _ => today.to_string(),
    }
}
