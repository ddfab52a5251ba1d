//! End-to-end generate pipeline: fetch catalog → build entries → assemble
//! document → write file.
//!
//! Single forward pass, run to completion. The only fallible steps are the
//! catalog fetch (degraded to zero products) and the final write (fatal).

use std::path::PathBuf;
use std::time::Instant;

use chrono::{Local, NaiveDate};
use tracing::{info, instrument};

use sitemapgen_catalog::CatalogClient;
use sitemapgen_shared::{AppConfig, Product, Result, SiteConfig};

use crate::document::SitemapDocument;
use crate::entries;

/// Configuration for a generate run.
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    /// Site settings (base URL, hreflang, stylesheet).
    pub site: SiteConfig,
    /// Where the sitemap is written.
    pub output_path: PathBuf,
}

impl From<&AppConfig> for GenerateConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            site: config.site.clone(),
            output_path: PathBuf::from(&config.site.output_path),
        }
    }
}

/// Per-family entry counts for one assembled document.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntryCounts {
    pub home: usize,
    pub categories: usize,
    pub stores: usize,
    pub products: usize,
    pub static_pages: usize,
    /// Product records dropped for an empty name/category slug.
    pub skipped_empty_slug: usize,
    /// Product records dropped as duplicates, whether of another product
    /// path or of an earlier entry family's location (first-seen wins).
    pub skipped_duplicates: usize,
}

/// Result of a completed generate run.
#[derive(Debug)]
pub struct GenerateReport {
    /// Entry counts per page family.
    pub counts: EntryCounts,
    /// Total URL entries written.
    pub total_urls: usize,
    /// Path the sitemap was written to.
    pub output_path: PathBuf,
    /// Total elapsed time.
    pub elapsed: std::time::Duration,
}

/// Assemble the sitemap document for a given catalog snapshot and date.
///
/// Pure over its inputs: same products and same date yield a byte-identical
/// document. Insertion order is home, categories, stores, products (catalog
/// order), static pages.
pub fn build_document(
    site: &SiteConfig,
    products: &[Product],
    today: NaiveDate,
) -> (SitemapDocument, EntryCounts) {
    let mut doc = SitemapDocument::new();

    let home = doc.push(entries::home_entry(site, today)) as usize;
    let categories = doc.extend(entries::category_entries(site, today));
    let stores = doc.extend(entries::store_entries(site, today));

    let built = entries::product_entries(site, products, today);
    let skipped_empty_slug = built.skipped_empty_slug;
    let submitted = built.entries.len();
    let product_count = doc.extend(built.entries);
    // A product path can also collide with a category/store/static location;
    // those rejections count as duplicates too, so the skip counts add up.
    let skipped_duplicates = built.skipped_duplicate + (submitted - product_count);

    let static_pages = doc.extend(entries::static_page_entries(site, today));

    let counts = EntryCounts {
        home,
        categories,
        stores,
        products: product_count,
        static_pages,
        skipped_empty_slug,
        skipped_duplicates,
    };

    (doc, counts)
}

/// Run the full generate pipeline and write the sitemap.
///
/// The catalog fetch is fail-soft: on any fetch error the run continues
/// with zero products and still emits the home/category/store/static pages.
#[instrument(skip_all, fields(base_url = %config.site.base_url))]
pub async fn generate(config: &GenerateConfig, catalog: &CatalogClient) -> Result<GenerateReport> {
    let start = Instant::now();

    info!(output = %config.output_path.display(), "starting sitemap generation");

    let products = catalog.fetch_products().await;
    let today = Local::now().date_naive();

    let (doc, counts) = build_document(&config.site, &products, today);
    doc.write(&config.output_path, config.site.stylesheet.as_deref())?;

    let report = GenerateReport {
        counts,
        total_urls: doc.len(),
        output_path: config.output_path.clone(),
        elapsed: start.elapsed(),
    };

    info!(
        total = report.total_urls,
        products = counts.products,
        skipped_empty = counts.skipped_empty_slug,
        skipped_dup = counts.skipped_duplicates,
        "sitemap generation complete"
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitemapgen_shared::{CatalogConfig, Credentials};

    fn site() -> SiteConfig {
        SiteConfig::default()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn product(name: &str, category: &str, last_updated: Option<&str>) -> Product {
        Product {
            name: name.into(),
            category: category.into(),
            last_updated: last_updated.map(String::from),
        }
    }

    #[test]
    fn zero_products_still_yields_21_entries() {
        let (doc, counts) = build_document(&site(), &[], today());

        assert_eq!(counts.home, 1);
        assert_eq!(counts.categories, 8);
        assert_eq!(counts.stores, 5);
        assert_eq!(counts.products, 0);
        assert_eq!(counts.static_pages, 7);
        assert_eq!(doc.len(), 21);
    }

    #[test]
    fn products_append_between_stores_and_static_pages() {
        let products = [
            product("Yerba", "Almacén", Some("2024-03-15T10:22:00Z")),
            product("Pan", "Almacén", None),
        ];
        let (doc, counts) = build_document(&site(), &products, today());

        assert_eq!(counts.products, 2);
        assert_eq!(doc.len(), 23);

        let locs: Vec<_> = doc.entries().iter().map(|e| e.loc.as_str()).collect();
        let yerba = locs
            .iter()
            .position(|l| l.ends_with("/almacen/yerba"))
            .unwrap();
        let last_store = locs
            .iter()
            .position(|l| l.ends_with("/supermercado/mas-online"))
            .unwrap();
        let first_static = locs.iter().position(|l| l.ends_with("/buscar")).unwrap();
        assert!(last_store < yerba && yerba < first_static);
    }

    #[test]
    fn duplicate_product_paths_collapse() {
        let products = [
            product("Leche", "Lacteos", None),
            product("LECHE", "lacteos", None),
        ];
        let (doc, counts) = build_document(&site(), &products, today());
        assert_eq!(counts.products, 1);
        assert_eq!(counts.skipped_duplicates, 1);
        assert_eq!(doc.len(), 22);
    }

    #[test]
    fn product_colliding_with_store_page_counts_as_duplicate() {
        // Slugs to /supermercado/coto, already emitted as a store page
        let products = [
            product("Coto", "Supermercado", None),
            product("Pan", "Almacén", None),
        ];
        let (doc, counts) = build_document(&site(), &products, today());

        assert_eq!(counts.products, 1);
        assert_eq!(counts.skipped_duplicates, 1);
        assert_eq!(doc.len(), 22);

        // The store entry's metadata survives (first-write-wins)
        let store = doc
            .entries()
            .iter()
            .find(|e| e.loc.ends_with("/supermercado/coto"))
            .unwrap();
        assert_eq!(store.priority, Some(0.85));
    }

    #[test]
    fn empty_category_excluded_from_count() {
        let products = [product("Leche", "", None), product("Pan", "Almacén", None)];
        let (_, counts) = build_document(&site(), &products, today());
        assert_eq!(counts.products, 1);
        assert_eq!(counts.skipped_empty_slug, 1);
    }

    #[test]
    fn same_inputs_same_date_byte_identical_output() {
        let products = [
            product("Yerba", "Almacén", Some("2024-03-15T10:22:00Z")),
            product("Fernet", "Bebidas", Some("2024-04-01")),
        ];
        let (doc_a, _) = build_document(&site(), &products, today());
        let (doc_b, _) = build_document(&site(), &products, today());
        assert_eq!(doc_a.to_xml(Some("/sitemap.xsl")), doc_b.to_xml(Some("/sitemap.xsl")));
    }

    #[tokio::test]
    async fn generate_end_to_end_with_mock_catalog() {
        let server = wiremock::MockServer::start().await;

        let body = serde_json::json!([
            {"nombre": "Yerba", "categoria": "Almacén", "updated_at": "2024-03-15T10:22:00Z"},
        ]);
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/rest/v1/productos"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_json(&body))
            .mount(&server)
            .await;

        let credentials = Credentials {
            url: server.uri(),
            key: "test-key".into(),
        };
        let catalog = CatalogClient::new(&credentials, &CatalogConfig::default()).unwrap();

        let tmp = tempfile::tempdir().unwrap();
        let config = GenerateConfig {
            site: site(),
            output_path: tmp.path().join("public/sitemap.xml"),
        };

        let report = generate(&config, &catalog).await.unwrap();

        assert_eq!(report.counts.products, 1);
        assert_eq!(report.total_urls, 22);

        let xml = std::fs::read_to_string(&report.output_path).unwrap();
        assert!(xml.contains("<loc>https://tradingchango.com/almacen/yerba</loc>"));
        assert!(xml.contains("<lastmod>2024-03-15</lastmod>"));
        assert_eq!(xml.matches("<url>").count(), 22);
    }

    #[tokio::test]
    async fn generate_survives_catalog_outage() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/rest/v1/productos"))
            .respond_with(wiremock::ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let credentials = Credentials {
            url: server.uri(),
            key: "test-key".into(),
        };
        let catalog = CatalogClient::new(&credentials, &CatalogConfig::default()).unwrap();

        let tmp = tempfile::tempdir().unwrap();
        let config = GenerateConfig {
            site: site(),
            output_path: tmp.path().join("sitemap.xml"),
        };

        let report = generate(&config, &catalog).await.unwrap();

        // Degraded but usable: all static families present, zero products
        assert_eq!(report.counts.products, 0);
        assert_eq!(report.total_urls, 21);
        assert!(report.output_path.exists());
    }
}
