//! Product catalog fetcher over the Supabase REST interface.
//!
//! The catalog is a read-only external data source: one table of products,
//! projected down to the three fields needed for sitemap URLs. The fetch is
//! deliberately fail-soft — a broken catalog must never block publishing
//! the static portion of the sitemap.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument, warn};
use url::Url;

use sitemapgen_shared::{CatalogConfig, Credentials, Product, Result, SitemapError};

/// Columns projected from the product table.
const SELECT_COLUMNS: &str = "nombre,categoria,updated_at";

/// User-Agent string for catalog requests.
const USER_AGENT: &str = concat!("sitemapgen/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// Wire row
// ---------------------------------------------------------------------------

/// One row of the REST response. All columns are nullable in the source
/// schema, so every field tolerates `null` or absence.
#[derive(Debug, Deserialize)]
struct ProductRow {
    #[serde(default)]
    nombre: Option<String>,
    #[serde(default)]
    categoria: Option<String>,
    #[serde(default)]
    updated_at: Option<String>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            name: row.nombre.unwrap_or_default(),
            category: row.categoria.unwrap_or_default(),
            last_updated: row.updated_at,
        }
    }
}

// ---------------------------------------------------------------------------
// CatalogClient
// ---------------------------------------------------------------------------

/// HTTP client for the product catalog, constructed explicitly from resolved
/// credentials and passed to the pipeline (no ambient/global handle).
#[derive(Debug)]
pub struct CatalogClient {
    client: Client,
    endpoint: Url,
    key: String,
    table: String,
}

impl CatalogClient {
    /// Build a client from resolved credentials and catalog config.
    pub fn new(credentials: &Credentials, config: &CatalogConfig) -> Result<Self> {
        let endpoint = Url::parse(&credentials.url).map_err(|e| {
            SitemapError::config(format!("invalid catalog endpoint '{}': {e}", credentials.url))
        })?;

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SitemapError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint,
            key: credentials.key.clone(),
            table: config.table.clone(),
        })
    }

    /// Fetch all product records, propagating any failure.
    #[instrument(skip_all, fields(table = %self.table))]
    pub async fn try_fetch_products(&self) -> Result<Vec<Product>> {
        let url = self.table_url()?;

        let response = self
            .client
            .get(url.clone())
            .query(&[("select", SELECT_COLUMNS)])
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
            .send()
            .await
            .map_err(|e| SitemapError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SitemapError::Network(format!("{url}: HTTP {status}")));
        }

        let rows: Vec<ProductRow> = response.json().await.map_err(|e| {
            SitemapError::validation(format!("{url}: malformed product response: {e}"))
        })?;

        debug!(count = rows.len(), "fetched product rows");
        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Fetch all product records, degrading to an empty list on any failure.
    ///
    /// The static/utility pages must still be emitted when the catalog is
    /// unreachable, so the caller never sees a fetch error from here.
    pub async fn fetch_products(&self) -> Vec<Product> {
        match self.try_fetch_products().await {
            Ok(products) => products,
            Err(e) => {
                warn!(error = %e, "catalog fetch failed, continuing with zero products");
                Vec::new()
            }
        }
    }

    /// REST URL of the product table.
    fn table_url(&self) -> Result<Url> {
        self.endpoint
            .join(&format!("rest/v1/{}", self.table))
            .map_err(|e| SitemapError::config(format!("invalid table name '{}': {e}", self.table)))
    }
}
