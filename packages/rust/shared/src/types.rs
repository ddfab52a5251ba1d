//! Core domain types for sitemap generation.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ChangeFreq
// ---------------------------------------------------------------------------

/// Crawler hint for how often a page is expected to change.
///
/// Serializes to the lowercase token the sitemap protocol expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFreq {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFreq {
    /// The lowercase protocol token for this frequency.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Never => "never",
        }
    }
}

impl std::fmt::Display for ChangeFreq {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// UrlEntry
// ---------------------------------------------------------------------------

/// An alternate-language link attached to a URL entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlternateLink {
    /// Language/region tag (e.g. `es-AR`).
    pub hreflang: String,
    /// Absolute URL of the language variant.
    pub href: String,
}

/// One `<url>` entry of the sitemap document.
///
/// `loc` is the only required field; everything else is a crawler hint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlEntry {
    /// Absolute URL of the page.
    pub loc: String,
    /// ISO date (`YYYY-MM-DD`) the page was last modified.
    pub lastmod: Option<String>,
    /// Expected update cadence.
    pub changefreq: Option<ChangeFreq>,
    /// Crawl priority in `0.0..=1.0`.
    pub priority: Option<f32>,
    /// Alternate-language variants of this page.
    #[serde(default)]
    pub alternates: Vec<AlternateLink>,
}

impl UrlEntry {
    /// Create a bare entry with only a location.
    pub fn new(loc: impl Into<String>) -> Self {
        Self {
            loc: loc.into(),
            lastmod: None,
            changefreq: None,
            priority: None,
            alternates: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Product
// ---------------------------------------------------------------------------

/// A product record as read from the catalog data source.
///
/// The data source is the source of truth; this system only projects the
/// three fields it needs to derive product URLs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Human-readable product name.
    pub name: String,
    /// Human-readable category name.
    pub category: String,
    /// Last-update timestamp, optionally ISO-8601 with a `T` separator.
    pub last_updated: Option<String>,
}
