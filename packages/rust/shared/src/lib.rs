//! Shared types, error model, and configuration for sitemapgen.
//!
//! This crate is the foundation depended on by the other sitemapgen crates.
//! It provides:
//! - [`SitemapError`] — the unified error type
//! - Domain types ([`UrlEntry`], [`ChangeFreq`], [`Product`], [`AlternateLink`])
//! - Configuration ([`AppConfig`], [`SiteConfig`], credential resolution)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CatalogConfig, Credentials, SiteConfig, config_dir, config_file_path, init_config,
    load_config, load_config_from, resolve_credentials,
};
pub use error::{Result, SitemapError};
pub use types::{AlternateLink, ChangeFreq, Product, UrlEntry};
