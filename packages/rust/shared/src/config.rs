//! Application configuration for sitemapgen.
//!
//! User config lives at `~/.sitemapgen/sitemapgen.toml`.
//! CLI flags override config file values, which override defaults.
//! Credentials are never stored in the file — only the names of the
//! environment variables that hold them.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SitemapError};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "sitemapgen.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".sitemapgen";

// ---------------------------------------------------------------------------
// Config structs (matching sitemapgen.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Site settings (base URL, output path, locale).
    #[serde(default)]
    pub site: SiteConfig,

    /// Catalog data-source settings.
    #[serde(default)]
    pub catalog: CatalogConfig,
}

/// `[site]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Canonical site origin, without a trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// hreflang tag used for alternate-language links.
    #[serde(default = "default_hreflang")]
    pub hreflang: String,

    /// Path the sitemap is written to, relative to the working directory.
    #[serde(default = "default_output_path")]
    pub output_path: String,

    /// Optional XSLT stylesheet referenced from the document preamble.
    #[serde(default = "default_stylesheet")]
    pub stylesheet: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            hreflang: default_hreflang(),
            output_path: default_output_path(),
            stylesheet: default_stylesheet(),
        }
    }
}

fn default_base_url() -> String {
    "https://tradingchango.com".into()
}
fn default_hreflang() -> String {
    "es-AR".into()
}
fn default_output_path() -> String {
    "public/sitemap.xml".into()
}
fn default_stylesheet() -> Option<String> {
    Some("/sitemap.xsl".into())
}

/// `[catalog]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Name of the env var holding the data-source endpoint (never the value).
    #[serde(default = "default_url_env")]
    pub url_env: String,

    /// Name of the env var holding the access key (never the value).
    #[serde(default = "default_key_env")]
    pub key_env: String,

    /// Table to project product rows from.
    #[serde(default = "default_table")]
    pub table: String,

    /// HTTP request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            url_env: default_url_env(),
            key_env: default_key_env(),
            table: default_table(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_url_env() -> String {
    "SUPABASE_URL".into()
}
fn default_key_env() -> String {
    "SUPABASE_KEY".into()
}
fn default_table() -> String {
    "productos".into()
}
fn default_timeout_secs() -> u64 {
    10
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.sitemapgen/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| SitemapError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.sitemapgen/sitemapgen.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| SitemapError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| SitemapError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| SitemapError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| SitemapError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| SitemapError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

// ---------------------------------------------------------------------------
// Credential resolution
// ---------------------------------------------------------------------------

/// Resolved data-source credentials, read from the process environment.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Data-source endpoint (e.g. `https://xyz.supabase.co`).
    pub url: String,
    /// Access key sent with every request.
    pub key: String,
}

/// Resolve the endpoint and key from the env vars named in the config.
///
/// Absence of either is a fatal startup condition: no work happens without
/// a reachable catalog endpoint.
pub fn resolve_credentials(config: &AppConfig) -> Result<Credentials> {
    let url = require_env(&config.catalog.url_env)?;
    let key = require_env(&config.catalog.key_env)?;
    Ok(Credentials { url, key })
}

fn require_env(var_name: &str) -> Result<String> {
    match std::env::var(var_name) {
        Ok(val) if !val.is_empty() => Ok(val),
        _ => Err(SitemapError::config(format!(
            "missing {var_name}. Set the {var_name} environment variable before running."
        ))),
    }
}
