//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use sitemapgen_catalog::CatalogClient;
use sitemapgen_core::pipeline::{GenerateConfig, generate};
use sitemapgen_shared::{AppConfig, init_config, load_config, load_config_from, resolve_credentials};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// sitemapgen — generate the site's sitemap.xml from the product catalog.
#[derive(Parser)]
#[command(
    name = "sitemapgen",
    version,
    about = "Generate a sitemap.xml from the product catalog and fixed page tables.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Fetch the catalog and write the sitemap.
    Generate {
        /// Output path (defaults to the configured `site.output_path`).
        #[arg(short, long)]
        out: Option<String>,

        /// Site origin override (defaults to the configured `site.base_url`).
        #[arg(long)]
        base_url: Option<String>,

        /// Read config from a specific file instead of the default location.
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "sitemapgen=info",
        1 => "sitemapgen=debug",
        _ => "sitemapgen=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Generate {
            out,
            base_url,
            config,
        } => cmd_generate(out.as_deref(), base_url.as_deref(), config.as_deref()).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show().await,
        },
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_generate(
    out: Option<&str>,
    base_url: Option<&str>,
    config_path: Option<&std::path::Path>,
) -> Result<()> {
    let mut config = match config_path {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };

    if let Some(base) = base_url {
        config.site.base_url = base.trim_end_matches('/').to_string();
    }
    if let Some(out) = out {
        config.site.output_path = out.to_string();
    }

    // Credentials are a fatal startup condition: fail before any work
    let credentials = resolve_credentials(&config)?;
    let catalog = CatalogClient::new(&credentials, &config.catalog)?;

    let generate_config = GenerateConfig::from(&config);

    info!(
        base_url = %generate_config.site.base_url,
        output = %generate_config.output_path.display(),
        "generating sitemap"
    );

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    spinner.set_message("Fetching catalog and assembling sitemap");

    let report = generate(&generate_config, &catalog).await?;

    spinner.finish_and_clear();

    // Per-category summary for the invoking process/cron log
    println!();
    println!("  Sitemap written to {}", report.output_path.display());
    println!("  Home:          {}", report.counts.home);
    println!("  Categories:    {}", report.counts.categories);
    println!("  Stores:        {}", report.counts.stores);
    println!("  Products:      {}", report.counts.products);
    println!("  Static pages:  {}", report.counts.static_pages);
    if report.counts.skipped_empty_slug > 0 || report.counts.skipped_duplicates > 0 {
        println!(
            "  Skipped:       {} empty-slug, {} duplicate",
            report.counts.skipped_empty_slug, report.counts.skipped_duplicates
        );
    }
    println!("  Total URLs:    {}", report.total_urls);
    println!("  Time:          {:.1}s", report.elapsed.as_secs_f64());
    println!();

    Ok(())
}

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}
