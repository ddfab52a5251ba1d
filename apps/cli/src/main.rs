//! sitemapgen CLI — scheduled sitemap generator for the price-comparison
//! site.
//!
//! Reads the product catalog, derives URL entries for every logical page,
//! and writes the sitemap XML for the web server to serve statically.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
