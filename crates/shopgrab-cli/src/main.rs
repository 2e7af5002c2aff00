use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use shopgrab_core::{AppConfig, ConfigError, Platform};
use shopgrab_scraper::{CdpSessionProvider, ProductScraper, SessionProvider, StaticHtmlProvider};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "shopgrab-cli")]
#[command(about = "Extract product data from e-commerce product pages")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Extract one product page and print the record as JSON.
    Extract {
        #[arg(long)]
        platform: Platform,
        #[arg(long)]
        url: String,
        /// Render from a saved HTML snapshot instead of a live browser.
        #[arg(long)]
        html: Option<PathBuf>,
        /// Also print the per-field outcome report.
        #[arg(long)]
        report: bool,
    },
    /// List supported platform keys.
    Platforms,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let log_level = std::env::var("SHOPGRAB_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(log_level))?;
    // stdout carries the JSON output
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Platforms => {
            for platform in Platform::ALL {
                println!("{platform}");
            }
        }
        Commands::Extract {
            platform,
            url,
            html,
            report,
        } => {
            let (provider, navigation_timeout) =
                session_provider(html.as_deref(), shopgrab_core::load_app_config)?;

            let scraper = ProductScraper::new(provider, navigation_timeout);
            let extraction = scraper.scrape(platform, &url).await?;

            let output = if report {
                serde_json::to_string_pretty(&extraction)?
            } else {
                serde_json::to_string_pretty(&extraction.record)?
            };
            println!("{output}");
        }
    }

    Ok(())
}

/// Snapshots load synchronously, so this only bounds a stuck provider.
const SNAPSHOT_NAVIGATION_TIMEOUT: Duration = Duration::from_secs(10);

/// Picks the page source for `extract`. Browser configuration is only read
/// when a live browser is needed.
fn session_provider<F>(
    html: Option<&Path>,
    load_config: F,
) -> anyhow::Result<(Arc<dyn SessionProvider>, Duration)>
where
    F: FnOnce() -> Result<AppConfig, ConfigError>,
{
    if let Some(path) = html {
        let html = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        tracing::debug!(path = %path.display(), "rendering from saved snapshot");
        return Ok((
            Arc::new(StaticHtmlProvider::new(html)),
            SNAPSHOT_NAVIGATION_TIMEOUT,
        ));
    }

    let config = load_config()?;
    let provider = CdpSessionProvider::new(&config.cdp_endpoint, config.cdp_command_timeout())?;
    Ok((Arc::new(provider), config.navigation_timeout()))
}

#[cfg(test)]
mod tests;
