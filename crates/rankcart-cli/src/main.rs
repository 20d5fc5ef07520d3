mod input;
mod report;
mod runner;
mod summary;

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use rankcart_scraper::Marketplace;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SiteArg {
    Trendyol,
    Hepsiburada,
}

impl From<SiteArg> for Marketplace {
    fn from(site: SiteArg) -> Self {
        match site {
            SiteArg::Trendyol => Marketplace::Trendyol,
            SiteArg::Hepsiburada => Marketplace::Hepsiburada,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "rankcart")]
#[command(about = "Checks where a product ranks in marketplace search results and adds it to the cart")]
struct Cli {
    /// Marketplace to run against
    #[arg(long, value_enum, default_value = "trendyol")]
    site: SiteArg,

    /// Number of independent runs over the full input
    #[arg(long, default_value_t = 1)]
    runs: u32,

    /// JSON file with product sets; prompts interactively when omitted
    #[arg(long)]
    input: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = rankcart_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    anyhow::ensure!(cli.runs >= 1, "--runs must be at least 1");

    let site = Marketplace::from(cli.site).profile();

    let sets = match &cli.input {
        Some(path) => input::load_sets_from_file(path, &site)?,
        None => input::collect_sets_interactively(&site)?,
    };
    if sets.is_empty() {
        println!("No inputs provided. Exiting.");
        return Ok(());
    }

    run(&cli, &config, &site, &sets).await
}

#[cfg(feature = "chrome")]
async fn run(
    cli: &Cli,
    config: &rankcart_core::AppConfig,
    site: &rankcart_scraper::SiteProfile,
    sets: &[rankcart_core::ProductSet],
) -> anyhow::Result<()> {
    use anyhow::Context;

    let browser = rankcart_scraper::ChromeBrowser::launch()
        .await
        .context("failed to launch browser")?;

    let sink = report::FileReportSink::new(config.report_dir.clone(), site.name);
    let pipeline_config = rankcart_scraper::PipelineConfig::from_app_config(config);

    let result = runner::execute_runs(&browser, site, sets, cli.runs, &pipeline_config, &sink).await;

    if let Err(e) = browser.shutdown().await {
        tracing::warn!(error = %e, "browser did not shut down cleanly");
    }

    let reports = result?;
    tracing::info!(runs = reports.len(), "all runs completed");
    Ok(())
}

#[cfg(not(feature = "chrome"))]
async fn run(
    _cli: &Cli,
    _config: &rankcart_core::AppConfig,
    _site: &rankcart_scraper::SiteProfile,
    _sets: &[rankcart_core::ProductSet],
) -> anyhow::Result<()> {
    anyhow::bail!("built without browser support; rebuild with `--features chrome`")
}
