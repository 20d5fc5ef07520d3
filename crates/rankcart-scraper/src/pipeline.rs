//! One (keyword, target) attempt, end to end: search, scan, add to cart.
//!
//! [`run_keyword`] never fails — every failure is captured into the
//! returned [`KeywordOutcome`] so a single bad keyword cannot abort the
//! run it belongs to.

use std::time::Duration;

use rankcart_core::{AppConfig, KeywordOutcome, TargetSpec};

use crate::driver::PageDriver;
use crate::error::ScraperError;
use crate::locator::{locate_product, ScrollConfig};
use crate::site::{parse_total_count, SiteProfile};

/// Timeouts and pacing for one keyword attempt.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Budget for page navigations (home, product page).
    pub nav_timeout: Duration,
    /// Budget for waiting on the search input and result cards.
    pub element_timeout: Duration,
    /// Budget for the add-to-cart control to appear.
    pub cart_timeout: Duration,
    /// Pause after clicking add-to-cart for the action to register.
    pub cart_settle: Duration,
    pub scroll: ScrollConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            nav_timeout: Duration::from_secs(90),
            element_timeout: Duration::from_secs(60),
            cart_timeout: Duration::from_secs(30),
            cart_settle: Duration::from_millis(5000),
            scroll: ScrollConfig::default(),
        }
    }
}

impl PipelineConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            nav_timeout: Duration::from_secs(config.nav_timeout_secs),
            element_timeout: Duration::from_secs(config.element_timeout_secs),
            cart_timeout: Duration::from_secs(config.cart_timeout_secs),
            cart_settle: Duration::from_millis(config.cart_settle_ms),
            scroll: ScrollConfig::from_app_config(config),
        }
    }
}

/// Run one keyword against one target product on `driver`.
///
/// Searches the marketplace for `keyword`, scans the results for the
/// target, and adds it to the cart when found. Progress (advertised total,
/// match position) is recorded into the outcome as it becomes known, so a
/// failure partway through still reports everything observed before it.
///
/// An invalid target link (no extractable product ID) fails immediately
/// without touching the driver. A target absent from the results is a
/// `NotFound` outcome, not an error.
pub async fn run_keyword<D: PageDriver>(
    driver: &D,
    site: &SiteProfile,
    keyword: &str,
    target: &TargetSpec,
    run_number: Option<u32>,
    config: &PipelineConfig,
) -> KeywordOutcome {
    let mut outcome = KeywordOutcome::pending(keyword, &target.raw_link, run_number);
    if let Err(e) = drive_keyword(driver, site, keyword, target, config, &mut outcome).await {
        tracing::warn!(keyword, run = ?run_number, error = %e, "keyword attempt failed");
        outcome.record_error(e.to_string());
    }
    outcome
}

/// The fallible steps of one keyword attempt. Writes observations into
/// `outcome` as they happen; the caller converts any error into the
/// outcome's terminal `Error` state.
async fn drive_keyword<D: PageDriver>(
    driver: &D,
    site: &SiteProfile,
    keyword: &str,
    target: &TargetSpec,
    config: &PipelineConfig,
    outcome: &mut KeywordOutcome,
) -> Result<(), ScraperError> {
    let target_id = target
        .extracted_id
        .as_deref()
        .ok_or_else(|| ScraperError::InvalidTargetLink {
            link: target.raw_link.clone(),
        })?;

    tracing::info!(keyword, target_id, site = site.name, "searching for target product");

    driver.navigate(site.home_url, config.nav_timeout).await?;
    driver
        .wait_for(site.search_input_selector, config.element_timeout)
        .await?;
    driver
        .type_text(site.search_input_selector, keyword)
        .await?;
    driver.submit_search(config.nav_timeout).await?;
    driver
        .wait_for(site.card_selector, config.element_timeout)
        .await?;

    // The advertised count is advisory: a missing summary element or a
    // failed read both mean "unknown", never an error.
    let total = match driver.inner_text(site.total_count_selector).await {
        Ok(Some(text)) => parse_total_count(&text),
        Ok(None) | Err(_) => None,
    };
    outcome.total_products = total;
    tracing::debug!(keyword, total = ?total, "advertised result count");

    let Some(candidate) =
        locate_product(driver, site.card_selector, target_id, total, &config.scroll).await?
    else {
        // `pending` already reads as NotFound with no error.
        return Ok(());
    };
    outcome.record_match(&candidate);

    let product_url = site.resolve_link(&candidate.link);
    driver.navigate(&product_url, config.nav_timeout).await?;
    driver
        .wait_for(site.add_to_cart_selector, config.cart_timeout)
        .await?;
    driver.click(site.add_to_cart_selector).await?;
    tokio::time::sleep(config.cart_settle).await;
    outcome.added_to_cart = true;
    tracing::info!(keyword, position = candidate.position, "added to cart");

    Ok(())
}
