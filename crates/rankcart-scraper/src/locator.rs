//! Incremental discovery of a target product in a lazily-loaded result list.
//!
//! Search pages render a window of result cards and mount more as the page
//! scrolls. [`locate_product`] polls the currently-rendered cards, scrolls a
//! fixed step when the target is not yet visible, and stops on the first of:
//! a match, the advertised result count being fully loaded, the scan ceiling,
//! or the content height stalling at the bottom of the page.
//!
//! Termination logic lives in [`ScanState`], a pure state machine with no
//! driver access, so every stop condition is unit-testable without a
//! browser; the async loop around it only reads the DOM, scrolls, and
//! sleeps.

use std::time::Duration;

use rankcart_core::{AppConfig, MatchCandidate};

use crate::driver::PageDriver;
use crate::error::ScraperError;

/// Tuning knobs for the scan loop. Defaults match the values the scan was
/// calibrated with: 500px steps, 2s settle, 500-card ceiling.
#[derive(Debug, Clone)]
pub struct ScrollConfig {
    /// Pause after each scroll before the next DOM read. Paces requests and
    /// gives lazy-loaded cards time to mount.
    pub settle_delay: Duration,
    /// Pixels scrolled per iteration.
    pub scroll_step_px: u64,
    /// Hard ceiling on cards examined; bounds scan cost when the result set
    /// is huge or the advertised total is missing.
    pub max_cards: u64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_millis(2000),
            scroll_step_px: 500,
            max_cards: 500,
        }
    }
}

impl ScrollConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            settle_delay: Duration::from_millis(config.settle_delay_ms),
            scroll_step_px: config.scroll_step_px,
            max_cards: config.max_cards_to_scan,
        }
    }
}

/// What one poll of the rendered cards concluded.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Verdict {
    /// Target found; scanning stops immediately, no further scrolling.
    Match(MatchCandidate),
    /// Every advertised result is loaded and none matched.
    Exhausted { loaded: u64 },
    /// The scan ceiling was reached without a match.
    CeilingReached { loaded: u64 },
    /// Unknown total and the content height stopped growing at the bottom
    /// for two consecutive polls.
    HeightStalled { loaded: u64 },
    /// Keep scrolling.
    Continue,
}

/// Pure termination logic for the scan loop.
///
/// Fed one observation per poll (`assess`), told about each scroll advance
/// (`advance`). Conditions are checked in priority order: match, advertised
/// total exhausted, ceiling, height stall.
struct ScanState {
    total_known: Option<u64>,
    max_cards: u64,
    scroll_offset: u64,
    last_height: u64,
    stalled_polls: u8,
}

impl ScanState {
    fn new(total_known: Option<u64>, max_cards: u64) -> Self {
        Self {
            total_known,
            max_cards,
            scroll_offset: 0,
            last_height: 0,
            stalled_polls: 0,
        }
    }

    fn assess(&mut self, cards: &[Option<String>], target_id: &str, height: u64) -> Verdict {
        let loaded = cards.len() as u64;

        // Positions are assigned over all rendered cards, linked or not, so
        // a card without an anchor still occupies its slot. Only cards
        // within the ceiling are eligible to match — a candidate beyond it
        // must never be returned.
        let eligible = cards.iter().take(self.max_cards as usize);
        for (index, link) in eligible.enumerate() {
            if let Some(link) = link {
                if link.contains(target_id) {
                    return Verdict::Match(MatchCandidate {
                        link: link.clone(),
                        position: index as u64 + 1,
                    });
                }
            }
        }

        if let Some(total) = self.total_known {
            if loaded >= total {
                return Verdict::Exhausted { loaded };
            }
        }

        if loaded >= self.max_cards {
            return Verdict::CeilingReached { loaded };
        }

        if self.total_known.is_none() {
            // Stall detection: we are at the bottom and the height did not
            // grow since the last poll. One stalled poll can be a lazy
            // loader that has not mounted yet, so two consecutive stalls
            // are required before giving up.
            let grew = height > self.last_height;
            let bottomed = self.scroll_offset >= height;
            if bottomed && !grew {
                self.stalled_polls += 1;
            } else {
                self.stalled_polls = 0;
            }
            self.last_height = height;
            if self.stalled_polls >= 2 {
                return Verdict::HeightStalled { loaded };
            }
        }

        Verdict::Continue
    }

    fn advance(&mut self, step: u64) {
        self.scroll_offset = self.scroll_offset.saturating_add(step);
    }
}

/// Scroll through the search results until the target product appears or
/// the result set is provably exhausted.
///
/// `target_id` matches by substring containment against each card's link;
/// the first match in DOM order wins. `total_known` is the advertised
/// result count when the page showed one.
///
/// Returns `Ok(None)` when the target is definitively absent — that is a
/// valid terminal state, not an error. Card-read failures during a poll are
/// treated as zero cards for that iteration; a transient rendering error
/// must not abort the scan.
///
/// # Errors
///
/// Returns [`ScraperError::DriverClosed`] when the page has been closed,
/// and propagates height-read failures.
pub async fn locate_product<D: PageDriver>(
    driver: &D,
    card_selector: &str,
    target_id: &str,
    total_known: Option<u64>,
    config: &ScrollConfig,
) -> Result<Option<MatchCandidate>, ScraperError> {
    let mut state = ScanState::new(total_known, config.max_cards);

    loop {
        if driver.is_closed().await {
            return Err(ScraperError::DriverClosed);
        }

        let cards = driver.card_links(card_selector).await.unwrap_or_default();
        let height = driver.scroll_height().await?;

        match state.assess(&cards, target_id, height) {
            Verdict::Match(candidate) => {
                tracing::info!(
                    target_id,
                    position = candidate.position,
                    loaded = cards.len(),
                    "target product found"
                );
                return Ok(Some(candidate));
            }
            Verdict::Exhausted { loaded } => {
                tracing::info!(target_id, loaded, "all advertised results loaded, target absent");
                return Ok(None);
            }
            Verdict::CeilingReached { loaded } => {
                tracing::info!(target_id, loaded, "scan ceiling reached, target absent");
                return Ok(None);
            }
            Verdict::HeightStalled { loaded } => {
                tracing::info!(target_id, loaded, "content height stalled, target absent");
                return Ok(None);
            }
            Verdict::Continue => {
                tracing::debug!(
                    target_id,
                    loaded = cards.len(),
                    total = ?total_known,
                    "target not yet visible, scrolling"
                );
                // A failed scroll nudge is recoverable; the next poll sees
                // whatever actually rendered.
                driver.scroll_by(config.scroll_step_px).await.ok();
                state.advance(config.scroll_step_px);
                tokio::time::sleep(config.settle_delay).await;
            }
        }
    }
}

#[cfg(test)]
#[path = "locator_test.rs"]
mod tests;
