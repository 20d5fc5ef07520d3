//! Browser capability seam consumed by the locator and pipeline.
//!
//! Everything the core needs from a browser is expressed here as two small
//! traits so the scan/pipeline/orchestration logic runs against scripted
//! in-process drivers in tests. The `chrome` feature provides the real
//! CDP-backed implementation.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::ScraperError;

/// One browser page (tab), scoped to a single keyword's execution.
///
/// All waits carry an explicit timeout and fail with
/// [`ScraperError::WaitTimeout`] once the budget is spent. Read operations
/// used mid-scan (`card_links`, `scroll_by`) may fail transiently; callers
/// in the locator tolerate those failures per its contract.
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Navigate to `url` and wait for the load to settle.
    async fn navigate(&self, url: &str, timeout: Duration) -> Result<(), ScraperError>;

    /// Wait until an element matching `selector` is present.
    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<(), ScraperError>;

    /// Type `text` into the element matching `selector`, focusing it first.
    async fn type_text(&self, selector: &str, text: &str) -> Result<(), ScraperError>;

    /// Press Enter in the focused element and wait for the navigation it
    /// triggers. The two are coupled in one operation: pressing and then
    /// waiting separately races the page load.
    async fn submit_search(&self, timeout: Duration) -> Result<(), ScraperError>;

    /// Click the element matching `selector`.
    async fn click(&self, selector: &str) -> Result<(), ScraperError>;

    /// The href of each result card's first anchor, in DOM order. Cards
    /// without an anchor still occupy their slot as `None` — positions are
    /// assigned over all cards, not just linked ones.
    async fn card_links(&self, selector: &str) -> Result<Vec<Option<String>>, ScraperError>;

    /// Text content of the first element matching `selector`, or `None`
    /// when no such element exists.
    async fn inner_text(&self, selector: &str) -> Result<Option<String>, ScraperError>;

    /// Current scrollable content height in pixels.
    async fn scroll_height(&self) -> Result<u64, ScraperError>;

    /// Scroll the page down by `px` pixels.
    async fn scroll_by(&self, px: u64) -> Result<(), ScraperError>;

    /// Whether the page has been closed out from under us.
    async fn is_closed(&self) -> bool;

    /// Release the page. Errors are worth logging but never fatal.
    async fn close(&self) -> Result<(), ScraperError>;
}

/// Source of isolated pages, one per keyword.
///
/// A failure here means the browser session itself is unusable — callers
/// treat it as fatal rather than as a per-keyword error.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    type Page: PageDriver;

    async fn open_page(&self) -> Result<Self::Page, ScraperError>;
}
