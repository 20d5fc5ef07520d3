use std::path::PathBuf;

/// Application configuration, loaded from `RANKCART_*` environment variables.
///
/// Every field has a default, so an empty environment yields a working
/// configuration. The scroll/settle knobs trade pacing against detection
/// risk and poll count — see the field docs.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Default tracing filter when `RUST_LOG` is not set.
    pub log_level: String,
    /// Directory run reports are written into.
    pub report_dir: PathBuf,
    /// Delay after each scroll nudge before the next DOM read, in
    /// milliseconds. Longer delays give lazy-loaded results time to mount
    /// and keep request pacing below anti-bot thresholds; shorter delays
    /// finish scans faster.
    pub settle_delay_ms: u64,
    /// Pixels scrolled per poll iteration. Smaller steps reveal results in
    /// finer increments at the cost of more polls.
    pub scroll_step_px: u64,
    /// Hard ceiling on result cards examined per keyword. Bounds scan cost
    /// on unusually large result sets.
    pub max_cards_to_scan: u64,
    /// Page navigation timeout, in seconds.
    pub nav_timeout_secs: u64,
    /// Timeout for waiting on page elements (search input, result cards),
    /// in seconds.
    pub element_timeout_secs: u64,
    /// Timeout for the add-to-cart control to appear, in seconds.
    pub cart_timeout_secs: u64,
    /// Delay after clicking add-to-cart for the action to register, in
    /// milliseconds.
    pub cart_settle_ms: u64,
}
