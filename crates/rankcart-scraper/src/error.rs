use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("timed out after {timeout_ms}ms waiting for \"{selector}\"")]
    WaitTimeout { selector: String, timeout_ms: u64 },

    #[error("{action} on \"{selector}\" failed: {reason}")]
    Interaction {
        action: &'static str,
        selector: String,
        reason: String,
    },

    #[error("in-page evaluation failed: {reason}")]
    Evaluate { reason: String },

    #[error("page is closed")]
    DriverClosed,

    #[error("invalid product link \"{link}\": no product ID found")]
    InvalidTargetLink { link: String },

    #[error("browser session unavailable: {reason}")]
    Session { reason: String },
}
