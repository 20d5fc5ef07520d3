//! Input domain types: the products to look for and the keywords to try.

use serde::{Deserialize, Serialize};

/// A product link together with the marketplace identifier extracted from it.
///
/// `extracted_id` is the site-specific product identifier pulled out of
/// `raw_link` (e.g. `p-123456` on Trendyol). `None` means the link carried
/// no recognizable identifier; pipelines must fail such items fast without
/// touching the browser.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetSpec {
    pub raw_link: String,
    pub extracted_id: Option<String>,
}

/// One product to search for, tried independently against each keyword.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSet {
    pub target: TargetSpec,
    pub keywords: Vec<String>,
}
