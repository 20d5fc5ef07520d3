//! Marketplace profiles: selectors, URL shapes, and product-ID patterns.
//!
//! Each supported marketplace drives the same search → scan → cart flow;
//! only the DOM details differ. Selectors are the storefront's generated
//! class names and break when the site ships a new frontend build — keep
//! them current here rather than scattering them through the pipeline.

use regex::Regex;

use rankcart_core::TargetSpec;

/// Supported marketplaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marketplace {
    Trendyol,
    Hepsiburada,
}

impl Marketplace {
    #[must_use]
    pub fn profile(self) -> SiteProfile {
        match self {
            Marketplace::Trendyol => SiteProfile::trendyol(),
            Marketplace::Hepsiburada => SiteProfile::hepsiburada(),
        }
    }
}

impl std::fmt::Display for Marketplace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Marketplace::Trendyol => write!(f, "trendyol"),
            Marketplace::Hepsiburada => write!(f, "hepsiburada"),
        }
    }
}

/// Everything site-specific the pipeline needs for one marketplace.
pub struct SiteProfile {
    /// Lowercase marketplace name, used for report filename prefixes.
    pub name: &'static str,
    /// Site origin, also the page the search starts from.
    pub home_url: &'static str,
    /// Search box the keyword is typed into.
    pub search_input_selector: &'static str,
    /// One result card in the search results.
    pub card_selector: &'static str,
    /// Element whose text carries the advertised total result count.
    pub total_count_selector: &'static str,
    /// The add-to-cart control on a product page.
    pub add_to_cart_selector: &'static str,
    id_pattern: Regex,
}

impl SiteProfile {
    #[must_use]
    pub fn trendyol() -> Self {
        Self {
            name: "trendyol",
            home_url: "https://www.trendyol.com/",
            search_input_selector: r#"input[class*="V8wbcUhU"]"#,
            card_selector: "div.p-card-chldrn-cntnr.card-border",
            total_count_selector: ".dscrptn.dscrptn-V2 h2",
            add_to_cart_selector: ".add-to-basket",
            id_pattern: Regex::new(r"p-\d+").expect("valid regex"),
        }
    }

    #[must_use]
    pub fn hepsiburada() -> Self {
        Self {
            name: "hepsiburada",
            home_url: "https://www.hepsiburada.com/",
            search_input_selector: ".initialComponent-z0s572PM2ZR4NUXqD_iB",
            card_selector: "article.productCard-VQtVQDmG__hermiOJr6T",
            total_count_selector: ".searchResultSummary span",
            add_to_cart_selector: r#"button[data-test-id="addToCart"]"#,
            id_pattern: Regex::new(r"pm-HB[A-Z0-9]+").expect("valid regex"),
        }
    }

    /// Extract this marketplace's product identifier from a link, e.g.
    /// `p-123456` from a Trendyol URL or `pm-HBC00007V1CYR` from a
    /// Hepsiburada one.
    #[must_use]
    pub fn extract_product_id(&self, link: &str) -> Option<String> {
        self.id_pattern.find(link).map(|m| m.as_str().to_owned())
    }

    /// Build a [`TargetSpec`] for a raw product link. `extracted_id` is
    /// `None` when the link carries no recognizable identifier.
    #[must_use]
    pub fn target_spec(&self, raw_link: &str) -> TargetSpec {
        TargetSpec {
            raw_link: raw_link.to_owned(),
            extracted_id: self.extract_product_id(raw_link),
        }
    }

    /// Resolve a result-card href to a navigable URL. Cards carry
    /// site-relative hrefs; absolute ones pass through untouched.
    #[must_use]
    pub fn resolve_link(&self, href: &str) -> String {
        if href.starts_with("http://") || href.starts_with("https://") {
            href.to_owned()
        } else {
            let origin = self.home_url.trim_end_matches('/');
            format!("{origin}{href}")
        }
    }
}

/// Pull the advertised result count out of a summary element's text.
///
/// Returns the first run of digits, e.g. `Some(1234)` from
/// `"ayakkabı için 1234 sonuç"`. `None` when the text holds no digits.
#[must_use]
pub fn parse_total_count(text: &str) -> Option<u64> {
    let re = Regex::new(r"\d+").expect("valid regex");
    re.find(text).and_then(|m| m.as_str().parse::<u64>().ok())
}
