#[cfg(feature = "chrome")]
pub mod chrome;
pub mod driver;
pub mod error;
pub mod locator;
pub mod pipeline;
pub mod site;

#[cfg(feature = "chrome")]
pub use chrome::ChromeBrowser;
pub use driver::{PageDriver, SessionFactory};
pub use error::ScraperError;
pub use locator::{locate_product, ScrollConfig};
pub use pipeline::{run_keyword, PipelineConfig};
pub use site::{Marketplace, SiteProfile};
