//! Product-set collection: interactive prompts or a JSON input file.
//!
//! Both paths produce the same ordered `Vec<ProductSet>`; sets with no
//! keywords are dropped. Product-ID extraction happens here so a bad link
//! is visible in the collected data, but it does not reject the set — the
//! pipeline reports it as that keyword's error.

use std::path::Path;

use anyhow::Context;
use dialoguer::{theme::ColorfulTheme, Confirm, Input};
use serde::Deserialize;

use rankcart_core::ProductSet;
use rankcart_scraper::SiteProfile;

/// On-disk shape of one product set in a `--input` file.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSet {
    target_link: String,
    #[serde(default)]
    keywords: Vec<String>,
}

/// Load product sets from a JSON file: an array of
/// `{"targetLink": "...", "keywords": ["...", ...]}` objects.
///
/// # Errors
///
/// Returns an error when the file cannot be read or is not valid JSON of
/// the expected shape.
pub(crate) fn load_sets_from_file(
    path: &Path,
    site: &SiteProfile,
) -> anyhow::Result<Vec<ProductSet>> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("reading input file {}", path.display()))?;
    parse_sets(&data, site).with_context(|| format!("parsing input file {}", path.display()))
}

fn parse_sets(json: &str, site: &SiteProfile) -> anyhow::Result<Vec<ProductSet>> {
    let raw: Vec<RawSet> = serde_json::from_str(json)?;
    Ok(raw
        .into_iter()
        .filter(|set| {
            if set.keywords.is_empty() {
                tracing::warn!(target = %set.target_link, "skipping set with no keywords");
                false
            } else {
                true
            }
        })
        .map(|set| ProductSet {
            target: site.target_spec(&set.target_link),
            keywords: set.keywords,
        })
        .collect())
}

/// Collect product sets interactively: a product link, keywords one per
/// line until an empty line, then a yes/no continuation prompt.
///
/// # Errors
///
/// Returns an error when the terminal interaction fails (e.g. stdin
/// closed).
pub(crate) fn collect_sets_interactively(site: &SiteProfile) -> anyhow::Result<Vec<ProductSet>> {
    let theme = ColorfulTheme::default();
    let mut sets = Vec::new();

    loop {
        println!("\n--- New product set ---");
        let target_link: String = Input::with_theme(&theme)
            .with_prompt("Product link")
            .interact_text()?;

        println!("Keywords, one per line (empty line to finish):");
        let mut keywords = Vec::new();
        loop {
            let line: String = Input::with_theme(&theme)
                .with_prompt(">")
                .allow_empty(true)
                .interact_text()?;
            let line = line.trim().to_owned();
            if line.is_empty() {
                break;
            }
            keywords.push(line);
        }

        if keywords.is_empty() {
            println!("No keywords entered; set dropped.");
        } else {
            sets.push(ProductSet {
                target: site.target_spec(target_link.trim()),
                keywords,
            });
        }

        let more = Confirm::with_theme(&theme)
            .with_prompt("Add another product set?")
            .default(false)
            .interact()?;
        if !more {
            break;
        }
    }

    Ok(sets)
}
