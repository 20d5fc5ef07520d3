//! Report types accumulated over a run and persisted as JSON.
//!
//! Field names serialize in camelCase so the on-disk reports keep the shape
//! downstream consumers already parse (`targetLink`, `totalProducts`,
//! `addedToCart`, ...).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A result card observed in the search results.
///
/// `position` is 1-based, assigned by enumeration order of the cards loaded
/// at observation time — it approximates on-page ranking and is not stable
/// across reloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchCandidate {
    pub link: String,
    pub position: u64,
}

/// Terminal state of a single keyword search.
///
/// `NotFound` is a valid outcome, not a failure: the result set was
/// exhausted (or the scan ceiling hit) without the target appearing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchStatus {
    Found,
    NotFound,
    Error,
}

/// Everything recorded about one (keyword, target) attempt.
///
/// Invariants, preserved by the constructors and by the pipeline:
/// `status == Found` exactly when `position` is set; `added_to_cart`
/// implies `Found`; `NotFound` never carries an `error` message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordOutcome {
    pub keyword: String,
    pub target_link: String,
    pub status: SearchStatus,
    pub position: Option<u64>,
    pub total_products: Option<u64>,
    pub added_to_cart: bool,
    pub error: Option<String>,
    pub run_number: Option<u32>,
}

impl KeywordOutcome {
    /// An outcome in its initial state: nothing observed yet, status
    /// `NotFound`. The pipeline upgrades it as steps complete, so a failure
    /// at any point leaves whatever was already known intact.
    #[must_use]
    pub fn pending(keyword: &str, target_link: &str, run_number: Option<u32>) -> Self {
        Self {
            keyword: keyword.to_owned(),
            target_link: target_link.to_owned(),
            status: SearchStatus::NotFound,
            position: None,
            total_products: None,
            added_to_cart: false,
            error: None,
            run_number,
        }
    }

    /// Marks the outcome failed, preserving position/total observed so far.
    pub fn record_error(&mut self, message: impl Into<String>) {
        self.status = SearchStatus::Error;
        self.error = Some(message.into());
        self.added_to_cart = false;
    }

    /// Records a located candidate: status becomes `Found` and the 1-based
    /// position is retained even if a later step fails.
    pub fn record_match(&mut self, candidate: &MatchCandidate) {
        self.status = SearchStatus::Found;
        self.position = Some(candidate.position);
    }
}

/// Outcomes for every keyword tried against one product, in input order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetReport {
    pub product_link: String,
    pub keyword_outcomes: Vec<KeywordOutcome>,
}

/// All results of a single run, in strict input order.
///
/// Created when the run starts, appended to as keywords complete, and
/// handed to the report sink at run end — or earlier, wrapped in a
/// [`PartialReport`], when a fatal error aborts the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub timestamp: DateTime<Utc>,
    pub run_number: Option<u32>,
    pub set_reports: Vec<SetReport>,
}

impl RunReport {
    #[must_use]
    pub fn new(run_number: Option<u32>) -> Self {
        Self {
            timestamp: Utc::now(),
            run_number,
            set_reports: Vec::new(),
        }
    }
}

/// The partial variant persisted when a run aborts: whatever accumulated,
/// plus the triggering error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialReport {
    pub error: String,
    pub run_report: RunReport,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_outcome_starts_not_found_with_nothing_observed() {
        let outcome = KeywordOutcome::pending("shoes", "https://example.com/p-1", Some(3));
        assert_eq!(outcome.status, SearchStatus::NotFound);
        assert!(outcome.position.is_none());
        assert!(outcome.total_products.is_none());
        assert!(!outcome.added_to_cart);
        assert!(outcome.error.is_none());
        assert_eq!(outcome.run_number, Some(3));
    }

    #[test]
    fn record_match_sets_found_and_position() {
        let mut outcome = KeywordOutcome::pending("shoes", "https://example.com/p-1", None);
        outcome.record_match(&MatchCandidate {
            link: "/item-p-1".to_owned(),
            position: 7,
        });
        assert_eq!(outcome.status, SearchStatus::Found);
        assert_eq!(outcome.position, Some(7));
    }

    #[test]
    fn record_error_after_match_keeps_position() {
        let mut outcome = KeywordOutcome::pending("shoes", "https://example.com/p-1", None);
        outcome.total_products = Some(120);
        outcome.record_match(&MatchCandidate {
            link: "/item-p-1".to_owned(),
            position: 2,
        });
        outcome.record_error("cart control never appeared");

        assert_eq!(outcome.status, SearchStatus::Error);
        assert_eq!(outcome.position, Some(2));
        assert_eq!(outcome.total_products, Some(120));
        assert!(!outcome.added_to_cart);
        assert!(outcome.error.is_some());
    }

    #[test]
    fn outcome_serializes_with_camel_case_field_names() {
        let outcome = KeywordOutcome {
            keyword: "shoes".to_owned(),
            target_link: "https://example.com/p-1".to_owned(),
            status: SearchStatus::Found,
            position: Some(2),
            total_products: Some(120),
            added_to_cart: true,
            error: None,
            run_number: Some(1),
        };
        let json = serde_json::to_value(&outcome).expect("serialization should succeed");

        assert_eq!(json["targetLink"], "https://example.com/p-1");
        assert_eq!(json["status"], "Found");
        assert_eq!(json["totalProducts"], 120);
        assert_eq!(json["addedToCart"], true);
        assert_eq!(json["runNumber"], 1);
    }

    #[test]
    fn run_report_round_trips_through_json() {
        let mut report = RunReport::new(Some(2));
        report.set_reports.push(SetReport {
            product_link: "https://example.com/p-9".to_owned(),
            keyword_outcomes: vec![KeywordOutcome::pending(
                "boots",
                "https://example.com/p-9",
                Some(2),
            )],
        });

        let json = serde_json::to_string(&report).expect("serialize");
        let back: RunReport = serde_json::from_str(&json).expect("deserialize");

        assert_eq!(back.run_number, Some(2));
        assert_eq!(back.set_reports.len(), 1);
        assert_eq!(back.set_reports[0].keyword_outcomes[0].keyword, "boots");
    }
}
