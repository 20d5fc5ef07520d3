//! Console summary of a run's outcomes, printed in input order.

use rankcart_core::{KeywordOutcome, RunReport, SearchStatus};

pub(crate) fn print_run_summary(report: &RunReport) {
    match report.run_number {
        Some(n) => println!("\nSummary for run {n}:"),
        None => println!("\nSummary:"),
    }
    for set in &report.set_reports {
        println!("\nProduct link: {}", set.product_link);
        for outcome in &set.keyword_outcomes {
            println!("  {}", format_outcome(outcome));
        }
    }
}

fn format_outcome(outcome: &KeywordOutcome) -> String {
    match outcome.status {
        SearchStatus::Found => {
            let position = outcome
                .position
                .map_or_else(|| "?".to_owned(), |p| p.to_string());
            let total = outcome
                .total_products
                .map_or_else(|| "unknown".to_owned(), |t| t.to_string());
            format!(
                "\"{}\": Found at {position}/{total}, Added: {}",
                outcome.keyword, outcome.added_to_cart
            )
        }
        SearchStatus::NotFound => format!("\"{}\": NotFound", outcome.keyword),
        SearchStatus::Error => format!(
            "\"{}\": Error - {}",
            outcome.keyword,
            outcome.error.as_deref().unwrap_or("unknown error")
        ),
    }
}

#[cfg(test)]
mod tests {
    use rankcart_core::MatchCandidate;

    use super::*;

    #[test]
    fn found_outcome_shows_position_total_and_cart() {
        let mut outcome = KeywordOutcome::pending("shoes", "https://t/p-1", Some(1));
        outcome.total_products = Some(120);
        outcome.record_match(&MatchCandidate {
            link: "/x-p-1".to_owned(),
            position: 3,
        });
        outcome.added_to_cart = true;

        assert_eq!(format_outcome(&outcome), "\"shoes\": Found at 3/120, Added: true");
    }

    #[test]
    fn found_with_unknown_total_prints_unknown() {
        let mut outcome = KeywordOutcome::pending("shoes", "https://t/p-1", None);
        outcome.record_match(&MatchCandidate {
            link: "/x-p-1".to_owned(),
            position: 7,
        });

        assert_eq!(
            format_outcome(&outcome),
            "\"shoes\": Found at 7/unknown, Added: false"
        );
    }

    #[test]
    fn not_found_outcome_is_bare() {
        let outcome = KeywordOutcome::pending("shoes", "https://t/p-1", None);
        assert_eq!(format_outcome(&outcome), "\"shoes\": NotFound");
    }

    #[test]
    fn error_outcome_includes_the_message() {
        let mut outcome = KeywordOutcome::pending("shoes", "https://t/p-1", None);
        outcome.record_error("navigation to https://t failed: timed out");

        assert_eq!(
            format_outcome(&outcome),
            "\"shoes\": Error - navigation to https://t failed: timed out"
        );
    }
}
