//! Run orchestration: sequences the keyword pipeline over every product
//! set, for one or more independent runs.
//!
//! A keyword failure never aborts its run — the pipeline converts it into
//! that keyword's outcome. A fatal failure (the browser session itself is
//! unusable, or a report cannot be persisted) aborts everything, but the
//! accumulated partial report is persisted first.

use anyhow::Context;

use rankcart_core::{PartialReport, ProductSet, RunReport, SetReport};
use rankcart_scraper::{run_keyword, PageDriver, PipelineConfig, SessionFactory, SiteProfile};

use crate::report::ReportSink;
use crate::summary;

/// Execute `run_count` sequential runs over `sets`, emitting one report
/// per completed run and returning them all.
///
/// Keywords within a set, sets within a run, and runs themselves execute
/// and report in strict input order. Each keyword gets a fresh page from
/// `factory`, closed when the keyword finishes regardless of its outcome.
///
/// # Errors
///
/// Returns an error only for fatal conditions (no page can be opened, or
/// a completed report cannot be persisted); the partial report is emitted
/// best-effort before returning.
pub(crate) async fn execute_runs<F, S>(
    factory: &F,
    site: &SiteProfile,
    sets: &[ProductSet],
    run_count: u32,
    config: &PipelineConfig,
    sink: &S,
) -> anyhow::Result<Vec<RunReport>>
where
    F: SessionFactory,
    S: ReportSink,
{
    let mut reports = Vec::with_capacity(run_count as usize);

    for run in 1..=run_count {
        tracing::info!(run, run_count, "starting run");
        let mut report = RunReport::new(Some(run));

        if let Err(fatal) = execute_one_run(factory, site, sets, config, &mut report).await {
            emit_partial_best_effort(sink, &report, &fatal).await;
            return Err(fatal.context(format!("run {run} aborted")));
        }

        summary::print_run_summary(&report);

        if let Err(fatal) = sink.emit(&report).await {
            emit_partial_best_effort(sink, &report, &fatal).await;
            return Err(fatal.context(format!("persisting report for run {run}")));
        }

        reports.push(report);
    }

    Ok(reports)
}

async fn execute_one_run<F>(
    factory: &F,
    site: &SiteProfile,
    sets: &[ProductSet],
    config: &PipelineConfig,
    report: &mut RunReport,
) -> anyhow::Result<()>
where
    F: SessionFactory,
{
    for set in sets {
        tracing::info!(product = %set.target.raw_link, "processing product set");
        let mut set_report = SetReport {
            product_link: set.target.raw_link.clone(),
            keyword_outcomes: Vec::new(),
        };

        for keyword in &set.keywords {
            let page = factory
                .open_page()
                .await
                .context("browser session unusable, cannot open a page")?;

            // run_keyword never fails, so the page is closed on every path.
            let outcome =
                run_keyword(&page, site, keyword, &set.target, report.run_number, config).await;

            if let Err(e) = page.close().await {
                tracing::warn!(keyword, error = %e, "failed to close page after keyword");
            }

            set_report.keyword_outcomes.push(outcome);
        }

        report.set_reports.push(set_report);
    }

    Ok(())
}

async fn emit_partial_best_effort<S: ReportSink>(
    sink: &S,
    report: &RunReport,
    error: &anyhow::Error,
) {
    let partial = PartialReport {
        error: format!("{error:#}"),
        run_report: report.clone(),
    };
    if let Err(e) = sink.emit_partial(&partial).await {
        tracing::error!(error = %e, "failed to persist partial report");
    }
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
