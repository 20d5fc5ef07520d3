//! Report persistence: one JSON document per run, plus a partial variant
//! written when a run aborts.

use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use rankcart_core::{PartialReport, RunReport};

/// Destination for finished (and aborted) run reports.
///
/// The orchestrator emits through this seam so tests can record reports
/// in memory instead of touching the filesystem.
#[async_trait]
pub(crate) trait ReportSink: Send + Sync {
    async fn emit(&self, report: &RunReport) -> anyhow::Result<()>;
    async fn emit_partial(&self, partial: &PartialReport) -> anyhow::Result<()>;
}

/// Writes reports as pretty-printed JSON files:
/// `{prefix}_report_run_{n}_{timestamp}.json` for completed runs and
/// `{prefix}_report_partial_{timestamp}.json` on fatal failure. Timestamps
/// are ISO-8601 with `:` and `.` replaced so the name is filesystem-safe
/// everywhere.
pub(crate) struct FileReportSink {
    dir: PathBuf,
    prefix: String,
}

impl FileReportSink {
    pub(crate) fn new(dir: PathBuf, prefix: &str) -> Self {
        Self {
            dir,
            prefix: prefix.to_owned(),
        }
    }

    fn timestamp_slug(timestamp: &DateTime<Utc>) -> String {
        timestamp.format("%Y-%m-%dT%H-%M-%S-%3fZ").to_string()
    }

    fn run_path(&self, report: &RunReport) -> PathBuf {
        let slug = Self::timestamp_slug(&report.timestamp);
        let name = match report.run_number {
            Some(n) => format!("{}_report_run_{n}_{slug}.json", self.prefix),
            None => format!("{}_report_{slug}.json", self.prefix),
        };
        self.dir.join(name)
    }

    fn partial_path(&self) -> PathBuf {
        let slug = Self::timestamp_slug(&Utc::now());
        self.dir.join(format!("{}_report_partial_{slug}.json", self.prefix))
    }

    async fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
        let json = serde_json::to_vec_pretty(value).context("serializing report")?;
        tokio::fs::write(path, json)
            .await
            .with_context(|| format!("writing report to {}", path.display()))?;
        Ok(())
    }
}

#[async_trait]
impl ReportSink for FileReportSink {
    async fn emit(&self, report: &RunReport) -> anyhow::Result<()> {
        let path = self.run_path(report);
        Self::write_json(&path, report).await?;
        tracing::info!(path = %path.display(), run = ?report.run_number, "run report saved");
        Ok(())
    }

    async fn emit_partial(&self, partial: &PartialReport) -> anyhow::Result<()> {
        let path = self.partial_path();
        Self::write_json(&path, partial).await?;
        tracing::warn!(path = %path.display(), "partial report saved");
        Ok(())
    }
}

#[cfg(test)]
#[path = "report_test.rs"]
mod tests;
