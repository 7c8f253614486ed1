//! Report file output

use crate::reporting::model::BatchReport;
use crate::reporting::{csv, json};
use anyhow::Context;
use clap::ValueEnum;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Json,
    Csv,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Json => "json",
            ReportFormat::Csv => "csv",
        }
    }
}

pub fn render(report: &BatchReport, format: ReportFormat) -> anyhow::Result<Vec<u8>> {
    match format {
        ReportFormat::Json => Ok(json::render(report)?.into_bytes()),
        ReportFormat::Csv => csv::render(report),
    }
}

pub fn report_path(report: &BatchReport, format: ReportFormat, out_dir: &Path) -> PathBuf {
    out_dir.join(format!(
        "report_{}.{}",
        report.started_at.format("%Y%m%d_%H%M%S"),
        format.extension()
    ))
}

/// Render and write the report; the file handle is closed on every path.
pub fn write_report(
    report: &BatchReport,
    format: ReportFormat,
    out_dir: &Path,
) -> anyhow::Result<PathBuf> {
    let data = render(report, format)?;
    let path = report_path(report, format, out_dir);

    let file = File::create(&path)
        .with_context(|| format!("Failed to create report {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(&data)
        .and_then(|_| writer.flush())
        .with_context(|| format!("Failed to write report {}", path.display()))?;

    Ok(path)
}
