use crate::reporting::model::{BatchReport, ScanResult, Summary};
use serde::Serialize;

#[derive(Serialize)]
struct Report<'a> {
    scan_metadata: ScanMetadata,
    summary: Summary,
    results: &'a [ScanResult],
}

#[derive(Serialize)]
struct ScanMetadata {
    tool: String,
    version: String,
    started_at: String,
    finished_at: String,
    report_format: String,
}

pub fn render(report: &BatchReport) -> anyhow::Result<String> {
    let doc = Report {
        scan_metadata: ScanMetadata {
            tool: "FRAMEJACK".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            started_at: report.started_at.to_rfc3339(),
            finished_at: report.finished_at.to_rfc3339(),
            report_format: "application/json".to_string(),
        },
        summary: report.summary(),
        results: &report.results,
    };

    let json = serde_json::to_string_pretty(&doc)?;
    Ok(json)
}
