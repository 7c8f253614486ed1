use crate::reporting::model::BatchReport;
use anyhow::Result;
use csv::Writer;

const HEADER: [&str; 10] = [
    "URL",
    "Status",
    "Vulnerable",
    "Verdict",
    "X-Frame-Options",
    "CSP frame-ancestors",
    "Iframes",
    "PoC",
    "Screenshot",
    "Error",
];

/// One row per target, in input order
pub fn render(report: &BatchReport) -> Result<Vec<u8>> {
    let mut wtr = Writer::from_writer(vec![]);
    wtr.write_record(HEADER)?;

    for result in &report.results {
        let (xfo, ancestors) = match &result.headers {
            Some(h) => (
                h.x_frame_options.to_string(),
                if h.frame_ancestors { "Set" } else { "Not Set" }.to_string(),
            ),
            None => ("N/A".to_string(), "N/A".to_string()),
        };
        let path = |p: &Option<std::path::PathBuf>| {
            p.as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default()
        };

        wtr.write_record([
            result.url.clone(),
            result.status_label(),
            if result.is_vulnerable() { "YES" } else { "NO" }.to_string(),
            result.verdict.to_string(),
            xfo,
            ancestors,
            result.iframes.len().to_string(),
            path(&result.poc_path),
            path(&result.screenshot_path),
            result.error.clone().unwrap_or_default(),
        ])?;
    }

    let data = wtr.into_inner()?;
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporting::model::{HeaderFindings, Observed, ScanResult};
    use crate::validation::verdict::Verdict;
    use chrono::Utc;

    #[test]
    fn test_rows_follow_input_order() {
        let mut protected = ScanResult::failed("a.test", "http://a.test/", None, String::new());
        protected.verdict = Verdict::Protected;
        protected.error = None;
        protected.status_code = Some(301);
        protected.headers = Some(HeaderFindings {
            x_frame_options: Observed::Value("DENY".into()),
            ..Default::default()
        });
        let failed = ScanResult::failed("b.test", "http://b.test/", None, "connection refused".into());

        let report = BatchReport {
            started_at: Utc::now(),
            finished_at: Utc::now(),
            results: vec![protected, failed],
        };

        let text = String::from_utf8(render(&report).unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("URL,Status,Vulnerable"));
        assert!(lines[1].starts_with("http://a.test/,301,NO,PROTECTED,DENY,Not Set,0"));
        assert!(lines[2].starts_with("http://b.test/,Error,NO,ERROR,N/A,N/A,0"));
        assert!(lines[2].ends_with("connection refused"));
    }
}
