use crate::core::engine::ScanObserver;
use crate::reporting::model::{BatchReport, ScanResult};
use crate::validation::verdict::Verdict;
use std::io::Write;
use unicode_width::UnicodeWidthStr;

const MITIGATION_GUIDE: &str =
    "https://cheatsheetseries.owasp.org/cheatsheets/Clickjacking_Defense_Cheat_Sheet.html";

// ==============================
// BOX CONFIGURATION
// ==============================

const BOX_WIDTH: usize = 78;
const INNER_WIDTH: usize = BOX_WIDTH - 2;

fn visual_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

fn top_border() -> String {
    format!("╔{}╗", "═".repeat(INNER_WIDTH))
}

fn middle_border() -> String {
    format!("╠{}╣", "═".repeat(INNER_WIDTH))
}

fn bottom_border() -> String {
    format!("╚{}╝", "═".repeat(INNER_WIDTH))
}

/// Left-aligned box line; overlong content is left unpadded
fn box_line(content: &str) -> String {
    let safe_content = format!(" {} ", content);
    let padding = INNER_WIDTH.saturating_sub(visual_width(&safe_content));
    format!("║{}{}║", safe_content, " ".repeat(padding))
}

fn box_line_centered(content: &str) -> String {
    let safe_content = format!(" {} ", content);
    let width = visual_width(&safe_content);

    if width >= INNER_WIDTH {
        return box_line(content);
    }

    let remaining = INNER_WIDTH - width;
    let left = remaining / 2;
    let right = remaining - left;

    format!("║{}{}{}║", " ".repeat(left), safe_content, " ".repeat(right))
}

// ==============================
// PER-TARGET PANEL
// ==============================

pub fn render_panel(result: &ScanResult) -> Vec<String> {
    let title = match result.verdict {
        Verdict::Vulnerable => "🔴 CLICKJACKING VULNERABILITY FOUND",
        Verdict::Protected => "🟢 SITE PROTECTED AGAINST CLICKJACKING",
        Verdict::FetchError => "⚠️  ERROR",
    };

    let mut lines = vec![top_border(), box_line_centered(title), middle_border()];
    lines.push(box_line(&format!("URL: {}", result.url)));

    match &result.headers {
        Some(headers) => {
            lines.push(box_line(&format!("Status: {} ({})", result.verdict, result.status_label())));
            lines.push(box_line(&format!("X-Frame-Options: {}", headers.x_frame_options)));
            lines.push(box_line(&format!(
                "CSP Frame-Ancestors: {}",
                if headers.frame_ancestors { "Set" } else { "Not Set" }
            )));
            if !result.iframes.is_empty() {
                lines.push(box_line(&format!("Embedded frames: {}", result.iframes.len())));
            }
        }
        None => {
            let error = result.error.as_deref().unwrap_or("Unknown error");
            lines.push(box_line(&format!("Error: {}", error)));
        }
    }

    if result.verdict == Verdict::Vulnerable {
        lines.push(box_line(&format!("Mitigation Guide: {}", MITIGATION_GUIDE)));
    }
    if let Some(poc) = &result.poc_path {
        lines.push(box_line(&format!("PoC: {}", poc.display())));
    }
    if let Some(shot) = &result.screenshot_path {
        lines.push(box_line(&format!("Screenshot: {}", shot.display())));
    }
    for warning in &result.warnings {
        lines.push(box_line(&format!("Warning: {}", warning)));
    }

    lines.push(bottom_border());
    lines
}

/// Prints a panel for each finished target
pub struct ConsoleObserver {
    quiet: bool,
}

impl ConsoleObserver {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl ScanObserver for ConsoleObserver {
    fn on_result(&self, _index: usize, result: &ScanResult) {
        if self.quiet {
            return;
        }
        // One lock per panel keeps concurrent targets from interleaving
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        for line in render_panel(result) {
            let _ = writeln!(out, "{}", line);
        }
    }
}

// ==============================
// RESULTS TABLE
// ==============================

pub fn render_table(report: &BatchReport) -> String {
    let url_width = report
        .results
        .iter()
        .map(|r| visual_width(&r.url))
        .max()
        .unwrap_or(0)
        .max("URL".len());

    let mut out = String::new();
    out.push_str("\nClickjacking Test Results\n");
    out.push_str(&format!("{:<w$}  {:<6}  {}\n", "URL", "Status", "Vulnerable", w = url_width));
    out.push_str(&format!("{}\n", "─".repeat(url_width + 20)));

    for r in &report.results {
        out.push_str(&format!(
            "{:<w$}  {:<6}  {}\n",
            r.url,
            r.status_label(),
            if r.is_vulnerable() { "YES" } else { "NO" },
            w = url_width
        ));
    }

    let summary = report.summary();
    out.push_str(&format!(
        "\n{} target(s): {} vulnerable, {} protected, {} error(s)\n",
        summary.total, summary.vulnerable, summary.protected, summary.errors
    ));
    out
}
