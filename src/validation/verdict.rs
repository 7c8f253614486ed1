//! Framing-defense policy evaluation.
//!
//! A response is protected when `X-Frame-Options` is exactly `DENY` or
//! `SAMEORIGIN` (any case), or when its CSP carries a `frame-ancestors`
//! directive. Anything else, including legacy `ALLOW-FROM`, is vulnerable.

use crate::http::response::header_value;
use crate::reporting::model::{HeaderFindings, Observed};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

pub const SAFE_X_FRAME_OPTIONS: [&str; 2] = ["DENY", "SAMEORIGIN"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Vulnerable,
    Protected,
    #[serde(rename = "error")]
    FetchError,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Vulnerable => write!(f, "VULNERABLE"),
            Verdict::Protected => write!(f, "PROTECTED"),
            Verdict::FetchError => write!(f, "ERROR"),
        }
    }
}

pub fn is_safe_x_frame_options(value: &str) -> bool {
    let upper = value.trim().to_ascii_uppercase();
    SAFE_X_FRAME_OPTIONS.contains(&upper.as_str())
}

pub fn has_frame_ancestors(csp: &str) -> bool {
    csp.to_ascii_lowercase().contains("frame-ancestors")
}

/// Pure, deterministic mapping from response headers to a verdict.
pub fn evaluate(headers: &HashMap<String, String>) -> (Verdict, HeaderFindings) {
    let xfo = header_value(headers, "x-frame-options");
    let csp = header_value(headers, "content-security-policy");

    let safe_xfo = xfo.map(is_safe_x_frame_options).unwrap_or(false);
    let frame_ancestors = csp.map(has_frame_ancestors).unwrap_or(false);

    let verdict = if safe_xfo || frame_ancestors {
        Verdict::Protected
    } else {
        Verdict::Vulnerable
    };

    let findings = HeaderFindings {
        x_frame_options: Observed::from(xfo.map(|v| v.trim().to_ascii_uppercase()).as_deref()),
        content_security_policy: Observed::from(csp),
        frame_ancestors,
    };

    (verdict, findings)
}
