use crate::validation::verdict::Verdict;
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::fmt;
use std::path::PathBuf;

pub const MISSING: &str = "missing";

/// A header or attribute value that may be absent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Observed {
    #[default]
    Missing,
    Value(String),
}

impl Observed {
    pub fn as_deref(&self) -> Option<&str> {
        match self {
            Observed::Missing => None,
            Observed::Value(v) => Some(v),
        }
    }
}

impl From<Option<&str>> for Observed {
    fn from(value: Option<&str>) -> Self {
        match value {
            Some(v) => Observed::Value(v.to_string()),
            None => Observed::Missing,
        }
    }
}

impl fmt::Display for Observed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_deref().unwrap_or(MISSING))
    }
}

impl Serialize for Observed {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_deref().unwrap_or(MISSING))
    }
}

/// Framing-defense posture read from response headers
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct HeaderFindings {
    pub x_frame_options: Observed,
    pub content_security_policy: Observed,
    pub frame_ancestors: bool,
}

impl HeaderFindings {
    /// Human-readable names of the defenses this response lacks
    pub fn missing_defenses(&self, safe_x_frame_options: bool) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if !safe_x_frame_options {
            missing.push("X-Frame-Options");
        }
        if !self.frame_ancestors {
            missing.push("CSP frame-ancestors");
        }
        missing
    }
}

/// One embedded frame element, in document order
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct IframeFinding {
    pub src: Observed,
    pub width: Observed,
    pub height: Observed,
    pub frameborder: Observed,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanResult {
    pub input: String,
    pub url: String,
    pub domain: Option<String>,
    pub verdict: Verdict,
    pub status_code: Option<u16>,
    pub headers: Option<HeaderFindings>,
    pub iframes: Vec<IframeFinding>,
    pub poc_path: Option<PathBuf>,
    pub screenshot_path: Option<PathBuf>,
    pub error: Option<String>,
    pub warnings: Vec<String>,
    pub scanned_at: DateTime<Utc>,
}

impl ScanResult {
    /// Result for a target whose verdict could not be determined
    pub fn failed(input: &str, url: &str, domain: Option<String>, error: String) -> Self {
        Self {
            input: input.to_string(),
            url: url.to_string(),
            domain,
            verdict: Verdict::FetchError,
            status_code: None,
            headers: None,
            iframes: Vec::new(),
            poc_path: None,
            screenshot_path: None,
            error: Some(error),
            warnings: Vec::new(),
            scanned_at: Utc::now(),
        }
    }

    pub fn is_vulnerable(&self) -> bool {
        self.verdict == Verdict::Vulnerable
    }

    /// Status code, or `Error` when the target failed before a response arrived
    pub fn status_label(&self) -> String {
        match (self.verdict, self.status_code) {
            (Verdict::FetchError, _) | (_, None) => "Error".to_string(),
            (_, Some(code)) => code.to_string(),
        }
    }
}

#[derive(Debug, Default, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub vulnerable: usize,
    pub protected: usize,
    pub errors: usize,
}

/// Every input target's result, in input order
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub results: Vec<ScanResult>,
}

impl BatchReport {
    pub fn summary(&self) -> Summary {
        let count = |v: Verdict| self.results.iter().filter(|r| r.verdict == v).count();
        Summary {
            total: self.results.len(),
            vulnerable: count(Verdict::Vulnerable),
            protected: count(Verdict::Protected),
            errors: count(Verdict::FetchError),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observed_serializes_sentinel() {
        let findings = HeaderFindings {
            x_frame_options: Observed::Value("DENY".into()),
            content_security_policy: Observed::Missing,
            frame_ancestors: false,
        };
        let json = serde_json::to_value(&findings).unwrap();
        assert_eq!(json["x_frame_options"], "DENY");
        assert_eq!(json["content_security_policy"], "missing");
    }

    #[test]
    fn test_failed_result_labels() {
        let result = ScanResult::failed("bad", "bad", None, "boom".into());
        assert_eq!(result.status_label(), "Error");
        assert!(!result.is_vulnerable());
        assert!(result.headers.is_none());
    }

    #[test]
    fn test_missing_defenses() {
        let findings = HeaderFindings {
            frame_ancestors: true,
            ..Default::default()
        };
        assert_eq!(findings.missing_defenses(false), vec!["X-Frame-Options"]);
        assert!(findings.missing_defenses(true).is_empty());
    }
}
