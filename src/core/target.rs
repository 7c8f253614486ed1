//! Target normalization: raw input string -> absolute http(s) URL

use crate::errors::ScanError;
use anyhow::Context as _;
use std::fs;
use std::path::Path;
use url::Url;

const DEFAULT_SCHEME: &str = "http://";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanTarget {
    raw: String,
    url: Url,
    domain: String,
}

impl ScanTarget {
    /// Normalize and validate a raw target. No network access.
    pub fn parse(raw: &str) -> Result<Self, ScanError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ScanError::invalid_target(raw, "empty input"));
        }

        if let Some(scheme) = foreign_scheme(trimmed) {
            return Err(ScanError::invalid_target(
                raw,
                format!("unsupported scheme '{}'", scheme),
            ));
        }

        let normalized = normalize(trimmed);
        let url = Url::parse(&normalized)
            .map_err(|e| ScanError::invalid_target(raw, e.to_string()))?;

        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| ScanError::invalid_target(raw, "missing host"))?;

        let domain = match url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };

        Ok(Self {
            raw: raw.to_string(),
            url,
            domain,
        })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Host (plus explicit port) the target was addressed by
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Filesystem-safe stem derived from the domain, stable across runs
    pub fn file_stem(&self) -> String {
        self.domain
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    }
}

/// Prepend `http://` unless the input already carries an http(s) scheme.
pub fn normalize(raw: &str) -> String {
    let lower = raw.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        raw.to_string()
    } else {
        format!("{}{}", DEFAULT_SCHEME, raw)
    }
}

/// Scheme of an input that is already an absolute non-http(s) URL.
///
/// `host:port` shorthand (`localhost:3000`) parses as a URL whose "scheme"
/// is the host, so a remainder starting with a digit is not a scheme.
fn foreign_scheme(input: &str) -> Option<String> {
    let url = Url::parse(input).ok()?;
    let scheme = url.scheme();
    if scheme == "http" || scheme == "https" {
        return None;
    }

    let rest = input.get(scheme.len() + 1..).unwrap_or_default();
    if rest.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }

    Some(scheme.to_string())
}

/// Read newline-separated targets, skipping blank lines and `#` comments.
pub fn load_targets(path: &Path) -> anyhow::Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read target file {}", path.display()))?;

    Ok(parse_target_lines(&content))
}

pub fn parse_target_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_is_defaulted() {
        let target = ScanTarget::parse("example.com").unwrap();
        assert_eq!(target.url().as_str(), "http://example.com/");
        assert_eq!(target.domain(), "example.com");
        assert_eq!(target.raw(), "example.com");
    }

    #[test]
    fn test_existing_scheme_kept() {
        assert_eq!(normalize("https://example.com/a"), "https://example.com/a");
        assert_eq!(normalize("HTTP://example.com"), "HTTP://example.com");
        assert_eq!(normalize("example.com/login"), "http://example.com/login");
    }

    #[test]
    fn test_invalid_targets_rejected() {
        for raw in ["", "   ", "http://", "exa mple.com", "http://exa<mple>.com"] {
            let err = ScanTarget::parse(raw).unwrap_err();
            assert!(
                matches!(err, ScanError::InvalidTarget { .. }),
                "expected InvalidTarget for {:?}",
                raw
            );
        }
    }

    #[test]
    fn test_foreign_schemes_rejected() {
        for raw in ["mailto:admin@victim.test", "ftp://files.test/x", "javascript:alert(1)"] {
            let err = ScanTarget::parse(raw).unwrap_err();
            assert!(
                err.to_string().contains("unsupported scheme"),
                "expected scheme rejection for {:?}: {}",
                raw,
                err
            );
        }
    }

    #[test]
    fn test_host_port_shorthand_accepted() {
        let target = ScanTarget::parse("localhost:3000/app").unwrap();
        assert_eq!(target.url().as_str(), "http://localhost:3000/app");
        assert_eq!(target.domain(), "localhost:3000");

        let target = ScanTarget::parse("192.168.1.10:8080").unwrap();
        assert_eq!(target.domain(), "192.168.1.10:8080");
    }

    #[test]
    fn test_file_stem_includes_port() {
        let target = ScanTarget::parse("https://example.com:8443/app").unwrap();
        assert_eq!(target.domain(), "example.com:8443");
        assert_eq!(target.file_stem(), "example.com_8443");
    }

    #[test]
    fn test_target_lines_skip_blanks_and_comments() {
        let content = "example.com\n\n# staging\n  https://a.test  \n#x\n";
        assert_eq!(
            parse_target_lines(content),
            vec!["example.com".to_string(), "https://a.test".to_string()]
        );
    }
}
