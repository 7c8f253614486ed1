//! Self-contained HTML proof-of-concept that frames the target

use crate::core::target::ScanTarget;
use crate::errors::ScanError;
use crate::reporting::model::HeaderFindings;
use crate::validation::verdict::is_safe_x_frame_options;
use html_escape::{encode_double_quoted_attribute, encode_text};
use std::path::{Path, PathBuf};

const POC_SUFFIX: &str = "_clickjacking_poc.html";

const STYLE: &str = r#"
        body { margin: 0; font-family: 'Segoe UI', sans-serif; background-color: #3d0b1c; color: #f3d5b5; }
        .header { padding: 20px; text-align: center; }
        .container { max-width: 1000px; margin: auto; background: #500c20; padding: 20px; border-radius: 10px; }
        .url-box { margin-bottom: 20px; display: flex; }
        .url-box input { flex: 1; padding: 10px; font-size: 16px; border: none; border-radius: 5px; }
        .info { background-color: #fff0f0; padding: 15px; border-radius: 10px; color: #000; margin-bottom: 20px; }
        .missing { color: #d32f2f; }
        .alert { background-color: #d32f2f; color: #fff; padding: 15px; border-radius: 10px; font-weight: bold; }
        .iframe-wrapper { position: relative; width: 100%; height: 600px; border: 2px solid #900; border-radius: 10px; overflow: hidden; }
        iframe { width: 100%; height: 100%; border: none; opacity: 0.95; }
        .overlay { position: absolute; top: 50%; left: 50%; transform: translate(-50%, -50%);
                   background-color: rgba(255, 255, 0, 0.4); color: #000; padding: 10px 20px; border-radius: 8px;
                   font-weight: bold; z-index: 10; pointer-events: none; display: none; }
        .toggle-btn { margin: 10px auto 20px; display: block; padding: 10px 20px; background-color: #2196f3;
                      color: #fff; border: none; border-radius: 5px; cursor: pointer; }
"#;

const SCRIPT: &str = r#"
        function toggleOverlay() {
            const overlay = document.getElementById('overlay');
            overlay.style.display = (overlay.style.display === 'block') ? 'none' : 'block';
        }
"#;

/// Deterministic artifact path; repeated runs overwrite the same file.
pub fn poc_path(target: &ScanTarget, out_dir: &Path) -> PathBuf {
    out_dir.join(format!("{}{}", target.file_stem(), POC_SUFFIX))
}

pub fn render_poc(target: &ScanTarget, findings: &HeaderFindings) -> String {
    let url = target.url().as_str();
    let safe_xfo = findings
        .x_frame_options
        .as_deref()
        .map(is_safe_x_frame_options)
        .unwrap_or(false);
    let missing = findings.missing_defenses(safe_xfo).join(", ");

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Clickjacking Test - {title}</title>
    <style>{style}</style>
</head>
<body>
    <div class="header"><h1>Clickjacking Test</h1></div>
    <div class="container">
        <div class="url-box"><input type="text" value="{attr_url}" readonly></div>
        <div class="info">
            <strong>Site:</strong> {text_url}<br>
            <strong>X-Frame-Options:</strong> {xfo}<br>
            <strong>Missing Headers:</strong> <span class="missing">{missing}</span>
        </div>
        <div class="alert">Site is vulnerable to Clickjacking</div>
        <button class="toggle-btn" onclick="toggleOverlay()">Toggle Overlay</button>
        <div class="iframe-wrapper">
            <div class="overlay" id="overlay">Click Me!</div>
            <iframe src="{attr_url}"></iframe>
        </div>
    </div>
    <script>{script}</script>
</body>
</html>
"#,
        title = encode_text(target.domain()),
        style = STYLE,
        attr_url = encode_double_quoted_attribute(url),
        text_url = encode_text(url),
        xfo = encode_text(&findings.x_frame_options.to_string()),
        missing = encode_text(&missing),
        script = SCRIPT,
    )
}

/// Write the PoC page for `target` into the existing `out_dir`.
pub async fn write_poc(
    target: &ScanTarget,
    findings: &HeaderFindings,
    out_dir: &Path,
) -> Result<PathBuf, ScanError> {
    let path = poc_path(target, out_dir);
    tokio::fs::write(&path, render_poc(target, findings))
        .await
        .map_err(|source| ScanError::ArtifactWrite {
            path: path.clone(),
            source,
        })?;

    tracing::debug!("PoC written: {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporting::model::Observed;
    use std::fs;
    use tempfile::TempDir;

    fn vulnerable_findings() -> HeaderFindings {
        HeaderFindings {
            x_frame_options: Observed::Value("ALLOW-FROM HTTPS://EVIL.EXAMPLE".into()),
            content_security_policy: Observed::Missing,
            frame_ancestors: false,
        }
    }

    #[test]
    fn test_render_embeds_target_in_frame() {
        let target = ScanTarget::parse("example.com/login?a=1&b=2").unwrap();
        let html = render_poc(&target, &vulnerable_findings());

        assert!(html.contains(r#"<iframe src="http://example.com/login?a=1&amp;b=2">"#));
        assert!(html.contains("Site is vulnerable to Clickjacking"));
        assert!(html.contains("X-Frame-Options, CSP frame-ancestors"));
    }

    #[tokio::test]
    async fn test_rewrite_same_domain_overwrites() {
        let dir = TempDir::new().unwrap();
        let target = ScanTarget::parse("https://example.com").unwrap();

        let first = write_poc(&target, &vulnerable_findings(), dir.path())
            .await
            .unwrap();
        let second = write_poc(&target, &vulnerable_findings(), dir.path())
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(
            first.file_name().unwrap().to_str().unwrap(),
            "example.com_clickjacking_poc.html"
        );
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_missing_directory_is_write_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("does-not-exist");
        let target = ScanTarget::parse("example.com").unwrap();

        let err = write_poc(&target, &vulnerable_findings(), &missing)
            .await
            .unwrap_err();
        assert!(matches!(err, ScanError::ArtifactWrite { .. }));
    }
}
