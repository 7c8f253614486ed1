//! Screenshot evidence of a rendered PoC page.
//!
//! Browser automation sits behind [`BrowserLauncher`] so the pipeline can be
//! exercised without Chrome. Every capture launches its own browser; nothing
//! is shared between targets.

use crate::core::target::ScanTarget;
use crate::errors::ScanError;
use anyhow::{anyhow, Context, Result};
use headless_chrome::protocol::cdp::Page::CaptureScreenshotFormatOption;
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use url::Url;

pub const DEFAULT_SETTLE: Duration = Duration::from_secs(3);
pub const DEFAULT_BROWSER_TIMEOUT: Duration = Duration::from_secs(30);

const WINDOW_SIZE: (u32, u32) = (1366, 768);

/// Starts independent browser sessions. Called from a blocking thread.
pub trait BrowserLauncher: Send + Sync + 'static {
    type Session: BrowserSession;

    fn launch(&self) -> Result<Self::Session>;
}

pub trait BrowserSession {
    fn navigate(&mut self, url: &str) -> Result<()>;

    /// PNG bytes of the current viewport
    fn screenshot(&mut self) -> Result<Vec<u8>>;

    fn close(self) -> Result<()>;
}

/// Chrome/Chromium via the DevTools protocol
pub struct HeadlessChrome {
    timeout: Duration,
}

impl HeadlessChrome {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

pub struct ChromeSession {
    // Dropping the browser terminates the Chrome process.
    _browser: Browser,
    tab: Arc<Tab>,
}

impl BrowserLauncher for HeadlessChrome {
    type Session = ChromeSession;

    fn launch(&self) -> Result<ChromeSession> {
        let options = LaunchOptions::default_builder()
            .headless(true)
            .window_size(Some(WINDOW_SIZE))
            .idle_browser_timeout(self.timeout)
            .build()
            .map_err(|e| anyhow!("Browser launch options error: {}", e))?;

        let browser = Browser::new(options).context("Failed to launch Chrome/Chromium")?;
        let tab = browser.new_tab().context("Failed to create new tab")?;
        tab.set_default_timeout(self.timeout);

        Ok(ChromeSession {
            _browser: browser,
            tab,
        })
    }
}

impl BrowserSession for ChromeSession {
    fn navigate(&mut self, url: &str) -> Result<()> {
        self.tab.navigate_to(url).context("Failed to navigate")?;
        self.tab.wait_until_navigated().context("Navigation timeout")?;
        Ok(())
    }

    fn screenshot(&mut self) -> Result<Vec<u8>> {
        self.tab
            .capture_screenshot(CaptureScreenshotFormatOption::Png, None, None, true)
            .context("Failed to capture screenshot")
    }

    fn close(self) -> Result<()> {
        self.tab.close(false).context("Failed to close tab")?;
        Ok(())
    }
}

pub fn screenshot_path(target: &ScanTarget, out_dir: &Path, stamp: &str) -> PathBuf {
    out_dir.join(format!("{}_{}.png", target.file_stem(), stamp))
}

pub struct EvidenceCapturer<L: BrowserLauncher> {
    launcher: Arc<L>,
    settle: Duration,
    timeout: Duration,
}

impl<L: BrowserLauncher> EvidenceCapturer<L> {
    pub fn new(launcher: L, settle: Duration, timeout: Duration) -> Self {
        Self {
            launcher: Arc::new(launcher),
            settle,
            timeout,
        }
    }

    #[cfg(test)]
    pub(crate) fn launcher(&self) -> &L {
        &self.launcher
    }

    /// Render `poc` and save a screenshot to `dest`.
    ///
    /// Launch, navigation and screenshot failures, panics in the browser
    /// thread, and exceeding the timeout all map to `EvidenceCapture`.
    pub async fn capture(&self, poc: &Path, dest: PathBuf) -> Result<PathBuf, ScanError> {
        let page_url = file_url(poc)
            .await
            .map_err(|e| ScanError::EvidenceCapture(e.to_string()))?;
        let launcher = Arc::clone(&self.launcher);
        let settle = self.settle;
        let out = dest.clone();
        // Set once the caller stops waiting; the PNG is only published while unset.
        let abandoned = Arc::new(Mutex::new(false));
        let gate = Arc::clone(&abandoned);

        let task = tokio::task::spawn_blocking(move || -> Result<()> {
            let mut session = launcher.launch()?;
            let shot = session.navigate(page_url.as_str()).and_then(|_| {
                // Give the framed target time to render
                std::thread::sleep(settle);
                session.screenshot()
            });
            let closed = session.close();
            let png = shot?;
            closed?;

            let partial = partial_path(&out);
            fs::write(&partial, png)
                .with_context(|| format!("Failed to write {}", partial.display()))?;

            let gone = lock(&gate);
            if *gone {
                let _ = fs::remove_file(&partial);
                anyhow::bail!("capture abandoned after timeout");
            }
            fs::rename(&partial, &out)
                .with_context(|| format!("Failed to write {}", out.display()))?;
            Ok(())
        });

        let limit = self.timeout + settle;
        let outcome = tokio::time::timeout(limit, task).await;
        if outcome.is_err() {
            let mut gone = lock(&abandoned);
            *gone = true;
            // The task may have published just before the flag was set
            let _ = fs::remove_file(&dest);
        }

        match outcome {
            Ok(Ok(Ok(()))) => Ok(dest),
            Ok(Ok(Err(e))) => Err(ScanError::EvidenceCapture(format!("{:#}", e))),
            Ok(Err(join)) => Err(ScanError::EvidenceCapture(format!(
                "browser task failed: {}",
                join
            ))),
            Err(_) => Err(ScanError::EvidenceCapture(format!(
                "timed out after {:?}",
                limit
            ))),
        }
    }
}

fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}

fn lock(flag: &Mutex<bool>) -> MutexGuard<'_, bool> {
    flag.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

async fn file_url(path: &Path) -> Result<Url> {
    let absolute = tokio::fs::canonicalize(path)
        .await
        .with_context(|| format!("PoC page not found: {}", path.display()))?;
    Url::from_file_path(&absolute)
        .map_err(|_| anyhow!("Cannot build file URL for {}", absolute.display()))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    pub(crate) const FAKE_PNG: &[u8] = b"\x89PNG\r\n\x1a\nfake";

    /// Records every navigation; fails launch when `fail` is set
    #[derive(Default)]
    pub(crate) struct FakeLauncher {
        pub fail: bool,
        /// Time spent taking each screenshot
        pub delay: Duration,
        pub launches: AtomicUsize,
        pub visited: Arc<Mutex<Vec<String>>>,
    }

    pub(crate) struct FakeSession {
        delay: Duration,
        visited: Arc<Mutex<Vec<String>>>,
    }

    impl BrowserLauncher for FakeLauncher {
        type Session = FakeSession;

        fn launch(&self) -> Result<FakeSession> {
            self.launches.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                anyhow::bail!("no chrome binary");
            }
            Ok(FakeSession {
                delay: self.delay,
                visited: Arc::clone(&self.visited),
            })
        }
    }

    impl BrowserSession for FakeSession {
        fn navigate(&mut self, url: &str) -> Result<()> {
            self.visited.lock().unwrap().push(url.to_string());
            Ok(())
        }

        fn screenshot(&mut self) -> Result<Vec<u8>> {
            std::thread::sleep(self.delay);
            Ok(FAKE_PNG.to_vec())
        }

        fn close(self) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_capture_writes_screenshot() {
        let dir = TempDir::new().unwrap();
        let poc = dir.path().join("example.com_clickjacking_poc.html");
        fs::write(&poc, "<html></html>").unwrap();
        let target = ScanTarget::parse("example.com").unwrap();
        let dest = screenshot_path(&target, dir.path(), "20260101_000000");

        let launcher = FakeLauncher::default();
        let visited = Arc::clone(&launcher.visited);
        let capturer = EvidenceCapturer::new(launcher, Duration::ZERO, Duration::from_secs(5));

        let path = capturer.capture(&poc, dest.clone()).await.unwrap();
        assert_eq!(path, dest);
        assert_eq!(fs::read(&path).unwrap(), FAKE_PNG);
        assert!(!partial_path(&path).exists());
        assert!(visited.lock().unwrap()[0].starts_with("file://"));
    }

    #[tokio::test]
    async fn test_launch_failure_is_capture_error() {
        let dir = TempDir::new().unwrap();
        let poc = dir.path().join("p.html");
        fs::write(&poc, "<html></html>").unwrap();

        let capturer = EvidenceCapturer::new(
            FakeLauncher {
                fail: true,
                ..Default::default()
            },
            Duration::ZERO,
            Duration::from_secs(5),
        );

        let err = capturer
            .capture(&poc, dir.path().join("shot.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, ScanError::EvidenceCapture(_)));
        assert!(!dir.path().join("shot.png").exists());
    }

    #[tokio::test]
    async fn test_timed_out_capture_leaves_no_file() {
        let dir = TempDir::new().unwrap();
        let poc = dir.path().join("p.html");
        fs::write(&poc, "<html></html>").unwrap();
        let dest = dir.path().join("slow.png");

        let capturer = EvidenceCapturer::new(
            FakeLauncher {
                delay: Duration::from_millis(400),
                ..Default::default()
            },
            Duration::ZERO,
            Duration::from_millis(100),
        );

        let err = capturer.capture(&poc, dest.clone()).await.unwrap_err();
        assert!(err.to_string().contains("timed out"));

        // Let the browser thread finish its late screenshot
        tokio::time::sleep(Duration::from_millis(800)).await;
        assert!(!dest.exists());
        assert!(!partial_path(&dest).exists());
    }

    #[tokio::test]
    async fn test_missing_poc_is_capture_error() {
        let dir = TempDir::new().unwrap();
        let capturer =
            EvidenceCapturer::new(FakeLauncher::default(), Duration::ZERO, Duration::from_secs(5));
        let err = capturer
            .capture(&dir.path().join("absent.html"), dir.path().join("s.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, ScanError::EvidenceCapture(_)));
    }

    #[test]
    fn test_screenshot_path_is_deterministic() {
        let target = ScanTarget::parse("https://example.com:8080").unwrap();
        let path = screenshot_path(&target, Path::new("out"), "20260101_120000");
        assert_eq!(path, Path::new("out/example.com_8080_20260101_120000.png"));
    }
}
