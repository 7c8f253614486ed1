//! FRAMEJACK Core Engine
//!
//! Runs the per-target pipeline (normalize, fetch, evaluate, inspect, PoC,
//! capture) over a batch with bounded concurrency. Every input produces
//! exactly one result, stored in the slot matching its input index.

use crate::core::context::{clamp_concurrency, ScanConfig};
use crate::core::target::ScanTarget;
use crate::errors::ScanError;
use crate::evidence::capture::{screenshot_path, BrowserLauncher, EvidenceCapturer};
use crate::evidence::poc::write_poc;
use crate::http::client::Fetch;
use crate::reporting::model::{BatchReport, ScanResult};
use crate::scanner::frames::inspect_frames;
use crate::validation::verdict::{evaluate, Verdict};
use chrono::Utc;
use futures::stream::{self, StreamExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Pending,
    Fetching,
    Evaluated,
    Capturing,
    Failed,
    Done,
}

/// Subscriber for per-target progress. Both hooks default to no-ops.
pub trait ScanObserver: Send + Sync {
    fn on_stage(&self, _index: usize, _input: &str, _stage: Stage) {}

    fn on_result(&self, _index: usize, _result: &ScanResult) {}
}

pub struct Engine<F: Fetch, L: BrowserLauncher> {
    config: ScanConfig,
    fetcher: F,
    capturer: Option<EvidenceCapturer<L>>,
}

impl<F: Fetch, L: BrowserLauncher> Engine<F, L> {
    pub fn new(config: ScanConfig, fetcher: F, launcher: Option<L>) -> Self {
        let capturer = if config.capture && config.generate_poc {
            launcher.map(|l| EvidenceCapturer::new(l, config.settle, config.browser_timeout))
        } else {
            None
        };

        Self {
            config,
            fetcher,
            capturer,
        }
    }

    /// Scan every input and return results in input order.
    pub async fn run(&self, inputs: &[String], observer: &dyn ScanObserver) -> BatchReport {
        let started_at = Utc::now();
        let stamp = started_at.format("%Y%m%d_%H%M%S").to_string();
        let workers = clamp_concurrency(self.config.concurrency);

        tracing::info!(
            "Starting clickjacking scan: {} target(s), concurrency={}",
            inputs.len(),
            workers
        );

        let mut slots: Vec<Option<ScanResult>> = vec![None; inputs.len()];

        let mut completed = stream::iter(inputs.iter().enumerate())
            .map(|(index, raw)| {
                let stamp = stamp.as_str();
                async move {
                    observer.on_stage(index, raw, Stage::Pending);
                    let result = self.scan_one(index, raw, stamp, observer).await;
                    observer.on_stage(index, raw, Stage::Done);
                    observer.on_result(index, &result);
                    (index, result)
                }
            })
            .buffer_unordered(workers);

        while let Some((index, result)) = completed.next().await {
            slots[index] = Some(result);
        }

        let results = slots
            .into_iter()
            .zip(inputs)
            .map(|(slot, raw)| {
                slot.unwrap_or_else(|| {
                    ScanResult::failed(raw, raw, None, "target was not processed".to_string())
                })
            })
            .collect();

        let report = BatchReport {
            started_at,
            finished_at: Utc::now(),
            results,
        };

        let summary = report.summary();
        tracing::info!(
            "Scan completed: {} vulnerable, {} protected, {} error(s)",
            summary.vulnerable,
            summary.protected,
            summary.errors
        );

        report
    }

    async fn scan_one(
        &self,
        index: usize,
        raw: &str,
        stamp: &str,
        observer: &dyn ScanObserver,
    ) -> ScanResult {
        let target = match ScanTarget::parse(raw) {
            Ok(t) => t,
            Err(e) => {
                tracing::warn!("[{}] {}", index, e);
                observer.on_stage(index, raw, Stage::Failed);
                return ScanResult::failed(raw, raw.trim(), None, e.to_string());
            }
        };

        observer.on_stage(index, raw, Stage::Fetching);
        tracing::debug!("[{}] Fetching {}", index, target.url());

        let response = match self.fetcher.fetch(target.url()).await {
            Ok(r) => r,
            Err(e) => {
                let err = ScanError::from(e);
                tracing::warn!("[{}] {}: {}", index, target.url(), err);
                observer.on_stage(index, raw, Stage::Failed);
                return ScanResult::failed(
                    raw,
                    target.url().as_str(),
                    Some(target.domain().to_string()),
                    err.to_string(),
                );
            }
        };

        let (verdict, headers) = evaluate(&response.headers);
        let mut warnings = Vec::new();
        // HTML parsing is CPU bound; keep it off the worker threads driving fetches.
        let body = response.body_text();
        let iframes = match tokio::task::spawn_blocking(move || inspect_frames(&body)).await {
            Ok(frames) => frames,
            Err(e) => {
                tracing::warn!("[{}] iframe inspection failed: {}", index, e);
                warnings.push(format!("iframe inspection failed: {}", e));
                Vec::new()
            }
        };
        observer.on_stage(index, raw, Stage::Evaluated);

        tracing::info!(
            "[{}] {} status={} time={}ms verdict={} iframes={}",
            index,
            target.url(),
            response.status,
            response.elapsed_ms,
            verdict,
            iframes.len()
        );

        let mut result = ScanResult {
            input: target.raw().to_string(),
            url: target.url().to_string(),
            domain: Some(target.domain().to_string()),
            verdict,
            status_code: Some(response.status),
            headers: Some(headers),
            iframes,
            poc_path: None,
            screenshot_path: None,
            error: None,
            warnings,
            scanned_at: Utc::now(),
        };

        if verdict == Verdict::Vulnerable && self.config.generate_poc {
            self.collect_evidence(index, raw, &target, stamp, &mut result, observer)
                .await;
        }

        result
    }

    /// PoC and screenshot stages; failures become warnings, never verdict changes.
    async fn collect_evidence(
        &self,
        index: usize,
        raw: &str,
        target: &ScanTarget,
        stamp: &str,
        result: &mut ScanResult,
        observer: &dyn ScanObserver,
    ) {
        let Some(headers) = result.headers.as_ref() else {
            return;
        };

        let poc = match write_poc(target, headers, &self.config.output_dir).await {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!("[{}] {}", index, e);
                result.warnings.push(e.to_string());
                return;
            }
        };
        result.poc_path = Some(poc.clone());

        let Some(capturer) = &self.capturer else {
            return;
        };

        observer.on_stage(index, raw, Stage::Capturing);
        let dest = screenshot_path(target, &self.config.output_dir, stamp);
        match capturer.capture(&poc, dest).await {
            Ok(path) => result.screenshot_path = Some(path),
            Err(e) => {
                tracing::warn!("[{}] {}", index, e);
                result.warnings.push(e.to_string());
            }
        }
    }
}
