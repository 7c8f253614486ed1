//! HTTP fetcher: one GET per target with a fixed browser identity and timeout

use crate::errors::FetchError;
use crate::http::response::HttpResponse;
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use url::Url;

pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Source of HTTP responses for the scan pipeline.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<HttpResponse, FetchError>;
}

pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        // Redirects follow reqwest's default bounded policy.
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetch for HttpClient {
    async fn fetch(&self, url: &Url) -> Result<HttpResponse, FetchError> {
        let start = Instant::now();

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status().as_u16();

        let mut headers: HashMap<String, String> = HashMap::new();
        for (k, v) in response.headers().iter() {
            let value = String::from_utf8_lossy(v.as_bytes()).to_string();
            headers
                .entry(k.as_str().to_ascii_lowercase())
                .and_modify(|existing| {
                    existing.push_str(", ");
                    existing.push_str(&value);
                })
                .or_insert(value);
        }

        let body = response.bytes().await?;

        Ok(HttpResponse {
            status,
            headers,
            body: body.to_vec(),
            elapsed_ms: start.elapsed().as_millis(),
        })
    }
}
