//! Subscription fetching and checker hand-off
//!
//! Downloads subscription text over HTTP(S). Only a `200 OK` with a
//! non-empty body counts as success. Batch results can be posted to a
//! ping checker that tests each config.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use reqwest::StatusCode;
use reqwest::redirect::Policy;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::batch::BatchReport;
use crate::converter::FullConfig;
use crate::parser::has_supported_prefix;

/// Browser user agent sent by default, some providers reject other clients
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

const MAX_REDIRECTS: usize = 10;

// ============================================================================
// Fetch Options
// ============================================================================

/// HTTP client settings for subscription downloads
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FetchOptions {
    /// Whole-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Verify server certificates
    #[serde(default = "default_true")]
    pub verify_tls: bool,

    /// User-Agent header value
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Honour HTTP(S)_PROXY and NO_PROXY from the environment
    #[serde(default = "default_true")]
    pub use_env_proxy: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            verify_tls: true,
            user_agent: default_user_agent(),
            use_env_proxy: true,
        }
    }
}

impl FetchOptions {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn client(&self) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder()
            .user_agent(self.user_agent.as_str())
            .timeout(self.timeout())
            .redirect(Policy::limited(MAX_REDIRECTS))
            .danger_accept_invalid_certs(!self.verify_tls);
        if !self.use_env_proxy {
            builder = builder.no_proxy();
        }
        builder.build().context("Failed to build HTTP client")
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

// ============================================================================
// HTTP Utilities
// ============================================================================

/// Fetch text content from a URL
pub async fn fetch_text(url: &str, options: &FetchOptions) -> Result<String> {
    debug!("Fetching URL: {}", url);

    let response = options
        .client()?
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to fetch URL: {}", url))?;

    let status = response.status();
    if status != StatusCode::OK {
        bail!("HTTP request failed with status {}: {}", status, url);
    }

    let text = response
        .text()
        .await
        .with_context(|| format!("Failed to read response body from: {}", url))?;

    if text.is_empty() {
        bail!("Empty response body from: {}", url);
    }

    debug!("Fetched {} bytes from {}", text.len(), url);
    Ok(text)
}

/// Fetch a subscription and keep the lines that are links
pub async fn fetch_links(url: &str, options: &FetchOptions) -> Result<Vec<String>> {
    let text = fetch_text(url, options).await?;
    let links = link_lines(&text);
    info!("Found {} link line(s) at {}", links.len(), url);
    Ok(links)
}

/// Trimmed lines starting with a supported scheme prefix
///
/// Blank lines and `#` comments are skipped.
pub fn link_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter(|line| has_supported_prefix(line))
        .map(str::to_string)
        .collect()
}

// ============================================================================
// Checker Submission
// ============================================================================

/// Body posted to a ping checker
#[derive(Serialize, Debug)]
struct CheckerPayload<'a> {
    success: bool,
    total_processed: usize,
    configs: &'a [FullConfig],
}

impl<'a> From<&'a BatchReport> for CheckerPayload<'a> {
    fn from(report: &'a BatchReport) -> Self {
        Self {
            success: report.success,
            total_processed: report.total_processed,
            configs: &report.configs,
        }
    }
}

/// Post converted configs to a ping checker and return its response body
///
/// Only `success`, `total_processed` and `configs` are sent.
pub async fn submit_report(
    url: &str,
    report: &BatchReport,
    options: &FetchOptions,
) -> Result<String> {
    info!("Submitting {} config(s) to {}", report.total_processed, url);

    let response = options
        .client()?
        .post(url)
        .json(&CheckerPayload::from(report))
        .send()
        .await
        .with_context(|| format!("Failed to submit report to: {}", url))?;

    let status = response.status();
    if !status.is_success() {
        bail!("Checker rejected report with status {}: {}", status, url);
    }

    response
        .text()
        .await
        .with_context(|| format!("Failed to read checker response from: {}", url))
}
