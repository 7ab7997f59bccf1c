use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::converter::ConverterOptions;
use crate::fetch::{FetchOptions, fetch_text};

// ============================================================================
// Settings Types
// ============================================================================

/// Application settings parsed from a TOML file
///
/// ```toml
/// max_configs = 50
///
/// [converter]
/// test_url = "https://www.gstatic.com/generate_204"
/// multiplex = true
///
/// [fetch]
/// timeout_secs = 10
///
/// [checker]
/// url = "http://127.0.0.1:8080/batch-test"
/// ```
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Settings {
    /// Converter options
    #[serde(default)]
    pub converter: ConverterOptions,

    /// Subscription download options
    #[serde(default)]
    pub fetch: FetchOptions,

    /// Stop a batch after this many converted links, default 100
    #[serde(default = "default_max_configs")]
    pub max_configs: usize,

    /// Ping checker that batch results are posted to
    #[serde(default)]
    pub checker: CheckerSettings,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct CheckerSettings {
    /// Endpoint receiving `{success, total_processed, configs}`, disabled when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            converter: ConverterOptions::default(),
            fetch: FetchOptions::default(),
            max_configs: default_max_configs(),
            checker: CheckerSettings::default(),
        }
    }
}

// ============================================================================
// Settings Implementation
// ============================================================================

impl Settings {
    /// Parse settings from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(content).context("Failed to parse settings TOML")?;
        settings.validate()?;
        Ok(settings)
    }

    /// Checks value ranges that serde cannot express
    pub fn validate(&self) -> Result<()> {
        if self.max_configs == 0 {
            bail!("max_configs must be greater than 0");
        }

        Url::parse(&self.converter.test_url)
            .with_context(|| format!("Invalid test_url: {}", self.converter.test_url))?;

        if self.fetch.timeout_secs == 0 {
            bail!("fetch.timeout_secs must be greater than 0");
        }

        if let Some(url) = &self.checker.url {
            Url::parse(url).with_context(|| format!("Invalid checker url: {}", url))?;
        }

        Ok(())
    }

    /// Load settings from file path
    pub async fn from_file(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read settings from {:?}", path))?;
        Self::from_toml(&content)
    }

    /// Load settings from file path or URL
    pub async fn load(path_or_url: &str) -> Result<Self> {
        if is_remote(path_or_url) {
            let content = fetch_text(path_or_url, &FetchOptions::default()).await?;
            Self::from_toml(&content)
        } else {
            let expanded = expand_tilde(path_or_url);
            Self::from_file(Path::new(&expanded)).await
        }
    }
}

fn default_max_configs() -> usize {
    100
}

// ============================================================================
// Path Utilities
// ============================================================================

/// Whether `location` is an http(s) URL rather than a file path
pub fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Expand ~ to home directory in path
pub fn expand_tilde(path: &str) -> String {
    if (path.starts_with("~/") || path == "~")
        && let Some(home) = dirs_home()
    {
        return path.replacen('~', &home, 1);
    }
    path.to_string()
}

fn dirs_home() -> Option<String> {
    #[cfg(windows)]
    {
        std::env::var("USERPROFILE").ok()
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOME").ok()
    }
}
