//! Batch conversion reports
//!
//! [`BatchProcessor`] runs a converter over text, link lists, remote
//! subscriptions or single links and wraps the results in serializable
//! reports.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::outbound::Outbound;
use crate::converter::{Converter, FullConfig, make_tags_unique};
use crate::diagnostics::Stats;
use crate::fetch::{FetchOptions, fetch_links};
use crate::parser::extract_links;
use crate::settings::Settings;

// ============================================================================
// Reports
// ============================================================================

/// Result of converting many links
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct BatchReport {
    pub success: bool,
    pub total_processed: usize,
    pub configs: Vec<FullConfig>,
    pub errors: Vec<String>,
    pub stats: Stats,
}

/// Result of converting one link
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SingleReport {
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<FullConfig>,

    /// `config` pretty-printed, ready to save as a sing-box config file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(default)]
    pub errors: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<Stats>,
}

// ============================================================================
// Batch Processor
// ============================================================================

/// Drives a [`Converter`] over batches of links
pub struct BatchProcessor {
    converter: Converter,
    max_configs: usize,
    fetch: FetchOptions,
}

impl BatchProcessor {
    pub fn new(converter: Converter, max_configs: usize) -> Self {
        Self {
            converter,
            max_configs,
            fetch: FetchOptions::default(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            converter: Converter::new(settings.converter.clone()),
            max_configs: settings.max_configs,
            fetch: settings.fetch.clone(),
        }
    }

    /// Replaces the options used by [`BatchProcessor::process_url`]
    pub fn with_fetch_options(mut self, fetch: FetchOptions) -> Self {
        self.fetch = fetch;
        self
    }

    pub fn converter(&self) -> &Converter {
        &self.converter
    }

    pub fn converter_mut(&mut self) -> &mut Converter {
        &mut self.converter
    }

    /// Extracts links from subscription text and converts them
    pub fn process_text(&mut self, text: &str) -> BatchReport {
        let links = extract_links(text);
        self.process_links(&links)
    }

    /// Converts links in order until `max_configs` of them succeed
    pub fn process_links(&mut self, links: &[String]) -> BatchReport {
        let mut outbounds: Vec<Outbound> = Vec::new();
        for link in links {
            if outbounds.len() >= self.max_configs {
                info!("Reached limit of {} configs, stopping", self.max_configs);
                break;
            }
            if let Some(outbound) = self.converter.convert_to_outbound(link) {
                outbounds.push(outbound);
            }
        }

        if self.converter.options().unique_tags {
            make_tags_unique(&mut outbounds);
        }

        let target = self.converter.options().test_url.clone();
        let configs: Vec<FullConfig> = outbounds
            .into_iter()
            .map(|outbound| FullConfig::assemble(outbound, &target))
            .collect();
        info!("Converted {} of {} link(s)", configs.len(), links.len());

        self.report(configs)
    }

    /// Fetches a subscription and converts its link lines
    ///
    /// A failed download yields a successful report with no configs.
    pub async fn process_url(&mut self, url: &str) -> BatchReport {
        match fetch_links(url, &self.fetch).await {
            Ok(links) => self.process_links(&links),
            Err(e) => {
                warn!("Failed to fetch subscription: {:#}", e);
                self.report(Vec::new())
            }
        }
    }

    /// Converts one link into a full config
    pub fn process_single(&mut self, link: &str) -> SingleReport {
        match self.converter.create_full_config(link) {
            Some(config) => SingleReport {
                success: true,
                json: config.to_json_pretty().ok(),
                config: Some(config),
                error: None,
                errors: self.converter.errors().to_vec(),
                stats: Some(self.converter.stats()),
            },
            None => SingleReport {
                success: false,
                config: None,
                json: None,
                error: Some("Failed to convert config".to_string()),
                errors: self.converter.errors().to_vec(),
                stats: None,
            },
        }
    }

    fn report(&self, configs: Vec<FullConfig>) -> BatchReport {
        BatchReport {
            success: true,
            total_processed: configs.len(),
            configs,
            errors: self.converter.errors().to_vec(),
            stats: self.converter.stats(),
        }
    }
}
