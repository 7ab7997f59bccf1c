//! Link to sing-box conversion
//!
//! A [`Converter`] owns everything one conversion run mutates: the success
//! counter and the diagnostic sink. Concurrent runs each build their own
//! converter.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::config::SingBoxConfig;
use crate::config::inbound::Inbound;
use crate::config::log::{Log, LogLevel};
use crate::config::outbound::Outbound;
use crate::config::route::Route;
use crate::diagnostics::{DiagnosticSink, Stats};
use crate::parser::{
    ParseContext, ProtocolRegistry, extract_links, extract_links_from_many, has_supported_prefix,
};

/// Connectivity probe used as the default health-check target
pub const DEFAULT_TEST_URL: &str = "https://www.gstatic.com/generate_204";
/// DNS server carried in the converter options
pub const DEFAULT_DNS_ADDRESS: &str = "1.1.1.2";
/// Port of the local mixed inbound in assembled configs
pub const MIXED_INBOUND_PORT: u16 = 1080;
/// Tag of the local mixed inbound in assembled configs
pub const MIXED_INBOUND_TAG: &str = "mixed-in";

// ============================================================================
// Converter Options
// ============================================================================

/// Construction-time converter settings
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ConverterOptions {
    /// Health-check URL returned as `target` with every full config
    #[serde(default = "default_test_url")]
    pub test_url: String,

    /// DNS server address, carried for callers
    #[serde(default = "default_dns_address")]
    pub dns_address: String,

    /// Attach an h2mux multiplex section to VLESS outbounds
    #[serde(default)]
    pub multiplex: bool,

    /// Keep per-link failure diagnostics
    #[serde(default)]
    pub debug: bool,

    /// Suffix repeated tags in batch conversions so every tag is distinct
    #[serde(default)]
    pub unique_tags: bool,
}

impl Default for ConverterOptions {
    fn default() -> Self {
        Self {
            test_url: default_test_url(),
            dns_address: default_dns_address(),
            multiplex: false,
            debug: false,
            unique_tags: false,
        }
    }
}

fn default_test_url() -> String {
    DEFAULT_TEST_URL.to_string()
}

fn default_dns_address() -> String {
    DEFAULT_DNS_ADDRESS.to_string()
}

// ============================================================================
// Full Config
// ============================================================================

/// A runnable sing-box config for one outbound, plus the values a caller
/// needs to health-check it
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FullConfig {
    pub config: SingBoxConfig,
    pub target: String,
    pub proxy_tag: String,
}

impl FullConfig {
    /// Wraps an outbound with a local mixed inbound and a route to it
    pub fn assemble(outbound: Outbound, target: &str) -> Self {
        let tag = outbound.tag().to_string();
        let config = SingBoxConfig::builder()
            .log(Log::with_level(LogLevel::Info))
            .inbound(Inbound::local_mixed(MIXED_INBOUND_PORT, MIXED_INBOUND_TAG))
            .outbound(outbound)
            .route(Route::to_outbound(tag.clone()))
            .build();

        Self {
            config,
            target: target.to_string(),
            proxy_tag: tag,
        }
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

// ============================================================================
// Converter
// ============================================================================

/// Converts subscription links into sing-box outbounds
pub struct Converter {
    registry: ProtocolRegistry,
    options: ConverterOptions,
    server_counter: usize,
    diagnostics: DiagnosticSink,
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(ConverterOptions::default())
    }
}

impl Converter {
    pub fn new(options: ConverterOptions) -> Self {
        Self::with_registry(options, ProtocolRegistry::with_builtin_parsers())
    }

    /// Creates a converter dispatching through a custom registry
    pub fn with_registry(options: ConverterOptions, registry: ProtocolRegistry) -> Self {
        Self {
            diagnostics: DiagnosticSink::for_mode(options.debug),
            registry,
            options,
            server_counter: 0,
        }
    }

    pub fn options(&self) -> &ConverterOptions {
        &self.options
    }

    fn parse_context(&self) -> ParseContext {
        ParseContext {
            multiplex: self.options.multiplex,
        }
    }

    /// Converts one link
    ///
    /// Returns `None` for unknown schemes and for links that fail to parse.
    /// Failures are recorded as diagnostics in debug mode.
    pub fn convert_to_outbound(&mut self, link: &str) -> Option<Outbound> {
        let link = link.trim();
        let ctx = self.parse_context();

        match self.registry.parse_link(link, &ctx) {
            None => {
                trace!("No parser for link, skipping");
                None
            }
            Some(Ok(outbound)) => {
                self.server_counter += 1;
                Some(outbound)
            }
            Some(Err(e)) => {
                debug!("Skipping link: {}", e);
                self.diagnostics.push_error(&e);
                None
            }
        }
    }

    /// Converts one link and wraps it in a full config
    pub fn create_full_config(&mut self, link: &str) -> Option<FullConfig> {
        let outbound = self.convert_to_outbound(link)?;
        Some(FullConfig::assemble(outbound, &self.options.test_url))
    }

    /// Extracts candidate links from subscription text
    pub fn extract_links(&self, input: &str) -> Vec<String> {
        extract_links(input)
    }

    /// Extracts and converts every link in a text blob, in order
    pub fn convert_text(&mut self, input: &str) -> Vec<Outbound> {
        let links = extract_links(input);
        self.convert_links(&links)
    }

    /// Extracts and converts links from several text blobs
    pub fn convert_multiple<I, S>(&mut self, inputs: I) -> Vec<Outbound>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let links = extract_links_from_many(inputs);
        self.convert_links(&links)
    }

    fn convert_links(&mut self, links: &[String]) -> Vec<Outbound> {
        let mut outbounds: Vec<Outbound> = links
            .iter()
            .filter_map(|link| self.convert_to_outbound(link))
            .collect();
        info!("Converted {} of {} link(s)", outbounds.len(), links.len());

        if self.options.unique_tags {
            make_tags_unique(&mut outbounds);
        }
        outbounds
    }

    /// Checks that a link has a recognized prefix and converts cleanly
    pub fn validate_link(&mut self, link: &str) -> bool {
        has_supported_prefix(link) && self.convert_to_outbound(link).is_some()
    }

    /// Number of successful conversions since creation or the last reset
    pub fn server_count(&self) -> usize {
        self.server_counter
    }

    pub fn stats(&self) -> Stats {
        Stats::new(
            self.server_counter,
            self.diagnostics.len(),
            self.options.multiplex,
            self.options.debug,
        )
    }

    /// Recorded diagnostics, always empty outside debug mode
    pub fn errors(&self) -> &[String] {
        self.diagnostics.entries()
    }

    pub fn clear_errors(&mut self) {
        self.diagnostics.clear();
    }

    /// Clears the counter and diagnostics, keeping options
    pub fn reset(&mut self) {
        self.server_counter = 0;
        self.diagnostics.clear();
    }

    pub fn set_multiplex_enabled(&mut self, enabled: bool) {
        self.options.multiplex = enabled;
    }

    /// Switches debug mode; leaving it drops recorded diagnostics
    pub fn set_debug_mode(&mut self, enabled: bool) {
        if self.options.debug != enabled {
            self.options.debug = enabled;
            self.diagnostics = DiagnosticSink::for_mode(enabled);
        }
    }
}

/// Renames repeated tags to `tag-2`, `tag-3`, ... in list order
pub fn make_tags_unique(outbounds: &mut [Outbound]) {
    let mut seen: HashMap<String, usize> = HashMap::new();
    for outbound in outbounds.iter_mut() {
        let count = seen.entry(outbound.tag().to_string()).or_insert(0);
        *count += 1;
        if *count > 1 {
            let tag = format!("{}-{}", outbound.tag(), count);
            outbound.set_tag(tag);
        }
    }
}
