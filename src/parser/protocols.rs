//! Protocol parsers module
//!
//! This module contains parsers for the supported subscription link formats.
//! Each parser implements the `ProtocolParser` trait and is looked up by its
//! exact scheme in a `ProtocolRegistry`.

mod hysteria2;
mod shadowsocks;
mod trojan;
mod tuic;
mod vless;
mod vmess;

pub use hysteria2::Hysteria2Parser;
pub use shadowsocks::{ShadowsocksParser, VALID_SS_METHODS};
pub use trojan::TrojanParser;
pub use tuic::TuicParser;
pub use vless::VLessParser;
pub use vmess::VMessParser;

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::config::outbound::Outbound;
use crate::error::ConvertError;

/// Link prefixes the converter recognizes, in dispatch order
pub const SUPPORTED_PROTOCOLS: &[&str] = &[
    "vless://",
    "vmess://",
    "trojan://",
    "hysteria2://",
    "hy2://",
    "ss://",
    "tuic://",
];

/// Checks whether a link starts with a recognized prefix
pub fn has_supported_prefix(link: &str) -> bool {
    SUPPORTED_PROTOCOLS.iter().any(|p| link.starts_with(p))
}

// ============================================================================
// Protocol Parser Trait
// ============================================================================

/// Per-converter settings that influence the produced outbound
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseContext {
    /// Attach an h2mux multiplex section where the protocol supports it
    pub multiplex: bool,
}

/// Trait for parsing individual protocol links
pub trait ProtocolParser: Send + Sync {
    /// Returns the link scheme this parser handles (e.g., "ss", "vmess")
    fn scheme(&self) -> &str;

    /// Parses a link into an outbound configuration
    fn parse(&self, link: &str, ctx: &ParseContext) -> Result<Outbound, ConvertError>;

    /// Checks if this parser can handle the given link
    fn can_parse(&self, link: &str) -> bool {
        link.strip_prefix(self.scheme())
            .is_some_and(|rest| rest.starts_with("://"))
    }
}

// ============================================================================
// Protocol Registry
// ============================================================================

/// Registry for protocol parsers with dynamic dispatch
#[derive(Default)]
pub struct ProtocolRegistry {
    parsers: HashMap<String, Arc<dyn ProtocolParser>>,
}

impl ProtocolRegistry {
    /// Creates a new empty registry
    pub fn new() -> Self {
        Self {
            parsers: HashMap::new(),
        }
    }

    /// Creates a registry with all built-in parsers registered
    pub fn with_builtin_parsers() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(VLessParser));
        registry.register(Arc::new(VMessParser));
        registry.register(Arc::new(TrojanParser));
        registry.register(Arc::new(ShadowsocksParser));
        registry.register(Arc::new(Hysteria2Parser::new("hysteria2")));
        registry.register(Arc::new(Hysteria2Parser::new("hy2")));
        registry.register(Arc::new(TuicParser));
        registry
    }

    /// Registers a protocol parser
    pub fn register(&mut self, parser: Arc<dyn ProtocolParser>) {
        self.parsers.insert(parser.scheme().to_string(), parser);
    }

    /// Gets a parser for the given scheme
    pub fn get(&self, scheme: &str) -> Option<&Arc<dyn ProtocolParser>> {
        self.parsers.get(scheme)
    }

    /// Parses a link with the parser registered for its scheme
    ///
    /// Returns `None` when no parser handles the scheme.
    pub fn parse_link(
        &self,
        link: &str,
        ctx: &ParseContext,
    ) -> Option<Result<Outbound, ConvertError>> {
        let scheme = extract_scheme(link)?;
        let parser = self.parsers.get(scheme)?;
        debug!("Parsing link with scheme '{}'", scheme);

        let result = parser.parse(link, ctx);
        match &result {
            Ok(outbound) => debug!("Parsed {} link -> outbound '{}'", scheme, outbound.tag()),
            Err(e) => debug!("Failed to parse {} link: {}", scheme, e),
        }
        Some(result)
    }
}

/// Extracts the scheme from a link
pub fn extract_scheme(link: &str) -> Option<&str> {
    link.split_once("://")
        .map(|(scheme, _)| scheme)
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_registry_new() {
        let registry = ProtocolRegistry::new();
        assert!(registry.parsers.is_empty());
    }

    #[test]
    fn test_protocol_registry_with_builtin_parsers() {
        let registry = ProtocolRegistry::with_builtin_parsers();
        for scheme in ["vless", "vmess", "trojan", "ss", "hysteria2", "hy2", "tuic"] {
            assert!(registry.get(scheme).is_some(), "{}", scheme);
        }
        assert!(registry.get("ssr").is_none());
    }

    #[test]
    fn test_every_supported_prefix_has_a_parser() {
        let registry = ProtocolRegistry::with_builtin_parsers();
        for prefix in SUPPORTED_PROTOCOLS {
            let scheme = prefix.trim_end_matches("://");
            assert!(registry.get(scheme).is_some(), "{}", scheme);
        }
    }

    #[test]
    fn test_extract_scheme() {
        assert_eq!(extract_scheme("ss://abc"), Some("ss"));
        assert_eq!(extract_scheme("hy2://x@y"), Some("hy2"));
        assert_eq!(extract_scheme("not-a-link"), None);
        assert_eq!(extract_scheme("://missing"), None);
    }

    #[test]
    fn test_parse_link_unknown_scheme() {
        let registry = ProtocolRegistry::with_builtin_parsers();
        assert!(registry.parse_link("wireguard://test", &ParseContext::default()).is_none());
        assert!(registry.parse_link("no scheme", &ParseContext::default()).is_none());
    }

    #[test]
    fn test_dispatch_is_case_sensitive() {
        let registry = ProtocolRegistry::with_builtin_parsers();
        assert!(
            registry
                .parse_link("VLESS://uuid@example.com", &ParseContext::default())
                .is_none()
        );
    }

    #[test]
    fn test_hy2_alias_dispatches_to_hysteria2() {
        let registry = ProtocolRegistry::with_builtin_parsers();
        let outbound = registry
            .parse_link("hy2://pw@example.com:443", &ParseContext::default())
            .unwrap()
            .unwrap();
        assert_eq!(outbound.type_name(), "hysteria2");
        assert_eq!(outbound.tag(), "hysteria2-out");
    }

    #[test]
    fn test_has_supported_prefix() {
        assert!(has_supported_prefix("vmess://abc"));
        assert!(has_supported_prefix("hy2://abc"));
        assert!(!has_supported_prefix("http://abc"));
        assert!(!has_supported_prefix(" vless://abc"));
    }

    #[test]
    fn test_can_parse() {
        assert!(VLessParser.can_parse("vless://uuid@host"));
        assert!(!VLessParser.can_parse("vlessx://uuid@host"));
        assert!(!VLessParser.can_parse("vmess://abc"));
        assert!(Hysteria2Parser::new("hy2").can_parse("hy2://pw@host"));
    }
}
