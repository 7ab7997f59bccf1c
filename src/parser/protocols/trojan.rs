//! Trojan protocol parser
//!
//! This module provides parsing for Trojan (trojan://) links.
//! Format: trojan://password@host:port?params#remark

use tracing::trace;

use crate::config::outbound::{Outbound, TrojanOutbound};
use crate::config::shared::OutboundTlsConfig;
use crate::error::ConvertError;
use crate::parser::link::ParsedLink;
use crate::parser::transport::{build_transport, is_supported_transport};

use super::{ParseContext, ProtocolParser};

const TAG: &str = "trojan-out";

// ============================================================================
// Trojan Parser
// ============================================================================

/// Parser for Trojan (trojan://) links
///
/// TLS is always enabled. A `type` outside the supported transport set is
/// dropped rather than rejecting the link.
pub struct TrojanParser;

impl ProtocolParser for TrojanParser {
    fn scheme(&self) -> &str {
        "trojan"
    }

    fn parse(&self, link: &str, _ctx: &ParseContext) -> Result<Outbound, ConvertError> {
        trace!("Parsing Trojan link");
        let link = ParsedLink::parse(link)?;

        let transport_type = link.params.get_or("type", "tcp");
        let transport = if is_supported_transport(transport_type) {
            build_transport(transport_type, &link.params)
        } else {
            trace!("Ignoring unsupported Trojan transport {:?}", transport_type);
            None
        };

        Ok(Outbound::Trojan(TrojanOutbound {
            tag: TAG.to_string(),
            password: link.userinfo(),
            tls: Some(OutboundTlsConfig::with_server_name(
                link.params.get_owned("sni"),
            )),
            transport,
            server: link.host,
            server_port: link.port,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::outbound::V2RayTransport;

    fn parse(uri: &str) -> Result<Outbound, ConvertError> {
        TrojanParser.parse(uri, &ParseContext::default())
    }

    #[test]
    fn test_trojan_basic() {
        let outbound = parse("trojan://secret@example.com:8443?sni=tls.example.com#node").unwrap();

        if let Outbound::Trojan(trojan) = outbound {
            assert_eq!(trojan.tag, "trojan-out");
            assert_eq!(trojan.server, "example.com");
            assert_eq!(trojan.server_port, 8443);
            assert_eq!(trojan.password, "secret");
            let tls = trojan.tls.unwrap();
            assert!(tls.enabled);
            assert_eq!(tls.server_name, Some("tls.example.com".to_string()));
            assert!(trojan.transport.is_none());
        } else {
            panic!("Expected Trojan outbound");
        }
    }

    #[test]
    fn test_trojan_default_tls_enabled() {
        if let Outbound::Trojan(trojan) = parse("trojan://secret@example.com").unwrap() {
            let tls = trojan.tls.unwrap();
            assert!(tls.enabled);
            assert!(tls.server_name.is_none());
            assert_eq!(trojan.server_port, 443);
        } else {
            panic!("Expected Trojan outbound");
        }
    }

    #[test]
    fn test_trojan_with_websocket() {
        let outbound =
            parse("trojan://secret@example.com:443?type=ws&path=/ws&host=cdn.example.com").unwrap();

        if let Outbound::Trojan(trojan) = outbound {
            if let Some(V2RayTransport::WebSocket(ws)) = trojan.transport {
                assert_eq!(ws.path, Some("/ws".to_string()));
                assert_eq!(ws.headers.get("Host"), Some(&"cdn.example.com".to_string()));
            } else {
                panic!("Expected WebSocket transport");
            }
        } else {
            panic!("Expected Trojan outbound");
        }
    }

    #[test]
    fn test_trojan_unsupported_transport_dropped() {
        if let Outbound::Trojan(trojan) = parse("trojan://secret@example.com?type=kcp").unwrap() {
            assert!(trojan.transport.is_none());
        } else {
            panic!("Expected Trojan outbound");
        }
    }

    #[test]
    fn test_trojan_url_encoded_password() {
        if let Outbound::Trojan(trojan) = parse("trojan://p%40ss%3Aword@example.com:443").unwrap() {
            assert_eq!(trojan.password, "p@ss:word");
        } else {
            panic!("Expected Trojan outbound");
        }
    }

    #[test]
    fn test_trojan_missing_host() {
        assert!(parse("trojan://secret@:443").is_err());
    }

    #[test]
    fn test_scheme() {
        assert_eq!(TrojanParser.scheme(), "trojan");
    }
}
