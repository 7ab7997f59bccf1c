//! Shared field structures for sing-box configuration.
//!
//! Reusable structures embedded in several outbound and inbound types.

use serde::{Deserialize, Serialize};

use crate::config::util::is_false;

// ============================================================================
// Listen Fields
// ============================================================================

/// Listen fields for inbounds
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ListenFields {
    /// Listen address (required)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listen: Option<String>,

    /// Listen port
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listen_port: Option<u16>,
}

// ============================================================================
// TLS Fields
// ============================================================================

/// TLS configuration for outbound (client).
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct OutboundTlsConfig {
    /// Enable TLS
    #[serde(default, skip_serializing_if = "is_false")]
    pub enabled: bool,

    /// Server name for verification and SNI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_name: Option<String>,

    /// List of supported ALPN protocols
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alpn: Vec<String>,

    /// uTLS configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utls: Option<UtlsConfig>,

    /// Reality configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reality: Option<OutboundRealityConfig>,
}

impl OutboundTlsConfig {
    /// Plain TLS with an optional SNI
    pub fn with_server_name(server_name: Option<String>) -> Self {
        Self {
            enabled: true,
            server_name,
            ..Default::default()
        }
    }
}

/// uTLS configuration for TLS fingerprint resistance.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct UtlsConfig {
    /// Enable uTLS
    #[serde(default, skip_serializing_if = "is_false")]
    pub enabled: bool,

    /// Fingerprint to use: chrome, firefox, edge, safari, 360, qq, ios, android, random, randomized
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
}

/// Reality configuration for outbound (client).
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct OutboundRealityConfig {
    /// Enable Reality
    #[serde(default, skip_serializing_if = "is_false")]
    pub enabled: bool,

    /// Public key (generated by `sing-box generate reality-keypair`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,

    /// Short ID (hex string, 0-8 digits)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outbound_tls_serialization() {
        let tls = OutboundTlsConfig {
            enabled: true,
            server_name: Some("example.com".to_string()),
            alpn: vec!["h2".to_string(), "http/1.1".to_string()],
            ..Default::default()
        };
        let json = serde_json::to_string(&tls).unwrap();
        assert!(json.contains(r#""enabled":true"#));
        assert!(json.contains(r#""server_name":"example.com""#));
        assert!(json.contains(r#""alpn":["h2","http/1.1"]"#));
        assert!(!json.contains("utls"));
        assert!(!json.contains("reality"));
    }

    #[test]
    fn test_tls_with_server_name_none() {
        let tls = OutboundTlsConfig::with_server_name(None);
        let json = serde_json::to_string(&tls).unwrap();
        assert_eq!(json, r#"{"enabled":true}"#);
    }

    #[test]
    fn test_reality_serialization() {
        let reality = OutboundRealityConfig {
            enabled: true,
            public_key: Some("key".to_string()),
            short_id: None,
        };
        let json = serde_json::to_string(&reality).unwrap();
        assert_eq!(json, r#"{"enabled":true,"public_key":"key"}"#);
    }

    #[test]
    fn test_listen_fields_serialization() {
        let listen = ListenFields {
            listen: Some("127.0.0.1".to_string()),
            listen_port: Some(1080),
        };
        let json = serde_json::to_string(&listen).unwrap();
        assert_eq!(json, r#"{"listen":"127.0.0.1","listen_port":1080}"#);
    }
}
