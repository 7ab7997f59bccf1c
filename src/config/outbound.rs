use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::shared::OutboundTlsConfig;
use crate::config::util::is_false;

// ============================================================================
// Outbound Enum
// ============================================================================

/// Outbound configuration enum
///
/// Represents the proxy outbound types a subscription link can be converted to.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Outbound {
    /// VLESS outbound
    #[serde(rename = "vless")]
    VLess(VLessOutbound),
    /// VMess outbound
    #[serde(rename = "vmess")]
    VMess(VMessOutbound),
    /// Trojan outbound
    Trojan(TrojanOutbound),
    /// Shadowsocks outbound
    Shadowsocks(ShadowsocksOutbound),
    /// Hysteria2 outbound
    Hysteria2(Hysteria2Outbound),
    /// TUIC outbound
    #[serde(rename = "tuic")]
    Tuic(TuicOutbound),
}

impl Outbound {
    /// Returns the outbound tag
    pub fn tag(&self) -> &str {
        match self {
            Outbound::VLess(o) => &o.tag,
            Outbound::VMess(o) => &o.tag,
            Outbound::Trojan(o) => &o.tag,
            Outbound::Shadowsocks(o) => &o.tag,
            Outbound::Hysteria2(o) => &o.tag,
            Outbound::Tuic(o) => &o.tag,
        }
    }

    /// Replaces the outbound tag
    pub fn set_tag(&mut self, tag: String) {
        match self {
            Outbound::VLess(o) => o.tag = tag,
            Outbound::VMess(o) => o.tag = tag,
            Outbound::Trojan(o) => o.tag = tag,
            Outbound::Shadowsocks(o) => o.tag = tag,
            Outbound::Hysteria2(o) => o.tag = tag,
            Outbound::Tuic(o) => o.tag = tag,
        }
    }

    /// sing-box `type` value of this outbound
    pub fn type_name(&self) -> &'static str {
        match self {
            Outbound::VLess(_) => "vless",
            Outbound::VMess(_) => "vmess",
            Outbound::Trojan(_) => "trojan",
            Outbound::Shadowsocks(_) => "shadowsocks",
            Outbound::Hysteria2(_) => "hysteria2",
            Outbound::Tuic(_) => "tuic",
        }
    }

    /// Returns `(server, server_port)`
    pub fn server(&self) -> (&str, u16) {
        match self {
            Outbound::VLess(o) => (&o.server, o.server_port),
            Outbound::VMess(o) => (&o.server, o.server_port),
            Outbound::Trojan(o) => (&o.server, o.server_port),
            Outbound::Shadowsocks(o) => (&o.server, o.server_port),
            Outbound::Hysteria2(o) => (&o.server, o.server_port),
            Outbound::Tuic(o) => (&o.server, o.server_port),
        }
    }

    /// TLS section, if the outbound has one
    pub fn tls(&self) -> Option<&OutboundTlsConfig> {
        match self {
            Outbound::VLess(o) => o.tls.as_ref(),
            Outbound::VMess(o) => o.tls.as_ref(),
            Outbound::Trojan(o) => o.tls.as_ref(),
            Outbound::Hysteria2(o) => o.tls.as_ref(),
            Outbound::Tuic(o) => o.tls.as_ref(),
            Outbound::Shadowsocks(_) => None,
        }
    }

    /// Transport section, if the outbound has one
    pub fn transport(&self) -> Option<&V2RayTransport> {
        match self {
            Outbound::VLess(o) => o.transport.as_ref(),
            Outbound::VMess(o) => o.transport.as_ref(),
            Outbound::Trojan(o) => o.transport.as_ref(),
            _ => None,
        }
    }
}

// ============================================================================
// Common Types
// ============================================================================

/// Multiplex configuration for outbound
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct OutboundMultiplex {
    /// Enable multiplex
    #[serde(default, skip_serializing_if = "is_false")]
    pub enabled: bool,

    /// Multiplex protocol: smux, yamux, h2mux (default: h2mux)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,

    /// Maximum streams per connection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_streams: Option<u32>,

    /// Enable padding
    #[serde(default)]
    pub padding: bool,
}

impl OutboundMultiplex {
    /// h2mux with 16 streams per connection and no padding
    pub fn h2mux() -> Self {
        Self {
            enabled: true,
            protocol: Some("h2mux".to_string()),
            max_streams: Some(16),
            padding: false,
        }
    }
}

/// V2Ray transport configuration for outbound
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum V2RayTransport {
    /// HTTP transport (also covers `h2` and `http2` link types)
    Http(HttpTransport),
    /// WebSocket transport
    #[serde(rename = "ws")]
    WebSocket(WebSocketTransport),
    /// QUIC transport
    Quic(QuicTransport),
    /// gRPC transport
    #[serde(rename = "grpc")]
    Grpc(GrpcTransport),
    /// HTTPUpgrade transport
    #[serde(rename = "httpupgrade")]
    HttpUpgrade(HttpUpgradeTransport),
}

impl V2RayTransport {
    /// sing-box `type` value of this transport
    pub fn type_name(&self) -> &'static str {
        match self {
            V2RayTransport::Http(_) => "http",
            V2RayTransport::WebSocket(_) => "ws",
            V2RayTransport::Quic(_) => "quic",
            V2RayTransport::Grpc(_) => "grpc",
            V2RayTransport::HttpUpgrade(_) => "httpupgrade",
        }
    }
}

/// HTTP transport configuration
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct HttpTransport {
    /// Host domains
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub host: Vec<String>,

    /// HTTP request path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// WebSocket transport configuration
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct WebSocketTransport {
    /// HTTP request path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Extra headers
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,
}

/// QUIC transport configuration
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct QuicTransport {}

/// gRPC transport configuration
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct GrpcTransport {
    /// gRPC service name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
}

/// HTTPUpgrade transport configuration
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct HttpUpgradeTransport {
    /// HTTP request path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Extra headers
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,
}

// ============================================================================
// Outbound Types
// ============================================================================

/// VLESS outbound configuration
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct VLessOutbound {
    pub tag: String,
    pub server: String,
    pub server_port: u16,

    /// VLESS UUID
    pub uuid: String,

    /// VLESS flow, always empty for converted links
    #[serde(default)]
    pub flow: String,

    /// Always `none`
    #[serde(default)]
    pub encryption: String,

    /// V2Ray transport configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport: Option<V2RayTransport>,

    /// TLS configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls: Option<OutboundTlsConfig>,

    /// Multiplex configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiplex: Option<OutboundMultiplex>,
}

/// VMess outbound configuration
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct VMessOutbound {
    pub tag: String,
    pub server: String,
    pub server_port: u16,

    /// VMess user UUID
    pub uuid: String,

    /// Alter ID (0 = AEAD, 1 = legacy)
    #[serde(default)]
    pub alter_id: u32,

    /// V2Ray transport configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport: Option<V2RayTransport>,

    /// TLS configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls: Option<OutboundTlsConfig>,
}

/// Trojan outbound configuration
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct TrojanOutbound {
    pub tag: String,
    pub server: String,
    pub server_port: u16,

    /// Trojan password
    pub password: String,

    /// TLS configuration (always enabled)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls: Option<OutboundTlsConfig>,

    /// V2Ray transport configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport: Option<V2RayTransport>,
}

/// Shadowsocks outbound configuration
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ShadowsocksOutbound {
    pub tag: String,
    pub server: String,
    pub server_port: u16,

    /// Encryption method
    pub method: String,

    /// Password
    pub password: String,
}

/// Hysteria2 outbound configuration
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Hysteria2Outbound {
    pub tag: String,
    pub server: String,
    pub server_port: u16,

    /// Authentication password
    pub password: String,

    /// TLS configuration (always enabled)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls: Option<OutboundTlsConfig>,
}

/// TUIC outbound configuration
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct TuicOutbound {
    pub tag: String,
    pub server: String,
    pub server_port: u16,

    /// TUIC UUID
    pub uuid: String,

    /// TUIC password
    #[serde(default)]
    pub password: String,

    /// Congestion control: cubic, new_reno, bbr (default: cubic)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub congestion_control: Option<String>,

    /// UDP relay mode: native, quic (default: native)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub udp_relay_mode: Option<String>,

    /// TLS configuration (always enabled)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls: Option<OutboundTlsConfig>,
}
