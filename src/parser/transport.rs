//! V2Ray transport builder
//!
//! Turns a link's transport `type` and its parameters into a sing-box
//! transport section. `http`, `h2` and `http2` all map to sing-box's `http`
//! transport.

use std::collections::HashMap;

use tracing::trace;

use crate::config::outbound::{
    GrpcTransport, HttpTransport, HttpUpgradeTransport, QuicTransport, V2RayTransport,
    WebSocketTransport,
};

use super::link::Params;

/// Transport `type` values accepted in links
pub const SUPPORTED_TRANSPORTS: &[&str] = &[
    "tcp",
    "ws",
    "http",
    "quic",
    "grpc",
    "httpupgrade",
    "h2",
    "http2",
];

/// Transport families, with link-level aliases folded together
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    Tcp,
    WebSocket,
    HttpUpgrade,
    Http,
    Quic,
    Grpc,
}

impl TransportKind {
    /// Looks up a link `type` value
    pub fn from_type(transport_type: &str) -> Option<Self> {
        match transport_type {
            "tcp" => Some(Self::Tcp),
            "ws" => Some(Self::WebSocket),
            "httpupgrade" => Some(Self::HttpUpgrade),
            "http" | "h2" | "http2" => Some(Self::Http),
            "quic" => Some(Self::Quic),
            "grpc" => Some(Self::Grpc),
            _ => None,
        }
    }
}

/// Checks whether a link `type` value is supported
pub fn is_supported_transport(transport_type: &str) -> bool {
    SUPPORTED_TRANSPORTS.contains(&transport_type)
}

/// Builds the transport section for `transport_type`
///
/// Returns `None` for `tcp` and for unknown types; callers omit the
/// transport key in that case.
pub fn build_transport(transport_type: &str, params: &Params) -> Option<V2RayTransport> {
    let kind = TransportKind::from_type(transport_type)?;
    trace!("Building {:?} transport from type {:?}", kind, transport_type);

    let transport = match kind {
        TransportKind::Tcp => return None,
        TransportKind::WebSocket => V2RayTransport::WebSocket(WebSocketTransport {
            path: params.get_owned("path"),
            headers: host_header(params),
        }),
        TransportKind::HttpUpgrade => V2RayTransport::HttpUpgrade(HttpUpgradeTransport {
            path: params.get_owned("path"),
            headers: host_header(params),
        }),
        TransportKind::Http => V2RayTransport::Http(HttpTransport {
            host: params.get_owned("host").into_iter().collect(),
            path: params.get_owned("path"),
        }),
        TransportKind::Grpc => V2RayTransport::Grpc(GrpcTransport {
            service_name: params
                .get_owned("serviceName")
                .or_else(|| params.get_owned("grpcServiceName")),
        }),
        TransportKind::Quic => V2RayTransport::Quic(QuicTransport {}),
    };

    Some(transport)
}

fn host_header(params: &Params) -> HashMap<String, String> {
    params
        .get("host")
        .map(|host| HashMap::from([("Host".to_string(), host.to_string())]))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_websocket_with_path_and_host() {
        let params = Params::from_query("path=%2Fws&host=cdn.example.com");
        let transport = build_transport("ws", &params).unwrap();
        if let V2RayTransport::WebSocket(ws) = transport {
            assert_eq!(ws.path, Some("/ws".to_string()));
            assert_eq!(ws.headers.get("Host"), Some(&"cdn.example.com".to_string()));
        } else {
            panic!("Expected WebSocket transport");
        }
    }

    #[test]
    fn test_websocket_without_params() {
        let transport = build_transport("ws", &Params::default()).unwrap();
        let json = serde_json::to_string(&transport).unwrap();
        assert_eq!(json, r#"{"type":"ws"}"#);
    }

    #[test]
    fn test_httpupgrade_uses_headers() {
        let params = Params::from_query("path=/up&host=h.example");
        let transport = build_transport("httpupgrade", &params).unwrap();
        if let V2RayTransport::HttpUpgrade(up) = transport {
            assert_eq!(up.path, Some("/up".to_string()));
            assert_eq!(up.headers.get("Host"), Some(&"h.example".to_string()));
        } else {
            panic!("Expected HTTPUpgrade transport");
        }
    }

    #[test]
    fn test_http_aliases_use_host_list() {
        let params = Params::from_query("path=/h2&host=h2.example");
        for alias in ["http", "h2", "http2"] {
            let transport = build_transport(alias, &params).unwrap();
            if let V2RayTransport::Http(http) = transport {
                assert_eq!(http.host, vec!["h2.example".to_string()]);
                assert_eq!(http.path, Some("/h2".to_string()));
            } else {
                panic!("Expected HTTP transport for {}", alias);
            }
        }
    }

    #[test]
    fn test_grpc_service_name_fallback() {
        let params = Params::from_query("serviceName=primary&grpcServiceName=secondary");
        if let Some(V2RayTransport::Grpc(grpc)) = build_transport("grpc", &params) {
            assert_eq!(grpc.service_name, Some("primary".to_string()));
        } else {
            panic!("Expected gRPC transport");
        }

        let params = Params::from_query("grpcServiceName=secondary");
        if let Some(V2RayTransport::Grpc(grpc)) = build_transport("grpc", &params) {
            assert_eq!(grpc.service_name, Some("secondary".to_string()));
        } else {
            panic!("Expected gRPC transport");
        }
    }

    #[test]
    fn test_quic_has_no_fields() {
        let params = Params::from_query("path=/ignored&host=ignored");
        let transport = build_transport("quic", &params).unwrap();
        assert_eq!(serde_json::to_string(&transport).unwrap(), r#"{"type":"quic"}"#);
    }

    #[test]
    fn test_tcp_and_unknown_yield_nothing() {
        assert!(build_transport("tcp", &Params::default()).is_none());
        assert!(build_transport("xhttp", &Params::default()).is_none());
    }

    #[test]
    fn test_supported_set() {
        assert!(is_supported_transport("h2"));
        assert!(is_supported_transport("tcp"));
        assert!(!is_supported_transport("kcp"));
        assert!(!is_supported_transport("WS"));
    }
}
