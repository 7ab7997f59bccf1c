//! Subscription and Protocol Parsing Module
//!
//! This module provides functionality for:
//! - Extracting candidate links from plain or Base64 encoded subscription text
//! - Splitting links into host, port, credentials and parameters
//! - Building transport and TLS sections shared by several protocols
//! - Parsing protocol links (vless://, vmess://, trojan://, ss://, hysteria2://, hy2://, tuic://)

pub mod base64;
pub mod extract;
pub mod link;
pub mod protocols;
pub mod tls;
pub mod transport;

pub use extract::{extract_links, extract_links_from_many};
pub use link::{DEFAULT_PORT, Params, ParsedLink};
pub use protocols::{
    ParseContext, ProtocolParser, ProtocolRegistry, SUPPORTED_PROTOCOLS, VALID_SS_METHODS,
    has_supported_prefix,
};
pub use transport::SUPPORTED_TRANSPORTS;
