//! VMess protocol parser
//!
//! This module provides parsing for VMess (vmess://) links.
//! VMess links are Base64 encoded JSON containing connection details.

use serde_json::Value;
use tracing::trace;

use crate::config::outbound::{Outbound, VMessOutbound};
use crate::config::shared::OutboundTlsConfig;
use crate::error::ConvertError;
use crate::parser::base64::decode_base64;
use crate::parser::link::{DEFAULT_PORT, Params};
use crate::parser::transport::{build_transport, is_supported_transport};

use super::{ParseContext, ProtocolParser};

const TAG: &str = "vmess-out";

// ============================================================================
// VMess Parser
// ============================================================================

/// Parser for VMess (vmess://) links
///
/// VMess links are Base64 encoded JSON:
/// vmess://BASE64({ "v": "2", "ps": "name", "add": "host", "port": 443, ... })
///
/// The JSON object is read into a [`Params`] bag so `net`, `path`, `host`
/// and `serviceName` reach the transport builder the same way query
/// parameters do for other schemes.
pub struct VMessParser;

impl ProtocolParser for VMessParser {
    fn scheme(&self) -> &str {
        "vmess"
    }

    fn parse(&self, link: &str, _ctx: &ParseContext) -> Result<Outbound, ConvertError> {
        trace!("Parsing VMess link");

        let encoded = link
            .trim()
            .strip_prefix("vmess://")
            .ok_or_else(|| ConvertError::malformed("vmess", "missing vmess:// prefix"))?;

        let params = decode_payload(encoded)?;
        trace!("Decoded VMess payload with {} fields", params.len());

        let server = params
            .get_owned("add")
            .ok_or_else(|| ConvertError::malformed("vmess", "missing server address"))?;

        let server_port = params
            .get("port")
            .and_then(|p| p.trim().parse::<u16>().ok())
            .filter(|p| *p != 0)
            .unwrap_or(DEFAULT_PORT);

        let alter_id = params
            .get("aid")
            .and_then(|a| a.trim().parse::<u32>().ok())
            .unwrap_or(0);

        let net = params.get_or("net", "tcp");
        let transport = if net != "tcp" && is_supported_transport(net) {
            build_transport(net, &params)
        } else {
            None
        };

        let tls = (params.get("tls") == Some("tls"))
            .then(|| OutboundTlsConfig::with_server_name(params.get_owned("sni")));

        Ok(Outbound::VMess(VMessOutbound {
            tag: TAG.to_string(),
            server,
            server_port,
            uuid: params.get_or("id", "").to_string(),
            alter_id,
            transport,
            tls,
        }))
    }
}

/// Decodes the Base64 JSON payload of a VMess link
fn decode_payload(encoded: &str) -> Result<Params, ConvertError> {
    let decoded = decode_base64(encoded).map_err(|e| ConvertError::decode("VMess payload", e))?;
    let text = String::from_utf8(decoded).map_err(|e| ConvertError::decode("VMess payload", e))?;
    let json: Value =
        serde_json::from_str(&text).map_err(|e| ConvertError::decode("VMess JSON", e))?;
    let object = json
        .as_object()
        .ok_or_else(|| ConvertError::decode("VMess JSON", "payload is not an object"))?;
    Ok(Params::from_json_object(object))
}
