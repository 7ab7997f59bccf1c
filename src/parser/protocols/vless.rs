//! VLESS protocol parser
//!
//! This module provides parsing for VLESS (vless://) links.
//! Format: vless://uuid@host:port?params#remark

use tracing::trace;

use crate::config::outbound::{Outbound, OutboundMultiplex, VLessOutbound};
use crate::error::ConvertError;
use crate::parser::link::ParsedLink;
use crate::parser::tls::{Security, build_tls};
use crate::parser::transport::{build_transport, is_supported_transport};

use super::{ParseContext, ProtocolParser};

const TAG: &str = "vless-out";

// ============================================================================
// VLESS Parser
// ============================================================================

/// Parser for VLESS (vless://) links
///
/// Format: vless://uuid@host:port?params#remark
pub struct VLessParser;

impl ProtocolParser for VLessParser {
    fn scheme(&self) -> &str {
        "vless"
    }

    fn parse(&self, link: &str, ctx: &ParseContext) -> Result<Outbound, ConvertError> {
        trace!("Parsing VLESS link");
        let link = ParsedLink::parse(link)?;

        let uuid = link.user();
        if uuid.is_empty() {
            return Err(ConvertError::malformed("vless", "missing UUID"));
        }

        let transport_type = link.params.get_or("type", "tcp");
        if !is_supported_transport(transport_type) {
            return Err(ConvertError::UnsupportedTransport(transport_type.to_string()));
        }
        let transport = build_transport(transport_type, &link.params);

        let tls = match Security::from_params(&link.params) {
            Security::None => None,
            security => Some(build_tls(security, &link.params)?),
        };

        Ok(Outbound::VLess(VLessOutbound {
            tag: TAG.to_string(),
            server: link.host,
            server_port: link.port,
            uuid,
            flow: String::new(),
            encryption: "none".to_string(),
            transport,
            tls,
            multiplex: ctx.multiplex.then(OutboundMultiplex::h2mux),
        }))
    }
}
