//! Hysteria2 protocol parser
//!
//! This module provides parsing for Hysteria2 (hysteria2:// or hy2://) links.
//! Format: hysteria2://auth@host:port?params#remark

use tracing::trace;

use crate::config::outbound::{Hysteria2Outbound, Outbound};
use crate::config::shared::OutboundTlsConfig;
use crate::error::ConvertError;
use crate::parser::link::ParsedLink;

use super::{ParseContext, ProtocolParser};

const TAG: &str = "hysteria2-out";

// ============================================================================
// Hysteria2 Parser
// ============================================================================

/// Parser for Hysteria2 (hysteria2:// or hy2://) links
///
/// One instance is registered per scheme alias; both produce a `hysteria2`
/// outbound.
pub struct Hysteria2Parser {
    scheme: &'static str,
}

impl Hysteria2Parser {
    pub fn new(scheme: &'static str) -> Self {
        Self { scheme }
    }
}

impl ProtocolParser for Hysteria2Parser {
    fn scheme(&self) -> &str {
        self.scheme
    }

    fn parse(&self, link: &str, _ctx: &ParseContext) -> Result<Outbound, ConvertError> {
        trace!("Parsing Hysteria2 link (scheme: {})", self.scheme);
        let link = ParsedLink::parse(link)?;

        Ok(Outbound::Hysteria2(Hysteria2Outbound {
            tag: TAG.to_string(),
            password: link.userinfo(),
            tls: Some(OutboundTlsConfig::with_server_name(
                link.params.get_owned("sni"),
            )),
            server: link.host,
            server_port: link.port,
        }))
    }
}
