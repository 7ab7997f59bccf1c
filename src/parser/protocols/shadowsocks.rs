//! Shadowsocks protocol parser
//!
//! This module provides parsing for Shadowsocks (ss://) links.
//! Supports SIP002 with Base64 or plain userinfo, and the legacy format
//! where the whole link body is Base64 encoded.

use tracing::trace;

use crate::config::outbound::{Outbound, ShadowsocksOutbound};
use crate::error::ConvertError;
use crate::parser::base64::decode_base64;
use crate::parser::link::ParsedLink;

use super::{ParseContext, ProtocolParser};

const TAG: &str = "ss-out";

/// Shadowsocks methods accepted in links
pub const VALID_SS_METHODS: &[&str] = &[
    "aes-128-gcm",
    "aes-192-gcm",
    "aes-256-gcm",
    "aes-128-cfb",
    "aes-192-cfb",
    "aes-256-cfb",
    "aes-128-ctr",
    "aes-192-ctr",
    "aes-256-ctr",
    "chacha20-ietf-poly1305",
    "xchacha20-ietf-poly1305",
    "2022-blake3-aes-128-gcm",
    "2022-blake3-aes-256-gcm",
];

// ============================================================================
// Shadowsocks Parser
// ============================================================================

/// Parser for Shadowsocks (ss://) links
///
/// - SIP002: ss://BASE64(method:password)@host:port#remark
/// - SIP002 with plain userinfo: ss://method:password@host:port#remark
/// - Legacy: ss://BASE64(method:password@host:port)#remark
pub struct ShadowsocksParser;

impl ProtocolParser for ShadowsocksParser {
    fn scheme(&self) -> &str {
        "ss"
    }

    fn parse(&self, link: &str, _ctx: &ParseContext) -> Result<Outbound, ConvertError> {
        trace!("Parsing Shadowsocks link");
        let link = self.expand_legacy(link.trim())?;
        let link = ParsedLink::parse(&link)?;

        let (method, password) = self.parse_userinfo(&link.userinfo())?;
        if !VALID_SS_METHODS.contains(&method.as_str()) {
            return Err(ConvertError::UnsupportedCipher(method));
        }

        Ok(Outbound::Shadowsocks(ShadowsocksOutbound {
            tag: TAG.to_string(),
            server: link.host,
            server_port: link.port,
            method,
            password,
        }))
    }
}

impl ShadowsocksParser {
    /// Rewrites a legacy all-Base64 link into SIP002 form
    ///
    /// Links that already carry an `@` are returned unchanged.
    fn expand_legacy(&self, link: &str) -> Result<String, ConvertError> {
        let body = link
            .strip_prefix("ss://")
            .ok_or_else(|| ConvertError::malformed("ss", "missing ss:// prefix"))?;
        let main = body.split(['#', '?']).next().unwrap_or_default();
        if main.contains('@') || main.is_empty() {
            return Ok(link.to_string());
        }

        trace!("Parsing as legacy Base64 format");
        let decoded = decode_base64(main.trim_end_matches('/'))
            .map_err(|e| ConvertError::decode("Shadowsocks link", e))?;
        let decoded = String::from_utf8(decoded)
            .map_err(|e| ConvertError::decode("Shadowsocks link", e))?;
        if !decoded.contains('@') {
            return Err(ConvertError::malformed("ss", "missing server"));
        }
        Ok(format!("ss://{}", decoded))
    }

    /// Splits userinfo into `(method, password)`
    ///
    /// Userinfo without a `:` is treated as Base64.
    fn parse_userinfo(&self, userinfo: &str) -> Result<(String, String), ConvertError> {
        if userinfo.is_empty() {
            return Err(ConvertError::malformed("ss", "missing userinfo"));
        }

        let credentials = if userinfo.contains(':') {
            userinfo.to_string()
        } else {
            let decoded = decode_base64(userinfo)
                .map_err(|e| ConvertError::decode("Shadowsocks userinfo", e))?;
            String::from_utf8(decoded)
                .map_err(|e| ConvertError::decode("Shadowsocks userinfo", e))?
        };

        let (method, password) = credentials
            .split_once(':')
            .ok_or_else(|| ConvertError::malformed("ss", "userinfo is not method:password"))?;
        let (method, password) = (method.trim(), password.trim());
        if method.is_empty() || password.is_empty() {
            return Err(ConvertError::malformed("ss", "empty method or password"));
        }

        Ok((method.to_string(), password.to_string()))
    }
}
