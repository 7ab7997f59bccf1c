//! TLS, Reality and uTLS builder
//!
//! Builds the outbound TLS section from link parameters. Reality links must
//! carry a structurally valid X25519 public key (`pbk`); anything else
//! rejects the whole link.

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use tracing::{debug, trace};

use crate::config::shared::{OutboundRealityConfig, OutboundTlsConfig, UtlsConfig};
use crate::error::ConvertError;

use super::link::Params;

/// uTLS fingerprint forced on Reality links that do not name one
pub const DEFAULT_REALITY_FINGERPRINT: &str = "chrome";

const MIN_REALITY_KEY_CHARS: usize = 20;
const REALITY_KEY_BYTES: std::ops::RangeInclusive<usize> = 28..=36;

/// Standard alphabet, padding optional, trailing bits tolerated
const LENIENT_STANDARD: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Security modes a link may request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Security {
    None,
    Tls,
    Reality,
}

impl Security {
    /// Reads the `security` parameter; unknown values are treated as TLS
    pub fn from_params(params: &Params) -> Self {
        match params.get_or("security", "none") {
            "none" => Security::None,
            "reality" => Security::Reality,
            _ => Security::Tls,
        }
    }
}

/// Builds the TLS section for a link
///
/// `security` selects the Reality path; `params` supplies `sni`, `fp`,
/// `pbk`, `sid` and the transport `type` used to pick ALPN.
pub fn build_tls(security: Security, params: &Params) -> Result<OutboundTlsConfig, ConvertError> {
    let mut tls = OutboundTlsConfig::with_server_name(params.get_owned("sni"));

    if security == Security::Reality {
        let public_key = params
            .get("pbk")
            .and_then(validate_reality_key)
            .ok_or(ConvertError::InvalidRealityKey)?;

        tls.reality = Some(OutboundRealityConfig {
            enabled: true,
            public_key: Some(public_key),
            short_id: params.get_owned("sid"),
        });
        tls.utls = Some(UtlsConfig {
            enabled: true,
            fingerprint: Some(params.get_or("fp", DEFAULT_REALITY_FINGERPRINT).to_string()),
        });
    } else if let Some(fp) = params.get("fp") {
        tls.utls = Some(UtlsConfig {
            enabled: true,
            fingerprint: Some(fp.to_string()),
        });
    }

    tls.alpn = alpn_for_transport(params.get_or("type", "tcp"));
    trace!("Built TLS config: {:?}", tls);
    Ok(tls)
}

/// ALPN list implied by a transport type
pub fn alpn_for_transport(transport_type: &str) -> Vec<String> {
    match transport_type {
        "ws" => vec!["http/1.1".to_string()],
        "h2" | "http2" | "grpc" => vec!["h2".to_string(), "http/1.1".to_string()],
        _ => Vec::new(),
    }
}

/// URL-decodes and trims a Reality public key
pub fn clean_public_key(key: &str) -> String {
    urlencoding::decode(key)
        .map(|k| k.into_owned())
        .unwrap_or_else(|_| key.to_string())
        .trim()
        .to_string()
}

/// Validates a Reality public key, returning the cleaned key
///
/// The key must be at least 20 characters of standard or URL-safe Base64
/// and decode to 28-36 bytes.
pub fn validate_reality_key(key: &str) -> Option<String> {
    let cleaned = clean_public_key(key);

    if cleaned.len() < MIN_REALITY_KEY_CHARS {
        debug!("Reality key too short: {} chars", cleaned.len());
        return None;
    }

    if !cleaned
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/' | b'-' | b'_' | b'='))
    {
        debug!("Reality key contains characters outside the Base64 alphabets");
        return None;
    }

    let decoded = LENIENT_STANDARD.decode(&cleaned).or_else(|_| {
        let standard = cleaned.replace('-', "+").replace('_', "/");
        LENIENT_STANDARD.decode(standard)
    });

    match decoded {
        Ok(bytes) if REALITY_KEY_BYTES.contains(&bytes.len()) => Some(cleaned),
        Ok(bytes) => {
            debug!("Reality key decodes to {} bytes", bytes.len());
            None
        }
        Err(e) => {
            debug!("Reality key is not Base64: {}", e);
            None
        }
    }
}
