//! Link conversion error types
//!
//! Every variant is local to a single link: the converter turns it into an
//! absent result and moves on to the next link.

use thiserror::Error;

/// Reasons a single subscription link fails to convert
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConvertError {
    /// Unparseable URI, or a required scheme/host/credential is missing
    #[error("Malformed {scheme} link: {reason}")]
    MalformedLink { scheme: String, reason: String },

    /// Transport `type` outside the supported set
    #[error("Unsupported transport type: {0}")]
    UnsupportedTransport(String),

    /// Shadowsocks method outside the cipher allow-list
    #[error("Unsupported Shadowsocks cipher: {0}")]
    UnsupportedCipher(String),

    /// Reality public key missing or structurally invalid
    #[error("Invalid or missing Reality public key")]
    InvalidRealityKey,

    /// Base64 or structured payload decode failure
    #[error("Failed to decode {what}: {reason}")]
    DecodeFailure { what: String, reason: String },
}

impl ConvertError {
    /// Create a malformed link error
    pub fn malformed(scheme: &str, reason: impl Into<String>) -> Self {
        Self::MalformedLink {
            scheme: scheme.to_string(),
            reason: reason.into(),
        }
    }

    /// Create a decode failure error
    pub fn decode(what: &str, reason: impl std::fmt::Display) -> Self {
        Self::DecodeFailure {
            what: what.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Short stable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedLink { .. } => "MalformedLink",
            Self::UnsupportedTransport(_) => "UnsupportedTransport",
            Self::UnsupportedCipher(_) => "UnsupportedCipher",
            Self::InvalidRealityKey => "InvalidRealityKey",
            Self::DecodeFailure { .. } => "DecodeFailure",
        }
    }
}
