//! Diagnostics and conversion statistics
//!
//! Diagnostics are only kept when a converter runs in debug mode. The sink
//! is picked once when the mode is set, so parsers report failures
//! unconditionally and the sink decides whether to keep them.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::ConvertError;
use crate::parser::{SUPPORTED_PROTOCOLS, SUPPORTED_TRANSPORTS};

// ============================================================================
// Diagnostic Sink
// ============================================================================

/// Destination for per-link diagnostic messages
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DiagnosticSink {
    /// Drop every message
    #[default]
    Discard,
    /// Keep messages in arrival order
    Record(Vec<String>),
}

impl DiagnosticSink {
    /// Returns a recording sink in debug mode, a discarding one otherwise
    pub fn for_mode(debug: bool) -> Self {
        if debug {
            Self::Record(Vec::new())
        } else {
            Self::Discard
        }
    }

    pub fn is_recording(&self) -> bool {
        matches!(self, Self::Record(_))
    }

    /// Records a free-text message
    pub fn push(&mut self, message: impl Into<String>) {
        if let Self::Record(entries) = self {
            let message = message.into();
            trace!("Recording diagnostic: {}", message);
            entries.push(message);
        }
    }

    /// Records a conversion failure as `[kind] message`
    pub fn push_error(&mut self, error: &ConvertError) {
        if self.is_recording() {
            self.push(format!("[{}] {}", error.kind(), error));
        }
    }

    /// Recorded messages, empty when discarding
    pub fn entries(&self) -> &[String] {
        match self {
            Self::Discard => &[],
            Self::Record(entries) => entries.as_slice(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// Drops recorded messages without changing the mode
    pub fn clear(&mut self) {
        if let Self::Record(entries) = self {
            entries.clear();
        }
    }
}

// ============================================================================
// Stats
// ============================================================================

/// Snapshot of a converter's counters and capabilities
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub total_servers: usize,
    pub total_errors: usize,
    pub supported_protocols: Vec<String>,
    pub supported_transports: Vec<String>,
    pub multiplex_enabled: bool,
    pub debug_mode: bool,
}

impl Stats {
    pub fn new(total_servers: usize, total_errors: usize, multiplex: bool, debug: bool) -> Self {
        Self {
            total_servers,
            total_errors,
            supported_protocols: SUPPORTED_PROTOCOLS.iter().map(|s| s.to_string()).collect(),
            supported_transports: SUPPORTED_TRANSPORTS.iter().map(|s| s.to_string()).collect(),
            multiplex_enabled: multiplex,
            debug_mode: debug,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discard_sink_keeps_nothing() {
        let mut sink = DiagnosticSink::for_mode(false);
        sink.push("ignored");
        sink.push_error(&ConvertError::InvalidRealityKey);
        assert!(!sink.is_recording());
        assert!(sink.is_empty());
    }

    #[test]
    fn test_record_sink_keeps_order() {
        let mut sink = DiagnosticSink::for_mode(true);
        sink.push("first");
        sink.push_error(&ConvertError::UnsupportedCipher("rc4-md5".to_string()));
        assert_eq!(
            sink.entries(),
            &[
                "first".to_string(),
                "[UnsupportedCipher] Unsupported Shadowsocks cipher: rc4-md5".to_string()
            ]
        );
    }

    #[test]
    fn test_clear_keeps_mode() {
        let mut sink = DiagnosticSink::for_mode(true);
        sink.push("x");
        sink.clear();
        assert!(sink.is_recording());
        assert_eq!(sink.len(), 0);
    }

    #[test]
    fn test_stats_serialization() {
        let stats = Stats::new(2, 1, true, false);
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["total_servers"], 2);
        assert_eq!(json["total_errors"], 1);
        assert_eq!(json["multiplex_enabled"], true);
        assert_eq!(json["debug_mode"], false);
        assert_eq!(json["supported_protocols"].as_array().unwrap().len(), 7);
        assert_eq!(json["supported_transports"][0], "tcp");
    }
}
