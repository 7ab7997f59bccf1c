use serde::{Deserialize, Serialize};

use crate::config::shared::ListenFields;

// ============================================================================
// Inbound Enum
// ============================================================================

/// Inbound configuration enum
///
/// Generated configs only ever expose a local mixed proxy.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Inbound {
    /// Mixed inbound (SOCKS4/4a/5 and HTTP)
    Mixed(MixedInbound),
}

/// Mixed inbound configuration (SOCKS4/4a/5 and HTTP)
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct MixedInbound {
    /// Tag of the inbound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,

    /// Listen fields
    #[serde(flatten)]
    pub listen: ListenFields,
}

impl Inbound {
    /// Mixed inbound listening on loopback
    pub fn local_mixed(port: u16, tag: &str) -> Self {
        Inbound::Mixed(MixedInbound {
            tag: Some(tag.to_string()),
            listen: ListenFields {
                listen: Some("127.0.0.1".to_string()),
                listen_port: Some(port),
            },
        })
    }
}
