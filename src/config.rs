use serde::{Deserialize, Serialize};

use crate::config::inbound::Inbound;
use crate::config::log::Log;
use crate::config::outbound::Outbound;
use crate::config::route::Route;

pub mod inbound;
pub mod log;
pub mod outbound;
pub mod route;
pub mod shared;
pub mod util;

/// sing-box configuration produced for a converted link
///
/// Only the sections the converter fills in are modelled. Empty sections
/// are omitted from serialization.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct SingBoxConfig {
    /// Log configuration
    #[serde(default, skip_serializing_if = "is_default_log")]
    pub log: Log,

    /// Inbound configurations
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inbounds: Vec<Inbound>,

    /// Outbound configurations
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outbounds: Vec<Outbound>,

    /// Route configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<Route>,
}

fn is_default_log(log: &Log) -> bool {
    log.level.is_none()
}

impl SingBoxConfig {
    /// Create a configuration builder
    pub fn builder() -> SingBoxConfigBuilder {
        SingBoxConfigBuilder::new()
    }

    /// Serialize the configuration to a JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize the configuration to a pretty-printed JSON string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Builder for SingBoxConfig
#[derive(Default)]
pub struct SingBoxConfigBuilder {
    config: SingBoxConfig,
}

impl SingBoxConfigBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set log configuration
    pub fn log(mut self, log: Log) -> Self {
        self.config.log = log;
        self
    }

    /// Add an inbound
    pub fn inbound(mut self, inbound: Inbound) -> Self {
        self.config.inbounds.push(inbound);
        self
    }

    /// Add an outbound
    pub fn outbound(mut self, outbound: Outbound) -> Self {
        self.config.outbounds.push(outbound);
        self
    }

    /// Set route configuration
    pub fn route(mut self, route: Route) -> Self {
        self.config.route = Some(route);
        self
    }

    /// Build the configuration
    pub fn build(self) -> SingBoxConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::log::LogLevel;
    use crate::config::outbound::ShadowsocksOutbound;

    #[test]
    fn test_singbox_config_default_serializes_empty() {
        let config = SingBoxConfig::default();
        let json = config.to_json().unwrap();
        assert_eq!(json, "{}");
    }

    #[test]
    fn test_singbox_config_builder() {
        let config = SingBoxConfig::builder()
            .log(Log::with_level(LogLevel::Info))
            .inbound(Inbound::local_mixed(1080, "mixed-in"))
            .outbound(Outbound::Shadowsocks(ShadowsocksOutbound {
                tag: "ss-out".to_string(),
                server: "1.1.1.1".to_string(),
                server_port: 8388,
                method: "aes-128-gcm".to_string(),
                password: "pw".to_string(),
            }))
            .route(Route::to_outbound("ss-out"))
            .build();

        let json = config.to_json().unwrap();
        assert!(json.contains(r#""level":"info""#));
        assert!(json.contains(r#""final":"ss-out""#));
        assert_eq!(config.outbounds.len(), 1);
        assert_eq!(config.inbounds.len(), 1);
    }

    #[test]
    fn test_singbox_config_roundtrip() {
        let original = SingBoxConfig::builder()
            .log(Log::with_level(LogLevel::Warn))
            .route(Route::to_outbound("proxy"))
            .build();
        let json = original.to_json_pretty().unwrap();
        let parsed: SingBoxConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, original);
    }
}
