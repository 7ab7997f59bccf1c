use serde::{Deserialize, Serialize};

/// Log configuration for the emitted sing-box config
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Log {
    /// Log level. One of: `trace` `debug` `info` `warn` `error` `fatal` `panic`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<LogLevel>,
}

impl Log {
    /// Log section with only a level set
    pub fn with_level(level: LogLevel) -> Self {
        Self { level: Some(level) }
    }
}

/// Log level for sing-box logging
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
    Panic,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_default_serializes_empty() {
        let log = Log::default();
        let json = serde_json::to_string(&log).unwrap();
        assert_eq!(json, "{}");
    }

    #[test]
    fn test_log_level_serialization() {
        let json = serde_json::to_string(&Log::with_level(LogLevel::Info)).unwrap();
        assert_eq!(json, r#"{"level":"info"}"#);
    }
}
