use serde::{Deserialize, Serialize};

/// Route configuration
///
/// Generated configs route everything to a single outbound, so only the
/// `final` field is modelled.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Route {
    /// Default outbound tag (first outbound used if empty)
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "final")]
    pub final_outbound: Option<String>,
}

impl Route {
    /// Route that sends all traffic to `tag`
    pub fn to_outbound(tag: impl Into<String>) -> Self {
        Self {
            final_outbound: Some(tag.into()),
        }
    }
}
