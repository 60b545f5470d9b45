//! Session configuration.

use serde::{Deserialize, Serialize};

/// SNMP credentials for one switch session.
///
/// Passed explicitly into [`crate::session::SwitchSession::connect`];
/// the core never reads credentials from ambient configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwitchConfig {
    /// Community used for every GET and WALK.
    pub read_only_community: String,
    /// Community used for every SET.
    pub read_write_community: String,
}

impl SwitchConfig {
    /// Creates a config from the two community strings.
    pub fn new(
        read_only_community: impl Into<String>,
        read_write_community: impl Into<String>,
    ) -> Self {
        Self {
            read_only_community: read_only_community.into(),
            read_write_community: read_write_community.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_json() {
        let config: SwitchConfig = serde_json::from_str(
            r#"{"read_only_community": "public", "read_write_community": "private"}"#,
        )
        .unwrap();
        assert_eq!(config.read_only_community, "public");
        assert_eq!(config.read_write_community, "private");
    }
}
