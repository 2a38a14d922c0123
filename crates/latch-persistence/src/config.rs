//! Persistence configuration

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
    /// Keep only the newest persistence code per principal
    pub single: bool,
    /// Session slot holding the persistence code
    pub session_key: String,
    /// Cookie holding the persistence code for remembered logins
    pub cookie_name: String,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            single: false,
            session_key: "latch_session".to_string(),
            cookie_name: "latch_persistence".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: PersistenceConfig = serde_json::from_str(r#"{"single": true}"#).unwrap();
        assert!(config.single);
        assert_eq!(config.session_key, "latch_session");
        assert_eq!(config.cookie_name, "latch_persistence");
    }
}
