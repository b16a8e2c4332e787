//! Planner configuration.

use crate::error::Result;
use crate::session::LifecyclePolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

fn default_handler_timeout_secs() -> u64 {
    60
}

/// Tunables for the planner core, typically loaded from a TOML file.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct PlannerConfig {
    /// Hard deadline for one capability-handler invocation, in seconds
    #[serde(default = "default_handler_timeout_secs")]
    pub handler_timeout_secs: u64,
    /// Idle session expiry in seconds; absent means sessions never expire
    #[serde(default)]
    pub session_idle_timeout_secs: Option<u64>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            handler_timeout_secs: default_handler_timeout_secs(),
            session_idle_timeout_secs: None,
        }
    }
}

impl PlannerConfig {
    /// Parses a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Loads a configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }

    /// Returns the handler invocation deadline.
    pub fn handler_timeout(&self) -> Duration {
        Duration::from_secs(self.handler_timeout_secs)
    }

    /// Returns the session lifecycle policy this configuration implies.
    pub fn lifecycle_policy(&self) -> LifecyclePolicy {
        match self.session_idle_timeout_secs {
            Some(secs) => LifecyclePolicy::idle_for(Duration::from_secs(secs)),
            None => LifecyclePolicy::keep_forever(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_fields_are_absent() {
        let config = PlannerConfig::from_toml_str("").unwrap();
        assert_eq!(config.handler_timeout_secs, 60);
        assert!(config.session_idle_timeout_secs.is_none());
        assert!(config.lifecycle_policy().idle_timeout.is_none());
    }

    #[test]
    fn loads_from_a_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("planner.toml");
        std::fs::write(&path, "handler_timeout_secs = 30\n").unwrap();

        let config = PlannerConfig::from_toml_file(&path).unwrap();
        assert_eq!(config.handler_timeout_secs, 30);
    }

    #[test]
    fn explicit_values_are_honored() {
        let config = PlannerConfig::from_toml_str(
            "handler_timeout_secs = 5\nsession_idle_timeout_secs = 1800\n",
        )
        .unwrap();
        assert_eq!(config.handler_timeout(), Duration::from_secs(5));
        assert_eq!(
            config.lifecycle_policy().idle_timeout,
            Some(Duration::from_secs(1800))
        );
    }
}
