//! Configuration for an intake session.

use serde::{Deserialize, Serialize};

/// SHA-256 hex digest of the shared access password.
const DEFAULT_PASSWORD_SHA256: &str =
    "0d6deeb9fb5d58123f4ce42cbac22995b54d775c48c8dbfee5b82da5277dba13";

/// Configuration for an intake session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeConfig {
    /// Local storage key for the live (in-progress) snapshot
    pub storage_key: String,
    /// Session storage key for the access flag
    pub session_key: String,
    /// SHA-256 hex digest of the access password
    pub password_sha256: String,
    /// Inactivity window before a free-text edit is persisted (ms)
    pub debounce_ms: u64,
    /// How long the "saved" acknowledgment stays visible (ms)
    pub save_indicator_ms: u64,
    /// Fields with a soft word limit
    pub word_limits: Vec<WordLimit>,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            storage_key: "speedrunFormData".to_string(),
            session_key: "speedrunAuthenticated".to_string(),
            password_sha256: DEFAULT_PASSWORD_SHA256.to_string(),
            debounce_ms: 500,
            save_indicator_ms: 2000,
            word_limits: Vec::new(),
        }
    }
}

impl IntakeConfig {
    /// Load config from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    /// Key the submitted record is written under.
    pub fn submitted_key(&self) -> String {
        format!("{}_submitted", self.storage_key)
    }

    /// Add a word limit for a field.
    pub fn with_word_limit(mut self, field_id: impl Into<String>, limit: u32) -> Self {
        self.word_limits.push(WordLimit {
            field_id: field_id.into(),
            limit,
        });
        self
    }
}

/// Soft word limit attached to a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordLimit {
    /// Id of the tracked control
    pub field_id: String,
    /// Word budget
    pub limit: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = IntakeConfig::default();
        assert_eq!(config.storage_key, "speedrunFormData");
        assert_eq!(config.debounce_ms, 500);
        assert_eq!(config.save_indicator_ms, 2000);
        assert_eq!(config.submitted_key(), "speedrunFormData_submitted");
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = r#"
storage_key: demoForm
word_limits:
  - field_id: problem
    limit: 150
"#;
        let config = IntakeConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.submitted_key(), "demoForm_submitted");
        assert_eq!(config.debounce_ms, 500);
        assert_eq!(config.word_limits[0].limit, 150);
    }

    #[test]
    fn test_yaml_roundtrip() {
        let config = IntakeConfig::default().with_word_limit("traction", 200);
        let yaml = config.to_yaml().unwrap();
        let parsed = IntakeConfig::from_yaml(&yaml).unwrap();
        assert_eq!(parsed.word_limits, config.word_limits);
    }
}
