//! Engine configuration.

use serde::Deserialize;

use crate::ConfigError;

/// How comparison and emptiness operators treat multi-valued operands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperandMatching {
    /// Set semantics: `=` needs full coverage both ways, scalar operators need
    /// single values, `is empty` needs both sides empty.
    #[default]
    Set,

    /// Pair-by-pair comparison driven by the operands' `requireAll` flags.
    Pairwise,
}

/// Configuration for the status engine.
///
/// ```rust
/// use form_status::{OperandMatching, StatusConfig};
///
/// let config = StatusConfig::from_json(r#"{ "matching": "pairwise" }"#).unwrap();
/// assert_eq!(config.matching, OperandMatching::Pairwise);
/// assert!(config.enabled);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StatusConfig {
    /// When false, the editor provider ignores every commit.
    pub enabled: bool,

    pub matching: OperandMatching,

    /// Register the built-in value range validator.
    pub value_ranges: bool,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            matching: OperandMatching::Set,
            value_ranges: true,
        }
    }
}

impl StatusConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_default() {
        assert_eq!(StatusConfig::from_json("{}").unwrap(), StatusConfig::default());
    }

    #[test]
    fn reads_every_field() {
        let config = StatusConfig::from_json(
            r#"{ "enabled": false, "matching": "pairwise", "value_ranges": false }"#,
        )
        .unwrap();
        assert_eq!(
            config,
            StatusConfig {
                enabled: false,
                matching: OperandMatching::Pairwise,
                value_ranges: false,
            }
        );
    }

    #[test]
    fn rejects_unknown_fields_and_modes() {
        assert!(StatusConfig::from_json(r#"{ "matchng": "set" }"#).is_err());
        assert!(StatusConfig::from_json(r#"{ "matching": "fuzzy" }"#).is_err());
    }
}
