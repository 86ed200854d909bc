// ─────────────────────────────────────────────────────────────────────
// Kripke Risk Engine — Engine Configuration
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

use crate::error::{KripkeError, KripkeResult};

/// Runtime configuration for the modal evaluator.
///
/// The frame itself is not part of the configuration: it is supplied
/// programmatically. This struct only carries the ranking policy knobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// A world is a live candidate when at least this many of the
    /// subject's active propositions hold in it.
    /// Default: 2.
    pub possible_threshold: usize,

    /// Number of ranked worlds reported per subject.
    /// Default: 3.
    pub top_n: usize,

    /// Rank every world when no world reaches `possible_threshold`.
    /// Default: true.
    pub fallback_to_all: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            possible_threshold: 2,
            top_n: 3,
            fallback_to_all: true,
        }
    }
}

impl EngineConfig {
    /// Validate configuration parameters.
    pub fn validate(&self) -> KripkeResult<()> {
        if self.top_n < 1 {
            return Err(KripkeError::Config(format!(
                "top_n must be >= 1, got {}",
                self.top_n
            )));
        }
        Ok(())
    }

    /// Load from JSON string. Missing fields take their defaults.
    pub fn from_json(json: &str) -> KripkeResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| KripkeError::Config(format!("JSON parse error: {e}")))
    }

    pub fn with_threshold(mut self, possible_threshold: usize) -> Self {
        self.possible_threshold = possible_threshold;
        self
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.possible_threshold, 2);
        assert_eq!(config.top_n, 3);
        assert!(config.fallback_to_all);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_top_n_rejected() {
        let config = EngineConfig::default().with_top_n(0);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("top_n"));
    }

    #[test]
    fn test_from_json_partial() {
        let config = EngineConfig::from_json(r#"{"possible_threshold": 3}"#).unwrap();
        assert_eq!(config.possible_threshold, 3);
        assert_eq!(config.top_n, 3);
        assert!(config.fallback_to_all);
    }

    #[test]
    fn test_from_json_invalid() {
        let err = EngineConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, KripkeError::Config(_)));
    }

    #[test]
    fn test_json_round_trip_keeps_fallback_flag() {
        let config = EngineConfig {
            fallback_to_all: false,
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(EngineConfig::from_json(&json).unwrap(), config);
    }
}
