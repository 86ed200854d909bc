// ─────────────────────────────────────────────────────────────────────
// Kripke Risk Engine — Risk Labels and Possible Worlds
// ─────────────────────────────────────────────────────────────────────
//! Risk categories and the possible-world value type.
//!
//! A `PossibleWorld` is compared structurally (risk label, description,
//! weight), so two independently constructed worlds with identical fields
//! are the same world. Inside a frame, worlds are addressed by `WorldId`,
//! the world's position in declaration order.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Categorical risk assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 3] = [RiskLevel::Low, RiskLevel::Medium, RiskLevel::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Label that is not one of Low / Medium / High.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRiskLabel(pub String);

impl fmt::Display for UnknownRiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown risk level '{}'", self.0)
    }
}

impl std::error::Error for UnknownRiskLabel {}

impl FromStr for RiskLevel {
    type Err = UnknownRiskLabel;

    /// Accepts the canonical label, then falls back to a trimmed,
    /// case-insensitive match.
    fn from_str(label: &str) -> Result<Self, Self::Err> {
        if let Some(risk) = RiskLevel::ALL.into_iter().find(|r| r.as_str() == label) {
            return Ok(risk);
        }
        let trimmed = label.trim();
        RiskLevel::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownRiskLabel(label.to_string()))
    }
}

/// Index of a world inside its frame (declaration order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WorldId(pub usize);

impl WorldId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for WorldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "w{}", self.0)
    }
}

/// One labelled hypothesis in the frame.
///
/// `weight` is carried for future weighting; ranking ignores it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PossibleWorld {
    pub risk: RiskLevel,
    pub description: String,
    pub weight: f64,
}

impl PossibleWorld {
    pub fn new(risk: RiskLevel, description: impl Into<String>) -> Self {
        Self {
            risk,
            description: description.into(),
            weight: 1.0,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }
}

impl fmt::Display for PossibleWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.risk, self.description)
    }
}

// Weight compares bitwise so that Eq and Hash agree.
impl PossibleWorld {
    /// Bit pattern used for equality and hashing. `-0.0` and `0.0` share a
    /// key, as do all NaN payloads.
    fn weight_key(&self) -> u64 {
        if self.weight == 0.0 {
            0.0f64.to_bits()
        } else if self.weight.is_nan() {
            f64::NAN.to_bits()
        } else {
            self.weight.to_bits()
        }
    }
}

impl PartialEq for PossibleWorld {
    fn eq(&self, other: &Self) -> bool {
        self.risk == other.risk
            && self.description == other.description
            && self.weight_key() == other.weight_key()
    }
}

impl Eq for PossibleWorld {}

impl Hash for PossibleWorld {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.risk.hash(state);
        self.description.hash(state);
        self.weight_key().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_parse_canonical() {
        assert_eq!("Low".parse::<RiskLevel>().unwrap(), RiskLevel::Low);
        assert_eq!("Medium".parse::<RiskLevel>().unwrap(), RiskLevel::Medium);
        assert_eq!("High".parse::<RiskLevel>().unwrap(), RiskLevel::High);
    }

    #[test]
    fn test_parse_lenient() {
        assert_eq!(" high ".parse::<RiskLevel>().unwrap(), RiskLevel::High);
        assert_eq!("MEDIUM".parse::<RiskLevel>().unwrap(), RiskLevel::Medium);
        assert_eq!("low\n".parse::<RiskLevel>().unwrap(), RiskLevel::Low);
    }

    #[test]
    fn test_parse_unknown() {
        let err = "critical".parse::<RiskLevel>().unwrap_err();
        assert_eq!(err, UnknownRiskLabel("critical".into()));
        assert!("".parse::<RiskLevel>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(RiskLevel::Medium.to_string(), "Medium");
        let world = PossibleWorld::new(RiskLevel::High, "High risk");
        assert_eq!(world.to_string(), "High (High risk)");
    }

    #[test]
    fn test_world_structural_equality() {
        let a = PossibleWorld::new(RiskLevel::Low, "Low risk");
        let b = PossibleWorld::new(RiskLevel::Low, "Low risk");
        let c = PossibleWorld::new(RiskLevel::Low, "Low risk").with_weight(2.0);
        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<PossibleWorld> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_default_weight() {
        let world = PossibleWorld::new(RiskLevel::Medium, "Medium risk");
        assert_eq!(world.weight, 1.0);
    }

    #[test]
    fn test_signed_zero_weight_is_one_world() {
        let pos = PossibleWorld::new(RiskLevel::Low, "A").with_weight(0.0);
        let neg = PossibleWorld::new(RiskLevel::Low, "A").with_weight(-0.0);
        assert_eq!(pos, neg);
        let set: HashSet<PossibleWorld> = [pos, neg].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_all_levels_round_trip_labels() {
        for risk in RiskLevel::ALL {
            assert_eq!(risk.as_str().parse::<RiskLevel>().unwrap(), risk);
        }
    }
}
