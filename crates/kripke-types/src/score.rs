// ─────────────────────────────────────────────────────────────────────
// Kripke Risk Engine — Match Scores and Result Records
// ─────────────────────────────────────────────────────────────────────

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::world::{PossibleWorld, RiskLevel, WorldId};

/// Percentage of a world's valuation matched by the subject.
///
/// Returns 0.0 for an empty valuation, otherwise a value in [0, 100].
#[inline]
pub fn match_percentage(match_score: usize, valuation_size: usize) -> f64 {
    if valuation_size == 0 {
        return 0.0;
    }
    let pct = 100.0 * match_score as f64 / valuation_size as f64;
    if pct > 100.0 {
        log::warn!("match_percentage: {match_score}/{valuation_size} exceeds 100%, clamping");
        return 100.0;
    }
    pct
}

/// Per-world evidence for one subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldEvaluation {
    pub world_id: WorldId,
    pub world: PossibleWorld,
    /// Propositions true for the subject.
    pub active: BTreeSet<String>,
    /// Propositions stipulated true in this world.
    pub world_propositions: BTreeSet<String>,
    /// `active ∩ world_propositions`.
    pub matched: BTreeSet<String>,
    pub match_score: usize,
    pub match_percentage: f64,
    /// Whether the world reached the candidate threshold.
    pub is_possible: bool,
}

/// One entry of a subject's world ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedWorld {
    pub world_id: WorldId,
    pub world: PossibleWorld,
    pub risk: RiskLevel,
    pub match_score: usize,
    pub match_percentage: f64,
    pub matched: BTreeSet<String>,
    pub is_possible: bool,
}

impl From<WorldEvaluation> for RankedWorld {
    fn from(eval: WorldEvaluation) -> Self {
        Self {
            world_id: eval.world_id,
            risk: eval.world.risk,
            world: eval.world,
            match_score: eval.match_score,
            match_percentage: eval.match_percentage,
            matched: eval.matched,
            is_possible: eval.is_possible,
        }
    }
}

/// The four modal readings of one proposition at one world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModalProfile {
    pub world_id: WorldId,
    pub proposition: String,
    /// Local truth at the world.
    pub believes: bool,
    /// True at every accessible world.
    pub knows: bool,
    /// True at some accessible world.
    pub possibly: bool,
    pub necessarily: bool,
}

/// Backend-neutral classification outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    /// Name of the backend that produced this assessment.
    pub backend: String,
    /// Predicted risk, `None` when the backend could not decide.
    pub risk: Option<RiskLevel>,
    /// Confidence in [0, 1].
    pub confidence: f64,
    /// Supporting facts, backend-specific.
    pub evidence: Vec<String>,
}

impl Assessment {
    pub fn undecided(backend: impl Into<String>) -> Self {
        Self {
            backend: backend.into(),
            risk: None,
            confidence: 0.0,
            evidence: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_empty_valuation() {
        assert_eq!(match_percentage(0, 0), 0.0);
    }

    #[test]
    fn test_percentage_partial() {
        assert!((match_percentage(1, 2) - 50.0).abs() < 1e-9);
        assert!((match_percentage(3, 10) - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_percentage_full() {
        assert_eq!(match_percentage(7, 7), 100.0);
    }

    #[test]
    fn test_percentage_clamps() {
        assert_eq!(match_percentage(5, 2), 100.0);
    }

    #[test]
    fn test_ranked_from_evaluation() {
        let world = PossibleWorld::new(RiskLevel::High, "High risk");
        let eval = WorldEvaluation {
            world_id: WorldId(2),
            world: world.clone(),
            active: ["x".to_string()].into(),
            world_propositions: ["x".to_string(), "y".to_string()].into(),
            matched: ["x".to_string()].into(),
            match_score: 1,
            match_percentage: 50.0,
            is_possible: false,
        };
        let ranked = RankedWorld::from(eval);
        assert_eq!(ranked.risk, RiskLevel::High);
        assert_eq!(ranked.world, world);
        assert_eq!(ranked.world_id, WorldId(2));
        assert_eq!(ranked.match_score, 1);
    }

    #[test]
    fn test_undecided_assessment() {
        let a = Assessment::undecided("modal");
        assert_eq!(a.risk, None);
        assert_eq!(a.confidence, 0.0);
        assert!(a.evidence.is_empty());
    }
}
