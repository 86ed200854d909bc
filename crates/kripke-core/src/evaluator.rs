// ─────────────────────────────────────────────────────────────────────
// Kripke Risk Engine — Modal Evaluator
// ─────────────────────────────────────────────────────────────────────
//! Modal queries over a `KripkeFrame` and the subject classification
//! algorithm.
//!
//! Query operators (world × proposition name → bool):
//! - `believes`: true when the name is in the world's valuation.
//! - `knows` / `necessarily`: true at every accessible world. A world
//!   with no accessibility entry is **false**; a world whose entry is
//!   empty is **vacuously true**.
//! - `possibly`: true at some accessible world; false when the entry is
//!   absent or empty.
//!
//! Classification: the subject's active propositions are intersected
//! with every world's valuation. Worlds with at least
//! `possible_threshold` matches are candidates; with no candidate the
//! whole frame is ranked instead. Candidates are ordered by
//! `(match_percentage, match_score)` descending, ties kept in world
//! declaration order.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::sync::Arc;

use kripke_types::score::match_percentage;
use kripke_types::{
    EngineConfig, KripkeResult, ModalProfile, RankedWorld, RiskLevel, Subject, WorldEvaluation,
    WorldId,
};

use crate::frame::KripkeFrame;

/// Read-only evaluator over a shared frame.
///
/// Holds no per-subject state: `evaluate` and `rank` are pure functions
/// of the frame, the config and the subject.
#[derive(Debug, Clone)]
pub struct ModalEvaluator {
    frame: Arc<KripkeFrame>,
    config: EngineConfig,
}

impl ModalEvaluator {
    pub fn new(frame: Arc<KripkeFrame>, config: EngineConfig) -> KripkeResult<Self> {
        config.validate()?;
        Ok(Self { frame, config })
    }

    pub fn with_defaults(frame: Arc<KripkeFrame>) -> Self {
        Self {
            frame,
            config: EngineConfig::default(),
        }
    }

    pub fn frame(&self) -> &KripkeFrame {
        &self.frame
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ── Modal operators ─────────────────────────────────────────────

    pub fn believes(&self, world: WorldId, name: &str) -> bool {
        self.frame
            .valuation(world)
            .is_some_and(|props| props.contains(name))
    }

    pub fn knows(&self, world: WorldId, name: &str) -> bool {
        match self.frame.accessible_from(world) {
            None => false,
            Some(accessible) => accessible.iter().all(|&w| self.believes(w, name)),
        }
    }

    pub fn necessarily(&self, world: WorldId, name: &str) -> bool {
        self.knows(world, name)
    }

    pub fn possibly(&self, world: WorldId, name: &str) -> bool {
        self.frame
            .accessible_from(world)
            .is_some_and(|accessible| accessible.iter().any(|&w| self.believes(w, name)))
    }

    /// All four readings of `name` at `world`.
    pub fn modal_profile(&self, world: WorldId, name: &str) -> ModalProfile {
        ModalProfile {
            world_id: world,
            proposition: name.to_string(),
            believes: self.believes(world, name),
            knows: self.knows(world, name),
            possibly: self.possibly(world, name),
            necessarily: self.necessarily(world, name),
        }
    }

    // ── Classification ──────────────────────────────────────────────

    /// Propositions that hold for the subject (failures excluded).
    pub fn active_propositions(&self, subject: &Subject) -> BTreeSet<String> {
        self.frame.registry().evaluate(subject)
    }

    /// One `WorldEvaluation` per world, in declaration order.
    pub fn evaluate(&self, subject: &Subject) -> Vec<WorldEvaluation> {
        let active = self.active_propositions(subject);
        self.evaluate_active(&active)
    }

    fn evaluate_active(&self, active: &BTreeSet<String>) -> Vec<WorldEvaluation> {
        let empty = BTreeSet::new();
        self.frame
            .world_ids()
            .zip(self.frame.worlds())
            .map(|(id, world)| {
                let world_propositions = self.frame.valuation(id).unwrap_or(&empty);
                let matched: BTreeSet<String> =
                    active.intersection(world_propositions).cloned().collect();
                let match_score = matched.len();
                WorldEvaluation {
                    world_id: id,
                    world: world.clone(),
                    active: active.clone(),
                    world_propositions: world_propositions.clone(),
                    match_percentage: match_percentage(match_score, world_propositions.len()),
                    is_possible: match_score >= self.config.possible_threshold,
                    matched,
                    match_score,
                }
            })
            .collect()
    }

    /// The subject's best `top_n` worlds.
    ///
    /// Non-empty for any built frame unless `fallback_to_all` is off and
    /// no world reaches the threshold.
    pub fn rank(&self, subject: &Subject, top_n: usize) -> Vec<RankedWorld> {
        let evaluations = self.evaluate(subject);
        let total = evaluations.len();

        let possible: Vec<WorldEvaluation> = evaluations
            .iter()
            .filter(|e| e.is_possible)
            .cloned()
            .collect();

        let candidates = if !possible.is_empty() {
            possible
        } else if self.config.fallback_to_all {
            log::debug!(
                "subject '{}': no world reaches {} matches, ranking all {total}",
                subject.id(),
                self.config.possible_threshold
            );
            evaluations
        } else {
            log::debug!("subject '{}': no possible world, fallback disabled", subject.id());
            Vec::new()
        };

        let mut ranked: Vec<RankedWorld> = candidates.into_iter().map(RankedWorld::from).collect();
        // sort_by is stable: ties stay in declaration order.
        ranked.sort_by(ranking_order);
        ranked.truncate(top_n);
        ranked
    }

    /// `rank` with the configured depth.
    pub fn rank_default(&self, subject: &Subject) -> Vec<RankedWorld> {
        self.rank(subject, self.config.top_n)
    }

    /// Risk label of the best-ranked world.
    pub fn classify(&self, subject: &Subject) -> Option<RiskLevel> {
        self.rank(subject, 1).first().map(|r| r.risk)
    }

    /// Highest-ranked world for the subject, used as its "current" world
    /// when probing modal operators.
    pub fn most_likely_world(&self, subject: &Subject) -> Option<WorldId> {
        self.rank(subject, 1).first().map(|r| r.world_id)
    }
}

/// Orders by descending `(match_percentage, match_score)`.
pub fn ranking_order(a: &RankedWorld, b: &RankedWorld) -> Ordering {
    b.match_percentage
        .total_cmp(&a.match_percentage)
        .then_with(|| b.match_score.cmp(&a.match_score))
}
