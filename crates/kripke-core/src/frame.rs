// ─────────────────────────────────────────────────────────────────────
// Kripke Risk Engine — Kripke Frame
// ─────────────────────────────────────────────────────────────────────
//! The static knowledge base: worlds, accessibility, valuation, and
//! the proposition registry.
//!
//! Worlds live in an arena in declaration order and are addressed by
//! `WorldId`. Relations are index tables. A world without an
//! accessibility entry (`None`) is distinct from a world whose entry is
//! an empty set (`Some(∅)`); the modal operators read them differently.
//!
//! A frame is validated once in `FrameBuilder::build()` and never
//! mutated afterwards, so it can be shared across threads behind an
//! `Arc` without locking.

use std::collections::{BTreeSet, HashMap};

use kripke_types::{KripkeError, KripkeResult, PossibleWorld, WorldId};

use crate::proposition::{Proposition, PropositionRegistry};

#[derive(Debug)]
pub struct KripkeFrame {
    worlds: Vec<PossibleWorld>,
    index: HashMap<PossibleWorld, WorldId>,
    accessibility: Vec<Option<BTreeSet<WorldId>>>,
    valuation: Vec<Option<BTreeSet<String>>>,
    registry: PropositionRegistry,
}

impl KripkeFrame {
    pub fn builder() -> FrameBuilder {
        FrameBuilder::default()
    }

    /// Worlds in declaration order.
    pub fn worlds(&self) -> &[PossibleWorld] {
        &self.worlds
    }

    pub fn world(&self, id: WorldId) -> Option<&PossibleWorld> {
        self.worlds.get(id.index())
    }

    pub fn world_id(&self, world: &PossibleWorld) -> Option<WorldId> {
        self.index.get(world).copied()
    }

    pub fn world_ids(&self) -> impl Iterator<Item = WorldId> + '_ {
        (0..self.worlds.len()).map(WorldId)
    }

    pub fn len(&self) -> usize {
        self.worlds.len()
    }

    /// Always false for a built frame.
    pub fn is_empty(&self) -> bool {
        self.worlds.is_empty()
    }

    /// Worlds reachable from `id`; `None` when `id` has no entry.
    pub fn accessible_from(&self, id: WorldId) -> Option<&BTreeSet<WorldId>> {
        self.accessibility.get(id.index()).and_then(Option::as_ref)
    }

    /// Propositions stipulated true at `id`; `None` when `id` has no entry.
    pub fn valuation(&self, id: WorldId) -> Option<&BTreeSet<String>> {
        self.valuation.get(id.index()).and_then(Option::as_ref)
    }

    pub fn registry(&self) -> &PropositionRegistry {
        &self.registry
    }

    pub fn proposition_count(&self) -> usize {
        self.registry.len()
    }
}

/// Declarative frame configuration, resolved and validated by `build()`.
///
/// Relations are stated in terms of world values. Repeated entries for
/// the same world are merged (set union).
#[derive(Debug, Default)]
pub struct FrameBuilder {
    worlds: Vec<PossibleWorld>,
    accessibility: Vec<(PossibleWorld, Vec<PossibleWorld>)>,
    valuation: Vec<(PossibleWorld, Vec<String>)>,
    registry: PropositionRegistry,
}

impl FrameBuilder {
    pub fn world(mut self, world: PossibleWorld) -> Self {
        self.worlds.push(world);
        self
    }

    pub fn worlds(mut self, worlds: impl IntoIterator<Item = PossibleWorld>) -> Self {
        self.worlds.extend(worlds);
        self
    }

    /// Declare the worlds reachable from `from`. An empty `to` still
    /// creates an entry.
    pub fn accessible(
        mut self,
        from: &PossibleWorld,
        to: impl IntoIterator<Item = PossibleWorld>,
    ) -> Self {
        self.accessibility.push((from.clone(), to.into_iter().collect()));
        self
    }

    pub fn valuation<S: Into<String>>(
        mut self,
        world: &PossibleWorld,
        propositions: impl IntoIterator<Item = S>,
    ) -> Self {
        self.valuation.push((
            world.clone(),
            propositions.into_iter().map(Into::into).collect(),
        ));
        self
    }

    pub fn proposition(mut self, proposition: Proposition) -> Self {
        self.registry.register(proposition);
        self
    }

    /// Replace the registry wholesale.
    pub fn registry(mut self, registry: PropositionRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Validate and freeze the frame.
    ///
    /// Fails on an empty world set, a world declared twice, or any
    /// relation entry naming a world outside the world set. Valuation
    /// names missing from the registry are allowed; they never match.
    pub fn build(self) -> KripkeResult<KripkeFrame> {
        if self.worlds.is_empty() {
            return Err(KripkeError::EmptyFrame);
        }

        let mut index = HashMap::with_capacity(self.worlds.len());
        for (i, world) in self.worlds.iter().enumerate() {
            if index.insert(world.clone(), WorldId(i)).is_some() {
                return Err(KripkeError::DuplicateWorld(world.to_string()));
            }
        }

        let resolve = |relation: &'static str, world: &PossibleWorld| {
            index
                .get(world)
                .copied()
                .ok_or_else(|| KripkeError::UnknownWorld {
                    relation,
                    world: world.to_string(),
                })
        };

        let mut accessibility: Vec<Option<BTreeSet<WorldId>>> = vec![None; self.worlds.len()];
        for (from, targets) in &self.accessibility {
            let from_id = resolve("accessibility", from)?;
            let entry = accessibility[from_id.index()].get_or_insert_with(BTreeSet::new);
            for target in targets {
                entry.insert(resolve("accessibility", target)?);
            }
        }

        let mut valuation: Vec<Option<BTreeSet<String>>> = vec![None; self.worlds.len()];
        for (world, names) in self.valuation {
            let id = resolve("valuation", &world)?;
            let entry = valuation[id.index()].get_or_insert_with(BTreeSet::new);
            for name in names {
                if !self.registry.contains(&name) {
                    log::debug!("valuation of {world} names unregistered proposition '{name}'");
                }
                entry.insert(name);
            }
        }

        log::info!(
            "Kripke frame built: {} worlds, {} propositions",
            self.worlds.len(),
            self.registry.len()
        );

        Ok(KripkeFrame {
            worlds: self.worlds,
            index,
            accessibility,
            valuation,
            registry: self.registry,
        })
    }
}

#[cfg(test)]
mod tests {
    use kripke_types::RiskLevel;

    use super::*;

    fn low() -> PossibleWorld {
        PossibleWorld::new(RiskLevel::Low, "A")
    }

    fn high() -> PossibleWorld {
        PossibleWorld::new(RiskLevel::High, "B")
    }

    #[test]
    fn test_empty_frame_rejected() {
        let err = KripkeFrame::builder().build().unwrap_err();
        assert_eq!(err, KripkeError::EmptyFrame);
    }

    #[test]
    fn test_duplicate_world_rejected() {
        let err = KripkeFrame::builder()
            .world(low())
            .world(low())
            .build()
            .unwrap_err();
        assert!(matches!(err, KripkeError::DuplicateWorld(_)));
    }

    #[test]
    fn test_unknown_accessibility_target_rejected() {
        let err = KripkeFrame::builder()
            .world(low())
            .accessible(&low(), [high()])
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            KripkeError::UnknownWorld { relation: "accessibility", .. }
        ));
    }

    #[test]
    fn test_unknown_accessibility_source_rejected() {
        let err = KripkeFrame::builder()
            .world(low())
            .accessible(&high(), [low()])
            .build()
            .unwrap_err();
        assert!(matches!(err, KripkeError::UnknownWorld { .. }));
    }

    #[test]
    fn test_unknown_valuation_world_rejected() {
        let err = KripkeFrame::builder()
            .world(low())
            .valuation(&high(), ["x"])
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            KripkeError::UnknownWorld { relation: "valuation", .. }
        ));
    }

    #[test]
    fn test_absent_vs_empty_accessibility() {
        let frame = KripkeFrame::builder()
            .world(low())
            .world(high())
            .accessible(&low(), [])
            .build()
            .unwrap();
        let a = frame.world_id(&low()).unwrap();
        let b = frame.world_id(&high()).unwrap();
        assert_eq!(frame.accessible_from(a).map(BTreeSet::len), Some(0));
        assert!(frame.accessible_from(b).is_none());
    }

    #[test]
    fn test_repeated_entries_merge() {
        let frame = KripkeFrame::builder()
            .worlds([low(), high()])
            .accessible(&low(), [low()])
            .accessible(&low(), [high()])
            .valuation(&high(), ["x"])
            .valuation(&high(), ["y", "x"])
            .build()
            .unwrap();
        assert_eq!(frame.accessible_from(WorldId(0)).unwrap().len(), 2);
        assert_eq!(frame.valuation(WorldId(1)).unwrap().len(), 2);
    }

    #[test]
    fn test_unregistered_valuation_name_allowed() {
        let frame = KripkeFrame::builder()
            .world(low())
            .valuation(&low(), ["nobody_registered_me"])
            .build()
            .unwrap();
        assert_eq!(frame.proposition_count(), 0);
        assert!(frame.valuation(WorldId(0)).unwrap().contains("nobody_registered_me"));
    }

    #[test]
    fn test_declaration_order_kept() {
        let frame = KripkeFrame::builder()
            .worlds([high(), low()])
            .build()
            .unwrap();
        assert_eq!(frame.world(WorldId(0)), Some(&high()));
        assert_eq!(frame.world_ids().collect::<Vec<_>>(), vec![WorldId(0), WorldId(1)]);
        assert!(frame.world(WorldId(5)).is_none());
    }
}
