// ─────────────────────────────────────────────────────────────────────
// Kripke Risk Engine — Proposition Registry
// ─────────────────────────────────────────────────────────────────────
//! Named boolean predicates over a `Subject`.
//!
//! Every predicate call yields a `PropositionOutcome`. A predicate may
//! fail either by returning `Err` (fallible predicates) or by panicking;
//! both are folded to "does not hold" for that subject and logged, so a
//! single malformed proposition never aborts evaluation of the rest.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};

use kripke_types::Subject;

type PredicateFn = Box<dyn Fn(&Subject) -> Result<bool, String> + Send + Sync>;

/// Why a predicate produced no truth value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PredicateFailure {
    /// The predicate returned an error.
    Error(String),
    /// The predicate panicked.
    Panicked(String),
}

impl fmt::Display for PredicateFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredicateFailure::Error(msg) => write!(f, "predicate error: {msg}"),
            PredicateFailure::Panicked(msg) => write!(f, "predicate panicked: {msg}"),
        }
    }
}

/// Result of evaluating one proposition against one subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropositionOutcome {
    Holds,
    DoesNotHold,
    Failed(PredicateFailure),
}

impl PropositionOutcome {
    /// Failures count as false.
    pub fn is_true(&self) -> bool {
        matches!(self, PropositionOutcome::Holds)
    }
}

/// A named predicate with a human-readable description.
pub struct Proposition {
    name: String,
    description: String,
    predicate: PredicateFn,
}

impl Proposition {
    /// Infallible predicate.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        predicate: impl Fn(&Subject) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            predicate: Box::new(move |s| Ok(predicate(s))),
        }
    }

    /// Predicate that can report an error instead of a truth value.
    pub fn fallible<E: fmt::Display>(
        name: impl Into<String>,
        description: impl Into<String>,
        predicate: impl Fn(&Subject) -> Result<bool, E> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            predicate: Box::new(move |s| predicate(s).map_err(|e| e.to_string())),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Evaluate against a subject, catching errors and panics.
    ///
    /// A panic still runs the process panic hook, so with the default hook
    /// a broken predicate prints one "thread panicked" line to stderr per
    /// subject in addition to the registry's warning. Callers batching many
    /// subjects can install their own hook with `std::panic::set_hook`.
    pub fn check(&self, subject: &Subject) -> PropositionOutcome {
        match catch_unwind(AssertUnwindSafe(|| (self.predicate)(subject))) {
            Ok(Ok(true)) => PropositionOutcome::Holds,
            Ok(Ok(false)) => PropositionOutcome::DoesNotHold,
            Ok(Err(msg)) => PropositionOutcome::Failed(PredicateFailure::Error(msg)),
            Err(payload) => {
                let msg = if let Some(s) = payload.downcast_ref::<&str>() {
                    (*s).to_string()
                } else if let Some(s) = payload.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "non-string panic payload".to_string()
                };
                PropositionOutcome::Failed(PredicateFailure::Panicked(msg))
            }
        }
    }

    /// Truth value with failures folded to false.
    pub fn holds(&self, subject: &Subject) -> bool {
        self.check(subject).is_true()
    }
}

impl fmt::Debug for Proposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Proposition")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Name-keyed proposition store, iterated in first-registration order.
#[derive(Debug, Default)]
pub struct PropositionRegistry {
    entries: Vec<Proposition>,
    index: HashMap<String, usize>,
}

impl PropositionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a proposition. A duplicate name replaces the earlier entry
    /// in place.
    pub fn register(&mut self, proposition: Proposition) {
        match self.index.get(proposition.name()) {
            Some(&slot) => {
                log::debug!("proposition '{}' re-registered, replacing", proposition.name());
                self.entries[slot] = proposition;
            }
            None => {
                self.index
                    .insert(proposition.name().to_string(), self.entries.len());
                self.entries.push(proposition);
            }
        }
    }

    pub fn register_fn(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        predicate: impl Fn(&Subject) -> bool + Send + Sync + 'static,
    ) {
        self.register(Proposition::new(name, description, predicate));
    }

    pub fn get(&self, name: &str) -> Option<&Proposition> {
        self.index.get(name).map(|&slot| &self.entries[slot])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Proposition> {
        self.entries.iter()
    }

    /// Outcome of every proposition for this subject.
    pub fn outcomes<'a>(&'a self, subject: &Subject) -> Vec<(&'a str, PropositionOutcome)> {
        self.entries
            .iter()
            .map(|p| (p.name(), p.check(subject)))
            .collect()
    }

    /// Names of the propositions that hold for the subject.
    pub fn evaluate(&self, subject: &Subject) -> BTreeSet<String> {
        let mut active = BTreeSet::new();
        for proposition in &self.entries {
            match proposition.check(subject) {
                PropositionOutcome::Holds => {
                    active.insert(proposition.name().to_string());
                }
                PropositionOutcome::DoesNotHold => {}
                PropositionOutcome::Failed(failure) => {
                    log::warn!(
                        "proposition '{}' failed for subject '{}', treating as false: {failure}",
                        proposition.name(),
                        subject.id()
                    );
                }
            }
        }
        active
    }
}

impl FromIterator<Proposition> for PropositionRegistry {
    fn from_iter<I: IntoIterator<Item = Proposition>>(iter: I) -> Self {
        let mut registry = Self::new();
        for proposition in iter {
            registry.register(proposition);
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject(age: u32) -> Subject {
        Subject::builder("S", age, "F")
            .attribute("fatigue", 7)
            .build()
    }

    #[test]
    fn test_evaluate_collects_true_names() {
        let mut registry = PropositionRegistry::new();
        registry.register_fn("always", "always true", |_| true);
        registry.register_fn("never", "always false", |_| false);
        registry.register_fn("senior", "age > 50", |s| s.age() > 50);

        let active = registry.evaluate(&subject(60));
        assert_eq!(active, BTreeSet::from(["always".to_string(), "senior".to_string()]));
    }

    #[test]
    fn test_panicking_predicate_is_false() {
        let mut registry = PropositionRegistry::new();
        registry.register_fn("boom", "panics", |_| panic!("bad predicate"));
        registry.register_fn("ok", "true", |_| true);

        let active = registry.evaluate(&subject(30));
        assert_eq!(active.len(), 1);
        assert!(active.contains("ok"));
    }

    #[test]
    fn test_fallible_predicate_error_is_false() {
        let mut registry = PropositionRegistry::new();
        registry.register(Proposition::fallible("lab", "needs lab", |s: &Subject| {
            s.lab_value("wbc_count")
                .map(|v| v > 11000.0)
                .ok_or("wbc_count missing")
        }));
        let outcomes = registry.outcomes(&subject(30));
        assert_eq!(
            outcomes[0].1,
            PropositionOutcome::Failed(PredicateFailure::Error("wbc_count missing".into()))
        );
        assert!(registry.evaluate(&subject(30)).is_empty());
    }

    #[test]
    fn test_panic_message_captured() {
        let p = Proposition::new("boom", "panics", |_| panic!("kaput"));
        match p.check(&subject(30)) {
            PropositionOutcome::Failed(PredicateFailure::Panicked(msg)) => {
                assert!(msg.contains("kaput"))
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_name_last_wins() {
        let mut registry = PropositionRegistry::new();
        registry.register_fn("x", "first", |_| false);
        registry.register_fn("y", "other", |_| false);
        registry.register_fn("x", "second", |_| true);

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("x").unwrap().description(), "second");
        assert!(registry.evaluate(&subject(20)).contains("x"));
        let names: Vec<&str> = registry.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["x", "y"]);
    }

    #[test]
    fn test_from_iterator() {
        let registry: PropositionRegistry = vec![
            Proposition::new("a", "a", |_| true),
            Proposition::new("b", "b", |s| s.has_attribute("fatigue", 6.0)),
        ]
        .into_iter()
        .collect();
        assert!(registry.contains("a"));
        assert!(registry.get("b").unwrap().holds(&subject(40)));
        assert!(!registry.contains("c"));
    }
}
