// ─────────────────────────────────────────────────────────────────────
// Kripke Risk Engine — Reasoning Backend Interface
// ─────────────────────────────────────────────────────────────────────
//! Uniform "subject in, assessment out" contract shared by every
//! reasoning backend.
//!
//! The modal evaluator implements it natively. Other reasoners (belief
//! functions, default logic, fuzzy inference) plug in through
//! `ExternalBackend`, so a selection layer can swap backends without
//! the engine knowing about them.

use kripke_types::{Assessment, Subject};

use crate::evaluator::ModalEvaluator;

/// Trait for risk classification backends.
pub trait RiskBackend: Send + Sync {
    /// Stable backend name, used in reports.
    fn name(&self) -> &str;

    fn assess(&self, subject: &Subject) -> Assessment;
}

impl RiskBackend for ModalEvaluator {
    fn name(&self) -> &str {
        "modal"
    }

    /// Confidence is the best world's match percentage scaled to [0, 1];
    /// evidence is its matched propositions.
    fn assess(&self, subject: &Subject) -> Assessment {
        match self.rank(subject, 1).into_iter().next() {
            Some(best) => Assessment {
                backend: self.name().to_string(),
                risk: Some(best.risk),
                confidence: (best.match_percentage / 100.0).clamp(0.0, 1.0),
                evidence: best.matched.into_iter().collect(),
            },
            None => Assessment::undecided(self.name()),
        }
    }
}

type AssessFn = Box<dyn Fn(&Subject) -> Assessment + Send + Sync>;

/// Backend that delegates to a function pointer.
pub struct ExternalBackend {
    name: String,
    assess_fn: AssessFn,
}

impl ExternalBackend {
    pub fn new(
        name: impl Into<String>,
        assess_fn: impl Fn(&Subject) -> Assessment + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            assess_fn: Box::new(assess_fn),
        }
    }
}

impl RiskBackend for ExternalBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn assess(&self, subject: &Subject) -> Assessment {
        let mut assessment = (self.assess_fn)(subject);
        if !assessment.confidence.is_finite() {
            log::warn!("backend '{}' returned non-finite confidence, using 0.0", self.name);
            assessment.confidence = 0.0;
        }
        assessment.confidence = assessment.confidence.clamp(0.0, 1.0);
        assessment
    }
}
