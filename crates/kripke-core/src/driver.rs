// ─────────────────────────────────────────────────────────────────────
// Kripke Risk Engine — Classification Driver
// ─────────────────────────────────────────────────────────────────────
//! Batch classification of labelled subjects.
//!
//! Subjects are evaluated in parallel with rayon against the shared,
//! read-only frame; reports come back in input order. Ground-truth
//! labels that do not parse as a risk level leave the subject
//! unlabelled: it is still classified but does not count toward
//! accuracy.

use rayon::prelude::*;

use kripke_types::{Assessment, RankedWorld, RiskLevel, Subject};

use crate::backend::RiskBackend;
use crate::evaluator::ModalEvaluator;

/// A subject plus its raw ground-truth label, if any.
#[derive(Debug, Clone)]
pub struct LabeledSubject {
    pub subject: Subject,
    pub label: Option<String>,
}

impl LabeledSubject {
    pub fn new(subject: Subject, label: Option<String>) -> Self {
        Self { subject, label }
    }

    pub fn unlabeled(subject: Subject) -> Self {
        Self {
            subject,
            label: None,
        }
    }
}

/// Classification outcome for one subject.
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectReport {
    pub subject_id: String,
    pub age: u32,
    pub gender: String,
    pub predicted: Option<RiskLevel>,
    pub actual: Option<RiskLevel>,
    /// `None` when there is no usable ground truth.
    pub correct: Option<bool>,
    pub top_predictions: Vec<RankedWorld>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    reports: Vec<SubjectReport>,
}

impl BatchReport {
    pub fn reports(&self) -> &[SubjectReport] {
        &self.reports
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    /// Subjects with a usable ground-truth label.
    pub fn scored(&self) -> usize {
        self.reports.iter().filter(|r| r.correct.is_some()).count()
    }

    pub fn correct(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| r.correct == Some(true))
            .count()
    }

    pub fn unlabeled(&self) -> usize {
        self.len() - self.scored()
    }

    /// Percentage of scored subjects classified correctly.
    pub fn accuracy(&self) -> Option<f64> {
        let scored = self.scored();
        if scored == 0 {
            return None;
        }
        Some(100.0 * self.correct() as f64 / scored as f64)
    }
}

/// Feeds subjects through a modal evaluator.
pub struct ClassificationDriver<'a> {
    evaluator: &'a ModalEvaluator,
    top_n: usize,
}

impl<'a> ClassificationDriver<'a> {
    pub fn new(evaluator: &'a ModalEvaluator) -> Self {
        Self {
            evaluator,
            top_n: evaluator.config().top_n,
        }
    }

    /// Ranking depth per report. A depth of 0 is raised to 1 so every
    /// report still carries a prediction.
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n.max(1);
        self
    }

    pub fn classify_one(&self, item: &LabeledSubject) -> SubjectReport {
        let subject = &item.subject;
        let top_predictions = self.evaluator.rank(subject, self.top_n);
        let predicted = top_predictions.first().map(|r| r.risk);
        let actual = item.label.as_deref().and_then(|label| match label.parse::<RiskLevel>() {
            Ok(risk) => Some(risk),
            Err(e) => {
                log::warn!("{e} for subject '{}', no ground truth", subject.id());
                None
            }
        });
        let correct = actual.map(|a| predicted == Some(a));
        log::debug!(
            "subject '{}': predicted {:?}, actual {:?}",
            subject.id(),
            predicted,
            actual
        );

        SubjectReport {
            subject_id: subject.id().to_string(),
            age: subject.age(),
            gender: subject.gender().to_string(),
            predicted,
            actual,
            correct,
            top_predictions,
        }
    }

    /// Classify a batch in parallel, preserving input order.
    pub fn classify_batch(&self, items: &[LabeledSubject]) -> BatchReport {
        let reports = items.par_iter().map(|item| self.classify_one(item)).collect();
        BatchReport { reports }
    }
}

/// Assess a batch with any backend, preserving input order.
pub fn assess_batch(backend: &dyn RiskBackend, subjects: &[Subject]) -> Vec<Assessment> {
    subjects.par_iter().map(|s| backend.assess(s)).collect()
}
