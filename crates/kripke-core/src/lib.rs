// ─────────────────────────────────────────────────────────────────────
// Kripke Risk Engine — Core Engine
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Kripke-semantics modal reasoning engine for categorical risk
//! assessment of tabular health records.
//!
//! Data flow: record → `Subject` → active propositions → per-world
//! match statistics → ranked worlds → predicted `RiskLevel`.
//!
//! # Invariants
//!
//! 1. **Frames are validated once**: `FrameBuilder::build()` rejects an
//!    empty world set, duplicate worlds, and relation entries naming
//!    unknown worlds. A built `KripkeFrame` is never mutated.
//!
//! 2. **Evaluation is pure**: `evaluate` and `rank` touch no shared
//!    mutable state, so any number of subjects can be evaluated in
//!    parallel against one `Arc<KripkeFrame>` and repeated calls return
//!    identical results.
//!
//! 3. **Predicate failures are local**: an error or panic inside one
//!    proposition folds to "false" for that subject only and is logged.
//!
//! 4. **Ranking never comes back empty** for a built frame with the
//!    default config: when no world reaches the candidate threshold,
//!    every world is ranked.

pub mod backend;
pub mod driver;
pub mod evaluator;
pub mod frame;
pub mod lung;
pub mod proposition;
pub mod record;

pub use backend::{ExternalBackend, RiskBackend};
pub use driver::{assess_batch, BatchReport, ClassificationDriver, LabeledSubject, SubjectReport};
pub use evaluator::ModalEvaluator;
pub use frame::{FrameBuilder, KripkeFrame};
pub use lung::{lung_disease_frame, lung_disease_propositions, shared_lung_disease_frame};
pub use proposition::{PredicateFailure, Proposition, PropositionOutcome, PropositionRegistry};
pub use record::{subject_from_record, FieldSource};
