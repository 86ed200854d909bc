// ─────────────────────────────────────────────────────────────────────
// Kripke Risk Engine — Types
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Data model, configuration, and error hierarchy for the Kripke
//! risk engine: subjects, possible worlds, risk labels, and the
//! per-world result records produced by the modal evaluator.

pub mod config;
pub mod error;
pub mod score;
pub mod subject;
pub mod world;

pub use config::EngineConfig;
pub use error::{KripkeError, KripkeResult};
pub use score::{Assessment, ModalProfile, RankedWorld, WorldEvaluation};
pub use subject::{Attribute, ImagingFinding, LabResult, Subject, SubjectBuilder};
pub use world::{PossibleWorld, RiskLevel, UnknownRiskLabel, WorldId};
