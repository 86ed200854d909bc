// ─────────────────────────────────────────────────────────────────────
// Kripke Risk Engine — Error Hierarchy
// ─────────────────────────────────────────────────────────────────────

use thiserror::Error;

/// Root error type for all Kripke engine failures.
///
/// Every variant is a configuration-time failure. Per-subject evaluation
/// never produces a `KripkeError`: predicate failures are folded to false
/// inside the proposition registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KripkeError {
    /// Frame declared without a single world.
    #[error("frame error: a Kripke frame needs at least one world")]
    EmptyFrame,

    /// A relation entry names a world that is not part of the frame.
    #[error("frame error: {relation} refers to unknown world '{world}'")]
    UnknownWorld { relation: &'static str, world: String },

    /// The same world (by value) was declared twice.
    #[error("frame error: world '{0}' declared more than once")]
    DuplicateWorld(String),

    /// Invalid engine configuration.
    #[error("config error: {0}")]
    Config(String),
}

pub type KripkeResult<T> = Result<T, KripkeError>;
