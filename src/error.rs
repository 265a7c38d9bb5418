use crate::aggregate::Attractor;
use crate::settings::Dimension;
use std::collections::TryReserveError;
use thiserror::Error;

/// Errors surfaced by aggregate construction and generation.
///
/// Contract violations are rejected at construction; storage and budget
/// exhaustion leave the aggregate at a consistent quiescent state (the
/// already-stuck prefix remains valid).
#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("stickiness must lie in [0, 1], got {0}")]
    StickinessOutOfRange(f64),

    #[error("{attractor} attractor is not available in {dim}")]
    UnsupportedAttractor {
        dim: Dimension,
        attractor: Attractor,
    },

    #[error("attractor size must be at least 1")]
    ZeroAttractorSize,

    #[error("failed to reserve storage for {requested} additional particles")]
    StorageExhausted {
        requested: usize,
        #[source]
        source: TryReserveError,
    },

    #[error("walker exhausted its step budget of {budget} without sticking")]
    WalkBudgetExhausted { budget: u64 },
}
