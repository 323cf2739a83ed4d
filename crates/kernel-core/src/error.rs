use thiserror::Error;

/// Raised while building a catalog; never during a turn.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    #[error("duplicate catalog id: {0}")]
    DuplicateId(String),
    #[error("event {id} has probability {probability}, expected a value in (0, 1]")]
    InvalidProbability { id: String, probability: f64 },
    #[error("event probabilities sum to {total}, which exceeds 1")]
    ProbabilityMassExceeded { total: f64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TurnError {
    #[error("unknown action: {0}")]
    UnknownAction(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("event draw {0} is outside [0, 1)")]
pub struct DrawOutOfRange(pub f64);
