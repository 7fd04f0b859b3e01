use fitment_ops::FitmentError;
use fitment_types::{StoreError, WheelSpecErrors};

/// Why a session could not produce a result.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Fitment(#[from] FitmentError),

    #[error(transparent)]
    Wheel(#[from] WheelSpecErrors),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("obstacle id '{id}' is used more than once")]
    DuplicateObstacle { id: String },

    #[error("invalid session configuration: {field} = {value}")]
    InvalidConfig { field: &'static str, value: f64 },
}

impl SessionError {
    /// The sweep was cancelled; no report exists for this session.
    pub fn is_aborted(&self) -> bool {
        matches!(self, Self::Fitment(FitmentError::SweepAborted { .. }))
    }
}
