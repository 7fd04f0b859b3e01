//! Fitment operations: tire envelope construction, fitment metrics, the
//! suspension geometry model and the clearance sweep.

pub mod clearance;
pub mod error;
pub mod fitment;
pub mod obstacle;
pub mod profile;
pub mod suspension;

pub use clearance::{
    check_interference, CancellationToken, ClearanceSample, ClearanceValidator, InterferenceEvent,
    InterferenceReport, SweepConfig, MIN_COVER_SECTORS,
};
pub use error::FitmentError;
pub use fitment::{compute_fitment, compute_fitment_with, BaselineComparison, FitmentBaseline, FitmentConfig, FitmentResult};
pub use obstacle::{ClearanceObstacle, ObstacleMount, ObstacleVolume};
pub use profile::{
    build_envelope, build_envelope_with, CoverBand, EnvelopeCover, ProfileConfig, ProfilePoint, TireEnvelope,
    MIN_PROFILE_RESOLUTION,
};
pub use suspension::{Interpolation, SuspensionGeometryModel, SuspensionPose, SuspensionSample};
