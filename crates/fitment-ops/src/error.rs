use fit_kernel::GeometryError;
use fitment_types::SpecError;

/// Errors from the fitment operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FitmentError {
    #[error(transparent)]
    Spec(#[from] SpecError),

    #[error("geometry error: {0}")]
    Geometry(#[from] GeometryError),

    #[error("profile resolution {resolution} is below the minimum of {min}")]
    DegenerateProfileResolution { resolution: usize, min: usize },

    #[error("revolution needs at least 3 segments, got {segments}")]
    TooFewSegments { segments: usize },

    #[error("invalid configuration: {field} = {value}")]
    InvalidConfig { field: &'static str, value: f64 },

    #[error("invalid suspension model: {reason}")]
    InvalidSuspensionModel { reason: String },

    #[error("travel position {travel_mm} mm is outside [{min_mm}, {max_mm}]")]
    TravelOutOfDomain { travel_mm: f64, min_mm: f64, max_mm: f64 },

    #[error("steering angle {angle_deg}° is outside [{min_deg}, {max_deg}]")]
    SteeringOutOfDomain { angle_deg: f64, min_deg: f64, max_deg: f64 },

    #[error("invalid obstacle '{id}': {source}")]
    InvalidObstacle {
        id: String,
        #[source]
        source: GeometryError,
    },

    #[error("sample grid of {cells} cells exceeds the limit of {limit}")]
    SampleGridTooLarge { cells: usize, limit: usize },

    #[error("sweep aborted after {evaluated} of {total} cells")]
    SweepAborted { evaluated: usize, total: usize },
}
