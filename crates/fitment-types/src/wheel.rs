use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{SpecError, WheelSpecErrors};
use crate::MM_PER_INCH;

const SUPPORTED_BOLT_COUNTS: [u8; 4] = [4, 5, 6, 8];
const MAX_BOLT_CIRCLE_MM: f64 = 250.0;

/// Lug count and pitch circle diameter, e.g. `5x114.3`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BoltPattern {
    count: u8,
    circle_diameter_mm: f64,
}

impl BoltPattern {
    pub fn new(count: u8, circle_diameter_mm: f64) -> Result<Self, SpecError> {
        if !SUPPORTED_BOLT_COUNTS.contains(&count) {
            return Err(SpecError::UnsupportedBoltCount { count: count as u32 });
        }
        if !(circle_diameter_mm > 0.0 && circle_diameter_mm <= MAX_BOLT_CIRCLE_MM) {
            return Err(SpecError::OutOfRangeDimension {
                field: "bolt_circle_mm",
                value: circle_diameter_mm,
                min: 0.0,
                max: MAX_BOLT_CIRCLE_MM,
            });
        }
        Ok(Self {
            count,
            circle_diameter_mm,
        })
    }

    pub fn count(&self) -> u8 {
        self.count
    }

    pub fn circle_diameter_mm(&self) -> f64 {
        self.circle_diameter_mm
    }
}

impl FromStr for BoltPattern {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || SpecError::MalformedBoltPattern {
            pattern: s.to_string(),
        };
        let (count, circle) = s.trim().split_once(['x', 'X']).ok_or_else(malformed)?;
        let count: u32 = count.trim().parse().map_err(|_| malformed())?;
        let circle: f64 = circle.trim().parse().map_err(|_| malformed())?;
        let count = u8::try_from(count).map_err(|_| SpecError::UnsupportedBoltCount { count })?;
        Self::new(count, circle)
    }
}

impl fmt::Display for BoltPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.count, self.circle_diameter_mm)
    }
}

impl TryFrom<String> for BoltPattern {
    type Error = SpecError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BoltPattern> for String {
    fn from(pattern: BoltPattern) -> Self {
        pattern.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadUnit {
    Kg,
    #[default]
    Lb,
}

/// Maximum load per wheel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LoadRating {
    pub value: u32,
    pub unit: LoadUnit,
}

impl LoadRating {
    pub fn kg(value: u32) -> Self {
        Self {
            value,
            unit: LoadUnit::Kg,
        }
    }

    pub fn lb(value: u32) -> Self {
        Self {
            value,
            unit: LoadUnit::Lb,
        }
    }

    pub fn as_kg(&self) -> f64 {
        match self.unit {
            LoadUnit::Kg => self.value as f64,
            LoadUnit::Lb => self.value as f64 * 0.453_592_37,
        }
    }
}

/// Plausible bounds for wheel fields.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WheelLimits {
    pub diameter_in: (f64, f64),
    pub width_in: (f64, f64),
    pub center_bore_mm: (f64, f64),
    /// Material that must remain between the mounting face and either rim
    /// edge; bounds |offset| to `width × 25.4 / 2 − min_hub_clearance_mm`.
    pub min_hub_clearance_mm: f64,
}

impl Default for WheelLimits {
    fn default() -> Self {
        Self {
            diameter_in: (10.0, 30.0),
            width_in: (4.0, 15.0),
            center_bore_mm: (50.0, 100.0),
            min_hub_clearance_mm: 25.0,
        }
    }
}

/// A validated wheel specification.
///
/// Construct through [`crate::validate_wheel_spec`] (or deserialise, which
/// runs the same checks).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawWheelSpec", into = "RawWheelSpec")]
pub struct WheelSpec {
    pub(crate) name: String,
    pub(crate) diameter_in: f64,
    pub(crate) width_in: f64,
    pub(crate) offset_mm: f64,
    pub(crate) bolt_pattern: BoltPattern,
    pub(crate) center_bore_mm: f64,
    pub(crate) load_rating: LoadRating,
}

impl WheelSpec {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn diameter_in(&self) -> f64 {
        self.diameter_in
    }

    pub fn width_in(&self) -> f64 {
        self.width_in
    }

    /// Offset in millimetres. Positive places the wheel centreline outboard of
    /// the hub mounting face.
    pub fn offset_mm(&self) -> f64 {
        self.offset_mm
    }

    pub fn bolt_pattern(&self) -> BoltPattern {
        self.bolt_pattern
    }

    pub fn center_bore_mm(&self) -> f64 {
        self.center_bore_mm
    }

    pub fn load_rating(&self) -> LoadRating {
        self.load_rating
    }

    pub fn width_mm(&self) -> f64 {
        self.width_in * MM_PER_INCH
    }

    pub fn diameter_mm(&self) -> f64 {
        self.diameter_in * MM_PER_INCH
    }

    /// Radius of the bead seat, where the tire sidewall starts.
    pub fn bead_seat_radius_mm(&self) -> f64 {
        self.diameter_mm() / 2.0
    }

    /// Re-check this spec against a different set of limits.
    pub fn check_limits(&self, limits: &WheelLimits) -> Result<(), WheelSpecErrors> {
        crate::codec::validate_wheel_spec_with(&RawWheelSpec::from(self.clone()), limits).map(|_| ())
    }

    /// Copy of this spec with a different offset, validated with default limits.
    pub fn with_offset(&self, offset_mm: f64) -> Result<Self, WheelSpecErrors> {
        let mut raw = RawWheelSpec::from(self.clone());
        raw.offset = offset_mm;
        crate::codec::validate_wheel_spec(&raw)
    }
}

/// Wheel record as supplied by a store or entry form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawWheelSpec {
    #[serde(default)]
    pub name: String,
    /// Inches.
    pub diameter: f64,
    /// Inches.
    pub width: f64,
    /// Millimetres (ET).
    pub offset: f64,
    pub bolt_pattern: String,
    /// Millimetres.
    pub center_bore: f64,
    pub load_rating: u32,
    #[serde(default)]
    pub load_unit: LoadUnit,
}

impl TryFrom<RawWheelSpec> for WheelSpec {
    type Error = WheelSpecErrors;

    fn try_from(raw: RawWheelSpec) -> Result<Self, Self::Error> {
        crate::codec::validate_wheel_spec(&raw)
    }
}

impl From<WheelSpec> for RawWheelSpec {
    fn from(wheel: WheelSpec) -> Self {
        Self {
            name: wheel.name,
            diameter: wheel.diameter_in,
            width: wheel.width_in,
            offset: wheel.offset_mm,
            bolt_pattern: wheel.bolt_pattern.to_string(),
            center_bore: wheel.center_bore_mm,
            load_rating: wheel.load_rating.value,
            load_unit: wheel.load_rating.unit,
        }
    }
}
