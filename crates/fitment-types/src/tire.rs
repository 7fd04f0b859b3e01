use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::SpecError;
use crate::MM_PER_INCH;

pub(crate) const WIDTH_RANGE_MM: (u16, u16) = (115, 445);
pub(crate) const ASPECT_RANGE: (u8, u8) = (25, 85);
pub(crate) const RIM_RANGE_TENTHS: (u16, u16) = (100, 240);
pub(crate) const MAX_LOAD_INDEX: u16 = 279;

/// ISO speed symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SpeedRating {
    L,
    M,
    N,
    P,
    Q,
    R,
    S,
    T,
    U,
    H,
    V,
    W,
    Y,
    Z,
}

impl SpeedRating {
    pub fn from_char(c: char) -> Option<Self> {
        let rating = match c {
            'L' => Self::L,
            'M' => Self::M,
            'N' => Self::N,
            'P' => Self::P,
            'Q' => Self::Q,
            'R' => Self::R,
            'S' => Self::S,
            'T' => Self::T,
            'U' => Self::U,
            'H' => Self::H,
            'V' => Self::V,
            'W' => Self::W,
            'Y' => Self::Y,
            'Z' => Self::Z,
            _ => return None,
        };
        Some(rating)
    }

    pub fn as_char(&self) -> char {
        match self {
            Self::L => 'L',
            Self::M => 'M',
            Self::N => 'N',
            Self::P => 'P',
            Self::Q => 'Q',
            Self::R => 'R',
            Self::S => 'S',
            Self::T => 'T',
            Self::U => 'U',
            Self::H => 'H',
            Self::V => 'V',
            Self::W => 'W',
            Self::Y => 'Y',
            Self::Z => 'Z',
        }
    }

    /// Maximum sustained speed in km/h. `Z` is open-ended above 240.
    pub fn max_speed_kmh(&self) -> u16 {
        match self {
            Self::L => 120,
            Self::M => 130,
            Self::N => 140,
            Self::P => 150,
            Self::Q => 160,
            Self::R => 170,
            Self::S => 180,
            Self::T => 190,
            Self::U => 200,
            Self::H => 210,
            Self::V => 240,
            Self::W => 270,
            Self::Y => 300,
            Self::Z => 240,
        }
    }
}

fn rim_out_of_range(value: f64) -> SpecError {
    SpecError::OutOfRangeDimension {
        field: "rim_diameter_in",
        value,
        min: RIM_RANGE_TENTHS.0 as f64 / 10.0,
        max: RIM_RANGE_TENTHS.1 as f64 / 10.0,
    }
}

/// Load index + speed symbol suffix, e.g. the `91Y` in `225/45R17 91Y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ServiceDescription {
    load_index: u16,
    speed_rating: SpeedRating,
}

impl ServiceDescription {
    pub fn new(load_index: u16, speed_rating: SpeedRating) -> Result<Self, SpecError> {
        if load_index > MAX_LOAD_INDEX {
            return Err(SpecError::OutOfRangeDimension {
                field: "load_index",
                value: load_index as f64,
                min: 0.0,
                max: MAX_LOAD_INDEX as f64,
            });
        }
        Ok(Self {
            load_index,
            speed_rating,
        })
    }

    pub fn load_index(&self) -> u16 {
        self.load_index
    }

    pub fn speed_rating(&self) -> SpeedRating {
        self.speed_rating
    }
}

impl fmt::Display for ServiceDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.load_index, self.speed_rating.as_char())
    }
}

/// A tire size in canonical numeric form.
///
/// Only the nominal dimensions are stored; sidewall height, overall diameter
/// and circumference are derived on demand. The rim diameter is kept in
/// tenths of an inch so that formatting reproduces the parsed code exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTireSpec", into = "RawTireSpec")]
pub struct TireSpec {
    width_mm: u16,
    aspect_ratio: u8,
    rim_tenths: u16,
    service: Option<ServiceDescription>,
}

impl TireSpec {
    /// Build a tire spec from its nominal dimensions, range-checking each.
    pub fn new(width_mm: u16, aspect_ratio: u8, rim_diameter_in: f64) -> Result<Self, SpecError> {
        let scaled = rim_diameter_in * 10.0;
        let rim_tenths = scaled.round();
        if !(0.0..=u16::MAX as f64).contains(&rim_tenths) {
            return Err(rim_out_of_range(rim_diameter_in));
        }
        if (scaled - rim_tenths).abs() > 1e-6 {
            return Err(SpecError::ExcessPrecision {
                field: "rim_diameter_in",
                value: rim_diameter_in,
            });
        }
        Self::from_parts(width_mm, aspect_ratio, rim_tenths as u16)
    }

    pub(crate) fn from_parts(width_mm: u16, aspect_ratio: u8, rim_tenths: u16) -> Result<Self, SpecError> {
        if !(WIDTH_RANGE_MM.0..=WIDTH_RANGE_MM.1).contains(&width_mm) {
            return Err(SpecError::OutOfRangeDimension {
                field: "width_mm",
                value: width_mm as f64,
                min: WIDTH_RANGE_MM.0 as f64,
                max: WIDTH_RANGE_MM.1 as f64,
            });
        }
        if !(ASPECT_RANGE.0..=ASPECT_RANGE.1).contains(&aspect_ratio) {
            return Err(SpecError::OutOfRangeDimension {
                field: "aspect_ratio",
                value: aspect_ratio as f64,
                min: ASPECT_RANGE.0 as f64,
                max: ASPECT_RANGE.1 as f64,
            });
        }
        if !(RIM_RANGE_TENTHS.0..=RIM_RANGE_TENTHS.1).contains(&rim_tenths) {
            return Err(rim_out_of_range(rim_tenths as f64 / 10.0));
        }
        Ok(Self {
            width_mm,
            aspect_ratio,
            rim_tenths,
            service: None,
        })
    }

    pub fn with_service(mut self, service: ServiceDescription) -> Self {
        self.service = Some(service);
        self
    }

    pub fn width_mm(&self) -> u16 {
        self.width_mm
    }

    /// Section width as a float, for geometry.
    pub fn section_width_mm(&self) -> f64 {
        self.width_mm as f64
    }

    pub fn aspect_ratio(&self) -> u8 {
        self.aspect_ratio
    }

    pub fn rim_diameter_in(&self) -> f64 {
        self.rim_tenths as f64 / 10.0
    }

    pub fn service(&self) -> Option<ServiceDescription> {
        self.service
    }

    /// `width × aspectRatio / 100`.
    pub fn sidewall_height_mm(&self) -> f64 {
        self.width_mm as f64 * self.aspect_ratio as f64 / 100.0
    }

    /// `rimDiameter × 25.4 + 2 × sidewallHeight`.
    pub fn overall_diameter_mm(&self) -> f64 {
        self.rim_diameter_in() * MM_PER_INCH + 2.0 * self.sidewall_height_mm()
    }

    pub fn circumference_mm(&self) -> f64 {
        std::f64::consts::PI * self.overall_diameter_mm()
    }

    /// Unloaded revolutions per kilometre.
    pub fn revolutions_per_km(&self) -> f64 {
        1_000_000.0 / self.circumference_mm()
    }

    /// The canonical size code, e.g. `225/45R17` or `235/75R17.5 91Y`.
    pub fn size_code(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TireSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}R{}", self.width_mm, self.aspect_ratio, self.rim_tenths / 10)?;
        if self.rim_tenths % 10 != 0 {
            write!(f, ".{}", self.rim_tenths % 10)?;
        }
        if let Some(service) = &self.service {
            write!(f, " {service}")?;
        }
        Ok(())
    }
}

impl FromStr for TireSpec {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::codec::parse_tire_size(s)
    }
}

/// Flat tire record as kept by a spec store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTireSpec {
    pub width: u16,
    pub aspect_ratio: u8,
    /// Rim diameter in inches.
    pub diameter: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_index: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed_rating: Option<char>,
}

impl TryFrom<RawTireSpec> for TireSpec {
    type Error = SpecError;

    fn try_from(raw: RawTireSpec) -> Result<Self, Self::Error> {
        let tire = TireSpec::new(raw.width, raw.aspect_ratio, raw.diameter)?;
        match (raw.load_index, raw.speed_rating) {
            (Some(load_index), Some(symbol)) => {
                let rating = SpeedRating::from_char(symbol).ok_or_else(|| SpecError::MalformedSizeCode {
                    code: format!("{load_index}{symbol}"),
                    reason: "unknown speed rating",
                })?;
                Ok(tire.with_service(ServiceDescription::new(load_index, rating)?))
            }
            (None, None) => Ok(tire),
            _ => Err(SpecError::MalformedSizeCode {
                code: format!("{tire}"),
                reason: "load index and speed rating must be given together",
            }),
        }
    }
}

impl From<TireSpec> for RawTireSpec {
    fn from(tire: TireSpec) -> Self {
        Self {
            width: tire.width_mm,
            aspect_ratio: tire.aspect_ratio,
            diameter: tire.rim_diameter_in(),
            load_index: tire.service.map(|s| s.load_index),
            speed_rating: tire.service.map(|s| s.speed_rating.as_char()),
        }
    }
}
