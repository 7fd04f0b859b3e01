//! Size codec: tire size codes and wheel records to canonical dimensions.

use crate::errors::{SpecError, WheelSpecErrors};
use crate::tire::{ServiceDescription, SpeedRating, TireSpec};
use crate::wheel::{BoltPattern, LoadRating, RawWheelSpec, WheelLimits, WheelSpec};
use crate::MM_PER_INCH;

/// Parse a size code of the form `{width}/{aspectRatio}R{rimDiameter}`,
/// optionally followed by a service description (`225/45R17 91Y`).
///
/// Width and aspect ratio are integers; the rim diameter may carry one
/// decimal place.
pub fn parse_tire_size(code: &str) -> Result<TireSpec, SpecError> {
    let malformed = |reason: &'static str| SpecError::MalformedSizeCode {
        code: code.to_string(),
        reason,
    };

    let trimmed = code.trim();
    let (size, service) = match trimmed.split_once(char::is_whitespace) {
        Some((size, rest)) => (size, Some(rest.trim())),
        None => (trimmed, None),
    };

    let (width, rest) = size
        .split_once('/')
        .ok_or_else(|| malformed("expected '/' after the section width"))?;
    let (aspect, rim) = rest
        .split_once('R')
        .ok_or_else(|| malformed("expected 'R' before the rim diameter"))?;

    let width = parse_digits(width, 3).ok_or_else(|| malformed("section width must be an integer"))?;
    let aspect = parse_digits(aspect, 3).ok_or_else(|| malformed("aspect ratio must be an integer"))?;
    let rim_tenths = parse_rim_tenths(rim)
        .ok_or_else(|| malformed("rim diameter must be an integer or have one decimal place"))?;

    // Values that overflow the narrow storage types are out of range, not malformed.
    let width = u16::try_from(width).map_err(|_| out_of_range("width_mm", width as f64, 115.0, 445.0))?;
    let aspect = u8::try_from(aspect).map_err(|_| out_of_range("aspect_ratio", aspect as f64, 25.0, 85.0))?;
    let rim_tenths = u16::try_from(rim_tenths)
        .map_err(|_| out_of_range("rim_diameter_in", rim_tenths as f64 / 10.0, 10.0, 24.0))?;

    let tire = TireSpec::from_parts(width, aspect, rim_tenths)?;

    match service {
        None => Ok(tire),
        Some(suffix) => {
            let service = parse_service(suffix).ok_or_else(|| malformed("service description must look like 91Y"))??;
            Ok(tire.with_service(service))
        }
    }
}

fn out_of_range(field: &'static str, value: f64, min: f64, max: f64) -> SpecError {
    SpecError::OutOfRangeDimension { field, value, min, max }
}

/// Parse a run of 1..=`max_len` ASCII digits.
fn parse_digits(s: &str, max_len: usize) -> Option<u32> {
    if s.is_empty() || s.len() > max_len || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

fn parse_rim_tenths(s: &str) -> Option<u32> {
    match s.split_once('.') {
        None => parse_digits(s, 2).map(|whole| whole * 10),
        Some((whole, frac)) => {
            if frac.len() != 1 {
                return None;
            }
            let whole = parse_digits(whole, 2)?;
            let frac = parse_digits(frac, 1)?;
            Some(whole * 10 + frac)
        }
    }
}

/// `Some(Err)` for a well-formed suffix with an out-of-range load index,
/// `None` when the suffix is not a service description at all.
fn parse_service(s: &str) -> Option<Result<ServiceDescription, SpecError>> {
    let symbol = s.chars().last()?;
    let digits = &s[..s.len() - symbol.len_utf8()];
    let load_index = parse_digits(digits, 3)?;
    let rating = SpeedRating::from_char(symbol)?;
    let load_index = u16::try_from(load_index).ok()?;
    Some(ServiceDescription::new(load_index, rating))
}

/// Validate a wheel record with the default limits.
pub fn validate_wheel_spec(raw: &RawWheelSpec) -> Result<WheelSpec, WheelSpecErrors> {
    validate_wheel_spec_with(raw, &WheelLimits::default())
}

/// Validate every field of a wheel record, collecting all failures.
pub fn validate_wheel_spec_with(raw: &RawWheelSpec, limits: &WheelLimits) -> Result<WheelSpec, WheelSpecErrors> {
    let mut errors = Vec::new();

    check_range(&mut errors, "diameter_in", raw.diameter, limits.diameter_in);
    let width_ok = check_range(&mut errors, "width_in", raw.width, limits.width_in);
    let bore_ok = check_range(&mut errors, "center_bore_mm", raw.center_bore, limits.center_bore_mm);

    if width_ok {
        let limit = raw.width * MM_PER_INCH / 2.0 - limits.min_hub_clearance_mm;
        check_range(&mut errors, "offset_mm", raw.offset, (-limit, limit));
    } else if !raw.offset.is_finite() {
        errors.push(out_of_range("offset_mm", raw.offset, f64::MIN, f64::MAX));
    }

    let bolt_pattern = match raw.bolt_pattern.parse::<BoltPattern>() {
        Ok(bp) => {
            // The bore has to fit inside the lug circle. An out-of-range
            // bore is already reported.
            if bore_ok && raw.center_bore >= bp.circle_diameter_mm() {
                errors.push(out_of_range(
                    "center_bore_mm",
                    raw.center_bore,
                    limits.center_bore_mm.0,
                    bp.circle_diameter_mm(),
                ));
            }
            Some(bp)
        }
        Err(e) => {
            errors.push(e);
            None
        }
    };

    if raw.load_rating == 0 {
        errors.push(out_of_range("load_rating", 0.0, 1.0, u32::MAX as f64));
    }

    match bolt_pattern {
        Some(bolt_pattern) if errors.is_empty() => Ok(WheelSpec {
            name: raw.name.clone(),
            diameter_in: raw.diameter,
            width_in: raw.width,
            offset_mm: raw.offset,
            bolt_pattern,
            center_bore_mm: raw.center_bore,
            load_rating: LoadRating {
                value: raw.load_rating,
                unit: raw.load_unit,
            },
        }),
        _ => Err(WheelSpecErrors(errors)),
    }
}

fn check_range(errors: &mut Vec<SpecError>, field: &'static str, value: f64, (min, max): (f64, f64)) -> bool {
    if (min..=max).contains(&value) {
        true
    } else {
        errors.push(out_of_range(field, value, min, max));
        false
    }
}

/// Check that a tire's rim diameter matches the wheel within `tolerance_in`.
pub fn check_rim_compatibility(tire: &TireSpec, wheel: &WheelSpec, tolerance_in: f64) -> Result<(), SpecError> {
    if (tire.rim_diameter_in() - wheel.diameter_in()).abs() <= tolerance_in {
        Ok(())
    } else {
        Err(SpecError::IncompatibleRimDiameter {
            tire_in: tire.rim_diameter_in(),
            wheel_in: wheel.diameter_in(),
            tolerance_in,
        })
    }
}
