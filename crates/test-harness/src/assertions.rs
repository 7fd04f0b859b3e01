//! Assertion helpers with diagnostic output.
//!
//! Failures carry expected vs actual and the full event list.

use fitment_engine::SessionResult;
use fitment_ops::InterferenceEvent;

use crate::helpers::HarnessError;
use crate::oracle::OracleVerdict;

fn describe_events(events: &[InterferenceEvent]) -> String {
    if events.is_empty() {
        return "none".into();
    }
    events
        .iter()
        .map(|e| format!("({}, {}, {})", e.travel_mm, e.steering_deg, e.obstacle_id))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Assert the sweep produced exactly one event, at this cell, against this
/// obstacle.
pub fn assert_single_event(
    result: &SessionResult,
    travel_mm: f64,
    steering_deg: f64,
    obstacle_id: &str,
) -> Result<(), HarnessError> {
    let events = &result.interference.events;
    match events.as_slice() {
        [e] if (e.travel_mm - travel_mm).abs() < 1e-9
            && (e.steering_deg - steering_deg).abs() < 1e-9
            && e.obstacle_id == obstacle_id =>
        {
            Ok(())
        }
        _ => Err(HarnessError::AssertionFailed {
            detail: format!(
                "expected one event ({travel_mm}, {steering_deg}, {obstacle_id}), got [{}]",
                describe_events(events)
            ),
        }),
    }
}

/// Assert the sweep found no interference.
pub fn assert_no_interference(result: &SessionResult) -> Result<(), HarnessError> {
    if result.interference.has_interference {
        return Err(HarnessError::AssertionFailed {
            detail: format!("expected no interference, got [{}]", describe_events(&result.interference.events)),
        });
    }
    Ok(())
}

/// Assert `actual` is within `tol` of `expected`.
pub fn assert_close(actual: f64, expected: f64, tol: f64, ctx: &str) -> Result<(), HarnessError> {
    if (actual - expected).abs() <= tol {
        Ok(())
    } else {
        Err(HarnessError::AssertionFailed {
            detail: format!("[{ctx}] expected {expected} ± {tol}, got {actual}"),
        })
    }
}

/// Assert every verdict passed, listing all failures.
pub fn assert_all_oracles_pass(verdicts: &[OracleVerdict]) -> Result<(), HarnessError> {
    let failures: Vec<String> = verdicts
        .iter()
        .filter(|v| !v.passed)
        .map(|v| format!("{}: {}", v.oracle_name, v.detail))
        .collect();
    if failures.is_empty() {
        Ok(())
    } else {
        Err(HarnessError::AssertionFailed {
            detail: format!("{} oracle(s) failed:\n  {}", failures.len(), failures.join("\n  ")),
        })
    }
}
