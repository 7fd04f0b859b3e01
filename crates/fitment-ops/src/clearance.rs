//! Clearance sweep: the tire envelope moved through travel × steering and
//! tested against every obstacle.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Arc;

use fit_kernel::{convex_distance, BoundingBox, ConvexShape, Transform};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::error::FitmentError;
use crate::obstacle::{ClearanceObstacle, ObstacleMount, ObstacleVolume};
use crate::profile::{EnvelopeCover, TireEnvelope};
use crate::suspension::{SuspensionGeometryModel, SuspensionPose};

/// Sweep limits and tolerances.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Largest accepted travel × steering grid.
    pub max_grid_cells: usize,
    /// Evaluate grid cells on the rayon thread pool.
    pub parallel: bool,
    /// Shapes closer than this count as touching.
    pub contact_tolerance_mm: f64,
    /// Angular pieces per sidewall band of the tire cover. More sectors hug
    /// the tread arc more closely.
    pub cover_sectors: usize,
}

/// Fewest cover sectors a sweep accepts.
pub const MIN_COVER_SECTORS: usize = 8;

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            max_grid_cells: 20_000,
            parallel: true,
            contact_tolerance_mm: 0.0,
            cover_sectors: 32,
        }
    }
}

impl SweepConfig {
    pub fn validate(&self) -> Result<(), FitmentError> {
        if !self.contact_tolerance_mm.is_finite() || self.contact_tolerance_mm < 0.0 {
            return Err(FitmentError::InvalidConfig {
                field: "contact_tolerance_mm",
                value: self.contact_tolerance_mm,
            });
        }
        if self.cover_sectors < MIN_COVER_SECTORS {
            return Err(FitmentError::InvalidConfig {
                field: "cover_sectors",
                value: self.cover_sectors as f64,
            });
        }
        Ok(())
    }
}

/// Cooperative cancellation flag shared between a sweep and its caller.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, AtomicOrdering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(AtomicOrdering::Relaxed)
    }
}

/// One interfering (travel, steering, obstacle) triple.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterferenceEvent {
    pub travel_mm: f64,
    pub steering_deg: f64,
    pub obstacle_id: String,
    /// Distance at this cell; zero when the volumes overlap.
    pub clearance_mm: f64,
}

impl InterferenceEvent {
    fn sort_key_cmp(&self, other: &Self) -> Ordering {
        self.travel_mm
            .total_cmp(&other.travel_mm)
            .then_with(|| self.steering_deg.total_cmp(&other.steering_deg))
            .then_with(|| self.obstacle_id.cmp(&other.obstacle_id))
    }
}

/// The closest approach seen during a sweep and where it happened.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClearanceSample {
    pub distance_mm: f64,
    pub travel_mm: f64,
    pub steering_deg: f64,
    pub obstacle_id: String,
}

impl ClearanceSample {
    fn cmp_rank(&self, other: &Self) -> Ordering {
        self.distance_mm
            .total_cmp(&other.distance_mm)
            .then_with(|| self.travel_mm.total_cmp(&other.travel_mm))
            .then_with(|| self.steering_deg.total_cmp(&other.steering_deg))
            .then_with(|| self.obstacle_id.cmp(&other.obstacle_id))
    }
}

/// Outcome of a completed sweep.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterferenceReport {
    pub has_interference: bool,
    /// Sorted by travel, then steering, then obstacle id.
    pub events: Vec<InterferenceEvent>,
    /// `None` when there was nothing to measure against.
    pub min_clearance: Option<ClearanceSample>,
    pub cells_evaluated: usize,
}

impl InterferenceReport {
    fn empty() -> Self {
        Self {
            has_interference: false,
            events: Vec::new(),
            min_clearance: None,
            cells_evaluated: 0,
        }
    }
}

/// Run a sweep with the default configuration and no cancellation.
pub fn check_interference(
    envelope: &TireEnvelope,
    model: &SuspensionGeometryModel,
    obstacles: &[ClearanceObstacle],
    travel_samples: &[f64],
    steering_samples: &[f64],
) -> Result<InterferenceReport, FitmentError> {
    ClearanceValidator::new(SweepConfig::default()).check(envelope, model, obstacles, travel_samples, steering_samples)
}

/// Sweeps a tire envelope through a travel × steering grid.
#[derive(Debug, Clone, Default)]
pub struct ClearanceValidator {
    config: SweepConfig,
    cancel: Option<CancellationToken>,
}

/// Per-cell result; `None` in the cell list marks a cell skipped after
/// cancellation.
struct CellOutcome {
    events: Vec<InterferenceEvent>,
    nearest: Option<ClearanceSample>,
}

impl ClearanceValidator {
    pub fn new(config: SweepConfig) -> Self {
        Self { config, cancel: None }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    /// Test every (travel, steering) cell against every obstacle.
    ///
    /// All inputs are validated before any geometry is posed. Events come
    /// back in (travel, steering, obstacle id) order whatever order the
    /// cells were evaluated in.
    #[instrument(skip_all, fields(obstacles = obstacles.len(), travel = travel_samples.len(), steering = steering_samples.len()))]
    pub fn check(
        &self,
        envelope: &TireEnvelope,
        model: &SuspensionGeometryModel,
        obstacles: &[ClearanceObstacle],
        travel_samples: &[f64],
        steering_samples: &[f64],
    ) -> Result<InterferenceReport, FitmentError> {
        self.config.validate()?;
        for obstacle in obstacles {
            obstacle.validate()?;
        }
        for &t in travel_samples {
            model.check_travel(t)?;
        }
        for &s in steering_samples {
            model.check_steering(s)?;
        }
        let total = travel_samples
            .len()
            .checked_mul(steering_samples.len())
            .unwrap_or(usize::MAX);
        if total > self.config.max_grid_cells {
            return Err(FitmentError::SampleGridTooLarge {
                cells: total,
                limit: self.config.max_grid_cells,
            });
        }

        if total == 0 && !obstacles.is_empty() {
            warn!(obstacles = obstacles.len(), "empty sample grid, no obstacle is measured");
        }
        if obstacles.is_empty() {
            debug!("no obstacles, nothing to sweep");
            return Ok(InterferenceReport::empty());
        }

        let poses = travel_samples
            .iter()
            .map(|&t| model.sample_at(t))
            .collect::<Result<Vec<_>, _>>()?;
        let cover = envelope.cover(self.config.cover_sectors)?;

        let cells: Vec<(usize, usize)> = (0..travel_samples.len())
            .flat_map(|ti| (0..steering_samples.len()).map(move |si| (ti, si)))
            .collect();

        let sweep = CellSweep {
            envelope,
            model,
            obstacles,
            poses: &poses,
            steering_samples,
            cover: &cover,
            contact: self.config.contact_tolerance_mm,
            cancel: self.cancel.as_ref(),
        };
        let outcomes: Vec<Option<CellOutcome>> = if self.config.parallel {
            cells.par_iter().map(|&cell| sweep.evaluate(cell)).collect()
        } else {
            cells.iter().map(|&cell| sweep.evaluate(cell)).collect()
        };

        let evaluated = outcomes.iter().filter(|o| o.is_some()).count();
        if evaluated < total {
            warn!(evaluated, total, "clearance sweep aborted");
            return Err(FitmentError::SweepAborted { evaluated, total });
        }

        let mut events = Vec::new();
        let mut min_clearance: Option<ClearanceSample> = None;
        for outcome in outcomes.into_iter().flatten() {
            events.extend(outcome.events);
            if let Some(near) = outcome.nearest {
                let closer = min_clearance
                    .as_ref()
                    .map_or(true, |best| near.cmp_rank(best) == Ordering::Less);
                if closer {
                    min_clearance = Some(near);
                }
            }
        }
        events.sort_by(InterferenceEvent::sort_key_cmp);

        let has_interference = !events.is_empty();
        if has_interference {
            warn!(events = events.len(), first = ?events.first().map(|e| &e.obstacle_id), "interference found");
        }
        info!(
            has_interference,
            cells = total,
            min_clearance_mm = ?min_clearance.as_ref().map(|c| c.distance_mm),
            "clearance sweep complete"
        );

        Ok(InterferenceReport {
            has_interference,
            events,
            min_clearance,
            cells_evaluated: evaluated,
        })
    }
}

/// Shared, read-only inputs for evaluating grid cells.
struct CellSweep<'a> {
    envelope: &'a TireEnvelope,
    model: &'a SuspensionGeometryModel,
    obstacles: &'a [ClearanceObstacle],
    poses: &'a [SuspensionPose],
    steering_samples: &'a [f64],
    cover: &'a EnvelopeCover,
    contact: f64,
    cancel: Option<&'a CancellationToken>,
}

impl CellSweep<'_> {
    fn evaluate(&self, (ti, si): (usize, usize)) -> Option<CellOutcome> {
        if self.cancel.is_some_and(|c| c.is_cancelled()) {
            return None;
        }

        let pose = &self.poses[ti];
        let steering = self.steering_samples[si];
        let hub = self.model.hub_transform(pose, steering);
        let tire = Transform::translation(0.0, self.envelope.wheel_offset_mm(), 0.0).then(&hub);

        let cover = self.cover.transformed(&tire);

        let mut events = Vec::new();
        let mut nearest: Option<ClearanceSample> = None;
        for obstacle in self.obstacles {
            let volume: Cow<'_, ObstacleVolume> = match obstacle.mount {
                ObstacleMount::Chassis => Cow::Borrowed(&obstacle.volume),
                ObstacleMount::Upright => Cow::Owned(obstacle.volume.transformed(&hub)),
            };
            let distance = nearest_distance(&cover, volume.as_ref());

            if distance <= self.contact {
                events.push(InterferenceEvent {
                    travel_mm: pose.travel_mm,
                    steering_deg: steering,
                    obstacle_id: obstacle.id.clone(),
                    clearance_mm: distance,
                });
            }
            let sample = ClearanceSample {
                distance_mm: distance,
                travel_mm: pose.travel_mm,
                steering_deg: steering,
                obstacle_id: obstacle.id.clone(),
            };
            if nearest.as_ref().map_or(true, |n| sample.cmp_rank(n) == Ordering::Less) {
                nearest = Some(sample);
            }
        }

        Some(CellOutcome { events, nearest })
    }
}

/// Distance from the posed cover to one obstacle. Bands and sectors whose
/// bounds are already further away than the best piece so far are skipped,
/// and the scan stops once it reaches the distance to the overall bound,
/// which no piece can beat.
fn nearest_distance(cover: &EnvelopeCover, volume: &ObstacleVolume) -> f64 {
    let volume_box = volume.bounding_box();
    let floor = convex_distance(&cover.bound, volume);

    let mut best = f64::INFINITY;
    'bands: for band in &cover.bands {
        if box_gap(&band.bound.bounding_box(), &volume_box) >= best || convex_distance(&band.bound, volume) >= best {
            continue;
        }
        for sector in &band.sectors {
            if box_gap(&sector.bounding_box(), &volume_box) >= best {
                continue;
            }
            best = best.min(convex_distance(sector, volume));
            if best <= floor {
                break 'bands;
            }
        }
    }
    best
}

/// Euclidean gap between two boxes; zero when they overlap. Never more
/// than the distance between anything inside them.
fn box_gap(a: &BoundingBox, b: &BoundingBox) -> f64 {
    let axis = |a_min: f64, a_max: f64, b_min: f64, b_max: f64| (b_min - a_max).max(a_min - b_max).max(0.0);
    let dx = axis(a.min.x, a.max.x, b.min.x, b.max.x);
    let dy = axis(a.min.y, a.max.y, b.min.y, b.max.y);
    let dz = axis(a.min.z, a.max.z, b.min.z, b.max.z);
    (dx * dx + dy * dy + dz * dz).sqrt()
}
