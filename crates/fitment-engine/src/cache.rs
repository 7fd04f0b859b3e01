use std::collections::HashMap;
use std::sync::Arc;

use fitment_types::{SpecStore, TireId, VehicleId, WheelId};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SessionError;
use crate::session::{FitmentSession, SessionResult};
use crate::vehicle::VehicleSource;

/// Identity of one evaluated combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FitmentKey {
    pub wheel: WheelId,
    pub tire: TireId,
    pub vehicle: VehicleId,
}

/// Opt-in memo of session results by [`FitmentKey`].
///
/// Entries are never updated in place. When a stored spec or vehicle
/// changes, invalidate the affected entries and evaluate again.
#[derive(Debug, Clone, Default)]
pub struct ResultCache {
    entries: HashMap<FitmentKey, Arc<SessionResult>>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &FitmentKey) -> Option<Arc<SessionResult>> {
        self.entries.get(key).cloned()
    }

    pub fn insert(&mut self, key: FitmentKey, result: SessionResult) -> Arc<SessionResult> {
        let result = Arc::new(result);
        self.entries.insert(key, Arc::clone(&result));
        result
    }

    /// Cached result for `key`, or evaluate through the stores and cache it.
    /// Failures are not cached.
    pub fn get_or_evaluate(
        &mut self,
        session: &FitmentSession,
        specs: &dyn SpecStore,
        vehicles: &dyn VehicleSource,
        key: FitmentKey,
    ) -> Result<Arc<SessionResult>, SessionError> {
        if let Some(hit) = self.get(&key) {
            debug!(?key, "result cache hit");
            return Ok(hit);
        }
        let result = session.evaluate_stored(specs, vehicles, key.wheel, key.tire, key.vehicle)?;
        Ok(self.insert(key, result))
    }

    /// Drop every entry that used this wheel. Returns how many were removed.
    pub fn invalidate_wheel(&mut self, wheel: WheelId) -> usize {
        self.invalidate(|k| k.wheel == wheel)
    }

    pub fn invalidate_tire(&mut self, tire: TireId) -> usize {
        self.invalidate(|k| k.tire == tire)
    }

    pub fn invalidate_vehicle(&mut self, vehicle: VehicleId) -> usize {
        self.invalidate(|k| k.vehicle == vehicle)
    }

    fn invalidate(&mut self, matches: impl Fn(&FitmentKey) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|k, _| !matches(k));
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
