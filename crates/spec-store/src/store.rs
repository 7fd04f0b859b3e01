use std::collections::{BTreeMap, BTreeSet, HashSet};

use fitment_types::{SpecStore, StoreError, TireId, TireSpec, WheelId, WheelSpec};
use tracing::debug;

use crate::errors::LoadError;
use crate::metadata::StoreMetadata;
use crate::save::{Combination, SpecDocument, TireRecord, WheelRecord, FORMAT_NAME, FORMAT_VERSION};

/// Wheels and tires keyed by id, plus the tires offered on each wheel.
///
/// Records are validated values, so nothing invalid can be stored. Lists
/// come back in id order.
#[derive(Debug, Clone)]
pub struct InMemorySpecStore {
    metadata: StoreMetadata,
    wheels: BTreeMap<WheelId, WheelSpec>,
    tires: BTreeMap<TireId, TireSpec>,
    combinations: BTreeSet<Combination>,
}

impl InMemorySpecStore {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            metadata: StoreMetadata::new(name),
            wheels: BTreeMap::new(),
            tires: BTreeMap::new(),
            combinations: BTreeSet::new(),
        }
    }

    pub fn metadata(&self) -> &StoreMetadata {
        &self.metadata
    }

    pub fn wheel_count(&self) -> usize {
        self.wheels.len()
    }

    pub fn tire_count(&self) -> usize {
        self.tires.len()
    }

    pub fn add_wheel(&mut self, spec: WheelSpec) -> WheelId {
        let id = WheelId::new();
        debug!(%id, name = spec.name(), "wheel added");
        self.wheels.insert(id, spec);
        self.metadata.touch();
        id
    }

    pub fn add_tire(&mut self, spec: TireSpec) -> TireId {
        let id = TireId::new();
        debug!(%id, size = %spec, "tire added");
        self.tires.insert(id, spec);
        self.metadata.touch();
        id
    }

    /// Offer `tire` on `wheel`. Returns `false` if it was already offered.
    pub fn add_tire_combination(&mut self, wheel: WheelId, tire: TireId) -> Result<bool, StoreError> {
        if !self.wheels.contains_key(&wheel) {
            return Err(StoreError::WheelNotFound(wheel));
        }
        if !self.tires.contains_key(&tire) {
            return Err(StoreError::TireNotFound(tire));
        }
        let added = self.combinations.insert(Combination { wheel, tire });
        if added {
            self.metadata.touch();
        }
        Ok(added)
    }

    /// Tires offered on `wheel`, in id order.
    pub fn compatible_tires(&self, wheel: WheelId) -> Result<Vec<(TireId, TireSpec)>, StoreError> {
        if !self.wheels.contains_key(&wheel) {
            return Err(StoreError::WheelNotFound(wheel));
        }
        Ok(self
            .combinations
            .iter()
            .filter(|c| c.wheel == wheel)
            .filter_map(|c| self.tires.get(&c.tire).map(|t| (c.tire, *t)))
            .collect())
    }

    /// Remove a wheel together with its combinations.
    pub fn remove_wheel(&mut self, id: WheelId) -> Result<WheelSpec, StoreError> {
        let spec = self.wheels.remove(&id).ok_or(StoreError::WheelNotFound(id))?;
        self.combinations.retain(|c| c.wheel != id);
        self.metadata.touch();
        Ok(spec)
    }

    /// Remove a tire together with its combinations.
    pub fn remove_tire(&mut self, id: TireId) -> Result<TireSpec, StoreError> {
        let spec = self.tires.remove(&id).ok_or(StoreError::TireNotFound(id))?;
        self.combinations.retain(|c| c.tire != id);
        self.metadata.touch();
        Ok(spec)
    }

    /// First wheel, in id order, with exactly this name.
    pub fn wheel_by_name(&self, name: &str) -> Option<(WheelId, &WheelSpec)> {
        self.wheels.iter().find(|(_, w)| w.name() == name).map(|(id, w)| (*id, w))
    }

    pub fn list_tire_specs(&self) -> Vec<(TireId, TireSpec)> {
        self.tires.iter().map(|(id, t)| (*id, *t)).collect()
    }

    pub(crate) fn to_document(&self) -> SpecDocument {
        SpecDocument {
            format: FORMAT_NAME.to_string(),
            version: FORMAT_VERSION,
            metadata: self.metadata.clone(),
            wheels: self
                .wheels
                .iter()
                .map(|(id, spec)| WheelRecord {
                    id: *id,
                    spec: spec.clone(),
                })
                .collect(),
            tires: self.tires.iter().map(|(id, spec)| TireRecord { id: *id, spec: *spec }).collect(),
            combinations: self.combinations.iter().copied().collect(),
        }
    }

    pub(crate) fn from_document(doc: SpecDocument) -> Result<Self, LoadError> {
        let mut wheels = BTreeMap::new();
        for record in doc.wheels {
            if wheels.insert(record.id, record.spec).is_some() {
                return Err(LoadError::DuplicateId(record.id.to_string()));
            }
        }
        let mut tires = BTreeMap::new();
        for record in doc.tires {
            if tires.insert(record.id, record.spec).is_some() {
                return Err(LoadError::DuplicateId(record.id.to_string()));
            }
        }
        let ids: HashSet<uuid::Uuid> = wheels.keys().map(|w: &WheelId| w.0).collect();
        if let Some(id) = tires.keys().find(|t: &&TireId| ids.contains(&t.0)) {
            return Err(LoadError::DuplicateId(id.to_string()));
        }

        let mut combinations = BTreeSet::new();
        for c in doc.combinations {
            if !wheels.contains_key(&c.wheel) || !tires.contains_key(&c.tire) {
                return Err(LoadError::DanglingReference {
                    wheel: c.wheel,
                    tire: c.tire,
                });
            }
            combinations.insert(c);
        }

        Ok(Self {
            metadata: doc.metadata,
            wheels,
            tires,
            combinations,
        })
    }
}

impl SpecStore for InMemorySpecStore {
    fn get_wheel_spec(&self, id: WheelId) -> Result<WheelSpec, StoreError> {
        self.wheels.get(&id).cloned().ok_or(StoreError::WheelNotFound(id))
    }

    fn get_tire_spec(&self, id: TireId) -> Result<TireSpec, StoreError> {
        self.tires.get(&id).copied().ok_or(StoreError::TireNotFound(id))
    }

    fn list_wheel_specs(&self) -> Vec<(WheelId, WheelSpec)> {
        self.wheels.iter().map(|(id, w)| (*id, w.clone())).collect()
    }
}
