use std::collections::HashMap;

use fitment_ops::{ClearanceObstacle, FitmentBaseline, SuspensionGeometryModel};
use fitment_types::{StoreError, VehicleId};
use serde::{Deserialize, Serialize};

/// Suspension geometry and factory fitment for one vehicle/trim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleGeometry {
    pub id: VehicleId,
    #[serde(default)]
    pub name: String,
    pub suspension: SuspensionGeometryModel,
    /// Factory wheel and tire, used for deltas and speedometer error.
    #[serde(default)]
    pub baseline: Option<FitmentBaseline>,
}

/// Supplies vehicle geometry and clearance obstacles by vehicle id.
pub trait VehicleSource {
    fn vehicle(&self, id: VehicleId) -> Result<VehicleGeometry, StoreError>;

    fn obstacles(&self, id: VehicleId) -> Result<Vec<ClearanceObstacle>, StoreError>;
}

/// In-memory [`VehicleSource`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VehicleCatalog {
    vehicles: HashMap<VehicleId, CatalogEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CatalogEntry {
    geometry: VehicleGeometry,
    obstacles: Vec<ClearanceObstacle>,
}

impl VehicleCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a vehicle and its obstacles.
    pub fn insert(&mut self, geometry: VehicleGeometry, obstacles: Vec<ClearanceObstacle>) {
        self.vehicles.insert(geometry.id, CatalogEntry { geometry, obstacles });
    }

    pub fn remove(&mut self, id: VehicleId) -> Option<VehicleGeometry> {
        self.vehicles.remove(&id).map(|e| e.geometry)
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    fn entry(&self, id: VehicleId) -> Result<&CatalogEntry, StoreError> {
        self.vehicles.get(&id).ok_or(StoreError::VehicleNotFound(id))
    }
}

impl VehicleSource for VehicleCatalog {
    fn vehicle(&self, id: VehicleId) -> Result<VehicleGeometry, StoreError> {
        Ok(self.entry(id)?.geometry.clone())
    }

    fn obstacles(&self, id: VehicleId) -> Result<Vec<ClearanceObstacle>, StoreError> {
        Ok(self.entry(id)?.obstacles.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fit_kernel::{Point3d, Sphere};
    use fitment_ops::ObstacleVolume;

    fn geometry() -> VehicleGeometry {
        VehicleGeometry {
            id: VehicleId::new(),
            name: "Hatchback front".into(),
            suspension: SuspensionGeometryModel::from_gains(-30.0, 50.0, -1.0, -0.015, 0.0, 35.0).unwrap(),
            baseline: None,
        }
    }

    #[test]
    fn test_catalog_lookup() {
        let mut catalog = VehicleCatalog::new();
        let vehicle = geometry();
        let id = vehicle.id;
        let fender = ClearanceObstacle::chassis(
            "fender_lip",
            ObstacleVolume::Sphere(Sphere::new(Point3d::new(0.0, 40.0, 360.0), 15.0).unwrap()),
        );
        catalog.insert(vehicle.clone(), vec![fender]);

        assert_eq!(catalog.vehicle(id).unwrap(), vehicle);
        assert_eq!(catalog.obstacles(id).unwrap().len(), 1);

        let missing = VehicleId::new();
        assert_eq!(catalog.vehicle(missing), Err(StoreError::VehicleNotFound(missing)));

        assert!(catalog.remove(id).is_some());
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_serde_defaults() {
        let vehicle = geometry();
        let mut json = serde_json::to_value(&vehicle).unwrap();
        let obj = json.as_object_mut().unwrap();
        obj.remove("name");
        obj.remove("baseline");
        let back: VehicleGeometry = serde_json::from_value(json).unwrap();
        assert_eq!(back.name, "");
        assert!(back.baseline.is_none());
        assert_eq!(back.suspension, vehicle.suspension);
    }
}
