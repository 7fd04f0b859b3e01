use fitment_types::{TireId, TireSpec, WheelId, WheelSpec};
use serde::{Deserialize, Serialize};

use crate::errors::SaveError;
use crate::metadata::StoreMetadata;
use crate::store::InMemorySpecStore;

/// Format identifier written into every document.
pub const FORMAT_NAME: &str = "wheel-fitment-specs";

/// Current file format version.
pub const FORMAT_VERSION: u32 = 1;

/// The top-level file structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecDocument {
    /// Format identifier.
    pub format: String,
    /// Format version number.
    pub version: u32,
    pub metadata: StoreMetadata,
    #[serde(default)]
    pub wheels: Vec<WheelRecord>,
    #[serde(default)]
    pub tires: Vec<TireRecord>,
    /// Tire sizes offered on each wheel.
    #[serde(default)]
    pub combinations: Vec<Combination>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WheelRecord {
    pub id: WheelId,
    pub spec: WheelSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TireRecord {
    pub id: TireId,
    pub spec: TireSpec,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Combination {
    pub wheel: WheelId,
    pub tire: TireId,
}

/// Serialize a store to a pretty-printed JSON string.
pub fn save_store(store: &InMemorySpecStore) -> Result<String, SaveError> {
    serde_json::to_string_pretty(&store.to_document()).map_err(|e| SaveError::Serialize(e.to_string()))
}
