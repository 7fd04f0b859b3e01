use tracing::{debug, info};

use crate::errors::LoadError;
use crate::save::{SpecDocument, FORMAT_NAME, FORMAT_VERSION};
use crate::store::InMemorySpecStore;

/// Deserialize a store from a JSON string.
///
/// Validates the format identifier and version, then every record: wheel
/// and tire specs go through the size codec, and combinations must refer
/// to records in the same document.
pub fn load_store(json: &str) -> Result<InMemorySpecStore, LoadError> {
    let raw: SpecDocument = serde_json::from_str(json).map_err(|e| LoadError::ParseError(e.to_string()))?;

    if raw.format != FORMAT_NAME {
        return Err(LoadError::UnknownFormat(raw.format));
    }

    if raw.version > FORMAT_VERSION {
        return Err(LoadError::FutureVersion {
            file_version: raw.version,
            supported_version: FORMAT_VERSION,
        });
    }

    let version = raw.version;
    let doc = if version < FORMAT_VERSION {
        debug!(from = version, to = FORMAT_VERSION, "migrating spec document");
        crate::migrate::migrate(raw, version, FORMAT_VERSION)?
    } else {
        raw
    };

    let store = InMemorySpecStore::from_document(doc)?;
    info!(
        name = %store.metadata().name,
        wheels = store.wheel_count(),
        tires = store.tire_count(),
        "spec store loaded"
    );
    Ok(store)
}
