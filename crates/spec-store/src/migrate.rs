use crate::errors::LoadError;
use crate::save::SpecDocument;

/// Apply format migrations from `from_version` to `to_version`.
///
/// Migrations are applied sequentially: v1→v2, v2→v3, etc.
/// Version 1 is the only version so far.
pub fn migrate(doc: SpecDocument, from_version: u32, to_version: u32) -> Result<SpecDocument, LoadError> {
    if from_version != to_version {
        return Err(LoadError::MigrationFailed {
            from: from_version,
            to: to_version,
            reason: format!("no migration path from v{} to v{}", from_version, to_version),
        });
    }
    Ok(doc)
}
