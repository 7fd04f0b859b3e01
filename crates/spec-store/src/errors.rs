use fitment_types::{TireId, WheelId};

/// Errors during spec document loading.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LoadError {
    #[error("failed to parse file: {0}")]
    ParseError(String),

    #[error("unknown file format: {0}")]
    UnknownFormat(String),

    #[error("file version {file_version} is newer than supported version {supported_version}")]
    FutureVersion {
        file_version: u32,
        supported_version: u32,
    },

    #[error("migration failed from version {from} to {to}: {reason}")]
    MigrationFailed { from: u32, to: u32, reason: String },

    #[error("combination refers to unknown wheel {wheel} or tire {tire}")]
    DanglingReference { wheel: WheelId, tire: TireId },

    #[error("id {0} appears more than once")]
    DuplicateId(String),
}

/// Errors during spec document saving.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SaveError {
    #[error("failed to serialize store: {0}")]
    Serialize(String),
}
