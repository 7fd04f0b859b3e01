//! Reference spec store: wheels, tires and the tire sizes offered on each
//! wheel, kept in memory and persisted as a versioned JSON document.

pub mod errors;
pub mod load;
pub mod metadata;
pub mod migrate;
pub mod save;
pub mod store;

pub use errors::{LoadError, SaveError};
pub use load::load_store;
pub use metadata::StoreMetadata;
pub use save::{save_store, FORMAT_NAME, FORMAT_VERSION};
pub use store::InMemorySpecStore;
