pub mod error;
pub mod snapshot;
pub mod store;

pub use error::PersistenceError;
pub use snapshot::{Preferences, SnapshotCache};
pub use store::{FileSnapshotStore, MemorySnapshotStore, SnapshotStore, StorageKey};
