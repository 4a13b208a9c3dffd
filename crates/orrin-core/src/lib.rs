pub mod catalog;
pub mod error;
pub mod mirror;
pub mod picker;
pub mod resource;
pub mod snapshot;
pub mod stats;
pub mod store;

pub use catalog::{MediaCatalog, RawMediaRecord, StaticCatalog};
pub use error::ListError;
pub use mirror::ListMirror;
pub use picker::{pick_category, pick_genre, pick_item, spin, Spin};
pub use resource::{MemoryResourceService, ResourceError, ResourceService, RestResourceService};
pub use snapshot::{SnapshotManager, StoreSnapshot};
pub use stats::WatchStats;
pub use store::{CategoryLists, ListNamePolicy, ListStore, MAX_CUSTOM_LISTS};
