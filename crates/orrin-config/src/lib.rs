pub mod config;
pub mod paths;

pub use config::{CatalogConfig, Config, ListsConfig, LoggingConfig, RemoteConfig, StoreConfig};
pub use paths::{PathManager, container_base_path};
