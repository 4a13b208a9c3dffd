pub mod catalog;
pub mod clear;
pub mod config;
pub mod lists;
pub mod prompts;
pub mod show;
pub mod spin;
pub mod stats;
pub mod status;

use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Table};
use orrin_config::{Config, PathManager};
use orrin_core::{
    ListError, ListMirror, ListNamePolicy, ListStore, MediaCatalog, RestResourceService, SnapshotManager,
    StaticCatalog, WatchStats,
};
use orrin_models::{MediaCategory, MediaItem, StatusLabel};
use std::time::Duration;

pub fn parse_category(raw: &str) -> Result<MediaCategory> {
    raw.parse::<MediaCategory>()
        .map_err(|e| eyre!("{}", ListError::from(e)))
}

pub fn parse_status(raw: &str) -> Result<StatusLabel> {
    raw.parse::<StatusLabel>()
        .map_err(|e| eyre!("{}", ListError::from(e)))
}

pub fn load_config(paths: &PathManager) -> Result<Config> {
    let config_file = paths.config_file();
    let config = Config::load_or_default(&config_file)
        .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?;
    config
        .validate()
        .map_err(|e| eyre!("Invalid configuration in {}: {}", config_file.display(), e))?;
    Ok(config)
}

pub fn load_catalog(config: &Config, paths: &PathManager) -> Result<StaticCatalog> {
    let catalog_path = config.catalog_path(paths);
    StaticCatalog::load_from_file(&catalog_path).map_err(|e| eyre!("{:#}", e))
}

pub fn name_policy(config: &Config) -> ListNamePolicy {
    if config.lists.unique_names {
        ListNamePolicy::Unique
    } else {
        ListNamePolicy::AllowDuplicates
    }
}

pub fn find_item<C: MediaCatalog>(catalog: &C, media_id: &str) -> Result<MediaItem> {
    catalog
        .find(media_id)
        .cloned()
        .ok_or_else(|| eyre!("No title with id '{}' in the catalog. Run 'orrin catalog' to list ids.", media_id))
}

/// Saved store plus everything needed to write it back
pub struct Session {
    pub paths: PathManager,
    pub config: Config,
    pub store: ListStore,
    snapshots: SnapshotManager,
}

impl Session {
    pub fn open() -> Result<Self> {
        let paths = PathManager::default();
        let config = load_config(&paths)?;
        let snapshots = SnapshotManager::new(config.snapshot_path(&paths));
        let store = snapshots
            .load_or_new(name_policy(&config))
            .map_err(|e| eyre!("Failed to load saved lists from {}: {}", snapshots.path().display(), e))?;

        Ok(Self {
            paths,
            config,
            store,
            snapshots,
        })
    }

    pub fn catalog(&self) -> Result<StaticCatalog> {
        load_catalog(&self.config, &self.paths)
    }

    /// Save locally, then mirror the category when a remote is configured.
    /// Remote failures are reported but never undo the local save.
    pub async fn commit(&self, category: MediaCategory, with_stats: bool, output: &Output) -> Result<()> {
        self.snapshots
            .save(&self.store)
            .map_err(|e| eyre!("Failed to save lists to {}: {}", self.snapshots.path().display(), e))?;

        if !self.config.remote.enabled {
            return Ok(());
        }

        let remote = &self.config.remote;
        let service = match RestResourceService::new(&remote.base_url, Duration::from_secs(remote.timeout_seconds)) {
            Ok(service) => service,
            Err(e) => {
                tracing::warn!("Remote mirror disabled for this run: {}", e);
                output.warn(format!("Saved locally, but the remote at {} is unusable: {}", remote.base_url, e));
                return Ok(());
            }
        };
        let mirror = ListMirror::new(service, remote.user_id.clone());

        if let Err(e) = mirror.publish_category(&self.store, category).await {
            tracing::warn!(%category, "Failed to mirror lists: {}", e);
            output.warn(format!("Saved locally, but mirroring {} to {} failed: {}", category, remote.base_url, e));
            return Ok(());
        }

        if with_stats {
            if let Err(e) = mirror.publish_stats(&WatchStats::from_store(&self.store)).await {
                tracing::warn!("Failed to mirror watch stats: {}", e);
                output.warn(format!("Saved locally, but mirroring stats failed: {}", e));
            }
        }

        Ok(())
    }
}

pub fn items_table(items: &[&MediaItem]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("Id").add_attribute(Attribute::Bold),
        Cell::new("Title").add_attribute(Attribute::Bold),
        Cell::new("Type").add_attribute(Attribute::Bold),
        Cell::new("Year").add_attribute(Attribute::Bold),
        Cell::new("Genres").add_attribute(Attribute::Bold),
    ]);
    for item in items {
        table.add_row(vec![
            Cell::new(&item.id),
            Cell::new(&item.title),
            Cell::new(item.media_type.to_string()),
            Cell::new(item.year.map(|y| y.to_string()).unwrap_or_default()),
            Cell::new(item.genres.join(", ")),
        ]);
    }
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrin_models::MediaType;

    #[test]
    fn test_parse_arguments() {
        assert_eq!(parse_category("Films").unwrap(), MediaCategory::Films);
        assert_eq!(parse_status("did-not-finish").unwrap(), StatusLabel::DidNotFinish);

        let err = parse_category("podcasts").unwrap_err();
        assert!(err.to_string().starts_with("invalid argument:"));
        assert!(parse_status("maybe later").is_err());
    }

    #[test]
    fn test_name_policy_from_config() {
        let mut config = Config::default();
        assert_eq!(name_policy(&config), ListNamePolicy::AllowDuplicates);
        config.lists.unique_names = true;
        assert_eq!(name_policy(&config), ListNamePolicy::Unique);
    }

    #[test]
    fn test_find_item() {
        let catalog = StaticCatalog::new(vec![MediaItem::new("m1", "Heat", MediaType::Film)]);
        assert_eq!(find_item(&catalog, "m1").unwrap().title, "Heat");
        assert!(find_item(&catalog, "m2").is_err());
    }
}
