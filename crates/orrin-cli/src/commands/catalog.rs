use super::{items_table, load_catalog, load_config, parse_category};
use crate::output::Output;
use color_eyre::Result;
use orrin_config::PathManager;
use orrin_core::MediaCatalog;
use orrin_models::MediaItem;
use serde_json::json;

pub fn run_catalog(category: Option<String>, output: &Output) -> Result<()> {
    let category = category.as_deref().map(parse_category).transpose()?;
    let paths = PathManager::default();
    let config = load_config(&paths)?;
    let catalog = load_catalog(&config, &paths)?;

    let items: Vec<&MediaItem> = match category {
        Some(category) => catalog.in_category(category),
        None => catalog.list_all().iter().collect(),
    };

    if items.is_empty() {
        output.info(format!("No titles found in {}", config.catalog_path(&paths).display()));
        output.json(&json!([]));
        return Ok(());
    }

    output.table(&items_table(&items), &json!(items));
    Ok(())
}
