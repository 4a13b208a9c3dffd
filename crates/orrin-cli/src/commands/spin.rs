use super::{load_catalog, load_config, parse_category};
use crate::output::Output;
use color_eyre::Result;
use orrin_config::PathManager;
use owo_colors::OwoColorize;
use serde_json::json;

pub fn run_spin(category: Option<String>, genre: Option<String>, output: &Output) -> Result<()> {
    let category = category.as_deref().map(parse_category).transpose()?;
    let paths = PathManager::default();
    let config = load_config(&paths)?;
    let catalog = load_catalog(&config, &paths)?;

    let mut rng = rand::thread_rng();
    let Some(result) = orrin_core::spin(&catalog, category, genre, &mut rng) else {
        output.warn("The catalog is empty, nothing to spin");
        return Ok(());
    };

    output.info(format!("Category: {}", result.category.label().bright_cyan()));
    if let Some(genre) = &result.genre {
        output.info(format!("Genre:    {}", genre.bright_cyan()));
    }
    if result.fell_back {
        output.warn("Nothing matched, picked from the whole catalog instead");
    }

    let item = &result.item;
    let year = item.year.map(|y| format!(" ({})", y)).unwrap_or_default();
    output.success(format!("{}{} [{}]", item.title.bold(), year, item.id));
    if let Some(description) = &item.description {
        output.info(description);
    }

    output.json(&json!(result));
    Ok(())
}
