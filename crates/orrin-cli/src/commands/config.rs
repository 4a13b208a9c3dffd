use super::load_config;
use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color, Table};
use orrin_config::{Config, PathManager};
use owo_colors::OwoColorize;
use serde_json::json;

pub fn run_config(cmd: crate::ConfigCommands, output: &Output) -> Result<()> {
    match cmd {
        crate::ConfigCommands::Show => show_config(output),
        crate::ConfigCommands::Init { force } => init_config(force, output),
    }
}

fn enabled_cell(enabled: bool) -> Cell {
    Cell::new(if enabled { "✓".green().to_string() } else { "✗".red().to_string() })
}

fn section_table(title: &str, rows: Vec<(&str, Cell)>) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        Cell::new(title).fg(Color::Cyan).add_attribute(Attribute::Bold),
        Cell::new(""),
    ]);
    for (key, value) in rows {
        table.add_row(vec![Cell::new(key), value]);
    }
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table
}

fn show_config(output: &Output) -> Result<()> {
    let paths = PathManager::default();
    let config_file = paths.config_file();
    let config = load_config(&paths)?;

    if !config_file.exists() {
        output.warn(format!("Configuration file not found at: {}", config_file.display()));
        output.info("Showing defaults. Run 'orrin config init' to write them to disk.");
    }

    if !output.is_human() {
        output.json(&json!({
            "configFile": config_file.display().to_string(),
            "catalogPath": config.catalog_path(&paths).display().to_string(),
            "snapshotPath": config.snapshot_path(&paths).display().to_string(),
            "lists": {
                "uniqueNames": config.lists.unique_names,
                "defaultNamePrefix": config.lists.default_name_prefix,
            },
            "remote": {
                "enabled": config.remote.enabled,
                "baseUrl": config.remote.base_url,
                "timeoutSeconds": config.remote.timeout_seconds,
                "userId": config.remote.user_id,
            },
            "logFile": config.logging.file.as_ref().map(|p| p.display().to_string()),
        }));
        return Ok(());
    }

    let files = section_table(
        "Files",
        vec![
            ("Config", Cell::new(config_file.display().to_string())),
            ("Catalog", Cell::new(config.catalog_path(&paths).display().to_string())),
            ("Saved lists", Cell::new(config.snapshot_path(&paths).display().to_string())),
            (
                "Log file",
                Cell::new(
                    config
                        .logging
                        .file
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "stderr".to_string()),
                ),
            ),
        ],
    );
    output.info(files.to_string());

    let lists = section_table(
        "Custom Lists",
        vec![
            ("Unique names", enabled_cell(config.lists.unique_names)),
            ("Default name prefix", Cell::new(&config.lists.default_name_prefix)),
        ],
    );
    output.info(lists.to_string());

    let remote = section_table(
        "Remote Mirror",
        vec![
            ("Enabled", enabled_cell(config.remote.enabled)),
            ("Base URL", Cell::new(&config.remote.base_url)),
            ("Timeout", Cell::new(format!("{}s", config.remote.timeout_seconds))),
            ("User id", Cell::new(&config.remote.user_id)),
        ],
    );
    output.info(remote.to_string());

    Ok(())
}

fn init_config(force: bool, output: &Output) -> Result<()> {
    let paths = PathManager::default();
    let config_file = paths.config_file();

    if config_file.exists() && !force {
        output.warn(format!(
            "Configuration already exists at {}. Use --force to overwrite it.",
            config_file.display()
        ));
        return Ok(());
    }

    paths
        .ensure_directories()
        .map_err(|e| eyre!("Failed to create directories under {}: {}", paths.config_dir().display(), e))?;
    Config::default()
        .save_to_file(&config_file)
        .map_err(|e| eyre!("Failed to save config to {}: {}", config_file.display(), e))?;

    output.success(format!("Wrote default configuration to {}", config_file.display()));
    output.info(format!("Put your catalog at {}", paths.catalog_file().display()));
    Ok(())
}
