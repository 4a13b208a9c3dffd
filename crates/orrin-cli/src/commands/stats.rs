use super::Session;
use crate::output::Output;
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color, Table};
use orrin_core::WatchStats;
use serde_json::json;

pub fn run_stats(output: &Output) -> Result<()> {
    let session = Session::open()?;
    let stats = WatchStats::from_store(&session.store);

    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("Watch Stats").fg(Color::Cyan).add_attribute(Attribute::Bold),
        Cell::new(""),
    ]);
    table.add_row(vec![Cell::new("Films watched"), Cell::new(stats.films)]);
    table.add_row(vec![Cell::new("Shows watched"), Cell::new(stats.shows)]);
    table.add_row(vec![Cell::new("Anime watched"), Cell::new(stats.anime)]);
    table.add_row(vec![Cell::new("Documentaries watched"), Cell::new(stats.documentaries)]);
    table.add_row(vec![Cell::new("Episodes"), Cell::new(stats.episodes)]);
    table.add_row(vec![Cell::new("TV time"), Cell::new(stats.tv_time())]);
    table.add_row(vec![Cell::new("In progress"), Cell::new(stats.in_progress)]);
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);

    let mut data = json!(stats);
    data["tvTime"] = json!(stats.tv_time());
    data["totalWatched"] = json!(stats.total_watched());
    output.table(&table, &data);
    Ok(())
}
