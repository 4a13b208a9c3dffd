use super::{items_table, parse_category, parse_status, Session};
use crate::output::Output;
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color, Table};
use orrin_core::{ListStore, MAX_CUSTOM_LISTS};
use orrin_models::{MediaCategory, MediaItem};
use serde_json::json;

pub fn run_show(category: &str, status: Option<String>, list: Option<String>, output: &Output) -> Result<()> {
    let category = parse_category(category)?;
    let session = Session::open()?;

    match (status, list) {
        (Some(status), _) => {
            let status = parse_status(&status)?;
            let items: Vec<&MediaItem> = session
                .store
                .bucket(category, status)
                .map(|bucket| bucket.items().iter().collect())
                .unwrap_or_default();
            show_items(&format!("{} - {}", category.label(), status), &items, output);
        }
        (None, Some(name)) => match session.store.custom_list(category, &name) {
            Some(list) => {
                let items: Vec<&MediaItem> = list.items().iter().collect();
                show_items(&format!("{} - {}", category.label(), list.name()), &items, output);
            }
            None => output.warn(format!("No custom list named '{}' in {}", name, category.label())),
        },
        (None, None) => show_overview(&session.store, category, output),
    }

    Ok(())
}

fn show_items(heading: &str, items: &[&MediaItem], output: &Output) {
    if output.is_human() {
        output.info(heading);
        if items.is_empty() {
            output.info("No titles yet");
            return;
        }
    }
    output.table(&items_table(items), &json!(items));
}

fn show_overview(store: &ListStore, category: MediaCategory, output: &Output) {
    let mut table = Table::new();
    table.set_header(vec![
        Cell::new(category.label()).fg(Color::Cyan).add_attribute(Attribute::Bold),
        Cell::new("Count").add_attribute(Attribute::Bold),
    ]);

    for bucket in store.status_buckets(category) {
        table.add_row(vec![Cell::new(bucket.label()), Cell::new(bucket.count())]);
    }

    let custom_lists = store.custom_lists(category);
    table.add_row(vec![
        Cell::new(format!("Custom lists ({}/{})", custom_lists.len(), MAX_CUSTOM_LISTS)).add_attribute(Attribute::Italic),
        Cell::new(""),
    ]);
    for list in custom_lists {
        table.add_row(vec![Cell::new(format!("  {}", list.name())), Cell::new(list.count())]);
    }

    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);

    let data = json!({
        "category": category,
        "statuses": store.status_buckets(category),
        "customLists": custom_lists,
    });
    output.table(&table, &data);
}
