use super::prompts::confirm_destructive;
use super::{find_item, parse_category, Session};
use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use orrin_core::MAX_CUSTOM_LISTS;
use orrin_models::MediaCategory;
use serde_json::json;

pub async fn run_list(cmd: crate::ListCommands, output: &Output) -> Result<()> {
    match cmd {
        crate::ListCommands::Create { category, name } => create_list(&category, name, output).await,
        crate::ListCommands::Rename { category, old_name, new_name } => {
            rename_list(&category, &old_name, &new_name, output).await
        }
        crate::ListCommands::Delete { category, name, yes } => delete_list(&category, &name, yes, output).await,
        crate::ListCommands::Add { category, name, media_id } => add_item(&category, &name, &media_id, output).await,
        crate::ListCommands::Remove { category, name, media_id } => {
            remove_item(&category, &name, &media_id, output).await
        }
    }
}

fn list_missing(category: MediaCategory, name: &str, output: &Output) {
    output.warn(format!("No custom list named '{}' in {}", name, category.label()));
}

async fn create_list(category: &str, name: Option<String>, output: &Output) -> Result<()> {
    let category = parse_category(category)?;
    let mut session = Session::open()?;
    let name = name.map(|n| n.trim().to_string()).unwrap_or_else(|| {
        session
            .store
            .next_default_list_name(category, &session.config.lists.default_name_prefix)
    });

    session
        .store
        .create_custom_list(category, name.as_str())
        .map_err(|e| eyre!("{}", e))?;
    session.commit(category, false, output).await?;

    let count = session.store.custom_lists(category).len();
    output.success(format!(
        "Created '{}' in {} ({}/{} custom lists)",
        name,
        category.label(),
        count,
        MAX_CUSTOM_LISTS
    ));
    output.json(&json!({ "category": category, "name": name, "customLists": count }));
    Ok(())
}

async fn rename_list(category: &str, old_name: &str, new_name: &str, output: &Output) -> Result<()> {
    let category = parse_category(category)?;
    let mut session = Session::open()?;

    let renamed = session
        .store
        .rename_custom_list(category, old_name, new_name)
        .map_err(|e| eyre!("{}", e))?;
    if !renamed {
        list_missing(category, old_name, output);
        return Ok(());
    }

    session.commit(category, false, output).await?;
    output.success(format!("Renamed '{}' to '{}' in {}", old_name, new_name.trim(), category.label()));
    Ok(())
}

async fn delete_list(category: &str, name: &str, yes: bool, output: &Output) -> Result<()> {
    let category = parse_category(category)?;
    let mut session = Session::open()?;

    let Some(list) = session.store.custom_list(category, name) else {
        list_missing(category, name, output);
        return Ok(());
    };

    let prompt = format!(
        "Delete '{}' from {} ({} titles)? This cannot be undone.",
        name,
        category.label(),
        list.count()
    );
    if !confirm_destructive(&prompt, yes, output)? {
        return Ok(());
    }

    let removed = session
        .store
        .delete_custom_list(category, name)
        .map_err(|e| eyre!("{}", e))?;
    session.commit(category, false, output).await?;

    if removed > 1 {
        output.success(format!("Deleted {} lists named '{}' from {}", removed, name, category.label()));
    } else {
        output.success(format!("Deleted '{}' from {}", name, category.label()));
    }
    output.json(&json!({ "category": category, "name": name, "removed": removed }));
    Ok(())
}

async fn add_item(category: &str, name: &str, media_id: &str, output: &Output) -> Result<()> {
    let category = parse_category(category)?;
    let mut session = Session::open()?;

    if session.store.custom_list(category, name).is_none() {
        list_missing(category, name, output);
        return Ok(());
    }

    let catalog = session.catalog()?;
    let item = find_item(&catalog, media_id)?;
    let title = item.title.clone();

    let added = session
        .store
        .add_to_custom_list(category, name, item)
        .map_err(|e| eyre!("{}", e))?;
    if !added {
        output.info(format!("{} is already in '{}'", title, name));
        return Ok(());
    }

    session.commit(category, false, output).await?;
    output.success(format!("Added {} to '{}' ({})", title, name, category.label()));
    Ok(())
}

async fn remove_item(category: &str, name: &str, media_id: &str, output: &Output) -> Result<()> {
    let category = parse_category(category)?;
    let mut session = Session::open()?;

    if session.store.custom_list(category, name).is_none() {
        list_missing(category, name, output);
        return Ok(());
    }

    let removed = session
        .store
        .remove_from_custom_list(category, name, media_id)
        .map_err(|e| eyre!("{}", e))?;
    if !removed {
        output.info(format!("{} is not in '{}'", media_id, name));
        return Ok(());
    }

    session.commit(category, false, output).await?;
    output.success(format!("Removed {} from '{}' ({})", media_id, name, category.label()));
    Ok(())
}
