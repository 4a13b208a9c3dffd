use super::{find_item, parse_category, parse_status, Session};
use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use orrin_core::MediaCatalog;
use serde_json::json;

pub async fn run_status(cmd: crate::StatusCommands, output: &Output) -> Result<()> {
    match cmd {
        crate::StatusCommands::Set { media_id, status, category } => {
            set_status(&media_id, &status, category.as_deref(), output).await
        }
        crate::StatusCommands::Clear { media_id, status, category } => {
            clear_status(&media_id, &status, category.as_deref(), output).await
        }
    }
}

async fn set_status(media_id: &str, status: &str, category: Option<&str>, output: &Output) -> Result<()> {
    let status = parse_status(status)?;
    let mut session = Session::open()?;
    let catalog = session.catalog()?;
    let item = find_item(&catalog, media_id)?;
    let category = match category {
        Some(raw) => parse_category(raw)?,
        None => item.category(),
    };

    let previous = session.store.status_of(category, media_id);
    let title = item.title.clone();
    let changed = session
        .store
        .move_to_status(category, status, item)
        .map_err(|e| eyre!("{}", e))?;

    if !changed {
        output.info(format!("{} is already in {} ({})", title, status, category.label()));
        return Ok(());
    }

    session.commit(category, true, output).await?;

    match previous {
        Some(from) => output.success(format!("Moved {} from {} to {} ({})", title, from, status, category.label())),
        None => output.success(format!("Added {} to {} ({})", title, status, category.label())),
    }
    output.json(&json!({
        "category": category,
        "id": media_id,
        "status": status.label(),
        "previous": previous.map(|p| p.label()),
    }));
    Ok(())
}

async fn clear_status(media_id: &str, status: &str, category: Option<&str>, output: &Output) -> Result<()> {
    let status = parse_status(status)?;
    let mut session = Session::open()?;
    let category = match category {
        Some(raw) => parse_category(raw)?,
        // The title may have left the catalog, so only consult it when needed
        None => session
            .catalog()?
            .find(media_id)
            .map(|item| item.category())
            .ok_or_else(|| eyre!("'{}' is not in the catalog; pass --category", media_id))?,
    };

    let removed = session
        .store
        .remove_from_status(category, status, media_id)
        .map_err(|e| eyre!("{}", e))?;

    if !removed {
        output.info(format!("{} is not in {} ({})", media_id, status, category.label()));
        return Ok(());
    }

    session.commit(category, true, output).await?;
    output.success(format!("Removed {} from {} ({})", media_id, status, category.label()));
    Ok(())
}
