use super::prompts::confirm_destructive;
use super::load_config;
use crate::output::Output;
use color_eyre::Result;
use orrin_config::PathManager;
use orrin_core::SnapshotManager;

pub fn run_clear(yes: bool, output: &Output) -> Result<()> {
    let paths = PathManager::default();
    let config = load_config(&paths)?;
    let snapshots = SnapshotManager::new(config.snapshot_path(&paths));

    if !snapshots.exists() {
        output.info("No saved lists found to clear");
        return Ok(());
    }

    let prompt = format!(
        "Delete every status bucket and custom list saved in {}?",
        snapshots.path().display()
    );
    if !confirm_destructive(&prompt, yes, output)? {
        return Ok(());
    }

    snapshots
        .clear()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to remove {}: {}", snapshots.path().display(), e))?;
    output.success(format!("Cleared saved lists: {}", snapshots.path().display()));
    Ok(())
}
