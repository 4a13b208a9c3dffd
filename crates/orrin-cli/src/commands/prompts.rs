use crate::output::Output;
use color_eyre::Result;
use dialoguer::Confirm;

/// Ask a yes/no question; `default` is used when the user just presses enter
pub fn prompt_yes_no(prompt: &str, default: bool, output: &Output) -> Result<bool> {
    Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()
        .map_err(|e| {
            output.error(format!("Failed to read confirmation: {}", e));
            color_eyre::eyre::eyre!("Failed to read confirmation: {}", e)
        })
}

/// Confirm a destructive action unless `--yes` was given
pub fn confirm_destructive(prompt: &str, yes: bool, output: &Output) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    let confirmed = prompt_yes_no(prompt, false, output)?;
    if !confirmed {
        output.info("Cancelled");
    }
    Ok(confirmed)
}
