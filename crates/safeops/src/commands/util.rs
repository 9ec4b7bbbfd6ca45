//! Shared helpers for command handlers.

use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Prompt for a secret without echoing it.
pub fn prompt_password(message: &str) -> Result<String, CliError> {
    dialoguer::Password::new()
        .with_prompt(message)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))
}

/// Short timestamp rendering for table cells.
pub fn short_time(ts: &chrono::DateTime<chrono::Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M").to_string()
}

/// `Option` rendering for table cells.
pub fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_owned()
}
