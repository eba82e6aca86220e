//! Shared helpers for command handlers.

use crate::error::CliError;

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

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

/// `NotFound` for a resource that came back empty.
pub fn not_found(resource_type: &str, identifier: impl ToString, list_command: &str) -> CliError {
    CliError::NotFound {
        resource_type: resource_type.into(),
        identifier: identifier.to_string(),
        list_command: list_command.into(),
    }
}
