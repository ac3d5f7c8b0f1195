//! Rules command implementation.

use super::CliError;
use catgame::GameConfig;

/// Print the default configuration as JSON.
///
/// The output is a valid `--config` file.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub(crate) fn execute() -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(&GameConfig::default())?;
    println!("{json}");
    Ok(())
}
