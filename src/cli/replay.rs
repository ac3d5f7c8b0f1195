//! Replay command implementation.

use super::output::{format_state, format_text};
use super::{CliError, OutputFormat};
use catgame::replay::{Recording, Replayer};
use std::path::PathBuf;

/// Execute the replay command.
///
/// Without `at` the whole recording is replayed and the result printed.
/// With `at` the table after that many actions is printed instead.
///
/// # Errors
///
/// Returns an error if the recording cannot be loaded or does not replay.
pub(crate) fn execute(
    recording_path: PathBuf,
    format: OutputFormat,
    at: Option<usize>,
) -> Result<(), CliError> {
    let recording = Recording::load(&recording_path).map_err(|e| {
        CliError::new(format!(
            "Failed to load recording {}: {e}",
            recording_path.display()
        ))
    })?;
    let mut replayer = Replayer::new(recording)?;

    if let Some(position) = at {
        replayer.seek(position)?;
        let state = replayer.engine().public_state();
        match format {
            OutputFormat::Text => {
                println!("After {position} actions:");
                print!("{}", format_state(&state));
            }
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&state)?),
        }
        return Ok(());
    }

    let result = replayer.finish()?;
    match format {
        OutputFormat::Text => print!("{}", format_text(&result)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
    }
    Ok(())
}
