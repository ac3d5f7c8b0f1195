//! Play command implementation.

use super::output::{format_event, format_state, format_text};
use super::{CliError, OutputFormat};
use catgame::error::ActionError;
use catgame::session::{InputProvider, OutputSink, Session, SessionLimits};
use catgame::{Action, GameConfig, GameEngine, GameEvent, PlayerId, PlayerSetup, PublicState};
use std::cell::RefCell;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::rc::Rc;

const HELP: &str = "commands: place <card> <terrain> | food | stuff | draw | status | quit";

/// Reads actions from a line-oriented input.
///
/// All seats share one input, so every seat gets a provider holding the
/// same reader.
struct LineProvider<R, W> {
    input: Rc<RefCell<R>>,
    prompt: W,
    names: Vec<String>,
}

impl<R: BufRead, W: Write> LineProvider<R, W> {
    fn read_command(&mut self, state: &PublicState, seat: PlayerId) -> Option<Action> {
        let name = self.names.get(seat).map_or("?", String::as_str);
        loop {
            let _ = write!(self.prompt, "{name}> ");
            let _ = self.prompt.flush();

            let mut line = String::new();
            match self.input.borrow_mut().read_line(&mut line) {
                Ok(0) | Err(_) => return None,
                Ok(_) => {}
            }
            let mut words = line.split_whitespace();
            let Some(kind) = words.next() else {
                continue;
            };
            let params: Vec<&str> = words.collect();

            match kind {
                "quit" | "exit" => return None,
                "status" => {
                    let _ = write!(self.prompt, "{}", format_state(state));
                }
                "help" => {
                    let _ = writeln!(self.prompt, "{HELP}");
                }
                _ => match Action::from_request(kind, &params) {
                    Ok(action) => return Some(action),
                    Err(e) => {
                        let _ = writeln!(self.prompt, "{e}\n{HELP}");
                    }
                },
            }
        }
    }
}

impl<R: BufRead, W: Write> InputProvider for LineProvider<R, W> {
    fn next_action(
        &mut self,
        state: &PublicState,
        seat: PlayerId,
        rejected: Option<&ActionError>,
    ) -> Option<Action> {
        if rejected.is_none() && state.cursor.step == 1 && seat == 0 {
            let _ = write!(self.prompt, "{}", format_state(state));
        }
        self.read_command(state, seat)
    }
}

/// Prints events as text lines.
struct TextSink {
    names: Vec<String>,
}

impl OutputSink for TextSink {
    fn notify(&mut self, event: &GameEvent) {
        if matches!(event, GameEvent::GameFinished { .. }) {
            return;
        }
        println!("{}", format_event(event, &self.names));
    }
}

/// Prints each event as one JSON line.
struct JsonSink;

impl OutputSink for JsonSink {
    fn notify(&mut self, event: &GameEvent) {
        if let Ok(json) = serde_json::to_string(event) {
            println!("{json}");
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<GameConfig, CliError> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };
    let text = fs::read_to_string(path)
        .map_err(|e| CliError::new(format!("Failed to read {}: {e}", path.display())))?;
    serde_json::from_str(&text)
        .map_err(|e| CliError::new(format!("Invalid config {}: {e}", path.display())))
}

/// Execute the play command.
///
/// # Errors
///
/// Returns an error if the setup is invalid, a player quits, or the
/// recording cannot be saved.
pub(crate) fn execute(
    players: Vec<String>,
    seed: Option<u64>,
    config: Option<PathBuf>,
    save: Option<PathBuf>,
    format: OutputFormat,
) -> Result<(), CliError> {
    let config = load_config(config.as_ref())?;

    // Generate seed if not provided
    let seed = seed.unwrap_or_else(|| {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(42)
    });

    let setups = players.iter().map(PlayerSetup::new).collect();
    let engine = GameEngine::new(seed, config, setups)?;

    let input = Rc::new(RefCell::new(io::stdin().lock()));
    let providers: Vec<Box<dyn InputProvider>> = (0..players.len())
        .map(|_| {
            let provider = LineProvider {
                input: Rc::clone(&input),
                prompt: io::stderr(),
                names: players.clone(),
            };
            Box::new(provider) as Box<dyn InputProvider>
        })
        .collect();

    if format == OutputFormat::Text {
        println!("Playing with seed {seed}: {}", players.join(", "));
        println!("{HELP}\n");
    }

    let mut session = Session::new(engine, providers, SessionLimits::default())?;
    let outcome = match format {
        OutputFormat::Text => session.run(&mut TextSink {
            names: players.clone(),
        }),
        OutputFormat::Json => session.run(&mut JsonSink),
    };

    // Save recording even for an abandoned game
    if let Some(save_path) = save {
        session
            .recording()
            .save(&save_path)
            .map_err(|e| CliError::new(format!("Failed to save recording: {e}")))?;
        if format == OutputFormat::Text {
            println!("Recording saved to: {}", save_path.display());
        }
    }

    let result = outcome?;
    match format {
        OutputFormat::Text => print!("\n{}", format_text(&result)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use catgame::session::EventLog;

    fn provider(script: &str, names: &[&str]) -> LineProvider<io::Cursor<Vec<u8>>, Vec<u8>> {
        LineProvider {
            input: Rc::new(RefCell::new(io::Cursor::new(script.as_bytes().to_vec()))),
            prompt: Vec::new(),
            names: names.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn test_line_provider_parses_commands() {
        let engine = GameEngine::new(
            1,
            GameConfig::default(),
            vec![PlayerSetup::new("Ada"), PlayerSetup::new("Bo")],
        )
        .unwrap();
        let state = engine.public_state();
        let mut p = provider("\nstatus\nbogus\nplace 3 1\nfood\nquit\n", &["Ada", "Bo"]);

        assert_eq!(
            p.next_action(&state, 0, None),
            Some(Action::PlaceCard { card: 3, terrain: 1 })
        );
        assert_eq!(p.next_action(&state, 1, None), Some(Action::CollectFood));
        assert_eq!(p.next_action(&state, 0, None), None);

        let prompt = String::from_utf8(p.prompt).unwrap();
        assert!(prompt.contains("Ada> "));
        assert!(prompt.contains("Round 1/4"));
        assert!(prompt.contains(HELP));
    }

    #[test]
    fn test_line_provider_end_of_input_quits() {
        let engine = GameEngine::new(
            1,
            GameConfig::default(),
            vec![PlayerSetup::new("Ada"), PlayerSetup::new("Bo")],
        )
        .unwrap();
        let providers: Vec<Box<dyn InputProvider>> = vec![
            Box::new(provider("food\n", &["Ada", "Bo"])),
            Box::new(provider("", &["Ada", "Bo"])),
        ];
        let mut session = Session::new(engine, providers, SessionLimits::default()).unwrap();
        let err = session.run(&mut EventLog::default()).unwrap_err();
        assert_eq!(err.to_string(), "player 1 abandoned the game");
        assert_eq!(session.recording().actions.len(), 1);
    }

    #[test]
    fn test_load_default_config() {
        assert_eq!(load_config(None).unwrap(), GameConfig::default());
    }
}
