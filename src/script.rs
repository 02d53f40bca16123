//! Line-oriented JSON command scripts driving a [`Hud`].
//!
//! Each non-blank line that does not start with `#` is one object:
//!
//! ```text
//! {"cmd": "draw", "args": [10, 20, 30, 40], "chain": ["teal", "corners"]}
//! {"cmd": "draw", "id": "pointer", "args": [{"pageX": 5, "pageY": 7}]}
//! {"cmd": "scale", "args": [2]}
//! {"cmd": "remove", "id": "pointer"}
//! ```

use crate::draw::DrawOptions;
use crate::hud::{Arg, ChainMethod, FrameClock, Hud, Operation};
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// One parsed script line.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptLine {
    pub cmd: String,
    #[serde(default)]
    pub args: Vec<Value>,
    /// Chain methods applied to a draw: names, or option objects
    #[serde(default)]
    pub chain: Vec<Value>,
    /// Key for upsert (draw) or removal (remove)
    #[serde(default)]
    pub id: Option<String>,
    /// Call-site token; the first one seen anchors frame clearing
    #[serde(default)]
    pub site: Option<String>,
}

/// Script commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Draw,
    Clear,
    Opacity,
    Translate,
    Scale,
    Strength,
    Color,
    Precision,
    Remove,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(name: &str) -> std::result::Result<Self, Self::Err> {
        match name.trim().to_lowercase().as_str() {
            "draw" => Ok(Command::Draw),
            "clear" => Ok(Command::Clear),
            "opacity" => Ok(Command::Opacity),
            "translate" => Ok(Command::Translate),
            "scale" => Ok(Command::Scale),
            "strength" => Ok(Command::Strength),
            "color" => Ok(Command::Color),
            "precision" => Ok(Command::Precision),
            "remove" => Ok(Command::Remove),
            other => Err(other.to_string()),
        }
    }
}

impl Command {
    /// Queue operation for the plain setter commands.
    fn setter(self) -> Option<Operation> {
        match self {
            Command::Opacity => Some(Operation::SetOpacity),
            Command::Translate => Some(Operation::SetTranslate),
            Command::Scale => Some(Operation::SetScale),
            Command::Strength => Some(Operation::SetStrength),
            Command::Color => Some(Operation::SetColor),
            Command::Precision => Some(Operation::SetPrecision),
            Command::Draw | Command::Clear | Command::Remove => None,
        }
    }
}

/// A script line that could not be executed.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("line {line}: invalid JSON: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("line {line}: unknown command '{name}'")]
    UnknownCommand { line: usize, name: String },

    #[error("line {line}: unknown chain method '{name}'")]
    UnknownChain { line: usize, name: String },

    #[error("line {line}: '{cmd}' needs an id")]
    MissingId { line: usize, cmd: String },
}

/// Executes one script line against `hud`.
///
/// Blank lines and `#` comments are accepted and do nothing.
pub fn execute_line<C: FrameClock>(
    hud: &mut Hud<C>,
    line_no: usize,
    line: &str,
) -> std::result::Result<(), ScriptError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(());
    }

    let parsed: ScriptLine = serde_json::from_str(line).map_err(|source| ScriptError::Parse {
        line: line_no,
        source,
    })?;
    let command: Command = parsed
        .cmd
        .parse()
        .map_err(|name| ScriptError::UnknownCommand {
            line: line_no,
            name,
        })?;

    // Resolve the chain up front so a bad name leaves the queue untouched.
    let chain = parsed
        .chain
        .iter()
        .map(|entry| chain_method(line_no, entry))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    if !chain.is_empty() && command != Command::Draw {
        log::warn!("line {}: chain ignored for '{}'", line_no, parsed.cmd);
    }

    if let Some(site) = parsed.site {
        hud.site(site);
    }
    let args: Vec<Arg> = parsed.args.into_iter().map(Arg::from).collect();

    match command {
        Command::Draw => {
            let handle = match parsed.id {
                Some(id) => hud.upsert(id, args),
                None => hud.draw(args),
            };
            chain
                .into_iter()
                .fold(handle, |handle, method| handle.apply(method));
        }
        Command::Clear => {
            hud.clear();
        }
        Command::Remove => {
            let id = parsed.id.ok_or_else(|| ScriptError::MissingId {
                line: line_no,
                cmd: parsed.cmd.clone(),
            })?;
            if !hud.remove(&id) {
                log::debug!("line {}: no action with id '{}'", line_no, id);
            }
        }
        setter => {
            if let Some(operation) = setter.setter() {
                hud.command(operation, args);
            }
        }
    }
    Ok(())
}

fn chain_method(line: usize, entry: &Value) -> std::result::Result<ChainMethod, ScriptError> {
    match entry {
        Value::String(name) => name.parse().map_err(|_| ScriptError::UnknownChain {
            line,
            name: name.clone(),
        }),
        Value::Object(map) => Ok(ChainMethod::Options(DrawOptions::from_json(map))),
        other => Err(ScriptError::UnknownChain {
            line,
            name: other.to_string(),
        }),
    }
}

/// Opens `path` for line reading, or standard input when `None`.
pub fn open(path: Option<&Path>) -> Result<Box<dyn BufRead + Send>> {
    match path {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open script {}", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(BufReader::new(io::stdin()))),
    }
}

/// Executes every line of `reader`; returns how many lines failed.
///
/// Line errors are logged and skipped. Only read failures abort the run.
pub fn run<C: FrameClock>(hud: &mut Hud<C>, reader: impl BufRead) -> Result<usize> {
    let mut failed = 0;
    for (index, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read script line {}", index + 1))?;
        if let Err(err) = execute_line(hud, index + 1, &line) {
            log::warn!("{}", err);
            failed += 1;
        }
    }
    Ok(failed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{PaintOp, RecordingSurface};
    use std::io::Write;

    fn ellipses(hud: &mut Hud) -> usize {
        let mut surface = RecordingSurface::new();
        hud.repaint(&mut surface);
        surface.count(|op| matches!(op, PaintOp::Ellipse(..)))
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let mut hud = Hud::new();
        let script = "# header\n\n   \n{\"cmd\": \"draw\", \"args\": [1, 2]}\n";
        assert_eq!(run(&mut hud, script.as_bytes()).unwrap(), 0);
        assert_eq!(hud.queue().len(), 1);
    }

    #[test]
    fn bad_lines_are_counted_and_skipped() {
        let mut hud = Hud::new();
        let script = concat!(
            "{\"cmd\": \"draw\", \"args\": [1, 2]}\n",
            "not json\n",
            "{\"cmd\": \"explode\"}\n",
            "{\"cmd\": \"draw\", \"args\": [3, 4], \"chain\": [\"sparkle\"]}\n",
            "{\"cmd\": \"draw\", \"args\": [5, 6]}\n",
        );
        assert_eq!(run(&mut hud, script.as_bytes()).unwrap(), 3);
        assert_eq!(ellipses(&mut hud), 2);
    }

    #[test]
    fn errors_carry_line_numbers() {
        let mut hud = Hud::new();
        let err = execute_line(&mut hud, 7, "{\"cmd\": \"remove\"}").unwrap_err();
        assert!(matches!(err, ScriptError::MissingId { line: 7, .. }));
        assert_eq!(err.to_string(), "line 7: 'remove' needs an id");

        let err = execute_line(&mut hud, 3, "{\"cmd\": \"draw\", \"chain\": [4]}").unwrap_err();
        assert!(matches!(err, ScriptError::UnknownChain { line: 3, .. }));
    }

    #[test]
    fn scripts_open_from_files() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{{\"cmd\": \"draw\", \"args\": [1, 2, 3]}}").unwrap();
        let mut hud = Hud::new();
        run(&mut hud, open(Some(file.path())).unwrap()).unwrap();
        assert_eq!(ellipses(&mut hud), 1);

        let missing = open(Some(Path::new("/nonexistent/wayhud.jsonl")));
        assert!(missing.is_err());
    }

    #[test]
    fn keyed_draws_upsert_and_remove() {
        let mut hud = Hud::new();
        for line in [
            r#"{"cmd": "draw", "id": "m", "args": [1, 1]}"#,
            r#"{"cmd": "draw", "id": "m", "args": [2, 2]}"#,
            r#"{"cmd": "draw", "args": [3, 3]}"#,
        ] {
            execute_line(&mut hud, 1, line).unwrap();
        }
        assert_eq!(hud.queue().len(), 2);
        execute_line(&mut hud, 4, r#"{"cmd": "remove", "id": "m"}"#).unwrap();
        assert_eq!(hud.queue().len(), 1);
    }

    #[test]
    fn chain_applies_names_and_option_objects() {
        let mut hud = Hud::new();
        let line = r#"{"cmd": "draw", "args": [0, 0, 10, 10], "chain": ["red", "corners", {"closed": false}]}"#;
        execute_line(&mut hud, 1, line).unwrap();
        let args = &hud.queue().get(0).unwrap().args;
        assert_eq!(args.len(), 7);
        assert_eq!(args[6], Arg::Options(DrawOptions::open()));

        let mut surface = RecordingSurface::new();
        hud.repaint(&mut surface);
        assert_eq!(
            surface.filled_text().iter().filter(|t| t.starts_with('•')).count(),
            4
        );
    }

    #[test]
    fn setters_and_sites_queue_like_the_api() {
        let mut hud = Hud::new();
        let script = concat!(
            "{\"cmd\": \"scale\", \"args\": [0.2], \"site\": \"loop\"}\n",
            "{\"cmd\": \"precision\", \"args\": [1]}\n",
            "{\"cmd\": \"translate\", \"args\": [{\"x\": 3, \"y\": 4}]}\n",
            "{\"cmd\": \"opacity\", \"args\": [0.5]}\n",
            "{\"cmd\": \"strength\", \"args\": [3]}\n",
            "{\"cmd\": \"color\", \"args\": [\"teal\"]}\n",
        );
        run(&mut hud, script.as_bytes()).unwrap();
        let mut surface = RecordingSurface::new();
        hud.repaint(&mut surface);

        let state = hud.state();
        assert_eq!(state.scale, 1.0);
        assert_eq!(state.precision, Some(1));
        assert_eq!((state.translate.x, state.translate.y), (3.0, 4.0));
        assert_eq!(state.opacity, 0.5);
        assert_eq!(state.strength, 3.0);
        assert_eq!(state.override_color.as_deref(), Some("teal"));

        // the anchored site clears before queueing again
        execute_line(&mut hud, 7, r#"{"cmd": "scale", "args": [2], "site": "loop"}"#).unwrap();
        assert_eq!(hud.queue().len(), 2);
    }
}
