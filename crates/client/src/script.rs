//! Plain-text command scripts.
//!
//! One command per line: `name`, `name(arg)` or `name arg`. Blank lines and
//! anything after a `#` outside quotes are ignored. The single argument is
//! mapped onto the parameter the action reads:
//!
//! | action         | parameter  |
//! |----------------|------------|
//! | `move_forward` | `steps`    |
//! | `build`        | `object`   |
//! | `speak`        | `message`  |
//! | `collect`      | `resource` |
//!
//! Other actions receive it as the extra `arg` parameter. The `undo` command
//! is handled by the driver instead of the action catalog.

use puzzle_core::ActionParams;
use serde_json::Value;
use thiserror::Error;

pub const UNDO: &str = "undo";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("line {line}: missing closing parenthesis")]
    UnclosedParen { line: usize },

    #[error("line {line}: `{name}` is not a valid action name")]
    InvalidName { line: usize, name: String },

    #[error("line {line}: expected a step count, found `{value}`")]
    InvalidSteps { line: usize, value: String },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Command {
    /// 1-based source line.
    pub line: usize,
    pub name: String,
    pub params: ActionParams,
}

impl Command {
    pub fn is_undo(&self) -> bool {
        self.name == UNDO
    }
}

pub fn parse(source: &str) -> Result<Vec<Command>, ScriptError> {
    source
        .lines()
        .enumerate()
        .filter_map(|(index, raw)| {
            let text = strip_comment(raw).trim();
            (!text.is_empty()).then(|| parse_line(index + 1, text))
        })
        .collect()
}

fn parse_line(line: usize, text: &str) -> Result<Command, ScriptError> {
    let (name, arg) = match text.find('(') {
        Some(open) => {
            let inner = text[open + 1..]
                .strip_suffix(')')
                .ok_or(ScriptError::UnclosedParen { line })?;
            (text[..open].trim(), Some(inner.trim()))
        }
        None => match text.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, Some(rest.trim())),
            None => (text, None),
        },
    };

    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(ScriptError::InvalidName {
            line,
            name: name.to_owned(),
        });
    }

    let arg = arg.map(unquote).filter(|arg| !arg.is_empty());
    let params = match arg {
        None => ActionParams::new(),
        Some(arg) => params_for(line, name, arg)?,
    };

    Ok(Command {
        line,
        name: name.to_owned(),
        params,
    })
}

fn params_for(line: usize, name: &str, arg: &str) -> Result<ActionParams, ScriptError> {
    let params = ActionParams::new();
    Ok(match name {
        "move_forward" => {
            let steps = arg.parse().map_err(|_| ScriptError::InvalidSteps {
                line,
                value: arg.to_owned(),
            })?;
            params.with_steps(steps)
        }
        "build" => params.with_object(arg),
        "speak" => params.with_message(arg),
        "collect" => params.with_resource(arg),
        _ => params.with_extra("arg", Value::String(arg.to_owned())),
    })
}

/// Cuts the line at the first `#` outside a quoted string.
fn strip_comment(line: &str) -> &str {
    let mut quote = None;
    for (index, c) in line.char_indices() {
        match (quote, c) {
            (None, '"' | '\'') => quote = Some(c),
            (Some(open), _) if c == open => quote = None,
            (None, '#') => return &line[..index],
            _ => {}
        }
    }
    line
}

fn unquote(arg: &str) -> &str {
    ['"', '\'']
        .iter()
        .find_map(|q| arg.strip_prefix(*q).and_then(|rest| rest.strip_suffix(*q)))
        .unwrap_or(arg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_three_forms() {
        let script = "\
            # opening moves\n\
            move_forward(3)\n\
            turn_left\n\
            \n\
            build bridge   # over the river\n\
            speak(\"hello there\")\n";
        let commands = parse(script).unwrap();

        let names: Vec<_> = commands.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["move_forward", "turn_left", "build", "speak"]);
        assert_eq!(commands[0].line, 2);
        assert_eq!(commands[0].params.steps, Some(3));
        assert!(commands[1].params.is_empty());
        assert_eq!(commands[2].params.object.as_deref(), Some("bridge"));
        assert_eq!(commands[3].params.message.as_deref(), Some("hello there"));
    }

    #[test]
    fn maps_collect_argument_to_resource() {
        let commands = parse("collect('gem')\nundo").unwrap();

        assert_eq!(commands[0].params.resource.as_deref(), Some("gem"));
        assert!(commands[1].is_undo());
    }

    #[test]
    fn unknown_action_keeps_its_argument() {
        let commands = parse("fly north").unwrap();

        assert_eq!(
            commands[0].params.extra.get("arg"),
            Some(&Value::String("north".into()))
        );
    }

    #[test]
    fn hash_inside_quotes_is_not_a_comment() {
        let commands = parse("speak(\"room #2\")  # greet\nspeak 'no #3'").unwrap();

        assert_eq!(commands[0].params.message.as_deref(), Some("room #2"));
        assert_eq!(commands[1].params.message.as_deref(), Some("no #3"));
    }

    #[test]
    fn reports_line_of_bad_input() {
        assert_eq!(
            parse("turn_left\nmove_forward(two)"),
            Err(ScriptError::InvalidSteps {
                line: 2,
                value: "two".into()
            })
        );
        assert_eq!(
            parse("speak(\"hi\""),
            Err(ScriptError::UnclosedParen { line: 1 })
        );
        assert!(matches!(
            parse("move-forward"),
            Err(ScriptError::InvalidName { line: 1, .. })
        ));
    }
}
