//! Parsing of REPL input lines.

use anyhow::{Result, anyhow, bail};
use harmony_core::blobs::ShapeId;
use harmony_core::chart::SELF_DIMENSIONS;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Shapes,
    Press(ShapeId),
    Drag { shape: ShapeId, x: f64, y: f64 },
    Down { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Up,
    Next,
    Set { axis: usize, score: u8 },
    Chart,
    Advance,
    Summary,
    Scene,
    Help,
    Quit,
    /// Anything that is not a command: the name on the start screen, a chat
    /// message in the reflection scene.
    Text(String),
}

pub fn parse(line: &str) -> Result<Command> {
    let line = line.trim();
    if line == "quit" || line == "exit" {
        return Ok(Command::Quit);
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Ok(Command::Text(line.to_string()));
    };

    let mut parts = rest.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let args: Vec<&str> = parts.collect();

    let command = match (name, args.as_slice()) {
        ("shapes", []) => Command::Shapes,
        ("press", [shape]) => Command::Press(parse_shape(shape)?),
        ("drag", [shape, x, y]) => Command::Drag {
            shape: parse_shape(shape)?,
            x: parse_coord(x)?,
            y: parse_coord(y)?,
        },
        ("down", [x, y]) => Command::Down {
            x: parse_coord(x)?,
            y: parse_coord(y)?,
        },
        ("move", [x, y]) => Command::Move {
            x: parse_coord(x)?,
            y: parse_coord(y)?,
        },
        ("up", []) => Command::Up,
        ("next", []) => Command::Next,
        ("set", [axis, score]) => Command::Set {
            axis: parse_axis(axis)?,
            score: parse_score(score)?,
        },
        ("chart", []) => Command::Chart,
        ("advance", []) => Command::Advance,
        ("summary", []) => Command::Summary,
        ("scene", []) => Command::Scene,
        ("help", []) => Command::Help,
        ("quit", []) | ("exit", []) => Command::Quit,
        _ => bail!("Unknown command or wrong arguments: /{rest}. Type /help."),
    };
    Ok(command)
}

fn parse_shape(value: &str) -> Result<ShapeId> {
    match value.to_ascii_lowercase().as_str() {
        "self" | "self_concept" | "a" => Ok(ShapeId::SelfConcept),
        "presented" | "mask" | "b" => Ok(ShapeId::Presented),
        other => bail!("Unknown shape '{other}' (use 'self' or 'presented')"),
    }
}

fn parse_coord(value: &str) -> Result<f64> {
    let coord: f64 = value
        .parse()
        .map_err(|_| anyhow!("'{value}' is not a number"))?;
    if !coord.is_finite() {
        bail!("'{value}' is not a finite coordinate");
    }
    Ok(coord)
}

/// Accepts a 1-based axis number or a case-insensitive label prefix.
fn parse_axis(value: &str) -> Result<usize> {
    if let Ok(number) = value.parse::<usize>() {
        if (1..=SELF_DIMENSIONS.len()).contains(&number) {
            return Ok(number - 1);
        }
        bail!("Axis number must be 1-{}", SELF_DIMENSIONS.len());
    }

    let needle = value.to_ascii_lowercase();
    let matches: Vec<usize> = SELF_DIMENSIONS
        .iter()
        .enumerate()
        .filter(|(_, (label, _))| label.to_ascii_lowercase().starts_with(&needle))
        .map(|(i, _)| i)
        .collect();
    match matches.as_slice() {
        [index] => Ok(*index),
        [] => bail!("No axis called '{value}'"),
        _ => bail!("'{value}' matches several axes"),
    }
}

fn parse_score(value: &str) -> Result<u8> {
    match value.parse::<u8>() {
        Ok(score @ 1..=10) => Ok(score),
        _ => bail!("Score must be a whole number from 1 to 10"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_passes_through() {
        assert_eq!(
            parse("  I felt seen today ").unwrap(),
            Command::Text("I felt seen today".into())
        );
        assert_eq!(parse("exit").unwrap(), Command::Quit);
    }

    #[test]
    fn test_pointer_commands() {
        assert_eq!(
            parse("/down 10 20.5").unwrap(),
            Command::Down { x: 10.0, y: 20.5 }
        );
        assert_eq!(parse("/up").unwrap(), Command::Up);
        assert_eq!(
            parse("/drag presented 400 400").unwrap(),
            Command::Drag {
                shape: ShapeId::Presented,
                x: 400.0,
                y: 400.0
            }
        );
        assert!(parse("/move 1").is_err());
        assert!(parse("/move x 2").is_err());
        assert!(parse("/down NaN 2").is_err());
    }

    #[test]
    fn test_set_accepts_number_or_label() {
        assert_eq!(
            parse("/set 3 7").unwrap(),
            Command::Set { axis: 2, score: 7 }
        );
        assert_eq!(
            parse("/set propriate 10").unwrap(),
            Command::Set { axis: 6, score: 10 }
        );
        // "Self-" prefixes five labels.
        assert!(parse("/set self- 4").is_err());
        assert!(parse("/set 8 4").is_err());
        assert!(parse("/set 1 0").is_err());
        assert!(parse("/set 1 11").is_err());
    }

    #[test]
    fn test_unknown_command() {
        let err = parse("/dance").unwrap_err();
        assert!(err.to_string().contains("/help"));
    }
}
