//! Line editing for the REPL: completes commands, shape names and chart
//! axes, and hints the arguments a command still needs.

use std::borrow::Cow::{self, Borrowed, Owned};

use colored::Colorize;
use harmony_core::chart::SELF_DIMENSIONS;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

/// Slash commands and the arguments each takes.
const COMMANDS: [(&str, &str); 14] = [
    ("/shapes", ""),
    ("/press", "<self|presented>"),
    ("/drag", "<self|presented> x y"),
    ("/down", "x y"),
    ("/move", "x y"),
    ("/up", ""),
    ("/next", ""),
    ("/set", "<axis> <1-10>"),
    ("/chart", ""),
    ("/advance", ""),
    ("/summary", ""),
    ("/scene", ""),
    ("/help", ""),
    ("/quit", ""),
];

const SHAPES: [&str; 2] = ["self", "presented"];

/// The single word `/set` accepts for an axis: its label up to the first
/// space, lowercased. Each one is a unique label prefix.
fn axis_keyword(label: &str) -> String {
    label
        .split_whitespace()
        .next()
        .unwrap_or(label)
        .to_ascii_lowercase()
}

/// Candidates for the word under the cursor and where that word starts.
fn candidates(line: &str) -> (usize, Vec<String>) {
    let Some((command, args)) = line.split_once(' ') else {
        if !line.starts_with('/') {
            return (0, Vec::new());
        }
        let names = COMMANDS
            .iter()
            .map(|(name, _)| *name)
            .filter(|name| name.starts_with(line))
            .map(str::to_string)
            .collect();
        return (0, names);
    };

    // Only the first argument has a fixed vocabulary.
    let word = args.trim_start();
    if word.contains(' ') {
        return (line.len(), Vec::new());
    }
    let start = line.len() - word.len();
    let needle = word.to_ascii_lowercase();

    let vocabulary: Vec<String> = match command {
        "/press" | "/drag" => SHAPES.iter().map(|s| s.to_string()).collect(),
        "/set" => SELF_DIMENSIONS
            .iter()
            .map(|(label, _)| axis_keyword(label))
            .collect(),
        _ => Vec::new(),
    };
    let matching = vocabulary
        .into_iter()
        .filter(|candidate| candidate.starts_with(&needle))
        .collect();
    (start, matching)
}

/// Grey text shown after the cursor: the rest of a unique completion, or
/// the usage of a command that has no arguments yet.
fn hint_for(line: &str) -> Option<String> {
    if let Some((_, usage)) = COMMANDS.iter().find(|(name, _)| *name == line.trim_end()) {
        if usage.is_empty() {
            return None;
        }
        let gap = if line.ends_with(' ') { "" } else { " " };
        return Some(format!("{gap}{usage}"));
    }

    let (start, found) = candidates(line);
    match found.as_slice() {
        [only] => {
            let typed = line.len() - start;
            (only.len() > typed).then(|| only[typed..].to_string())
        }
        _ => None,
    }
}

/// Completion, highlighting and hints for slash commands.
#[derive(Clone, Default)]
pub struct CliHelper;

impl CliHelper {
    pub fn new() -> Self {
        Self
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, found) = candidates(&line[..pos]);
        let pairs = found
            .into_iter()
            .map(|candidate| Pair {
                display: candidate.clone(),
                replacement: candidate,
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Owned(hint.bright_black().to_string())
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        // Only hint at the end of the line.
        if pos < line.len() {
            return None;
        }
        hint_for(line)
    }
}

impl Validator for CliHelper {}
