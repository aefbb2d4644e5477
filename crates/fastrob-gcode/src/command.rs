//! Motion command tokenizer
//!
//! Turns G-code text into an ordered [`MotionCommandStream`]. Comments are
//! stripped, words are split into a letter and a signed decimal value and only
//! `G` commands are kept.

use fastrob_core::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::OnceLock;
use tracing::debug;

/// One motion command with the words the path reconstruction needs.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MotionCommand {
    /// Command word, upper case (e.g. `G1`)
    pub command: String,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
    /// Extrusion amount
    pub e: Option<f64>,
    /// Source line, 1-based, 0 for commands built in code
    pub line_number: usize,
}

impl MotionCommand {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into().to_uppercase(),
            ..Default::default()
        }
    }

    pub fn with_x(mut self, x: f64) -> Self {
        self.x = Some(x);
        self
    }

    pub fn with_y(mut self, y: f64) -> Self {
        self.y = Some(y);
        self
    }

    pub fn with_z(mut self, z: f64) -> Self {
        self.z = Some(z);
        self
    }

    pub fn with_e(mut self, e: f64) -> Self {
        self.e = Some(e);
        self
    }

    /// Command letter, `None` for an empty command word
    pub fn letter(&self) -> Option<char> {
        self.command.chars().next()
    }

    /// True when the command deposits material
    pub fn is_extruding(&self) -> bool {
        self.e.is_some_and(|e| e > 0.0)
    }
}

impl fmt::Display for MotionCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.command)?;
        for (letter, value) in [('X', self.x), ('Y', self.y), ('Z', self.z), ('E', self.e)] {
            if let Some(value) = value {
                write!(f, " {}{}", letter, value)?;
            }
        }
        Ok(())
    }
}

/// Ordered sequence of motion commands.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MotionCommandStream {
    commands: Vec<MotionCommand>,
}

impl MotionCommandStream {
    pub fn new(commands: Vec<MotionCommand>) -> Self {
        Self { commands }
    }

    /// Tokenize G-code text, keeping only `G` commands.
    pub fn parse(text: &str) -> Self {
        let mut commands = Vec::new();
        let mut skipped = 0usize;

        for (index, line) in text.lines().enumerate() {
            match parse_line(line, index + 1) {
                Some(command) if command.letter() == Some('G') => commands.push(command),
                Some(_) => skipped += 1,
                None => {}
            }
        }

        debug!(
            "Tokenized {} motion commands, skipped {} other commands",
            commands.len(),
            skipped
        );
        Self { commands }
    }

    /// Read and tokenize a G-code file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::parse(&text))
    }

    pub fn commands(&self) -> &[MotionCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MotionCommand> {
        self.commands.iter()
    }

    /// G-code text, one command per line
    pub fn to_gcode(&self) -> String {
        let mut out = String::new();
        for command in &self.commands {
            out.push_str(&command.to_string());
            out.push('\n');
        }
        out
    }
}

impl From<Vec<MotionCommand>> for MotionCommandStream {
    fn from(commands: Vec<MotionCommand>) -> Self {
        Self::new(commands)
    }
}

impl FromIterator<MotionCommand> for MotionCommandStream {
    fn from_iter<I: IntoIterator<Item = MotionCommand>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a MotionCommandStream {
    type Item = &'a MotionCommand;
    type IntoIter = std::slice::Iter<'a, MotionCommand>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}

fn comment_regex() -> &'static Regex {
    static COMMENT_REGEX: OnceLock<Regex> = OnceLock::new();
    COMMENT_REGEX.get_or_init(|| Regex::new(r"\([^)]*\)|;.*").expect("invalid regex pattern"))
}

fn word_regex() -> &'static Regex {
    static WORD_REGEX: OnceLock<Regex> = OnceLock::new();
    WORD_REGEX.get_or_init(|| {
        Regex::new(r"([A-Za-z])\s*([+-]?(?:\d+\.?\d*|\.\d+))").expect("invalid regex pattern")
    })
}

/// Tokenize one line; `None` for blank and comment-only lines.
pub fn parse_line(line: &str, line_number: usize) -> Option<MotionCommand> {
    let cleaned = comment_regex().replace_all(line, "");
    let mut words = word_regex().captures_iter(&cleaned);

    let first = words.next()?;
    let mut command = MotionCommand {
        command: format!("{}{}", first[1].to_uppercase(), &first[2]),
        line_number,
        ..Default::default()
    };

    for word in words {
        let letter = word[1].to_uppercase();
        let value: f64 = match word[2].parse() {
            Ok(value) => value,
            Err(err) => {
                debug!("Line {}: skipping word {}{}: {}", line_number, letter, &word[2], err);
                continue;
            }
        };
        match letter.as_str() {
            "X" => command.x = Some(value),
            "Y" => command.y = Some(value),
            "Z" => command.z = Some(value),
            "E" => command.e = Some(value),
            _ => {}
        }
    }

    Some(command)
}
