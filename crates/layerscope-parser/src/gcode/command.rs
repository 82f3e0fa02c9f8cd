//! Command classification and parameter tokenizing

use serde::{Deserialize, Serialize};
use tracing::trace;

/// Semantic kind of a command line
///
/// Determined solely by the leading command code. Only movement, arc,
/// retraction and wipe currently drive interpretation; the other kinds are
/// recognised so they can be counted and reserved for future handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    /// Linear move (G0 rapid, G1 controlled feed)
    Movement,
    /// Arc move (G2 clockwise, G3 counter-clockwise)
    Arc,
    /// Position reset (G92)
    Reset,
    /// Filament change / pause (M600, M601)
    Pause,
    /// Extrusion mode markers (M83, M84)
    Extrusion,
    /// Absolute/relative positioning (G90, G91)
    CoordinateMode,
    /// Firmware retraction (G10)
    Retraction,
    /// Firmware unretract, treated as the wipe that follows a retraction (G11)
    Wipe,
    /// Outer wall marker; no command code maps to it in the current table
    OuterWall,
    /// Anything not in the table
    Unknown,
}

/// Static command-code table
///
/// Codes are matched exactly (case-sensitive) against the first token of a line.
pub const COMMAND_TABLE: &[(&str, CommandKind)] = &[
    ("G0", CommandKind::Movement),
    ("G1", CommandKind::Movement),
    ("G2", CommandKind::Arc),
    ("G3", CommandKind::Arc),
    ("G92", CommandKind::Reset),
    ("M600", CommandKind::Pause),
    ("M601", CommandKind::Pause),
    ("M83", CommandKind::Extrusion),
    ("M84", CommandKind::Extrusion),
    ("G90", CommandKind::CoordinateMode),
    ("G91", CommandKind::CoordinateMode),
    ("G10", CommandKind::Retraction),
    ("G11", CommandKind::Wipe),
];

impl CommandKind {
    /// Every kind, in declaration order
    pub const ALL: [CommandKind; 10] = [
        Self::Movement,
        Self::Arc,
        Self::Reset,
        Self::Pause,
        Self::Extrusion,
        Self::CoordinateMode,
        Self::Retraction,
        Self::Wipe,
        Self::OuterWall,
        Self::Unknown,
    ];

    /// Look up a command code in the static table
    pub fn from_code(code: &str) -> Self {
        COMMAND_TABLE
            .iter()
            .find(|(entry, _)| *entry == code)
            .map(|(_, kind)| *kind)
            .unwrap_or(Self::Unknown)
    }

    /// Snake-case name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Movement => "movement",
            Self::Arc => "arc",
            Self::Reset => "reset",
            Self::Pause => "pause",
            Self::Extrusion => "extrusion",
            Self::CoordinateMode => "coordinate_mode",
            Self::Retraction => "retraction",
            Self::Wipe => "wipe",
            Self::OuterWall => "outerwall",
            Self::Unknown => "unknown",
        }
    }

    /// Position of this kind within [`CommandKind::ALL`]
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl std::fmt::Display for CommandKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a raw line by its leading token
///
/// Returns `None` for blank or whitespace-only lines, which are skipped
/// before classification.
pub fn classify_line(line: &str) -> Option<CommandKind> {
    line.split_whitespace().next().map(CommandKind::from_code)
}

/// A classified line with its parameter words
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedLine<'a> {
    /// 1-based line number in the command stream
    pub line_number: usize,
    /// The line as it appeared in the stream
    pub raw: &'a str,
    /// Leading command code (e.g. "G1")
    pub code: &'a str,
    pub kind: CommandKind,
    /// `<letter><number>` words after the command code, letters upper-cased
    pub params: Vec<(char, f64)>,
}

impl<'a> ParsedLine<'a> {
    /// Tokenize a line; `None` for blank lines
    ///
    /// Words whose value is not a finite number are dropped.
    pub fn parse(line_number: usize, raw: &'a str) -> Option<Self> {
        let mut parts = raw.split_whitespace();
        let code = parts.next()?;
        let kind = CommandKind::from_code(code);

        let mut params = Vec::new();
        for part in parts {
            let mut chars = part.chars();
            let Some(letter) = chars.next() else {
                continue;
            };
            if !letter.is_ascii_alphabetic() {
                continue;
            }
            // `nan`, `inf` and overflowing literals parse as f64 but are not coordinates
            match chars.as_str().parse::<f64>() {
                Ok(value) if value.is_finite() => {
                    params.push((letter.to_ascii_uppercase(), value))
                }
                _ => trace!("Line {}: ignoring malformed word '{}'", line_number, part),
            }
        }

        Some(Self {
            line_number,
            raw,
            code,
            kind,
            params,
        })
    }

    /// Value of a parameter word; the last occurrence wins
    pub fn param(&self, letter: char) -> Option<f64> {
        self.params
            .iter()
            .rev()
            .find(|(l, _)| *l == letter)
            .map(|(_, v)| *v)
    }

    /// True when the parameter word is present
    pub fn has(&self, letter: char) -> bool {
        self.params.iter().any(|(l, _)| *l == letter)
    }

    /// True when the line carries a positive extrusion amount
    pub fn is_extruding(&self) -> bool {
        self.param('E').is_some_and(|e| e > 0.0)
    }
}
