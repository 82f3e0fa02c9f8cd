//! Error handling for Layerscope
//!
//! Provides the error types shared by every crate in the workspace:
//! - Interpretation errors (non-fatal, reported per command or arc segment)
//! - The unified [`Error`] used by fallible public APIs
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Interpretation error type
///
/// Represents a command (or a single arc sub-segment) that could not be
/// turned into geometry. These never abort a run: the interpreter skips the
/// offending piece, reports it to the diagnostic sink, and moves on.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InterpretError {
    /// Arc center could not be determined because an offset word is missing
    #[error("Unresolved arc center at line {line_number}: missing {missing}")]
    UnresolvedArcCenter {
        /// The 1-based line number of the arc command.
        line_number: usize,
        /// The missing offset word(s), e.g. "I" or "I/J".
        missing: &'static str,
    },

    /// Arc radius is zero, negative, or not finite
    #[error("Invalid arc radius at line {line_number}: {radius}")]
    InvalidArcRadius {
        /// The 1-based line number of the arc command.
        line_number: usize,
        /// The computed radius.
        radius: f64,
    },

    /// A discretized arc point has a non-finite coordinate
    #[error("Invalid arc segment point at line {line_number}, segment {segment}: ({x}, {y})")]
    InvalidArcSegmentPoint {
        /// The 1-based line number of the arc command.
        line_number: usize,
        /// The 1-based index of the sub-segment that was dropped.
        segment: usize,
        /// The computed X coordinate.
        x: f64,
        /// The computed Y coordinate.
        y: f64,
    },
}

impl InterpretError {
    /// Source line the error refers to
    pub fn line_number(&self) -> usize {
        match self {
            Self::UnresolvedArcCenter { line_number, .. }
            | Self::InvalidArcRadius { line_number, .. }
            | Self::InvalidArcSegmentPoint { line_number, .. } => *line_number,
        }
    }

    /// True when the whole command was skipped (as opposed to one sub-segment)
    pub fn skips_command(&self) -> bool {
        !matches!(self, Self::InvalidArcSegmentPoint { .. })
    }
}

/// Main error type for Layerscope
///
/// A unified error type for the fallible edges of the system (file access,
/// serialization, configuration). Interpretation itself never fails as a
/// whole, so [`InterpretError`] appears here only when a caller chooses to
/// escalate a diagnostic.
#[derive(Error, Debug)]
pub enum Error {
    /// Interpretation error
    #[error(transparent)]
    Interpret(#[from] InterpretError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is an interpretation error
    pub fn is_interpret_error(&self) -> bool {
        matches!(self, Error::Interpret(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
