//! Toolpath interpreter
//!
//! Drives a single pass over a command stream:
//! raw line → classify → handle → accumulate into layers.
//!
//! Handlers are pure functions of the parsed line and the current position;
//! the [`Interpreter`] is the only owner of mutable state (position, layer
//! accumulator, run statistics) and applies their results in order.

pub mod arc;
pub mod layers;
pub mod linear;
pub mod position;

pub use arc::{angular_delta, interpret_arc, segment_count, ArcPath};
pub use layers::{LayerAccumulator, RetractionState};
pub use linear::{interpret_linear, LinearMove};
pub use position::PositionTracker;

use layerscope_core::constants::DEFAULT_ARC_SEGMENT_LENGTH;
use layerscope_core::{
    Diagnostic, DiagnosticSinkHandle, Error, InterpretError, Layer, Position, Result, TracingSink,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, trace};

use crate::gcode::{CommandKind, ParsedLine};

/// Interpreter tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InterpreterConfig {
    /// Target arc length of one arc sub-segment
    pub arc_segment_length: f64,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            arc_segment_length: DEFAULT_ARC_SEGMENT_LENGTH,
        }
    }
}

impl InterpreterConfig {
    pub fn with_arc_segment_length(mut self, length: f64) -> Self {
        self.arc_segment_length = length;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !self.arc_segment_length.is_finite() || self.arc_segment_length <= 0.0 {
            return Err(Error::other(format!(
                "Arc segment length must be a finite value > 0, got {}",
                self.arc_segment_length
            )));
        }
        Ok(())
    }
}

/// Lifecycle of one interpreter run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    /// No run started yet
    Idle,
    /// Inside `parse`
    Running,
    /// Last run completed
    Done,
}

/// Counters for the most recent run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunStats {
    /// Lines seen, blank ones included
    pub lines: usize,
    /// Blank or whitespace-only lines skipped
    pub blank_lines: usize,
    /// Classified lines per [`CommandKind`], indexed by [`CommandKind::index`]
    pub kind_counts: [usize; CommandKind::ALL.len()],
    /// Movements appended to layers
    pub movements: usize,
    /// Diagnostics sent to the sink
    pub diagnostics: usize,
}

impl RunStats {
    /// Lines classified as `kind`
    pub fn count(&self, kind: CommandKind) -> usize {
        self.kind_counts[kind.index()]
    }
}

/// Single-pass interpreter from command stream to layers
pub struct Interpreter {
    config: InterpreterConfig,
    sink: DiagnosticSinkHandle,
    state: RunState,
    position: PositionTracker,
    accumulator: LayerAccumulator,
    stats: RunStats,
}

impl Interpreter {
    /// Interpreter with default configuration that logs diagnostics via `tracing`
    pub fn new() -> Self {
        Self {
            config: InterpreterConfig::default(),
            sink: Arc::new(TracingSink),
            state: RunState::Idle,
            position: PositionTracker::new(),
            accumulator: LayerAccumulator::new(),
            stats: RunStats::default(),
        }
    }

    /// Interpreter with a validated configuration
    pub fn with_config(config: InterpreterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new()
        })
    }

    /// Route diagnostics to `sink` instead of the log
    pub fn with_sink(mut self, sink: DiagnosticSinkHandle) -> Self {
        self.sink = sink;
        self
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Statistics of the most recent run
    pub fn last_run(&self) -> &RunStats {
        &self.stats
    }

    /// Machine position at the end of the most recent run
    pub fn position(&self) -> Position {
        self.position.current()
    }

    /// Interpret a whole command stream
    ///
    /// Never fails: commands that cannot be interpreted are skipped and
    /// reported to the diagnostic sink. Every call starts from a fresh
    /// machine state, so the same input always yields the same layers.
    pub fn parse(&mut self, input: &str) -> Vec<Layer> {
        debug!("Starting G-code interpretation, input size: {} bytes", input.len());

        self.state = RunState::Running;
        self.position.reset();
        self.accumulator = LayerAccumulator::new();
        self.stats = RunStats::default();

        for (index, raw) in input.lines().enumerate() {
            self.stats.lines += 1;
            match ParsedLine::parse(index + 1, raw) {
                Some(line) => self.interpret_line(&line),
                None => self.stats.blank_lines += 1,
            }
        }

        let layers = std::mem::take(&mut self.accumulator).finish();
        self.state = RunState::Done;

        debug!(
            "Interpretation complete: lines={}, movement={}, arc={}, retraction={}, wipe={}, unknown={}, layers={}, diagnostics={}",
            self.stats.lines,
            self.stats.count(CommandKind::Movement),
            self.stats.count(CommandKind::Arc),
            self.stats.count(CommandKind::Retraction),
            self.stats.count(CommandKind::Wipe),
            self.stats.count(CommandKind::Unknown),
            layers.len(),
            self.stats.diagnostics
        );

        layers
    }

    fn interpret_line(&mut self, line: &ParsedLine<'_>) {
        trace!("Line {}: {} ({})", line.line_number, line.code, line.kind);
        self.stats.kind_counts[line.kind.index()] += 1;

        match line.kind {
            CommandKind::Movement => {
                let result = interpret_linear(line, self.position.current());
                self.accumulator.record_movement(result.movement);
                self.stats.movements += 1;
                if let Some(purge) = result.purge {
                    self.accumulator.record_purge(purge.position);
                }
                self.position.move_to(result.target());
            }
            CommandKind::Arc => {
                match interpret_arc(line, self.position.current(), self.config.arc_segment_length)
                {
                    Ok(path) => {
                        self.stats.movements += path.segments.len();
                        for segment in path.segments {
                            self.accumulator.record_movement(segment);
                        }
                        for error in path.skipped {
                            self.report(line, error);
                        }
                        self.position.move_to(path.end);
                    }
                    Err(error) => self.report(line, error),
                }
            }
            CommandKind::Retraction => self.accumulator.on_retraction(self.position.current()),
            CommandKind::Wipe => self.accumulator.on_wipe(self.position.current()),
            CommandKind::Reset
            | CommandKind::Pause
            | CommandKind::Extrusion
            | CommandKind::CoordinateMode
            | CommandKind::OuterWall
            | CommandKind::Unknown => {}
        }
    }

    fn report(&mut self, line: &ParsedLine<'_>, error: InterpretError) {
        self.stats.diagnostics += 1;
        self.sink.report(&Diagnostic::new(line.raw, error));
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Interpreter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interpreter")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("position", &self.position)
            .finish()
    }
}

/// Interpret `input` with default settings
pub fn parse_layers(input: &str) -> Vec<Layer> {
    Interpreter::new().parse(input)
}
