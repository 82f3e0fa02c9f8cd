//! # Layerscope Parser
//!
//! Interprets 3D-printer G-code into per-layer toolpath geometry.
//!
//! ## Features
//!
//! - Command classification against a static code table
//! - Linear and arc move interpretation, arcs discretized into short segments
//! - Purge detection for in-place extrusion
//! - Layer grouping by Z height, with retraction hops folded back by the
//!   following wipe
//! - Optional comment/whitespace preprocessing
//! - Toolpath statistics over the resulting layers
//!
//! ```
//! use layerscope_parser::parse_layers;
//!
//! let layers = parse_layers("G1 X10 Y0 E1\nG1 X10 Y10 E1");
//! assert_eq!(layers.len(), 1);
//! assert_eq!(layers[0].z, Some(0.0));
//! ```

pub mod gcode;
pub mod interpreter;
pub mod stats;

pub use gcode::{
    classify_line, CommandKind, CommentProcessor, LineProcessor, LineProcessorHandle, ParsedLine,
    ProcessorPipeline, WhitespaceProcessor, COMMAND_TABLE,
};
pub use interpreter::{
    parse_layers, Interpreter, InterpreterConfig, LayerAccumulator, RetractionState, RunState,
    RunStats,
};
pub use stats::{Bounds, LayerSummary, ToolpathStats};
