//! # Layerscope Core
//!
//! Core types, errors, and diagnostics for Layerscope.
//! Provides the per-layer toolpath data model produced by the interpreter,
//! the non-fatal interpretation error kinds, and the sink through which
//! those errors are reported.

pub mod constants;
pub mod data;
pub mod diagnostics;
pub mod error;

pub use data::{ArcInfo, Layer, Movement, Position, PurgePoint};

pub use diagnostics::{
    CollectingSink, Diagnostic, DiagnosticSink, DiagnosticSinkHandle, NoOpSink, TracingSink,
};

pub use error::{Error, InterpretError, Result};
