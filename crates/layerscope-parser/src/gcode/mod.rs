//! G-Code line handling
//!
//! This module provides:
//! - Command classification against the static code table
//! - Parameter word tokenizing
//! - Comment and whitespace preprocessors

pub mod command;
pub mod processors;

pub use command::*;
pub use processors::*;
