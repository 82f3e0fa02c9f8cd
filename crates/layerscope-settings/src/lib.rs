//! Layerscope Settings Crate
//!
//! Handles file-backed configuration for the command-line front end.

pub mod config;
pub mod error;

pub use config::{
    Config, InputSettings, InterpreterSettings, OutputFormat, OutputSettings, APP_DIR_NAME,
    CONFIG_FILE_NAME,
};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
