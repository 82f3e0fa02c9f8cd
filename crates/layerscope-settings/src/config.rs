//! Configuration management for Layerscope
//!
//! Provides configuration file handling and validation. Supports JSON and
//! TOML file formats, stored by default in the platform config directory.
//!
//! Configuration is organized into sections:
//! - Interpreter settings (arc discretization)
//! - Input preprocessing (comment stripping, whitespace trimming)
//! - Output (format, JSON layout)

use layerscope_parser::{
    CommentProcessor, InterpreterConfig, ProcessorPipeline, WhitespaceProcessor,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{ConfigError, SettingsError, SettingsResult};

/// Application directory name under the platform config dir
pub const APP_DIR_NAME: &str = "layerscope";

/// Default config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Interpreter settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpreterSettings {
    /// Target length of one arc sub-segment
    pub arc_segment_length: f64,
}

impl Default for InterpreterSettings {
    fn default() -> Self {
        Self {
            arc_segment_length: InterpreterConfig::default().arc_segment_length,
        }
    }
}

/// Input preprocessing settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSettings {
    /// Remove `;` and `( )` comments before interpretation
    pub strip_comments: bool,
    /// Trim leading and trailing whitespace from each line
    pub trim_whitespace: bool,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            strip_comments: true,
            trim_whitespace: true,
        }
    }
}

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One header line plus one line per layer
    #[default]
    Summary,
    /// Layers serialized as JSON
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Summary => write!(f, "summary"),
            Self::Json => write!(f, "json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "summary" => Ok(Self::Summary),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub format: OutputFormat,
    /// Indent JSON output
    pub pretty_json: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            format: OutputFormat::Summary,
            pretty_json: true,
        }
    }
}

/// Complete application configuration
///
/// Aggregates all settings sections and provides file I/O operations.
/// Missing sections or keys in a file fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub interpreter: InterpreterSettings,
    pub input: InputSettings,
    pub output: OutputSettings,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Platform config file location (`<config dir>/layerscope/config.toml`)
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
            .ok_or_else(|| {
                ConfigError::UnsupportedPlatform(std::env::consts::OS.to_string()).into()
            })
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = FileFormat::from_path(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| SettingsError::LoadError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let config: Self = match format {
            FileFormat::Json => serde_json::from_str(&content)?,
            FileFormat::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, or defaults when the file does not exist
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to file (JSON or TOML), creating parent directories
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;
        let format = FileFormat::from_path(path)?;

        let content = match format {
            FileFormat::Json => serde_json::to_string_pretty(self)?,
            FileFormat::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                SettingsError::ConfigDirectory(format!("{}: {}", parent.display(), e))
            })?;
        }

        std::fs::write(path, content).map_err(|e| SettingsError::SaveError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let length = self.interpreter.arc_segment_length;
        if self.interpreter_config().validate().is_err() {
            return Err(ConfigError::ValueOutOfRange {
                key: "interpreter.arc_segment_length".to_string(),
                value: length.to_string(),
            });
        }
        Ok(())
    }

    /// Interpreter configuration derived from these settings
    pub fn interpreter_config(&self) -> InterpreterConfig {
        InterpreterConfig::default().with_arc_segment_length(self.interpreter.arc_segment_length)
    }

    /// Preprocessing pipeline derived from the input settings
    pub fn pipeline(&self) -> ProcessorPipeline {
        let mut pipeline = ProcessorPipeline::new();
        if self.input.strip_comments {
            pipeline.register(Arc::new(CommentProcessor::new()));
        }
        if self.input.trim_whitespace {
            pipeline.register(Arc::new(WhitespaceProcessor::new()));
        }
        pipeline
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Json,
    Toml,
}

impl FileFormat {
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}
