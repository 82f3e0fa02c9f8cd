//! # Layerscope
//!
//! Interprets 3D-printer G-code into per-layer toolpath geometry:
//! extrusion and travel segments, purge points, and arcs discretized into
//! short straight segments.
//!
//! ## Architecture
//!
//! Layerscope is organized as a workspace with multiple crates:
//!
//! 1. **layerscope-core** - Data model, error types, diagnostic sinks
//! 2. **layerscope-parser** - Classification, interpretation, layer grouping, statistics
//! 3. **layerscope-settings** - File-backed configuration
//! 4. **layerscope** - Command-line front end that ties the crates together

use std::path::Path;

use anyhow::Context;
use layerscope_core::{DiagnosticSinkHandle, Layer};
use layerscope_parser::{Interpreter, RunStats, ToolpathStats};
use layerscope_settings::{Config, OutputFormat, OutputSettings};

pub use layerscope_core::{Error, Result};
pub use layerscope_parser::parse_layers;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging
///
/// Sets up structured logging with:
/// - Output on stderr, leaving stdout for results
/// - RUST_LOG environment variable support
/// - INFO by default, DEBUG when `verbose` is set
pub fn init_logging(verbose: bool) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let default_level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.to_string()));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(verbose);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
}

/// Result of interpreting one command stream
#[derive(Debug, Clone)]
pub struct Analysis {
    pub layers: Vec<Layer>,
    pub stats: ToolpathStats,
    pub run: RunStats,
}

/// Read a G-code file
pub fn load_source(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file: {}", path.display()))
}

/// Preprocess and interpret `source` according to `config`
///
/// Diagnostics go to `sink` when given, otherwise to the log.
pub fn analyze(
    source: &str,
    config: &Config,
    sink: Option<DiagnosticSinkHandle>,
) -> anyhow::Result<Analysis> {
    config.validate().context("Invalid configuration")?;

    let pipeline = config.pipeline();
    let cleaned = pipeline.process_stream(source);
    tracing::debug!("Preprocessed input with {:?}", pipeline);

    let mut interpreter = Interpreter::with_config(config.interpreter_config())
        .context("Invalid interpreter configuration")?;
    if let Some(sink) = sink {
        interpreter = interpreter.with_sink(sink);
    }

    let layers = interpreter.parse(&cleaned);
    let stats = ToolpathStats::from_layers(&layers);
    let run = interpreter.last_run().clone();

    if run.diagnostics > 0 {
        tracing::info!("{} command(s) skipped, see warnings above", run.diagnostics);
    }

    Ok(Analysis { layers, stats, run })
}

/// Render an analysis in the configured output format
pub fn render(analysis: &Analysis, output: &OutputSettings) -> anyhow::Result<String> {
    match output.format {
        OutputFormat::Summary => Ok(render_summary(analysis)),
        OutputFormat::Json => {
            let json = if output.pretty_json {
                serde_json::to_string_pretty(&analysis.layers)
            } else {
                serde_json::to_string(&analysis.layers)
            };
            json.context("Failed to serialize layers")
        }
    }
}

fn render_summary(analysis: &Analysis) -> String {
    let stats = &analysis.stats;
    let mut out = format!(
        "layers: {}, movements: {}, extrusions: {}, travels: {}, purges: {}, extruded: {:.3}, travelled: {:.3}, skipped: {}\n",
        stats.layer_count(),
        stats.total_movements,
        stats.total_extrusions,
        stats.total_travels,
        stats.total_purges,
        stats.total_extrusion_length,
        stats.total_travel_length,
        analysis.run.diagnostics,
    );

    for layer in &stats.layers {
        let z = match layer.z {
            Some(z) => format!("{:.3}", z),
            None => "pending".to_string(),
        };
        out.push_str(&format!(
            "layer {:>4}  z={:<8} moves={:<6} extrude={:<6} travel={:<6} purge={:<4} arc={:<6} length={:.3}\n",
            layer.index,
            z,
            layer.movements,
            layer.extrusions,
            layer.travels,
            layer.purges,
            layer.arc_segments,
            layer.extrusion_length,
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use layerscope_core::CollectingSink;
    use layerscope_parser::CommandKind;
    use std::sync::Arc;
    use tempfile::TempDir;

    const SLICED: &str = "\
;FLAVOR:Marlin
;LAYER:0
G1 Z0.2 F3000
G1 X10 Y0 E0.5 ; outer wall
G1 X10 Y10 E0.5
G10
G1 Z0.6
G11
G1 X0 Y10 Z0.2
;LAYER:1
G1 Z0.4
G3 X0 Y0 I0 J-5 E0.7
G2 X5 Y5
";

    #[test]
    fn test_summary_has_one_line_per_layer() {
        let analysis =
            analyze("G1 X10 E1\nG1 Z0.4\nG1 X0 E1", &Config::default(), None).unwrap();
        let text = render(&analysis, &OutputSettings::default()).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("layers: 2"));
        assert!(lines[1].contains("z=0.000"));
        assert!(lines[2].contains("z=0.400"));
    }

    #[test]
    fn test_pending_layer_is_labelled() {
        let analysis = analyze("G0 X5 Y5", &Config::default(), None).unwrap();
        let text = render(&analysis, &OutputSettings::default()).unwrap();
        assert!(text.contains("z=pending"));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = Config::default();
        config.interpreter.arc_segment_length = 0.0;
        assert!(analyze("G1 X1", &config, None).is_err());
    }

    #[test]
    fn test_analyze_file_with_comments() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("part.gcode");
        std::fs::write(&path, SLICED).unwrap();

        let source = load_source(&path).unwrap();
        let sink = Arc::new(CollectingSink::new());
        let analysis = analyze(&source, &Config::default(), Some(sink.clone())).unwrap();

        let heights: Vec<Option<f64>> = analysis.layers.iter().map(|l| l.z).collect();
        assert_eq!(heights, vec![Some(0.2), Some(0.6), Some(0.4)]);
        assert_eq!(analysis.layers[0].movements.len(), 4);

        let diagnostics = sink.diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].line_number, 13);
        assert_eq!(analysis.run.diagnostics, 1);
    }

    #[test]
    fn test_missing_input_file() {
        let dir = TempDir::new().unwrap();
        let err = load_source(&dir.path().join("missing.gcode")).unwrap_err();
        assert!(err.to_string().contains("Failed to read input file"));
    }

    #[test]
    fn test_keeping_comments_turns_them_into_unknown_lines() {
        let mut config = Config::default();
        config.input.strip_comments = false;

        let analysis = analyze(";LAYER:0\nG1 X1 Y1 E1 ; wall", &config, None).unwrap();
        assert_eq!(analysis.layers[0].movements.len(), 1);
        assert_eq!(analysis.run.count(CommandKind::Unknown), 1);
    }

    #[test]
    fn test_json_output_uses_settings_from_file() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("layerscope.toml");
        std::fs::write(
            &config_path,
            "[interpreter]\narc_segment_length = 2.0\n\n[output]\nformat = \"json\"\npretty_json = false\n",
        )
        .unwrap();

        let config = Config::load_from_file(&config_path).unwrap();
        assert_eq!(config.output.format, OutputFormat::Json);

        let analysis = analyze("G1 X10 Y0\nG3 X0 Y10 I-10 J0", &config, None).unwrap();
        assert_eq!(analysis.layers[0].movements.len(), 1 + 8);

        let text = render(&analysis, &config.output).unwrap();
        assert!(!text.contains('\n'));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(1));
    }
}
