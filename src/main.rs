use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use layerscope::{analyze, init_logging, load_source, render, BUILD_DATE, VERSION};
use layerscope_settings::{Config, OutputFormat};
use tracing::{debug, info};

/// Interpret 3D-printer G-code into per-layer toolpath geometry
#[derive(Parser, Debug)]
#[command(name = "layerscope")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Input G-code file
    input: PathBuf,

    /// Configuration file (.toml or .json); defaults to the platform config location
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Target length of one arc sub-segment
    #[arg(short = 's', long)]
    segment_length: Option<f64>,

    /// Output format: summary or json
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// Pass comments through to the interpreter instead of stripping them
    #[arg(long)]
    keep_comments: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => match Config::default_path() {
            Ok(path) => Config::load_or_default(&path)
                .with_context(|| format!("Failed to load config: {}", path.display()))?,
            Err(e) => {
                debug!("Using default configuration: {}", e);
                Config::default()
            }
        },
    };

    if let Some(length) = cli.segment_length {
        config.interpreter.arc_segment_length = length;
    }
    if let Some(format) = cli.format {
        config.output.format = format;
    }
    if cli.keep_comments {
        config.input.strip_comments = false;
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;
    debug!("layerscope {} (built {})", VERSION, BUILD_DATE);

    let config = load_config(&cli)?;
    let source = load_source(&cli.input)?;
    info!("Interpreting {}", cli.input.display());

    let analysis = analyze(&source, &config, None)?;
    println!("{}", render(&analysis, &config.output)?.trim_end());

    Ok(())
}
