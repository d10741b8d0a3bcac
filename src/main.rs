use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use std::path::PathBuf;
use tracing::info;

mod color;
mod config;
mod curve;
mod display;
mod error;
mod render;
mod viewer;

use color::RgbColor;
use config::Config;
use curve::CurveFamily;
use display::DisplayMode;
use render::ViewMode;

#[derive(Parser, Debug)]
#[command(name = "rosette")]
#[command(author, version, about = "Rose curve and limacon trisectrix visualizer")]
pub struct Args {
    /// Output mode: terminal or csv
    #[arg(short, long)]
    mode: Option<DisplayMode>,

    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Curve family
    #[arg(long)]
    family: Option<CurveFamily>,

    /// Numerator of the frequency ratio k = n / d
    #[arg(short = 'n', long = "numerator")]
    n: Option<u32>,

    /// Denominator of the frequency ratio k = n / d
    #[arg(short = 'd', long = "denominator")]
    d: Option<u32>,

    /// Angular sampling step in radians
    #[arg(long)]
    step: Option<f64>,

    /// Projection: 2d, or 3d with the angle as depth
    #[arg(long)]
    view: Option<ViewMode>,

    /// Point diameter in braille dots (1.0-5.0)
    #[arg(long)]
    point_size: Option<f32>,

    /// Point color (#RRGGBB or a preset name)
    #[arg(long)]
    color: Option<RgbColor>,

    /// Background color (#RRGGBB or a preset name)
    #[arg(long)]
    background_color: Option<RgbColor>,

    /// Plot width in braille dots (100-1000)
    #[arg(long)]
    width: Option<u16>,

    /// Plot height in braille dots (100-1000)
    #[arg(long)]
    height: Option<u16>,

    /// Write csv output to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write a commented default config file and exit
    #[arg(long)]
    init_config: bool,

    /// Print shell completions and exit
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("rosette=warn".parse()?),
        )
        .init();

    let args = Args::parse();

    if let Some(shell) = args.completions {
        clap_complete::generate(shell, &mut Args::command(), "rosette", &mut std::io::stdout());
        return Ok(());
    }

    if args.init_config {
        let path = Config::init_default_config()?;
        println!("Wrote default config to {}", path.display());
        return Ok(());
    }

    // Load or create config
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load_from_default_path().unwrap_or_default(),
    };
    config.merge_args(&args);
    config.validate().context("Invalid configuration")?;

    info!("Starting rosette in {:?} mode", config.display.mode);

    match config.display.mode {
        DisplayMode::Terminal => display::terminal::run(config, args.config.clone())?,
        DisplayMode::Csv => display::csv::run(&config, args.output.as_deref())?,
    }

    Ok(())
}
