use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser};
use tiled_bake::{LayerNames, MapImageBuilder};

/// Generate a PNG that can be used as an SGDK MAP resource.
#[derive(Parser, Debug)]
#[command(name = "tiled-bake", version, disable_help_flag = true)]
struct Cli {
    /// Path to the input Tiled file (.json, .tmj, .tmx, .xml)
    map: PathBuf,
    /// Path to the tileset image (indexed PNG)
    tileset: PathBuf,
    /// Path to the output image
    output: PathBuf,
    /// Lo priority layer name
    #[arg(short = 'l', long, default_value = "LO")]
    lo_layer_name: String,
    /// Hi priority layer name
    #[arg(short = 'h', long, default_value = "HI")]
    hi_layer_name: String,
    /// Overwrite the output file if it exists
    #[arg(short, long)]
    force: bool,
    /// Print detailed progress information
    #[arg(short, long)]
    verbose: bool,
    /// Print help
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if !cli.force && cli.output.exists() {
        bail!(
            "Output file exists: {}. Use --force to overwrite.",
            cli.output.display()
        );
    }
    if let Some(parent) = cli.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Creating output directory {}", parent.display()))?;
    }

    log::info!("Reading from: {}", cli.map.display());
    let builder = MapImageBuilder::open(
        &cli.map,
        &cli.tileset,
        LayerNames::new(cli.lo_layer_name, cli.hi_layer_name),
    )
    .with_context(|| format!("Loading {}", cli.map.display()))?;
    log::debug!("{}", builder.map());

    builder
        .save(&cli.output)
        .with_context(|| format!("Writing {}", cli.output.display()))?;
    Ok(())
}
