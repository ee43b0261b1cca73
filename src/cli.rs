// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "folio-scene")]
#[command(about = "Scroll-driven 3D portfolio scene", long_about = None)]
pub struct Cli {
    /// JSON scene configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory holding the scene images
    #[arg(long)]
    pub assets: Option<PathBuf>,

    /// Seed for star placement (random when omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Open a borderless fullscreen window
    #[arg(long, default_value = "false")]
    pub fullscreen: bool,

    /// Hide the grid and light helpers
    #[arg(long = "no-helpers", default_value = "false")]
    pub no_helpers: bool,
}
