pub mod commands;

use std::path::PathBuf;

use clap::Parser;

use crate::config::{DEFAULT_DATA_DIR, DEFAULT_OUTPUT};

#[derive(Parser, Debug)]
#[command(name = "network-map")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Render an interactive network map of intellectual problems and bridge authors",
    long_about = "Render an interactive network map of intellectual problems and bridge authors.\n\n\
        Reads data/processed/problem_categories.json, lays the problems, their\n\
        connections and the bridge authors out with a seeded spring layout and\n\
        writes visualizations/intellectual_network_map.html. Both paths are\n\
        relative to the current directory unless overridden."
)]
pub struct Cli {
    /// Directory containing problem_categories.json
    #[arg(long, default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Output HTML file
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Layout seed (overrides the config file)
    #[arg(long)]
    pub seed: Option<u64>,

    /// TOML file overriding colors, weights, scales and layout parameters
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Open the generated map in the default browser
    #[arg(long, default_value = "false")]
    pub open: bool,
}
