use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Relative directory holding the processed reading dataset
pub const DEFAULT_DATA_DIR: &str = "data/processed";

/// File name of the problem categories document inside the data directory
pub const DATA_FILE_NAME: &str = "problem_categories.json";

/// Relative path of the generated visualization
pub const DEFAULT_OUTPUT: &str = "visualizations/intellectual_network_map.html";

/// Presentation and layout settings for one run.
///
/// Every section falls back to the built-in defaults, so a config file only
/// needs the keys it wants to change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub palette: PaletteConfig,
    pub weights: WeightConfig,
    pub scale: ScaleConfig,
    pub layout: LayoutConfig,
    pub figure: FigureConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    pub default_color: String,
    /// Color attribute carried by bridge author nodes
    pub work_color: String,
    pub work_marker_color: String,
    pub work_outline_color: String,
    pub problem_outline_color: String,
    pub edge_color: String,
    /// Problem name to marker color
    pub problems: BTreeMap<String, String>,
}

fn default_problem_colors() -> BTreeMap<String, String> {
    [
        ("Consciousness", "#FF6B6B"),
        ("Language", "#4ECDC4"),
        ("Violence", "#FF8C42"),
        ("Social Structure", "#95E1D3"),
        ("Aesthetic Experience", "#F38181"),
        ("Self/Subject", "#AA96DA"),
        ("Temporality", "#FCBAD3"),
        ("Place/Space", "#A8D8EA"),
    ]
    .into_iter()
    .map(|(name, color)| (name.to_string(), color.to_string()))
    .collect()
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            default_color: "#CCCCCC".to_string(),
            work_color: "#CCCCCC".to_string(),
            work_marker_color: "#E0E0E0".to_string(),
            work_outline_color: "#999999".to_string(),
            problem_outline_color: "white".to_string(),
            edge_color: "rgba(125,125,125,0.3)".to_string(),
            problems: default_problem_colors(),
        }
    }
}

/// Weights of the links between a bridge author and its problems
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightConfig {
    pub primary_link: f64,
    pub bridge_link: f64,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            primary_link: 3.0,
            bridge_link: 1.0,
        }
    }
}

/// Multipliers turning data values into marker sizes and line widths
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaleConfig {
    pub problem_marker: f64,
    pub work_marker: f64,
    pub line_width: f64,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            problem_marker: 2.0,
            work_marker: 3.0,
            line_width: 0.5,
        }
    }
}

/// Parameters of the spring simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub seed: u64,
    pub iterations: usize,
    /// Optimal distance between nodes; larger values spread the map out.
    /// Zero or less falls back to `1 / sqrt(node count)`.
    pub spread: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            iterations: 50,
            spread: 2.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FigureConfig {
    pub title: String,
    pub caption: String,
    pub height: u32,
    pub background: String,
    pub font_family: String,
    /// Load Plotly.js from this URL instead of drawing the map as inline SVG
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plotly_cdn: Option<String>,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            title: "Intellectual Network Map: Problems, Connections & Key Works".to_string(),
            caption: "Node size = number of books read | Line thickness = connection strength"
                .to_string(),
            height: 800,
            background: "#FAFAFA".to_string(),
            font_family: "Arial, sans-serif".to_string(),
            plotly_cdn: None,
        }
    }
}

impl Config {
    /// Load configuration from an optional TOML file, defaults otherwise
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file at {}", path.display()))?;

        Ok(config)
    }

    /// Path of the data file inside a data directory
    pub fn data_file(data_dir: &Path) -> PathBuf {
        data_dir.join(DATA_FILE_NAME)
    }
}
