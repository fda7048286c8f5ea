use crate::config::{PaletteConfig, ScaleConfig};

/// Resolve the display color of a problem, falling back to the default gray
pub fn problem_color<'a>(palette: &'a PaletteConfig, problem: &str) -> &'a str {
    palette
        .problems
        .get(problem)
        .map(String::as_str)
        .unwrap_or(palette.default_color.as_str())
}

/// Marker size of a problem node, linear in the number of books
pub fn problem_marker_size(scale: &ScaleConfig, books: u32) -> f64 {
    f64::from(books) * scale.problem_marker
}

/// Marker size of a bridge author node, linear in its significance
pub fn work_marker_size(scale: &ScaleConfig, significance: f64) -> f64 {
    significance * scale.work_marker
}

/// Line thickness of an edge, linear in its weight
pub fn line_width(scale: &ScaleConfig, weight: f64) -> f64 {
    weight * scale.line_width
}
