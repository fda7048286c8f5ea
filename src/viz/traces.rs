use petgraph::visit::EdgeRef;
use serde::Serialize;

use crate::config::Config;
use crate::graph::builder::{NetworkGraph, NetworkNode};
use crate::graph::layout::{Layout, Position};
use crate::graph::palette;

pub const PROBLEM_TRACE_NAME: &str = "Intellectual Problems";
pub const WORK_TRACE_NAME: &str = "Key Authors/Works";

/// One or many values for a per-point trace attribute
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PerPoint<T> {
    Single(T),
    Each(Vec<T>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Line {
    pub width: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Font {
    pub size: u32,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub size: Vec<f64>,
    pub color: PerPoint<String>,
    pub line: Line,
}

/// A Plotly scatter trace
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterTrace {
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// `None` breaks the line between segments
    pub x: Vec<Option<f64>>,
    pub y: Vec<Option<f64>>,
    pub mode: &'static str,
    pub hoverinfo: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showlegend: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<Line>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub text: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub textposition: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub textfont: Option<Font>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hovertext: Vec<String>,
}

impl ScatterTrace {
    fn new(mode: &'static str, hoverinfo: &'static str) -> Self {
        Self {
            kind: "scatter",
            x: Vec::new(),
            y: Vec::new(),
            mode,
            hoverinfo,
            name: None,
            showlegend: None,
            line: None,
            marker: None,
            text: Vec::new(),
            textposition: None,
            textfont: None,
            hovertext: Vec::new(),
        }
    }

    fn push_point(&mut self, pos: Position) {
        self.x.push(Some(pos.x));
        self.y.push(Some(pos.y));
    }
}

/// All drawable primitives of the map, in drawing order
#[derive(Debug, Clone, PartialEq)]
pub struct MapTraces {
    pub edges: Vec<ScatterTrace>,
    pub problems: ScatterTrace,
    pub works: ScatterTrace,
}

impl MapTraces {
    /// Edges first so that lines never cover the markers
    pub fn in_draw_order(&self) -> Vec<&ScatterTrace> {
        self.edges
            .iter()
            .chain([&self.problems, &self.works])
            .collect()
    }
}

/// Render every edge and node of the graph at its layout position
pub fn render_traces(network: &NetworkGraph, layout: &Layout, config: &Config) -> MapTraces {
    MapTraces {
        edges: edge_traces(network, layout, config),
        problems: problem_trace(network, layout, config),
        works: work_trace(network, layout, config),
    }
}

fn position(layout: &Layout, node: petgraph::graph::NodeIndex) -> Position {
    layout.get(node).unwrap_or(Position { x: 0.0, y: 0.0 })
}

/// One line segment per edge, thickness proportional to weight
pub fn edge_traces(network: &NetworkGraph, layout: &Layout, config: &Config) -> Vec<ScatterTrace> {
    network
        .graph()
        .edge_references()
        .map(|edge| {
            let from = position(layout, edge.source());
            let to = position(layout, edge.target());

            let mut trace = ScatterTrace::new("lines", "none");
            trace.x = vec![Some(from.x), Some(to.x), None];
            trace.y = vec![Some(from.y), Some(to.y), None];
            trace.line = Some(Line {
                width: palette::line_width(&config.scale, edge.weight().weight()),
                color: config.palette.edge_color.clone(),
            });
            trace.showlegend = Some(false);
            trace
        })
        .collect()
}

/// Ratings keep one decimal even when whole, e.g. `3.0`
fn format_rating(rating: f64) -> String {
    if rating.fract() == 0.0 && rating.is_finite() {
        format!("{:.1}", rating)
    } else {
        format!("{}", rating)
    }
}

/// Aggregated markers for all problem nodes
pub fn problem_trace(network: &NetworkGraph, layout: &Layout, config: &Config) -> ScatterTrace {
    let mut trace = ScatterTrace::new("markers+text", "text");
    let mut sizes = Vec::new();
    let mut colors = Vec::new();

    let graph = network.graph();
    for idx in graph.node_indices() {
        let NetworkNode::Problem(problem) = &graph[idx] else {
            continue;
        };
        trace.push_point(position(layout, idx));
        trace.text.push(problem.name.clone());
        trace.hovertext.push(format!(
            "{}<br>{} books<br>Avg rating: {}",
            problem.name,
            problem.books,
            format_rating(problem.avg_rating)
        ));
        sizes.push(palette::problem_marker_size(&config.scale, problem.books));
        colors.push(problem.color.clone());
    }

    trace.name = Some(PROBLEM_TRACE_NAME.to_string());
    trace.textposition = Some("top center");
    trace.textfont = Some(Font {
        size: 12,
        color: "black".to_string(),
        family: Some("Arial Black".to_string()),
    });
    trace.marker = Some(Marker {
        size: sizes,
        color: PerPoint::Each(colors),
        line: Line {
            width: 2.0,
            color: config.palette.problem_outline_color.clone(),
        },
    });
    trace
}

/// Aggregated markers for all bridge author nodes
pub fn work_trace(network: &NetworkGraph, layout: &Layout, config: &Config) -> ScatterTrace {
    let mut trace = ScatterTrace::new("markers+text", "text");
    let mut sizes = Vec::new();

    let graph = network.graph();
    for idx in graph.node_indices() {
        let NetworkNode::Work(work) = &graph[idx] else {
            continue;
        };
        trace.push_point(position(layout, idx));
        trace.text.push(work.name.clone());
        trace.hovertext.push(work.name.clone());
        sizes.push(palette::work_marker_size(&config.scale, work.significance));
    }

    trace.name = Some(WORK_TRACE_NAME.to_string());
    trace.textposition = Some("bottom center");
    trace.textfont = Some(Font {
        size: 9,
        color: "#666666".to_string(),
        family: None,
    });
    trace.marker = Some(Marker {
        size: sizes,
        color: PerPoint::Single(config.palette.work_marker_color.clone()),
        line: Line {
            width: 1.0,
            color: config.palette.work_outline_color.clone(),
        },
    });
    trace
}
