//! Inline SVG rendering of the map traces.
//!
//! Draws the same traces a Plotly page would receive, so the document needs
//! no script library: hover text becomes native `<title>` tooltips and the
//! legend entries toggle their trace with a few lines of inline script.

use std::fmt::Write;

use crate::config::FigureConfig;

use super::traces::{PerPoint, ScatterTrace};

/// Width of the drawing in SVG user units; the element scales to its container
pub const WIDTH: f64 = 1200.0;

const MARGIN_LEFT: f64 = 45.0;
const MARGIN_RIGHT: f64 = 45.0;
const MARGIN_TOP: f64 = 120.0;
const MARGIN_BOTTOM: f64 = 80.0;

/// Escape text for use in SVG/HTML content and attribute values
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Maps layout coordinates in `[-1, 1]` onto the plot area
struct Frame {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
}

impl Frame {
    fn new(height: f64) -> Self {
        Self {
            left: MARGIN_LEFT,
            top: MARGIN_TOP,
            width: WIDTH - MARGIN_LEFT - MARGIN_RIGHT,
            height: (height - MARGIN_TOP - MARGIN_BOTTOM).max(1.0),
        }
    }

    fn x(&self, x: f64) -> f64 {
        self.left + (x + 1.0) / 2.0 * self.width
    }

    fn y(&self, y: f64) -> f64 {
        self.top + (1.0 - y) / 2.0 * self.height
    }
}

fn trace_id(index: usize) -> String {
    format!("trace-{index}")
}

fn color_at(color: &PerPoint<String>, i: usize) -> &str {
    match color {
        PerPoint::Single(c) => c.as_str(),
        PerPoint::Each(colors) => colors.get(i).map(String::as_str).unwrap_or(""),
    }
}

/// Consecutive point pairs of a trace, broken at `None` gaps
fn segments(trace: &ScatterTrace) -> Vec<((f64, f64), (f64, f64))> {
    let points: Vec<Option<(f64, f64)>> = trace
        .x
        .iter()
        .zip(&trace.y)
        .map(|(x, y)| (*x).zip(*y))
        .collect();
    points
        .windows(2)
        .filter_map(|pair| Some((pair[0]?, pair[1]?)))
        .collect()
}

fn draw_lines(out: &mut String, trace: &ScatterTrace, frame: &Frame) {
    let Some(line) = &trace.line else {
        return;
    };
    for (from, to) in segments(trace) {
        let _ = writeln!(
            out,
            r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-width="{:.2}" stroke-linecap="round"/>"#,
            frame.x(from.0),
            frame.y(from.1),
            frame.x(to.0),
            frame.y(to.1),
            escape_xml(&line.color),
            line.width,
        );
    }
}

fn draw_markers(out: &mut String, trace: &ScatterTrace, frame: &Frame, config: &FigureConfig) {
    let Some(marker) = &trace.marker else {
        return;
    };
    let font = trace.textfont.as_ref();
    let font_size = font.map_or(12, |f| f.size) as f64;
    let font_color = font.map_or("black", |f| f.color.as_str());
    let font_family = font
        .and_then(|f| f.family.as_deref())
        .unwrap_or(config.font_family.as_str());

    for (i, (x, y)) in trace.x.iter().zip(&trace.y).enumerate() {
        let (Some(x), Some(y)) = (x, y) else {
            continue;
        };
        let (cx, cy) = (frame.x(*x), frame.y(*y));
        let radius = marker.size.get(i).copied().unwrap_or(0.0) / 2.0;

        out.push_str("<g class=\"point\">");
        let _ = write!(
            out,
            r#"<circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="{}" stroke="{}" stroke-width="{:.2}"/>"#,
            cx,
            cy,
            radius,
            escape_xml(color_at(&marker.color, i)),
            escape_xml(&marker.line.color),
            marker.line.width,
        );
        if trace.hoverinfo != "none" {
            if let Some(hover) = trace.hovertext.get(i) {
                let _ = write!(
                    out,
                    "<title>{}</title>",
                    escape_xml(&hover.replace("<br>", "\n"))
                );
            }
        }
        if let Some(label) = trace.text.get(i) {
            let label_y = match trace.textposition {
                Some("bottom center") => cy + radius + font_size + 2.0,
                _ => cy - radius - 4.0,
            };
            let _ = write!(
                out,
                r#"<text x="{:.2}" y="{:.2}" text-anchor="middle" font-size="{}" fill="{}" font-family="{}">{}</text>"#,
                cx,
                label_y,
                font_size,
                escape_xml(font_color),
                escape_xml(font_family),
                escape_xml(label),
            );
        }
        out.push_str("</g>\n");
    }
}

fn draw_legend(out: &mut String, traces: &[&ScatterTrace]) {
    out.push_str("<g class=\"legend\">\n");
    let mut row = 0.0;
    for (index, trace) in traces.iter().enumerate() {
        if trace.showlegend == Some(false) {
            continue;
        }
        let Some(name) = &trace.name else {
            continue;
        };
        let swatch = trace
            .marker
            .as_ref()
            .map(|m| color_at(&m.color, 0))
            .filter(|c| !c.is_empty())
            .unwrap_or("#999999");
        let (x, y) = (WIDTH - 220.0, MARGIN_TOP - 40.0 + row * 20.0);
        let _ = writeln!(
            out,
            r##"<g class="legend-item" data-target="{}"><circle cx="{:.2}" cy="{:.2}" r="6" fill="{}"/><text x="{:.2}" y="{:.2}" font-size="12" fill="#333333">{}</text></g>"##,
            trace_id(index),
            x,
            y,
            escape_xml(swatch),
            x + 12.0,
            y + 4.0,
            escape_xml(name),
        );
        row += 1.0;
    }
    out.push_str("</g>\n");
}

/// Render traces, in drawing order, as one standalone `<svg>` element
pub fn render_svg(traces: &[&ScatterTrace], config: &FigureConfig) -> String {
    let height = f64::from(config.height);
    let frame = Frame::new(height);
    let mut out = String::new();

    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {WIDTH} {height}" width="100%" role="img" aria-label="{}" font-family="{}">"#,
        escape_xml(&config.title),
        escape_xml(&config.font_family),
    );
    let _ = writeln!(
        out,
        r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}"/>"#,
        frame.left,
        frame.top,
        frame.width,
        frame.height,
        escape_xml(&config.background),
    );
    let _ = writeln!(
        out,
        r##"<text x="{:.2}" y="50" text-anchor="middle" font-size="24" fill="#333333">{}</text>"##,
        WIDTH / 2.0,
        escape_xml(&config.title),
    );

    for (index, trace) in traces.iter().enumerate() {
        let _ = writeln!(out, r#"<g class="trace" id="{}">"#, trace_id(index));
        draw_lines(&mut out, trace, &frame);
        draw_markers(&mut out, trace, &frame, config);
        out.push_str("</g>\n");
    }

    draw_legend(&mut out, traces);

    let _ = writeln!(
        out,
        r##"<text x="{:.2}" y="{:.2}" text-anchor="middle" font-size="10" fill="#666666">{}</text>"##,
        WIDTH / 2.0,
        height - MARGIN_BOTTOM / 2.0,
        escape_xml(&config.caption),
    );
    out.push_str("</svg>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viz::traces::{Font, Line, Marker};

    fn markers() -> ScatterTrace {
        ScatterTrace {
            kind: "scatter",
            x: vec![Some(-1.0), Some(1.0)],
            y: vec![Some(1.0), Some(-1.0)],
            mode: "markers+text",
            hoverinfo: "text",
            name: Some("Problems & Friends".to_string()),
            showlegend: None,
            line: None,
            marker: Some(Marker {
                size: vec![20.0, 10.0],
                color: PerPoint::Each(vec!["#FF6B6B".to_string(), "#4ECDC4".to_string()]),
                line: Line {
                    width: 2.0,
                    color: "white".to_string(),
                },
            }),
            text: vec!["A".to_string(), "<B>".to_string()],
            textposition: Some("top center"),
            textfont: Some(Font {
                size: 12,
                color: "black".to_string(),
                family: Some("Arial Black".to_string()),
            }),
            hovertext: vec!["A<br>10 books".to_string(), "B<br>5 books".to_string()],
        }
    }

    fn edge() -> ScatterTrace {
        ScatterTrace {
            kind: "scatter",
            x: vec![Some(-1.0), Some(1.0), None],
            y: vec![Some(-1.0), Some(1.0), None],
            mode: "lines",
            hoverinfo: "none",
            name: None,
            showlegend: Some(false),
            line: Some(Line {
                width: 1.5,
                color: "rgba(125,125,125,0.3)".to_string(),
            }),
            marker: None,
            text: Vec::new(),
            textposition: None,
            textfont: None,
            hovertext: Vec::new(),
        }
    }

    #[test]
    fn test_frame_maps_corners() {
        let frame = Frame::new(800.0);
        assert_eq!(frame.x(-1.0), MARGIN_LEFT);
        assert_eq!(frame.x(1.0), WIDTH - MARGIN_RIGHT);
        assert_eq!(frame.y(1.0), MARGIN_TOP);
        assert_eq!(frame.y(-1.0), 800.0 - MARGIN_BOTTOM);
    }

    #[test]
    fn test_segments_break_at_gaps() {
        let mut trace = edge();
        trace.x.extend([Some(0.0), Some(0.5)]);
        trace.y.extend([Some(0.0), Some(0.5)]);
        assert_eq!(
            segments(&trace),
            vec![((-1.0, -1.0), (1.0, 1.0)), ((0.0, 0.0), (0.5, 0.5))]
        );
    }

    #[test]
    fn test_markers_carry_size_color_and_hover() {
        let config = FigureConfig::default();
        let svg = render_svg(&[&edge(), &markers()], &config);

        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains(r##"r="10.00" fill="#FF6B6B""##));
        assert!(svg.contains(r##"r="5.00" fill="#4ECDC4""##));
        assert!(svg.contains("<title>A\n10 books</title>"));
        assert!(svg.contains("&lt;B&gt;"));
        assert!(svg.contains(r#"stroke-width="1.50""#));
    }

    #[test]
    fn test_edges_have_no_hover_or_legend() {
        let config = FigureConfig::default();
        let svg = render_svg(&[&edge()], &config);
        assert!(svg.contains("<line"));
        assert!(!svg.contains("<title>"));
        assert!(!svg.contains("legend-item"));
    }

    #[test]
    fn test_legend_lists_named_traces() {
        let config = FigureConfig::default();
        let svg = render_svg(&[&edge(), &markers()], &config);
        assert!(svg.contains(r#"data-target="trace-1""#));
        assert!(svg.contains("Problems &amp; Friends"));
    }

    #[test]
    fn test_title_and_caption() {
        let config = FigureConfig::default();
        let svg = render_svg(&[], &config);
        assert!(svg.contains("Problems, Connections &amp; Key Works"));
        assert!(svg.contains(&config.caption));
        assert!(svg.contains(r##"fill="#FAFAFA""##));
    }
}
