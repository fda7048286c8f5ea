use serde_json::{Value, json};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::config::FigureConfig;
use crate::error::{NetworkError, Result};

use super::svg::{escape_xml, render_svg};
use super::traces::{MapTraces, ScatterTrace};

const PLOT_DIV_ID: &str = "network-map";

/// A complete chart: traces in drawing order plus the page layout
#[derive(Debug, Clone)]
pub struct Figure {
    pub data: Vec<ScatterTrace>,
    pub layout: Value,
}

/// Compose the map traces into one styled figure with its caption
pub fn assemble(traces: &MapTraces, config: &FigureConfig) -> Figure {
    let data = traces.in_draw_order().into_iter().cloned().collect();

    let hidden_axis = json!({
        "showgrid": false,
        "zeroline": false,
        "showticklabels": false,
    });

    let layout = json!({
        "title": {
            "text": config.title,
            "x": 0.5,
            "xanchor": "center",
            "font": { "size": 24, "color": "#333333" },
        },
        "showlegend": true,
        "hovermode": "closest",
        "margin": { "b": 20, "l": 5, "r": 5, "t": 80 },
        "xaxis": hidden_axis,
        "yaxis": hidden_axis,
        "plot_bgcolor": config.background,
        "height": config.height,
        "font": { "family": config.font_family },
        "annotations": [{
            "text": config.caption,
            "xref": "paper",
            "yref": "paper",
            "x": 0.5,
            "y": -0.05,
            "showarrow": false,
            "font": { "size": 10, "color": "#666666" },
        }],
    });

    Figure { data, layout }
}

/// Serialize a value for inclusion inside a `<script>` element.
///
/// Every `<` is written as `\u003c`, so no string in the data can open or
/// close a tag inside the script.
fn script_json<T: serde::Serialize>(value: &T) -> serde_json::Result<String> {
    Ok(serde_json::to_string(value)?.replace('<', "\\u003c"))
}

const LEGEND_TOGGLE_JS: &str = r#"document.querySelectorAll('#network-map .legend-item').forEach(function (item) {
            item.addEventListener('click', function () {
                var trace = document.getElementById(item.dataset.target);
                var hidden = trace.style.display === 'none';
                trace.style.display = hidden ? '' : 'none';
                item.style.opacity = hidden ? 1 : 0.4;
            });
        });"#;

impl Figure {
    /// Render the figure as an HTML document.
    ///
    /// Without `plotly_cdn` the map is drawn as inline SVG and the document
    /// has no external resources. With it, the traces are handed to Plotly.js
    /// loaded from that URL.
    pub fn to_html(&self, config: &FigureConfig) -> serde_json::Result<String> {
        match &config.plotly_cdn {
            Some(cdn) => self.to_plotly_html(config, cdn),
            None => Ok(self.to_standalone_html(config)),
        }
    }

    fn to_standalone_html(&self, config: &FigureConfig) -> String {
        let traces: Vec<&ScatterTrace> = self.data.iter().collect();
        format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>{title}</title>
    <style>
        body {{ margin: 0; font-family: {font}; background: #ffffff; }}
        #{div} {{ width: 100%; }}
        #{div} .legend-item {{ cursor: pointer; }}
        #{div} .point:hover circle {{ opacity: 0.8; }}
    </style>
</head>
<body>
    <div id="{div}" class="network-map">
{svg}
    </div>
    <script>
        {toggle}
    </script>
</body>
</html>
"#,
            title = escape_xml(&config.title),
            font = escape_xml(&config.font_family),
            div = PLOT_DIV_ID,
            svg = render_svg(&traces, config),
            toggle = LEGEND_TOGGLE_JS,
        )
    }

    fn to_plotly_html(&self, config: &FigureConfig, cdn: &str) -> serde_json::Result<String> {
        let html = format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>{title}</title>
    <script src="{cdn}" charset="utf-8"></script>
    <style>
        body {{ margin: 0; font-family: {font}; background: #ffffff; }}
        #{div} {{ width: 100%; height: {height}px; }}
    </style>
</head>
<body>
    <div id="{div}" class="plotly-graph-div"></div>
    <script>
        const traces = {data};
        const layout = {layout};
        Plotly.newPlot('{div}', traces, layout, {{ responsive: true }});
    </script>
</body>
</html>
"#,
            title = escape_xml(&config.title),
            cdn = escape_xml(cdn),
            font = escape_xml(&config.font_family),
            div = PLOT_DIV_ID,
            height = config.height,
            data = script_json(&self.data)?,
            layout = script_json(&self.layout)?,
        );
        Ok(html)
    }
}

/// Write the figure to `output`, creating the parent directory if needed.
///
/// The document goes to a temporary file beside the target first and is
/// renamed into place, so a failed run leaves no partial file. Returns the
/// absolute path of the written file.
pub fn write_html(figure: &Figure, config: &FigureConfig, output: &Path) -> Result<PathBuf> {
    let html = figure.to_html(config).map_err(|e| {
        NetworkError::io(output, std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })?;

    let parent = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent).map_err(|e| NetworkError::io(&parent, e))?;

    let mut file = NamedTempFile::new_in(&parent).map_err(|e| NetworkError::io(&parent, e))?;
    file.write_all(html.as_bytes())
        .map_err(|e| NetworkError::io(file.path(), e))?;
    file.persist(output)
        .map_err(|e| NetworkError::io(output, e.error))?;

    let resolved = fs::canonicalize(output).map_err(|e| NetworkError::io(output, e))?;
    tracing::info!(bytes = html.len(), "Wrote {}", resolved.display());
    Ok(resolved)
}
