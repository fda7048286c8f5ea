use anyhow::{Context, Result};
use console::{Emoji, style};
use std::path::Path;

use crate::cli::Cli;
use crate::config::Config;
use crate::data::load_catalog;
use crate::graph::{build_graph, spring_layout};
use crate::viz::{assemble, render_traces, write_html};

static BOOKS: Emoji<'_, '_> = Emoji("📚 ", "");
static GRAPH: Emoji<'_, '_> = Emoji("🔗 ", "");
static PAINT: Emoji<'_, '_> = Emoji("🎨 ", "");
static CHECK: Emoji<'_, '_> = Emoji("✓ ", "[OK] ");

/// Load the dataset, build the graph, lay it out and write the HTML map
pub fn run(args: &Cli) -> Result<()> {
    let mut config = Config::load(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        config.layout.seed = seed;
    }
    match &args.config {
        Some(path) => tracing::info!("Using settings from {}", path.display()),
        None => tracing::info!("Using built-in settings"),
    }

    println!("{}Loading data...", BOOKS);
    let catalog = load_catalog(&args.data_dir).context("Failed to load problem categories")?;

    println!("{}Building graph...", GRAPH);
    let graph = build_graph(&catalog, &config).context("Failed to build network graph")?;

    println!("{}Creating visualization...", PAINT);
    let layout = spring_layout(&graph, &config.layout);
    let traces = render_traces(&graph, &layout, &config);
    let figure = assemble(&traces, &config.figure);
    let output_path = write_html(&figure, &config.figure, &args.output)
        .context("Failed to save visualization")?;

    println!();
    println!(
        "{}{}",
        CHECK,
        style("Network visualization created successfully!")
            .green()
            .bold()
    );
    println!(
        "  Nodes: {} intellectual problems",
        style(graph.problem_count()).green().bold()
    );
    println!("  Bridge authors: {}", style(graph.work_count()).green().bold());
    println!("  Connections: {}", style(graph.edge_count()).green().bold());
    println!(
        "  Saved to: {}",
        style(output_path.display()).cyan().underlined()
    );

    if args.open {
        open_in_browser(&output_path);
    }

    Ok(())
}

/// Best-effort launch of the default browser
fn open_in_browser(path: &Path) {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(path).spawn().ok();
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(path).spawn().ok();
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", path.to_str().unwrap_or("")])
            .spawn()
            .ok();
    }

    tracing::debug!("Requested browser for {}", path.display());
}
