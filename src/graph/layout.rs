//! Force-directed placement of the network map.
//!
//! A Fruchterman-Reingold spring model: every pair of nodes repels with
//! `k² / d`, every edge attracts with `weight · d² / k`, and the step size
//! cools linearly over a bounded number of iterations. Start positions come
//! from a seeded RNG and all sums run in node-index order, so the same graph
//! and seed always give the same coordinates, bit for bit.

use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;

use crate::config::LayoutConfig;

use super::builder::NetworkGraph;

/// Closest two nodes are allowed to get when computing forces
const MIN_DISTANCE: f64 = 0.01;

/// A 2D coordinate in layout space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Computed coordinates for every node of a graph
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    positions: BTreeMap<NodeIndex, Position>,
}

impl Layout {
    pub fn get(&self, node: NodeIndex) -> Option<Position> {
        self.positions.get(&node).copied()
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Compute a deterministic spring layout for the graph topology
pub fn spring_layout(network: &NetworkGraph, config: &LayoutConfig) -> Layout {
    let graph = network.graph();
    let n = graph.node_count();
    if n == 0 {
        return Layout::default();
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut pos: Vec<(f64, f64)> = (0..n)
        .map(|_| (rng.gen_range(0.0..1.0), rng.gen_range(0.0..1.0)))
        .collect();

    // A self-loop has no direction to pull in
    let springs: Vec<(usize, usize, f64)> = graph
        .edge_references()
        .filter(|e| e.source() != e.target())
        .map(|e| (e.source().index(), e.target().index(), e.weight().weight()))
        .collect();

    let k = if config.spread > 0.0 {
        config.spread
    } else {
        (1.0 / n as f64).sqrt()
    };

    let mut temperature = initial_temperature(&pos);
    let cooling = temperature / (config.iterations as f64 + 1.0);

    for _ in 0..config.iterations {
        let mut disp = vec![(0.0_f64, 0.0_f64); n];

        for i in 0..n {
            for j in (i + 1)..n {
                let dx = pos[i].0 - pos[j].0;
                let dy = pos[i].1 - pos[j].1;
                let dist = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);
                let force = k * k / (dist * dist);
                disp[i].0 += dx * force;
                disp[i].1 += dy * force;
                disp[j].0 -= dx * force;
                disp[j].1 -= dy * force;
            }
        }

        for &(a, b, weight) in &springs {
            let dx = pos[a].0 - pos[b].0;
            let dy = pos[a].1 - pos[b].1;
            let dist = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);
            let force = weight * dist / k;
            disp[a].0 -= dx * force;
            disp[a].1 -= dy * force;
            disp[b].0 += dx * force;
            disp[b].1 += dy * force;
        }

        // Each node moves `temperature` along its net force
        for (p, (dx, dy)) in pos.iter_mut().zip(disp) {
            let length = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);
            p.0 += dx * temperature / length;
            p.1 += dy * temperature / length;
        }

        temperature -= cooling;
    }

    tracing::debug!(
        nodes = n,
        springs = springs.len(),
        iterations = config.iterations,
        seed = config.seed,
        "Computed spring layout"
    );

    rescale(&pos)
}

/// A tenth of the wider side of the start positions' bounding box
fn initial_temperature(pos: &[(f64, f64)]) -> f64 {
    let span = |values: &mut dyn Iterator<Item = f64>| {
        let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        max - min
    };
    let width = span(&mut pos.iter().map(|p| p.0));
    let height = span(&mut pos.iter().map(|p| p.1));
    width.max(height).max(MIN_DISTANCE) * 0.1
}

/// Center positions on their centroid and scale the largest offset to 1
fn rescale(pos: &[(f64, f64)]) -> Layout {
    if pos.is_empty() {
        return Layout::default();
    }

    let n = pos.len() as f64;
    let cx = pos.iter().map(|p| p.0).sum::<f64>() / n;
    let cy = pos.iter().map(|p| p.1).sum::<f64>() / n;

    let radius = pos
        .iter()
        .map(|(x, y)| (x - cx).abs().max((y - cy).abs()))
        .fold(0.0_f64, f64::max);
    let factor = if radius > 0.0 { 1.0 / radius } else { 0.0 };

    let positions = pos
        .iter()
        .enumerate()
        .map(|(i, (x, y))| {
            (
                NodeIndex::new(i),
                Position {
                    x: (x - cx) * factor,
                    y: (y - cy) * factor,
                },
            )
        })
        .collect();

    Layout { positions }
}
