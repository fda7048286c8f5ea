use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;

use crate::config::Config;
use crate::data::{BridgeAuthorRecord, ConnectionRecord, ProblemCatalog, ProblemRecord};
use crate::error::{NetworkError, Result};

use super::palette;

/// An intellectual problem node
#[derive(Debug, Clone, PartialEq)]
pub struct ProblemNode {
    pub name: String,
    pub books: u32,
    pub avg_rating: f64,
    pub color: String,
}

/// A bridge author (or work) node
#[derive(Debug, Clone, PartialEq)]
pub struct WorkNode {
    pub name: String,
    pub significance: f64,
    pub color: String,
}

/// A node in the network map
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkNode {
    Problem(ProblemNode),
    Work(WorkNode),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Problem,
    Work,
}

impl NetworkNode {
    pub fn name(&self) -> &str {
        match self {
            NetworkNode::Problem(p) => &p.name,
            NetworkNode::Work(w) => &w.name,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            NetworkNode::Problem(_) => NodeKind::Problem,
            NetworkNode::Work(_) => NodeKind::Work,
        }
    }
}

/// Which problem an author link points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Primary,
    Bridge,
}

/// An edge in the network map
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkEdge {
    /// Problem to problem, weighted by conceptual overlap
    Connection { strength: f64 },
    /// Bridge author to problem
    AuthorLink { kind: LinkKind, weight: f64 },
}

impl NetworkEdge {
    pub fn weight(&self) -> f64 {
        match self {
            NetworkEdge::Connection { strength } => *strength,
            NetworkEdge::AuthorLink { weight, .. } => *weight,
        }
    }
}

/// The fully built, read-only network of problems and bridge authors
#[derive(Debug, Clone)]
pub struct NetworkGraph {
    graph: UnGraph<NetworkNode, NetworkEdge>,
    node_indices: HashMap<String, NodeIndex>,
}

impl NetworkGraph {
    /// The underlying petgraph graph
    pub fn graph(&self) -> &UnGraph<NetworkNode, NetworkEdge> {
        &self.graph
    }

    #[allow(dead_code)]
    pub fn index_of(&self, name: &str) -> Option<NodeIndex> {
        self.node_indices.get(name).copied()
    }

    #[allow(dead_code)]
    pub fn node(&self, name: &str) -> Option<&NetworkNode> {
        self.index_of(name).map(|idx| &self.graph[idx])
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn problem_count(&self) -> usize {
        self.count_kind(NodeKind::Problem)
    }

    pub fn work_count(&self) -> usize {
        self.count_kind(NodeKind::Work)
    }

    fn count_kind(&self, kind: NodeKind) -> usize {
        self.graph
            .node_weights()
            .filter(|node| node.kind() == kind)
            .count()
    }

    /// The edge joining two named nodes, in either orientation
    #[allow(dead_code)]
    pub fn edge_between(&self, a: &str, b: &str) -> Option<&NetworkEdge> {
        let (a, b) = (self.index_of(a)?, self.index_of(b)?);
        self.graph.find_edge(a, b).map(|e| &self.graph[e])
    }

    /// All edges touching a named node
    #[allow(dead_code)]
    pub fn edges_of(&self, name: &str) -> Vec<&NetworkEdge> {
        match self.index_of(name) {
            Some(idx) => self.graph.edges(idx).map(|e| e.weight()).collect(),
            None => Vec::new(),
        }
    }
}

/// Builder for the network map graph.
///
/// Every edge endpoint must be declared as a problem first; a reference to an
/// unknown name is a [`NetworkError::GraphIntegrity`] instead of a new node.
pub struct GraphBuilder<'a> {
    config: &'a Config,
    /// Map from node name to node index
    node_indices: HashMap<String, NodeIndex>,
    graph: UnGraph<NetworkNode, NetworkEdge>,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            node_indices: HashMap::new(),
            graph: UnGraph::new_undirected(),
        }
    }

    fn insert_node(&mut self, node: NetworkNode) -> Result<NodeIndex> {
        if self.node_indices.contains_key(node.name()) {
            return Err(NetworkError::GraphIntegrity(format!(
                "duplicate node name '{}'",
                node.name()
            )));
        }
        let name = node.name().to_string();
        let index = self.graph.add_node(node);
        self.node_indices.insert(name, index);
        Ok(index)
    }

    /// Look up a declared problem node by name
    fn problem_index(&self, name: &str, referenced_by: &str) -> Result<NodeIndex> {
        match self.node_indices.get(name) {
            Some(&idx) if self.graph[idx].kind() == NodeKind::Problem => Ok(idx),
            Some(_) => Err(NetworkError::GraphIntegrity(format!(
                "{referenced_by} links to '{name}', which is not a problem"
            ))),
            None => Err(NetworkError::GraphIntegrity(format!(
                "{referenced_by} references undeclared problem '{name}'"
            ))),
        }
    }

    /// Add a problem node
    pub fn add_problem(&mut self, name: &str, record: &ProblemRecord) -> Result<NodeIndex> {
        let color = palette::problem_color(&self.config.palette, name).to_string();
        self.insert_node(NetworkNode::Problem(ProblemNode {
            name: name.to_string(),
            books: record.estimated_books,
            avg_rating: record.avg_rating,
            color,
        }))
    }

    /// Add a connection between two declared problems.
    ///
    /// Repeating a pair, in either orientation, replaces the earlier strength.
    pub fn add_connection(&mut self, connection: &ConnectionRecord) -> Result<()> {
        let context = format!("connection '{}' - '{}'", connection.from, connection.to);
        let from = self.problem_index(&connection.from, &context)?;
        let to = self.problem_index(&connection.to, &context)?;

        if from == to {
            tracing::warn!("Self-loop connection on '{}'", connection.from);
        }

        self.graph.update_edge(
            from,
            to,
            NetworkEdge::Connection {
                strength: connection.strength,
            },
        );
        Ok(())
    }

    /// Add a bridge author with its primary link and one link per bridged problem
    pub fn add_bridge_author(&mut self, name: &str, record: &BridgeAuthorRecord) -> Result<()> {
        let context = format!("bridge author '{name}'");
        let primary = self.problem_index(&record.primary_problem, &context)?;
        let bridges = record
            .bridges
            .iter()
            .map(|bridge| {
                if *bridge == record.primary_problem {
                    return Err(NetworkError::GraphIntegrity(format!(
                        "{context} lists its primary problem '{bridge}' as a bridge"
                    )));
                }
                self.problem_index(bridge, &context)
            })
            .collect::<Result<Vec<_>>>()?;

        let author = self.insert_node(NetworkNode::Work(WorkNode {
            name: name.to_string(),
            significance: record.significance,
            color: self.config.palette.work_color.clone(),
        }))?;

        self.graph.update_edge(
            author,
            primary,
            NetworkEdge::AuthorLink {
                kind: LinkKind::Primary,
                weight: self.config.weights.primary_link,
            },
        );
        for bridge in bridges {
            self.graph.update_edge(
                author,
                bridge,
                NetworkEdge::AuthorLink {
                    kind: LinkKind::Bridge,
                    weight: self.config.weights.bridge_link,
                },
            );
        }
        Ok(())
    }

    /// Build and return the final graph
    pub fn build(self) -> NetworkGraph {
        NetworkGraph {
            graph: self.graph,
            node_indices: self.node_indices,
        }
    }
}

/// Build the network map graph from a loaded catalog
pub fn build_graph(catalog: &ProblemCatalog, config: &Config) -> Result<NetworkGraph> {
    let mut builder = GraphBuilder::new(config);

    for (name, record) in &catalog.problems {
        builder.add_problem(name, record)?;
    }
    for connection in &catalog.connections {
        builder.add_connection(connection)?;
    }
    for (name, record) in &catalog.key_bridge_authors {
        builder.add_bridge_author(name, record)?;
    }

    let graph = builder.build();
    tracing::debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "Built network graph"
    );
    Ok(graph)
}
