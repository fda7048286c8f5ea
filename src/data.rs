use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::config::Config;
use crate::error::{NetworkError, Result};

/// Reading statistics for one intellectual problem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemRecord {
    pub estimated_books: u32,
    pub avg_rating: f64,
}

/// A weighted link between two problems
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionRecord {
    pub from: String,
    pub to: String,
    pub strength: f64,
}

/// An author or work whose reading ties several problems together
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeAuthorRecord {
    pub significance: f64,
    pub primary_problem: String,
    pub bridges: Vec<String>,
}

/// The problem categories document as stored on disk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProblemCatalog {
    pub problems: BTreeMap<String, ProblemRecord>,
    pub connections: Vec<ConnectionRecord>,
    pub key_bridge_authors: BTreeMap<String, BridgeAuthorRecord>,
}

/// Load the problem categories document from a data directory
pub fn load_catalog(data_dir: &Path) -> Result<ProblemCatalog> {
    let path = Config::data_file(data_dir);

    let content = fs::read(&path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => NetworkError::DataNotFound { path: path.clone() },
        _ => NetworkError::io(&path, e),
    })?;

    let catalog: ProblemCatalog =
        serde_json::from_slice(&content).map_err(|source| NetworkError::MalformedData {
            path: path.clone(),
            source,
        })?;

    tracing::debug!(
        problems = catalog.problems.len(),
        connections = catalog.connections.len(),
        authors = catalog.key_bridge_authors.len(),
        "Loaded {}",
        path.display()
    );

    Ok(catalog)
}
