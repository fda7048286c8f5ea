use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop the network map pipeline
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("Data file not found: {}", .path.display())]
    DataNotFound { path: PathBuf },

    #[error("Malformed data in {}: {}", .path.display(), .source)]
    MalformedData {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Graph integrity error: {0}")]
    GraphIntegrity(String),

    #[error("I/O error at {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl NetworkError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        NetworkError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, NetworkError>;
