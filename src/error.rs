//! Error types for landmass generation

use thiserror::Error;

/// Failures at the file edges; generation itself never fails
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Catalog error: {0}")]
    Catalog(#[from] serde_json::Error),

    #[error("Nothing to export: landmass mesh is empty")]
    EmptyMesh,
}

pub type Result<T> = std::result::Result<T, Error>;
