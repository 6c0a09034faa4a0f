//! Error types for the part viewer

use std::path::PathBuf;
use thiserror::Error;

/// Result type for viewer operations
pub type ViewerResult<T> = Result<T, ViewerError>;

/// Errors that can occur while editing the part tree or driving the renderers
#[derive(Error, Debug)]
pub enum ViewerError {
    /// Tree-structure misuse: unknown node, re-parenting, cycles, removing the root
    #[error("Invalid node: {0}")]
    InvalidNode(String),

    /// Geometry loader failure
    #[error("Failed to load {path:?}: {reason}")]
    Load { path: PathBuf, reason: String },

    /// Illegal call against the VR worker state machine
    #[error("VR worker state error: {0}")]
    WorkerState(String),
}

impl ViewerError {
    pub fn load(path: impl Into<PathBuf>, err: &anyhow::Error) -> Self {
        ViewerError::Load {
            path: path.into(),
            // {:#} keeps the whole context chain on one line
            reason: format!("{:#}", err),
        }
    }
}
