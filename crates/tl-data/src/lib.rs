//! Project storage for the timeline
//!
//! A project is a folder holding a `data.json` document with the project's
//! characters, places and events, next to a `pictures` folder for image
//! references. The layout engine never reads files itself; this crate loads
//! the entity lists it consumes and writes drag results back.

pub mod project;
pub mod workspace;

use thiserror::Error;

// Re-exports
pub use project::{ProjectDocument, ProjectStore};
pub use workspace::ProjectsRoot;

/// Errors that can occur in data operations
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{kind} name is required")]
    MissingName { kind: &'static str },

    #[error("{kind} '{name}' already exists")]
    Duplicate { kind: &'static str, name: String },

    #[error("no event with index {0}")]
    UnknownEvent(usize),

    #[error("project '{0}' not found")]
    ProjectNotFound(String),

    #[error("project '{0}' already exists")]
    ProjectExists(String),

    #[error("store has no file to save to")]
    NoPath,
}

pub type DataResult<T> = Result<T, DataError>;
