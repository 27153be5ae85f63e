//! Error types for the concept tree editor

use crate::path::ConceptPath;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Empty concept path")]
    EmptyPath,

    #[error("No concept at path {path}")]
    PathNotFound { path: ConceptPath },

    #[error("Concept at path {path} has no children")]
    NoChildren { path: ConceptPath },

    #[error("Invalid concept path: {0}")]
    InvalidPath(String),

    #[error("Unknown concept field '{0}' (expected code | display | definition)")]
    UnknownField(String),

    #[error("CodeSystem failed validation: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("CodeSystem not found: {0}")]
    NotFound(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Model error: {0}")]
    Model(#[from] termadmin_models::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
