//! Error types for mdimport operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors reported to the caller of an import.
///
/// Resolution failures are never retried here; the caller decides whether
/// to try again (typically after the user has clicked into the draft).
#[derive(Error, Debug)]
pub enum Error {
    #[error("Markdown file is empty.")]
    EmptyInput,

    /// `editables` counts every node matching the editable selector group,
    /// hidden ones included.
    #[error(
        "Could not find a title editor on the page (editable nodes: {editables}). Click into the draft once and retry."
    )]
    NoTitleTarget { editables: usize },

    #[error(
        "Could not find a body editor on the page (editable nodes: {editables}). Click into the body once and retry."
    )]
    NoBodyTarget { editables: usize },

    #[error(
        "Editor detection conflict: title and body are the same node. Click into the body once and retry."
    )]
    TargetConflict,

    #[error("Unsupported source {0}: expected a .md, text/markdown or text/plain file")]
    UnsupportedSource(String),

    #[error("Failed to read config file at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid page snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
