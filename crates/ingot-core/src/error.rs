use std::path::PathBuf;
use thiserror::Error;

use crate::dependency_graph::CycleError;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Failed to read {}: {source}", .path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to scan {}: {source}", .path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("No .{extension} files found under {roots:?}")]
    EmptyFileSet {
        extension: String,
        roots: Vec<PathBuf>,
    },

    #[error("Duplicate file name {name:?}: found at {} and {}", .first.display(), .second.display())]
    DuplicateFileName {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error(transparent)]
    Cycle(#[from] CycleError),
}
