//! Core engine for amalgamating a C/C++ source tree into single-file
//! distribution artifacts

pub mod assembly;
pub mod dependency_graph;
pub mod discovery;
pub mod error;
pub mod include;
pub mod pipeline;
pub mod source_file;
pub mod system_headers;

pub use dependency_graph::{CycleError, DependencyGraph};
pub use error::CoreError;
pub use pipeline::{AmalgamationJob, Dialect, JobReport, OutputLayout};
pub use source_file::{SourceFile, SourceKind};
pub use system_headers::SystemHeaders;
