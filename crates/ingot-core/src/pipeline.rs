//! Orchestration of one amalgamation run
//!
//! Scan, classify, aggregate, sort, assemble, write. Every stage returns a
//! `Result`; nothing in here terminates the process, so the whole run is
//! testable end to end and the caller decides what a fatal error means.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use tracing::info;

use crate::assembly::{self, Artifact};
use crate::dependency_graph::DependencyGraph;
use crate::discovery;
use crate::error::CoreError;
use crate::source_file::{SourceFile, SourceKind};
use crate::system_headers::SystemHeaders;

/// Output language of the merged source artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    #[default]
    C,
    /// Also scans the optional `.cpp` set and wraps `.c` blocks in extern
    /// "C" guards.
    Cpp,
}

impl Dialect {
    /// Extension of the merged source artifact.
    pub fn source_extension(&self) -> &'static str {
        match self {
            Dialect::C => "c",
            Dialect::Cpp => "cpp",
        }
    }
}

/// Whether to write a header/source pair or one combined file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputLayout {
    #[default]
    Split,
    Combined,
}

/// Configuration for one amalgamation run.
#[derive(Debug, Clone)]
pub struct AmalgamationJob {
    /// Directories scanned recursively for headers and sources.
    pub roots: Vec<PathBuf>,
    /// Base name of the output artifacts, without extension.
    pub output_name: String,
    /// Destination directory, created if absent.
    pub out_dir: PathBuf,
    pub dialect: Dialect,
    pub layout: OutputLayout,
    pub system_headers: SystemHeaders,
    /// Replaces the default generated-file banner when set.
    pub banner: Option<String>,
}

impl AmalgamationJob {
    pub fn new(
        roots: Vec<PathBuf>,
        output_name: impl Into<String>,
        out_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            roots,
            output_name: output_name.into(),
            out_dir: out_dir.into(),
            dialect: Dialect::default(),
            layout: OutputLayout::default(),
            system_headers: SystemHeaders::c_standard(),
            banner: None,
        }
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn with_layout(mut self, layout: OutputLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_system_headers(mut self, system_headers: SystemHeaders) -> Self {
        self.system_headers = system_headers;
        self
    }

    pub fn with_banner(mut self, banner: impl Into<String>) -> Self {
        self.banner = Some(banner.into());
        self
    }

    /// Execute the run. Artifacts are rendered fully in memory before
    /// anything is written; a failing stage leaves the destination untouched.
    pub fn run(&self) -> Result<JobReport, CoreError> {
        let headers =
            discovery::scan(&self.roots, SourceKind::Header, &self.system_headers, false)?;
        let mut sources =
            discovery::scan(&self.roots, SourceKind::Source, &self.system_headers, false)?;
        if self.dialect == Dialect::Cpp {
            let cpp =
                discovery::scan(&self.roots, SourceKind::SourceCpp, &self.system_headers, true)?;
            sources.extend(cpp);
        }
        info!(
            headers = headers.len(),
            sources = sources.len(),
            "scanned {} root(s)",
            self.roots.len()
        );

        let system_includes = aggregate_system_includes(&headers, &sources);

        let graph = DependencyGraph::from_headers(&headers);
        let order = graph.topological_sort()?;
        info!(count = order.len(), "resolved header order");

        let by_name: BTreeMap<&str, &SourceFile> = headers
            .iter()
            .map(|header| (header.file_name.as_str(), header))
            .collect();
        let ordered_headers: Vec<&SourceFile> = order
            .iter()
            .filter_map(|name| by_name.get(name.as_str()).copied())
            .collect();
        let source_refs: Vec<&SourceFile> = sources.iter().collect();

        let banner = self.banner.as_deref().unwrap_or(assembly::DEFAULT_BANNER);
        let artifacts = assembly::render(
            &self.output_name,
            banner,
            &system_includes,
            &ordered_headers,
            &source_refs,
            self.dialect,
            self.layout,
        );

        let written = self.write(&artifacts)?;
        Ok(JobReport {
            written,
            header_count: headers.len(),
            source_count: sources.len(),
            system_include_count: system_includes.len(),
        })
    }

    fn write(&self, artifacts: &[Artifact]) -> Result<Vec<PathBuf>, CoreError> {
        std::fs::create_dir_all(&self.out_dir).map_err(|source| CoreError::CreateDir {
            path: self.out_dir.clone(),
            source,
        })?;

        let mut written = Vec::with_capacity(artifacts.len());
        for artifact in artifacts {
            let path = self.out_dir.join(&artifact.file_name);
            std::fs::write(&path, &artifact.contents).map_err(|source| {
                CoreError::WriteFile {
                    path: path.clone(),
                    source,
                }
            })?;
            info!(path = %path.display(), "wrote artifact");
            written.push(path);
        }
        Ok(written)
    }
}

/// What a completed run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobReport {
    pub written: Vec<PathBuf>,
    pub header_count: usize,
    pub source_count: usize,
    pub system_include_count: usize,
}

/// Union of the system includes across every record. A plain fold over the
/// immutable record sets; no accumulator is shared during construction.
fn aggregate_system_includes(headers: &[SourceFile], sources: &[SourceFile]) -> BTreeSet<String> {
    headers
        .iter()
        .chain(sources.iter())
        .flat_map(|file| file.system_includes.iter().cloned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use crate::system_headers::SystemHeaders;

    #[test]
    fn test_aggregation_unions_across_all_records() {
        let headers = vec![SourceFile::parse(
            PathBuf::from("a.h"),
            SourceKind::Header,
            "#include <math.h>\n".to_string(),
            &SystemHeaders::c_standard(),
        )];
        let sources = vec![SourceFile::parse(
            PathBuf::from("a.c"),
            SourceKind::Source,
            "#include <stdio.h>\n#include <math.h>\n".to_string(),
            &SystemHeaders::c_standard(),
        )];

        let aggregated = aggregate_system_includes(&headers, &sources);
        let expected: Vec<&str> = vec!["#include <math.h>", "#include <stdio.h>"];
        let actual: Vec<&str> = aggregated.iter().map(String::as_str).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_dialect_source_extension() {
        assert_eq!(Dialect::C.source_extension(), "c");
        assert_eq!(Dialect::Cpp.source_extension(), "cpp");
    }

    #[test]
    fn test_job_builder_defaults() {
        let job = AmalgamationJob::new(vec![PathBuf::from("src")], "merged", "dist");
        assert_eq!(job.dialect, Dialect::C);
        assert_eq!(job.layout, OutputLayout::Split);
        assert!(job.banner.is_none());
        assert!(job.system_headers.contains("#include <stdio.h>"));
    }
}
