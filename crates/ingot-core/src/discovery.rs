//! Recursive discovery of source files under the configured roots

use std::collections::BTreeMap;
use std::path::PathBuf;

use tracing::debug;
use walkdir::WalkDir;

use crate::error::CoreError;
use crate::source_file::{SourceFile, SourceKind};
use crate::system_headers::SystemHeaders;

/// Enumerate every file of `kind` under the given roots and parse each into
/// a [`SourceFile`].
///
/// Paths are collected across all roots and sorted lexicographically before
/// parsing, so repeated runs see the files in the same order on every host.
/// Finding nothing is a configuration error unless `allow_empty` is set
/// (used for the optional `.cpp` set). Two files sharing a base name cannot
/// both become graph nodes, so duplicates fail the scan immediately.
pub fn scan(
    roots: &[PathBuf],
    kind: SourceKind,
    system_headers: &SystemHeaders,
    allow_empty: bool,
) -> Result<Vec<SourceFile>, CoreError> {
    let mut paths = Vec::new();
    for root in roots {
        for entry in WalkDir::new(root) {
            let entry = entry.map_err(|source| CoreError::Walk {
                path: root.clone(),
                source,
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            if entry.path().extension().and_then(|ext| ext.to_str()) == Some(kind.extension()) {
                paths.push(entry.into_path());
            }
        }
    }
    paths.sort();

    if paths.is_empty() {
        if allow_empty {
            debug!(extension = kind.extension(), "no files found, set is optional");
            return Ok(Vec::new());
        }
        return Err(CoreError::EmptyFileSet {
            extension: kind.extension().to_string(),
            roots: roots.to_vec(),
        });
    }

    let mut seen: BTreeMap<String, PathBuf> = BTreeMap::new();
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let file = SourceFile::read(&path, kind, system_headers)?;
        if let Some(first) = seen.insert(file.file_name.clone(), path.clone()) {
            return Err(CoreError::DuplicateFileName {
                name: file.file_name,
                first,
                second: path,
            });
        }
        debug!(path = %file.path.display(), "loaded {}", file.file_name);
        files.push(file);
    }
    Ok(files)
}
