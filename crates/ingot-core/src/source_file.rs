//! The per-file record threading through the amalgamation pipeline

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::error::CoreError;
use crate::include;
use crate::system_headers::SystemHeaders;

/// File kinds participating in an amalgamation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SourceKind {
    /// A `.h` file, a graph node ordered topologically.
    Header,
    /// A `.c` file, a leaf emitted after the headers; wrapped in an extern
    /// "C" guard when the output dialect is C++.
    Source,
    /// A `.cpp` file, a leaf emitted after the `.c` files and never
    /// guard-wrapped.
    SourceCpp,
}

impl SourceKind {
    /// The file extension this kind is discovered by, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            SourceKind::Header => "h",
            SourceKind::Source => "c",
            SourceKind::SourceCpp => "cpp",
        }
    }
}

/// One discovered file: identity, include-stripped contents, and its
/// classified dependency sets. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Where the file was read from. Never used as a graph key.
    pub path: PathBuf,
    /// Base name including the extension; the graph node key. Must be unique
    /// within each scanned kind.
    pub file_name: String,
    pub kind: SourceKind,
    /// Original text, kept unmodified.
    pub raw_contents: String,
    /// `raw_contents` with every include directive stripped; this is what
    /// gets emitted into the merged artifact.
    pub contents: String,
    /// Verbatim directives matched by the system-header allow-list.
    pub system_includes: BTreeSet<String>,
    /// Base names of the non-system includes. Relative path prefixes are
    /// discarded here: headers are often included by paths that differ from
    /// where they physically sit, so only the base name identifies a node.
    pub local_includes: BTreeSet<String>,
}

impl SourceFile {
    /// Read and parse one file from disk.
    pub fn read(
        path: &Path,
        kind: SourceKind,
        system_headers: &SystemHeaders,
    ) -> Result<Self, CoreError> {
        let raw_contents = std::fs::read_to_string(path).map_err(|source| CoreError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(path.to_path_buf(), kind, raw_contents, system_headers))
    }

    /// Build a record from already-loaded text. Pure; the filesystem entry
    /// point above delegates here so parsing stays testable without files.
    pub fn parse(
        path: PathBuf,
        kind: SourceKind,
        raw_contents: String,
        system_headers: &SystemHeaders,
    ) -> Self {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let contents = include::strip(&raw_contents);

        let mut system_includes = BTreeSet::new();
        let mut local_includes = BTreeSet::new();
        for directive in include::extract(&raw_contents) {
            if system_headers.contains(&directive) {
                system_includes.insert(directive);
            } else {
                let target = include::target(&directive);
                local_includes.insert(include::base_name(target).to_string());
            }
        }

        Self {
            path,
            file_name,
            kind,
            raw_contents,
            contents,
            system_includes,
            local_includes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(raw: &str) -> SourceFile {
        SourceFile::parse(
            PathBuf::from("src/embedDB/embedDB.c"),
            SourceKind::Source,
            raw.to_string(),
            &SystemHeaders::c_standard(),
        )
    }

    #[test]
    fn test_file_name_is_base_name() {
        let file = parse("int x;\n");
        assert_eq!(file.file_name, "embedDB.c");
    }

    #[test]
    fn test_classification_splits_system_and_local() {
        let file = parse(
            "#include <math.h>\n\
             #include <stdio.h>\n\
             #include \"embedDB.h\"\n\
             #include \"../spline/spline.h\"\n\
             int main(void) {}\n",
        );

        let system: Vec<&str> = file.system_includes.iter().map(String::as_str).collect();
        assert_eq!(system, vec!["#include <math.h>", "#include <stdio.h>"]);

        let local: Vec<&str> = file.local_includes.iter().map(String::as_str).collect();
        assert_eq!(local, vec!["embedDB.h", "spline.h"]);
    }

    #[test]
    fn test_non_allow_listed_angle_include_is_local() {
        let file = parse("#include <RTClib.h>\n");
        assert!(file.system_includes.is_empty());
        assert!(file.local_includes.contains("RTClib.h"));
    }

    #[test]
    fn test_contents_are_stripped_and_raw_kept() {
        let raw = "#include <stdio.h>\nint x;\n";
        let file = parse(raw);
        assert_eq!(file.raw_contents, raw);
        assert!(!file.contents.contains("#include"));
        assert!(file.contents.contains("int x;"));
    }

    #[test]
    fn test_repeated_directives_collapse_to_one_entry() {
        let file = parse("#include \"util.h\"\n#include \"util.h\"\n#include \"../a/util.h\"\n");
        assert_eq!(file.local_includes.len(), 1);
        assert!(file.local_includes.contains("util.h"));
    }
}
