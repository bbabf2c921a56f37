//! Rendering of the merged artifacts
//!
//! Everything here is pure string assembly over already-ordered records, so
//! the integration tests can assert exact output bytes.

use std::collections::BTreeSet;

use crate::pipeline::{Dialect, OutputLayout};
use crate::source_file::{SourceFile, SourceKind};

/// One output file, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub contents: String,
}

/// Banner prepended to every artifact unless the caller supplies one.
pub const DEFAULT_BANNER: &str = "\
/******************************************************************************/
/**
 * Amalgamated source file. Generated; do not edit by hand.
 * Changes belong in the source tree this file was merged from.
 */
/******************************************************************************/
";

const OPEN_EXTERN: &str = "#ifdef __cplusplus\nextern \"C\" {\n#endif\n";
const CLOSE_EXTERN: &str = "#ifdef __cplusplus\n}\n#endif\n";

/// Render the final artifacts.
///
/// `headers` must already be in topological order; `sources` carries the
/// `.c` records (alphabetical) followed by any `.cpp` records. The system
/// includes are emitted first, sorted, one line each.
pub fn render(
    output_name: &str,
    banner: &str,
    system_includes: &BTreeSet<String>,
    headers: &[&SourceFile],
    sources: &[&SourceFile],
    dialect: Dialect,
    layout: OutputLayout,
) -> Vec<Artifact> {
    let mut header_section = String::new();
    for directive in system_includes {
        header_section.push_str(directive);
        header_section.push('\n');
    }
    for header in headers {
        header_section.push_str(&file_block(header, dialect));
    }

    let mut source_section = String::new();
    for source in sources {
        source_section.push_str(&file_block(source, dialect));
    }

    let source_name = format!("{output_name}.{}", dialect.source_extension());
    match layout {
        OutputLayout::Split => {
            let header_name = format!("{output_name}.h");
            // The reference line goes above the banner so the merged source
            // compiles against the merged header it shipped with.
            let source_contents =
                format!("#include \"./{header_name}\"\n{banner}{source_section}");
            vec![
                Artifact {
                    file_name: header_name,
                    contents: format!("{banner}{header_section}"),
                },
                Artifact {
                    file_name: source_name,
                    contents: source_contents,
                },
            ]
        }
        OutputLayout::Combined => vec![Artifact {
            file_name: source_name,
            contents: format!("{banner}{header_section}\n{source_section}"),
        }],
    }
}

/// One file's cleaned contents behind a traceability banner. Under the C++
/// dialect, `.c` blocks get an extern "C" guard so their symbols keep C
/// linkage; `.cpp` and header blocks are never wrapped.
fn file_block(file: &SourceFile, dialect: Dialect) -> String {
    let banner = file_banner(&file.file_name);
    if dialect == Dialect::Cpp && file.kind == SourceKind::Source {
        format!("{banner}{OPEN_EXTERN}{}\n{CLOSE_EXTERN}\n", file.contents)
    } else {
        format!("{banner}{}\n", file.contents)
    }
}

fn file_banner(name: &str) -> String {
    let rule = "*".repeat(60);
    format!("/{rule}{name}{rule}/\n")
}
