//! Recognition and removal of `#include` directives

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

/// Matches `#include <...>` and `#include "..."` with any leading whitespace.
///
/// The leading whitespace is part of the match so stripping a directive also
/// removes its indentation. Directives inside comments are matched too;
/// commented-out includes get hoisted like any other.
static INCLUDE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\s*#include ((<[^>]+>)|("[^"]+"))"#).expect("include pattern is valid")
});

/// Extract every include directive from `contents`, deduplicated, with the
/// original delimiters preserved (`#include <stdio.h>`, `#include "foo.h"`).
pub fn extract(contents: &str) -> BTreeSet<String> {
    INCLUDE_RE
        .captures_iter(contents)
        .map(|caps| format!("#include {}", &caps[1]))
        .collect()
}

/// Replace every include directive (and its leading whitespace) with a
/// single space. Line structure is not preserved.
pub fn strip(contents: &str) -> String {
    INCLUDE_RE.replace_all(contents, " ").into_owned()
}

/// The include target of a verbatim directive, delimiters removed:
/// `#include "../spline/spline.h"` becomes `../spline/spline.h`.
pub fn target(directive: &str) -> &str {
    directive
        .trim_start_matches("#include")
        .trim()
        .trim_matches(|c| c == '<' || c == '>' || c == '"')
}

/// Final path segment of an include target, handling both separators:
/// `../spline/spline.h` becomes `spline.h`.
pub fn base_name(target: &str) -> &str {
    target.rsplit(['/', '\\']).next().unwrap_or(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extracts_angle_and_quote_forms() {
        let source = "#include <math.h>\n#include \"embedDB.h\"\nint main(void) {}\n";
        let includes = extract(source);
        assert_eq!(includes.len(), 2);
        assert!(includes.contains("#include <math.h>"));
        assert!(includes.contains("#include \"embedDB.h\""));
    }

    #[test]
    fn test_deduplicates_repeated_directives() {
        let source = "#include <stdio.h>\n#include <stdio.h>\n#include <stdio.h>\n";
        let includes = extract(source);
        assert_eq!(includes.len(), 1);
    }

    #[test]
    fn test_strips_every_directive_to_a_single_space() {
        let source = "#include <stdio.h>\nint x;\n    #include \"util.h\"\nint y;\n";
        let stripped = strip(source);
        assert!(!stripped.contains("#include"));
        assert!(stripped.contains("int x;"));
        assert!(stripped.contains("int y;"));
    }

    #[test]
    fn test_directives_inside_comments_are_still_matched() {
        let source = "// #include <math.h>\n/* #include \"old.h\" */\n";
        let includes = extract(source);
        assert!(includes.contains("#include <math.h>"));
        assert!(includes.contains("#include \"old.h\""));
    }

    #[test]
    fn test_malformed_directives_are_ignored() {
        let source = "#include stdio.h\n#include\n# include <x.h>\n";
        assert!(extract(source).is_empty());
        assert_eq!(strip(source), source);
    }

    #[test]
    fn test_target_removes_delimiters() {
        assert_eq!(target("#include <stdio.h>"), "stdio.h");
        assert_eq!(target("#include \"../spline/spline.h\""), "../spline/spline.h");
    }

    #[test]
    fn test_base_name_drops_relative_prefixes() {
        assert_eq!(base_name("embedDB.h"), "embedDB.h");
        assert_eq!(base_name("../spline/spline.h"), "spline.h");
        assert_eq!(base_name("../../../../far/away/file.h"), "file.h");
        assert_eq!(base_name(r"win\style\path.h"), "path.h");
    }
}
