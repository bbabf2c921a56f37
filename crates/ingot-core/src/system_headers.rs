//! Allow-list of include directives treated as system headers
//!
//! Anything the allow-list matches is hoisted to the top of the merged
//! artifact instead of being resolved as a project-local dependency.

use std::collections::BTreeSet;

/// The set of include directives classified as standard/platform headers.
///
/// Entries are stored as full directives (`#include <stdio.h>`) and matched
/// against extracted directives by exact text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SystemHeaders {
    directives: BTreeSet<String>,
}

/// The C11 standard library headers.
const C_STANDARD: &[&str] = &[
    "assert.h",
    "complex.h",
    "ctype.h",
    "errno.h",
    "fenv.h",
    "float.h",
    "inttypes.h",
    "iso646.h",
    "limits.h",
    "locale.h",
    "math.h",
    "setjmp.h",
    "signal.h",
    "stdalign.h",
    "stdarg.h",
    "stdatomic.h",
    "stdbool.h",
    "stddef.h",
    "stdint.h",
    "stdio.h",
    "stdlib.h",
    "stdnoreturn.h",
    "string.h",
    "tgmath.h",
    "threads.h",
    "time.h",
    "uchar.h",
    "wchar.h",
    "wctype.h",
];

/// Headers commonly pulled in by Arduino sketches, on top of the C standard.
const ARDUINO: &[&str] = &["Arduino.h", "SPI.h", "SdFat.h"];

impl SystemHeaders {
    /// An empty allow-list; every include will be classified as local.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The C standard library preset.
    pub fn c_standard() -> Self {
        let mut headers = Self::empty();
        for name in C_STANDARD {
            headers.insert(name);
        }
        headers
    }

    /// The C standard library plus the Arduino platform headers.
    pub fn arduino() -> Self {
        let mut headers = Self::c_standard();
        for name in ARDUINO {
            headers.insert(name);
        }
        headers
    }

    /// Add an entry, normalizing its spelling. Accepted forms: a bare header
    /// name (`math.h`, stored angle-bracketed), a delimited name (`<math.h>`
    /// or `"math.h"`), or a full `#include` directive.
    pub fn insert(&mut self, entry: &str) {
        let entry = entry.trim();
        let directive = if let Some(rest) = entry.strip_prefix("#include") {
            format!("#include {}", rest.trim())
        } else if entry.starts_with('<') || entry.starts_with('"') {
            format!("#include {entry}")
        } else {
            format!("#include <{entry}>")
        };
        self.directives.insert(directive);
    }

    /// Whether a verbatim directive is on the allow-list.
    pub fn contains(&self, directive: &str) -> bool {
        self.directives.contains(directive)
    }

    pub fn len(&self) -> usize {
        self.directives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_c_standard_preset() {
        let headers = SystemHeaders::c_standard();
        assert_eq!(headers.len(), 29);
        assert!(headers.contains("#include <math.h>"));
        assert!(headers.contains("#include <stdio.h>"));
        assert!(!headers.contains("#include <Arduino.h>"));
    }

    #[test]
    fn test_arduino_preset_extends_c_standard() {
        let headers = SystemHeaders::arduino();
        assert_eq!(headers.len(), 32);
        assert!(headers.contains("#include <stdlib.h>"));
        assert!(headers.contains("#include <Arduino.h>"));
        assert!(headers.contains("#include <SPI.h>"));
        assert!(headers.contains("#include <SdFat.h>"));
    }

    #[test]
    fn test_insert_normalizes_spelling() {
        let mut headers = SystemHeaders::empty();
        headers.insert("RTClib.h");
        headers.insert("<Wire.h>");
        headers.insert("#include <EEPROM.h>");
        headers.insert("  #include   <LoRa.h>");
        assert!(headers.contains("#include <RTClib.h>"));
        assert!(headers.contains("#include <Wire.h>"));
        assert!(headers.contains("#include <EEPROM.h>"));
        assert!(headers.contains("#include <LoRa.h>"));
    }

    #[test]
    fn test_insert_keeps_quoted_form() {
        let mut headers = SystemHeaders::empty();
        headers.insert("\"platform.h\"");
        assert!(headers.contains("#include \"platform.h\""));
        assert!(!headers.contains("#include <platform.h>"));
    }

    #[test]
    fn test_matching_is_exact_text() {
        let headers = SystemHeaders::c_standard();
        assert!(!headers.contains("#include \"math.h\""));
        assert!(!headers.contains("#include <MATH.H>"));
    }
}
