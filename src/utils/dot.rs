//! Escaping helper for Graphviz DOT export.
//!
//! The control-flow graph debug export renders statement text into node labels;
//! this helper makes arbitrary IR text safe to embed in a quoted DOT string.

/// Escapes a string for use inside a quoted Graphviz DOT label.
///
/// Backslashes and quotes are escaped, newlines become DOT line breaks,
/// carriage returns are dropped, and angle brackets are escaped so labels
/// are never mistaken for HTML-like labels.
#[must_use]
pub fn escape_dot(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "")
        .replace('<', "\\<")
        .replace('>', "\\>")
}
