//! Source location tracking for error reporting
//!
//! The pseudo-language is strictly line oriented, so a location is a file
//! name plus a line, with the column kept for editor-friendly output.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A location in a source file (line and column are 1-based)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    pub filename: String,
    pub line: u32,
    pub column: u32,
}

impl SourceLocation {
    /// Create a location with filename
    pub fn new(filename: &str, line: u32, column: u32) -> Self {
        Self {
            filename: filename.to_string(),
            line,
            column,
        }
    }

    /// Location of the first column of a 0-based line index
    pub fn from_line_index(filename: &str, index: usize) -> Self {
        let line = u32::try_from(index + 1).unwrap_or(u32::MAX);
        Self::new(filename, line, 1)
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.filename, self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_location() {
        let loc = SourceLocation::new("hello.tc", 42, 10);
        assert_eq!(loc.filename, "hello.tc");
        assert_eq!(loc.line, 42);
        assert_eq!(loc.column, 10);
        assert_eq!(format!("{}", loc), "hello.tc:42:10");
    }

    #[test]
    fn test_from_line_index_is_one_based() {
        let loc = SourceLocation::from_line_index("hello.tc", 0);
        assert_eq!(loc.line, 1);
        assert_eq!(loc.column, 1);

        let loc = SourceLocation::from_line_index("hello.tc", 9);
        assert_eq!(format!("{}", loc), "hello.tc:10:1");
    }
}
