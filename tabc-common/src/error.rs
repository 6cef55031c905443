//! Error handling for the Tab C transpiler
//!
//! Every problem the transpiler detects is fatal, so there is a single
//! error type for the whole run and a `Diagnostic` used to print it.

use crate::source_loc::SourceLocation;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Main compiler error type that encompasses all phases of a run
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompilerError {
    #[error("Parse error at {location}: {message}")]
    ParseError {
        location: SourceLocation,
        message: String,
        /// Extra context printed under the message
        notes: Vec<String>,
    },

    #[error("IO error: {message}")]
    IoError { message: String },

    #[error("Internal compiler error: {message}")]
    InternalError { message: String },
}

impl CompilerError {
    /// Create a parse error
    pub fn parse_error(message: String, location: SourceLocation) -> Self {
        CompilerError::ParseError {
            location,
            message,
            notes: Vec::new(),
        }
    }

    /// Create an IO error from a plain message
    pub fn io_error(message: String) -> Self {
        CompilerError::IoError { message }
    }

    /// Source location of the error, if it has one
    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            CompilerError::ParseError { location, .. } => Some(location),
            CompilerError::IoError { .. } | CompilerError::InternalError { .. } => None,
        }
    }
}

/// Convert from std::io::Error
impl From<std::io::Error> for CompilerError {
    fn from(err: std::io::Error) -> Self {
        CompilerError::IoError {
            message: err.to_string(),
        }
    }
}

/// Diagnostic severity. There is no warning level: anything worth
/// reporting stops the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Note,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Note => write!(f, "note"),
        }
    }
}

/// A message ready to be written to the error stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub location: Option<SourceLocation>,
    pub notes: Vec<String>,
}

impl Diagnostic {
    pub fn error(message: String, location: Option<SourceLocation>) -> Self {
        Self {
            severity: Severity::Error,
            message,
            location,
            notes: Vec::new(),
        }
    }

    pub fn with_note(mut self, note: String) -> Self {
        self.notes.push(note);
        self
    }
}

impl From<&CompilerError> for Diagnostic {
    fn from(err: &CompilerError) -> Self {
        let diagnostic = Diagnostic::error(err.to_string(), err.location().cloned());
        match err {
            CompilerError::ParseError { notes, .. } => notes
                .iter()
                .fold(diagnostic, |diagnostic, note| diagnostic.with_note(note.clone())),
            _ => diagnostic,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)?;

        for note in &self.notes {
            write!(f, "\n  {}: {}", Severity::Note, note)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = CompilerError::parse_error(
            "return may not be used outside a function".to_string(),
            SourceLocation::new("prog.tc", 4, 1),
        );
        assert_eq!(
            err.to_string(),
            "Parse error at prog.tc:4:1: return may not be used outside a function"
        );
        assert_eq!(err.location().map(|l| l.line), Some(4));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.tc");
        let err = CompilerError::from(io);
        assert!(matches!(err, CompilerError::IoError { .. }));
        assert!(err.location().is_none());
    }

    #[test]
    fn test_diagnostic_from_error() {
        let err = CompilerError::InternalError {
            message: "dangling node".to_string(),
        };
        let diag = Diagnostic::from(&err);
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.to_string(), "error: Internal compiler error: dangling node");
    }

    #[test]
    fn test_diagnostic_carries_parse_error_notes() {
        let err = CompilerError::ParseError {
            location: SourceLocation::new("prog.tc", 3, 1),
            message: "function 'add' is already defined".to_string(),
            notes: vec!["first defined at prog.tc:1:1".to_string()],
        };
        let diag = Diagnostic::from(&err);

        assert_eq!(diag.notes.len(), 1);
        assert_eq!(
            diag.to_string(),
            "error: Parse error at prog.tc:3:1: function 'add' is already defined\n  note: first defined at prog.tc:1:1"
        );
    }
}
