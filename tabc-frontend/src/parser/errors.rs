//! Parse error types for the tree builder
//!
//! Every error is fatal: the first one stops the parse and no tree is
//! produced. Locations use 1-based line numbers.

use tabc_common::{CompilerError, SourceLocation};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("{location}: line could not be parsed\n\t{text}")]
    Line {
        location: SourceLocation,
        text: String,
    },

    #[error("{location}: parameters incorrectly formatted\n\t{text}")]
    ParameterFormat {
        location: SourceLocation,
        text: String,
    },

    #[error("{location}: function definition needs to end with ':'\n\t{text}")]
    MissingColon {
        location: SourceLocation,
        text: String,
    },

    #[error("{location}: return may not be used outside a function\n\t{text}")]
    ReturnOutsideFunction {
        location: SourceLocation,
        text: String,
    },

    #[error("{location}: function '{name}' is already defined\n\t{text}")]
    DuplicateFunction {
        name: String,
        location: SourceLocation,
        original: SourceLocation,
        text: String,
    },

    #[error("{location}: type '{name}' is already defined in this scope\n\t{text}")]
    DuplicateType {
        name: String,
        location: SourceLocation,
        text: String,
    },

    #[error("{location}: indentation depth {depth} does not match the open scope depth {expected}\n\t{text}")]
    IndentationSkip {
        location: SourceLocation,
        text: String,
        depth: usize,
        expected: usize,
    },

    #[error("{location}: the entry point must be declared at top level\n\t{text}")]
    NestedEntryPoint {
        location: SourceLocation,
        text: String,
    },

    #[error("{location}: the entry point is already defined\n\t{text}")]
    DuplicateEntryPoint {
        location: SourceLocation,
        original: SourceLocation,
        text: String,
    },
}

impl ParseError {
    pub fn location(&self) -> &SourceLocation {
        match self {
            ParseError::Line { location, .. }
            | ParseError::ParameterFormat { location, .. }
            | ParseError::MissingColon { location, .. }
            | ParseError::ReturnOutsideFunction { location, .. }
            | ParseError::DuplicateFunction { location, .. }
            | ParseError::DuplicateType { location, .. }
            | ParseError::IndentationSkip { location, .. }
            | ParseError::NestedEntryPoint { location, .. }
            | ParseError::DuplicateEntryPoint { location, .. } => location,
        }
    }

    /// Where the clashing definition was first made
    pub fn original(&self) -> Option<&SourceLocation> {
        match self {
            ParseError::DuplicateFunction { original, .. }
            | ParseError::DuplicateEntryPoint { original, .. } => Some(original),
            _ => None,
        }
    }
}

impl From<ParseError> for CompilerError {
    fn from(err: ParseError) -> Self {
        let location = err.location().clone();
        // The location is carried separately; keep only the message part
        let message = err.to_string();
        let prefix = format!("{}: ", location);
        let message = match message.strip_prefix(&prefix) {
            Some(rest) => rest.to_string(),
            None => message,
        };
        let notes = err
            .original()
            .map(|original| vec![format!("first defined at {}", original)])
            .unwrap_or_default();
        CompilerError::ParseError {
            location,
            message,
            notes,
        }
    }
}
