//! Tab C Transpiler - Common Types and Utilities
//! 
//! This crate contains the source location and error types shared by the
//! frontend and the command-line driver.

pub mod error;
pub mod source_loc;

pub use error::{CompilerError, Diagnostic, Severity};
pub use source_loc::SourceLocation;
