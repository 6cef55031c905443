//! Statement dispatch
//!
//! Anything on an action line that is not a function header must be one of
//! the statement forms below; the rest of the line is otherwise opaque.

use super::{ParseError, Parser};
use crate::lexer::ClassifiedLine;
use crate::tree::{Include, NodeKind, StructDecl, Type};
use crate::types::NativeType;
use log::debug;

const COMMAND_PREFIX: &str = "C::>";
const IMPORT_PREFIX: &str = "C::import";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Return(Option<String>),
    Command(String),
    Import(Include),
    Struct(String),
}

/// Recognizes a statement payload. Returns `None` for anything unknown.
pub fn parse_statement(payload: &str) -> Option<Statement> {
    let (head, rest) = match payload.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (payload, ""),
    };

    match head {
        "return" => Some(Statement::Return((!rest.is_empty()).then(|| rest.to_string()))),
        COMMAND_PREFIX => Some(Statement::Command(rest.to_string())),
        IMPORT_PREFIX => {
            let include = match rest.split_once(char::is_whitespace) {
                Some(("local", path)) => Include::Local(path.trim().to_string()),
                Some(("global", path)) => Include::Global(path.trim().to_string()),
                _ => match rest {
                    "local" => Include::Local(String::new()),
                    "global" => Include::Global(String::new()),
                    _ => Include::Global(rest.to_string()),
                },
            };
            Some(Statement::Import(include))
        }
        "struct" => {
            let mut words = rest.split_whitespace();
            match (words.next(), words.next()) {
                (Some(name), None) => Some(Statement::Struct(name.to_string())),
                _ => None,
            }
        }
        _ => None,
    }
}

impl Parser<'_> {
    pub(crate) fn dispatch_statement(
        &mut self,
        line: &ClassifiedLine<'_>,
        payload: &str,
        trailing_comment: Option<&str>,
    ) -> Result<(), ParseError> {
        let statement = parse_statement(payload).ok_or_else(|| ParseError::Line {
            location: self.location(line.index),
            text: line.raw.trim_end().to_string(),
        })?;

        let scope = self.current();

        let kind = match statement {
            Statement::Return(value) => {
                if scope == self.tree.root() {
                    return Err(ParseError::ReturnOutsideFunction {
                        location: self.location(line.index),
                        text: line.raw.trim_end().to_string(),
                    });
                }
                NodeKind::Return(value)
            }
            Statement::Command(text) => NodeKind::Command(text),
            Statement::Import(include) => NodeKind::Directive(include),
            Statement::Struct(name) => {
                return self.declare_struct(line, name, trailing_comment);
            }
        };

        if let Some(comment) = trailing_comment {
            self.push_leaf(line, NodeKind::Comment(comment.to_string()));
        }
        self.push_leaf(line, kind);
        Ok(())
    }

    fn declare_struct(
        &mut self,
        line: &ClassifiedLine<'_>,
        name: String,
        trailing_comment: Option<&str>,
    ) -> Result<(), ParseError> {
        // Only the top-level registry is seeded with natives
        if NativeType::from_name(&name).is_some() {
            debug!("struct {} clashes with a native type", name);
            return Err(ParseError::DuplicateType {
                name,
                location: self.location(line.index),
                text: line.raw.trim_end().to_string(),
            });
        }

        let scope = self.current();
        let id = self.tree.alloc(
            NodeKind::Struct(StructDecl {
                name: name.clone(),
                comment: trailing_comment.map(str::to_string),
            }),
            Some(self.line_number(line.index)),
            scope,
        );

        let declared = self
            .tree
            .container_mut(scope)
            .map(|container| container.declare_type(Type::structure(&name, id)));

        if let Some(Err(existing)) = declared {
            debug!("struct {} clashes with {:?} type", name, existing.kind);
            return Err(ParseError::DuplicateType {
                name,
                location: self.location(line.index),
                text: line.raw.trim_end().to_string(),
            });
        }

        debug!("declared struct {} in {}", name, scope);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_return_forms() {
        assert_eq!(parse_statement("return"), Some(Statement::Return(None)));
        assert_eq!(
            parse_statement("return a + b"),
            Some(Statement::Return(Some("a + b".to_string())))
        );
    }

    #[test]
    fn test_command_keeps_remainder_verbatim() {
        assert_eq!(
            parse_statement("C::> printf(\"%d  %d\\n\", a,  b)"),
            Some(Statement::Command("printf(\"%d  %d\\n\", a,  b)".to_string()))
        );
        assert_eq!(parse_statement("C::>"), Some(Statement::Command(String::new())));
    }

    #[test]
    fn test_import_flavors() {
        assert_eq!(
            parse_statement("C::import local foo.h"),
            Some(Statement::Import(Include::Local("foo.h".to_string())))
        );
        assert_eq!(
            parse_statement("C::import global foo.h"),
            Some(Statement::Import(Include::Global("foo.h".to_string())))
        );
        assert_eq!(
            parse_statement("C::import foo.h"),
            Some(Statement::Import(Include::Global("foo.h".to_string())))
        );
        assert_eq!(
            parse_statement("C::import local my dir/foo.h"),
            Some(Statement::Import(Include::Local("my dir/foo.h".to_string())))
        );
    }

    #[test]
    fn test_import_without_path_is_empty() {
        assert_eq!(
            parse_statement("C::import"),
            Some(Statement::Import(Include::Global(String::new())))
        );
        assert_eq!(
            parse_statement("C::import local"),
            Some(Statement::Import(Include::Local(String::new())))
        );
    }

    #[test]
    fn test_struct_declaration() {
        assert_eq!(
            parse_statement("struct Point"),
            Some(Statement::Struct("Point".to_string()))
        );
        assert_eq!(parse_statement("struct"), None);
        assert_eq!(parse_statement("struct Point extra"), None);
    }

    #[test]
    fn test_unknown_statements() {
        assert_eq!(parse_statement("while x"), None);
        assert_eq!(parse_statement("C::>>"), None);
        assert_eq!(parse_statement("print x"), None);
    }
}
