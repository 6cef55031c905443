//! Function header parsing
//!
//! Recognized headers, tried in order:
//!
//! - `main:`: the program entry point
//! - `name(type name, type, ...) -> ret:`: full signature
//! - `name(params):` / `name -> ret:`: partial signatures
//! - `name:`: no parameters, no return value
//!
//! A payload that does not start like a header yields `Ok(None)` and is
//! handed on to statement dispatch.

use crate::tree::{FunctionSignature, Parameter, TypeRef, ENTRY_POINT_NAME};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static HEADER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*)\s*(.*)$").expect("header pattern is valid")
});
static PARAMS_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\((.*)\)$").expect("parameter pattern is valid"));

/// Words that open flow constructs and never name a function
const RESERVED_KEYWORDS: &[&str] = &["if", "else", "while", "for", "return"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Header {
    EntryPoint,
    Function(FunctionSignature),
}

/// Why a header-shaped payload was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderError {
    ParameterFormat,
    MissingColon,
}

pub fn parse_header(payload: &str) -> Result<Option<Header>, HeaderError> {
    if payload == format!("{ENTRY_POINT_NAME}:") {
        return Ok(Some(Header::EntryPoint));
    }

    let Some(caps) = HEADER_PATTERN.captures(payload) else {
        return Ok(None);
    };
    let name = &caps[1];
    let rest = caps.get(2).map_or("", |m| m.as_str()).trim_end();

    if RESERVED_KEYWORDS.contains(&name) {
        return Ok(None);
    }

    let (params_text, return_text) = if rest == ":" {
        (None, None)
    } else if let Some(ret) = rest.strip_prefix("->") {
        (None, Some(ret))
    } else if rest.starts_with('(') {
        match rest.rfind("->") {
            Some(arrow) => (Some(rest[..arrow].trim_end()), Some(&rest[arrow + 2..])),
            None => {
                let params = rest.strip_suffix(':').ok_or(HeaderError::MissingColon)?;
                (Some(params.trim_end()), None)
            }
        }
    } else {
        return Ok(None);
    };

    let return_type = match return_text {
        Some(text) => {
            let text = text.trim().strip_suffix(':').ok_or(HeaderError::MissingColon)?;
            let text = text.trim();
            if text.is_empty() {
                return Err(HeaderError::MissingColon);
            }
            TypeRef::parse(text)
        }
        None => TypeRef::Void,
    };

    let parameters = match params_text {
        Some(text) => {
            let inner = PARAMS_PATTERN
                .captures(text)
                .and_then(|caps| caps.get(1))
                .ok_or(HeaderError::ParameterFormat)?;
            parse_parameters(inner.as_str())?
        }
        None => Vec::new(),
    };

    Ok(Some(Header::Function(FunctionSignature {
        name: name.to_string(),
        parameters,
        return_type,
    })))
}

/// Splits the text between the parentheses into parameters. A piece with a
/// single word is a type only; it gets a synthesized name and is marked
/// unused.
pub fn parse_parameters(inner: &str) -> Result<Vec<Parameter>, HeaderError> {
    if inner.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut pieces = Vec::new();
    for piece in inner.split(',') {
        let words: Vec<&str> = piece.split_whitespace().collect();
        match words.as_slice() {
            [ty] => pieces.push((*ty, None)),
            [ty, name] => pieces.push((*ty, Some(*name))),
            _ => return Err(HeaderError::ParameterFormat),
        }
    }

    let mut taken: HashSet<String> = pieces
        .iter()
        .filter_map(|(_, name)| name.map(str::to_string))
        .collect();

    let parameters = pieces
        .into_iter()
        .enumerate()
        .map(|(index, (ty, name))| match name {
            Some(name) => Parameter {
                ty: TypeRef::parse(ty),
                name: name.to_string(),
                unused: false,
            },
            None => {
                let mut synthesized = format!("param_{index}_unused_");
                while taken.contains(&synthesized) {
                    synthesized.push('_');
                }
                taken.insert(synthesized.clone());
                Parameter {
                    ty: TypeRef::parse(ty),
                    name: synthesized,
                    unused: true,
                }
            }
        })
        .collect();

    Ok(parameters)
}
