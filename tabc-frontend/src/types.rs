//! Native types pre-seeded into every top-level scope

use serde::Serialize;
use std::fmt;

/// Built-in C types the pseudo-language knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NativeType {
    Char,
    Int,
    Short,
    Long,
    Double,
    Float,
}

impl NativeType {
    pub const ALL: [NativeType; 6] = [
        NativeType::Char,
        NativeType::Int,
        NativeType::Short,
        NativeType::Long,
        NativeType::Double,
        NativeType::Float,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            NativeType::Char => "char",
            NativeType::Int => "int",
            NativeType::Short => "short",
            NativeType::Long => "long",
            NativeType::Double => "double",
            NativeType::Float => "float",
        }
    }

    /// Whether `unsigned` may qualify this type
    pub fn is_unsigned_capable(&self) -> bool {
        matches!(
            self,
            NativeType::Char | NativeType::Int | NativeType::Short | NativeType::Long
        )
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }
}

impl fmt::Display for NativeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
