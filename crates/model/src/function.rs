//! Parsed function declarations and the frozen per-header interface.

use crate::argument::Argument;
use crate::enums::EnumTable;
use serde::Serialize;

/// One native function as declared in the header, with argument roles fully
/// resolved.
#[derive(Debug, Clone, Serialize)]
pub struct FunctionDeclaration {
    pub method_name: String,
    pub arguments: Vec<Argument>,
    /// `None` for a plain `void` return.
    pub return_value: Option<Argument>,
    /// When true the native return slot is the library's status code and is
    /// checked internally rather than surfaced as a return value.
    pub returns_error_code: bool,
    pub uses_handle: bool,
    /// The declaration as written in the source, reproduced as a comment by
    /// the Fortran backend and quoted in diagnostics.
    pub raw_signature: String,
    pub raw_annotation: Option<String>,
}

impl FunctionDeclaration {
    pub fn inputs(&self) -> impl Iterator<Item = &Argument> {
        self.arguments.iter().filter(|a| !a.is_outarg)
    }

    pub fn outputs(&self) -> impl Iterator<Item = &Argument> {
        self.arguments.iter().filter(|a| a.is_outarg)
    }

    /// The return slot when it carries a real value instead of a status code.
    pub fn value_return(&self) -> Option<&Argument> {
        if self.returns_error_code {
            None
        } else {
            self.return_value.as_ref()
        }
    }
}

/// Everything one parse pass extracts from a header: declarations in source
/// order plus the enum table. Immutable once built.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HeaderInterface {
    pub declarations: Vec<FunctionDeclaration>,
    pub enums: EnumTable,
}
