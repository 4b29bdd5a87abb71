//! Enum declarations with positional values.
//!
//! The native library's enums never carry explicit initializers; a member's
//! value is its position in the block. Every backend emits these exact
//! integers so the generated constants stay ABI-identical to the library.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumDecl {
    pub name: String,
    pub values: Vec<String>,
}

impl EnumDecl {
    /// Members with their numeric values, in declaration order.
    pub fn entries(&self) -> impl Iterator<Item = (usize, &str)> {
        self.values.iter().enumerate().map(|(i, v)| (i, v.as_str()))
    }
}

/// All enums of one header, in source order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EnumTable {
    decls: Vec<EnumDecl>,
}

impl EnumTable {
    pub fn push(&mut self, decl: EnumDecl) {
        self.decls.push(decl);
    }

    pub fn get(&self, name: &str) -> Option<&EnumDecl> {
        self.decls.iter().find(|d| d.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EnumDecl> {
        self.decls.iter()
    }
}
