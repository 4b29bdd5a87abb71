//! The closed set of native types a wrapped function may use.

use serde::Serialize;

/// A C type after resolution through typedef chains and enum lookup.
///
/// Every argument and return slot resolves to exactly one of these variants
/// during parsing; the backends pattern-match on it instead of re-inspecting
/// type name strings. Enum-typed slots resolve to [`ScalarType::Int`], the
/// opaque document handle keeps its own variant so the generators can elide
/// or rebind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScalarType {
    Int,
    Long,
    Float,
    Double,
    Char,
    Void,
    Handle,
}

impl ScalarType {
    /// Resolves a basic C scalar name. The handle and enum cases are decided
    /// by the parser, which knows the configured markers.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "int" => Some(ScalarType::Int),
            "long" => Some(ScalarType::Long),
            "float" => Some(ScalarType::Float),
            "double" => Some(ScalarType::Double),
            "char" => Some(ScalarType::Char),
            "void" => Some(ScalarType::Void),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_names_resolve() {
        assert_eq!(ScalarType::from_name("double"), Some(ScalarType::Double));
        assert_eq!(ScalarType::from_name("void"), Some(ScalarType::Void));
        assert_eq!(ScalarType::from_name("unsigned"), None);
    }
}
