//! A single function parameter (or return slot) with its inferred roles.

use crate::scalar::ScalarType;
use serde::Serialize;
use std::fmt;

/// Array classification of an argument.
///
/// `size_indices` holds the 0-based positions of the arguments that carry
/// this array's length, as paired by an annotation. `manual_size` marks
/// arrays the caller has to preallocate (`AM` in the annotation grammar).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArrayInfo {
    pub is_array: bool,
    pub size_indices: Vec<usize>,
    pub manual_size: bool,
}

/// One parameter of a native function, identified by its position in the
/// parameter list. Built in two phases: default role inference produces a
/// draft, annotation application produces the final immutable value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Argument {
    /// Name from the source, or a synthetic `argN` when unnamed.
    pub name: String,
    /// The type spelling as written in the header, kept for diagnostics.
    pub raw_type: String,
    pub ty: ScalarType,
    pub pointer_depth: u8,
    pub is_const: bool,
    pub is_handle: bool,
    pub is_string: bool,
    pub is_outarg: bool,
    pub is_sizearg: bool,
    pub array: ArrayInfo,
}

impl Argument {
    /// A `char*` at depth 1 is the string itself, not an output or an array
    /// of strings. Deeper pointer levels carry extra indirection.
    pub fn is_plain_string(&self) -> bool {
        self.is_string && self.pointer_depth == 1
    }
}

/// Multi-line attribute dump attached to generator diagnostics, so an
/// unsupported declaration can be debugged from the error message alone.
impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  type      : {}", self.raw_type)?;
        writeln!(f, "  name      : {}", self.name)?;
        writeln!(f, "  is_outarg : {}", self.is_outarg)?;
        writeln!(f, "  is_const  : {}", self.is_const)?;
        writeln!(f, "  npointer  : {}", self.pointer_depth)?;
        writeln!(f, "  is_string : {}", self.is_string)?;
        writeln!(
            f,
            "  arrayinfos: is_array: {}, sizes: {:?}, manual: {}",
            self.array.is_array, self.array.size_indices, self.array.manual_size
        )?;
        write!(f, "  is_handle : {}", self.is_handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arg() -> Argument {
        Argument {
            name: "elementPath".to_string(),
            raw_type: "char".to_string(),
            ty: ScalarType::Char,
            pointer_depth: 1,
            is_const: true,
            is_handle: false,
            is_string: true,
            is_outarg: false,
            is_sizearg: false,
            array: ArrayInfo::default(),
        }
    }

    #[test]
    fn test_plain_string_detection() {
        let mut a = arg();
        assert!(a.is_plain_string());
        a.pointer_depth = 2;
        assert!(!a.is_plain_string());
    }

    #[test]
    fn test_dump_lists_every_attribute() {
        let dump = arg().to_string();
        for needle in ["type", "name", "is_outarg", "npointer", "arrayinfos", "is_handle"] {
            assert!(dump.contains(needle), "missing {needle} in dump:\n{dump}");
        }
    }
}
