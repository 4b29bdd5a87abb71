//! Resolves type name spellings to the closed [`ScalarType`] variant.

use crate::error::ParseError;
use bindweave_model::{EnumTable, ScalarType};
use std::collections::BTreeMap;

/// Resolves `name` to a scalar variant: directly, as the configured handle
/// or enum type, or through the typedef alias chain. A cyclic chain or one
/// ending in anything other than a scalar/enum fails with
/// [`ParseError::TypeResolution`]; a name that is no alias at all resolves to
/// `None` so the caller can report the full argument context.
pub fn resolve_type(
    name: &str,
    handle_type: &str,
    typedefs: &BTreeMap<String, String>,
    enums: &EnumTable,
) -> Result<Option<ScalarType>, ParseError> {
    let mut seen: Vec<&str> = Vec::new();
    let mut current = name;
    loop {
        if current == handle_type {
            return Ok(Some(ScalarType::Handle));
        }
        if let Some(scalar) = ScalarType::from_name(current) {
            return Ok(Some(scalar));
        }
        if enums.contains(current) {
            // Enums travel the C ABI as plain ints.
            return Ok(Some(ScalarType::Int));
        }
        match typedefs.get(current) {
            Some(next) => {
                if seen.contains(&current) {
                    return Err(ParseError::TypeResolution(name.to_string()));
                }
                seen.push(current);
                current = next;
            }
            None if !seen.is_empty() => {
                // The chain started from a typedef but ends nowhere useful.
                return Err(ParseError::TypeResolution(name.to_string()));
            }
            None => return Ok(None),
        }
    }
}
