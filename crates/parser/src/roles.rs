//! Two-phase argument-role construction.
//!
//! Phase one infers default roles from position and pointer shape; phase two
//! applies an [`Annotation`] override on top of the draft. Both phases are
//! pure list-in/list-out transformations; nothing mutates a declaration after
//! it has been assembled.

use crate::error::ParseError;
use bindweave_model::{Annotation, Argument, ParamAnnotation};

/// Default role inference, applied before any annotation:
///
/// * the handle flag comes from the type match during argument construction
///   (a by-value occurrence in first position is what the generators elide),
/// * a single-`*` `char*` is the input string itself, in any position,
/// * any other pointer argument that is not the last one is an input array,
/// * any other pointer argument in last position is an output.
pub fn infer_default_roles(mut arguments: Vec<Argument>) -> Vec<Argument> {
    let count = arguments.len();
    for (index, arg) in arguments.iter_mut().enumerate() {
        if arg.pointer_depth > 0 && !arg.is_plain_string() {
            if index + 1 < count {
                arg.array.is_array = true;
            } else {
                arg.is_outarg = true;
            }
        }
    }
    arguments
}

/// Applies an annotation to a draft argument list.
///
/// Annotation indices are 1-based positions; `0` or anything past the end of
/// the list fails with [`ParseError::AnnotationIndex`]. Size-argument indices
/// are validated the same way, recorded 0-based on the array argument, and
/// mark the referenced argument as a size argument.
pub fn apply_annotation(
    function: &str,
    mut arguments: Vec<Argument>,
    annotation: &Annotation,
) -> Result<Vec<Argument>, ParseError> {
    for (&index, param) in &annotation.out_args {
        let slot = checked_index(function, index, arguments.len())?;
        arguments[slot].is_outarg = true;
        apply_array(function, &mut arguments, slot, param)?;
    }
    for (&index, param) in &annotation.in_args {
        let slot = checked_index(function, index, arguments.len())?;
        arguments[slot].is_outarg = false;
        apply_array(function, &mut arguments, slot, param)?;
    }
    if annotation.uses_handle == Some(false)
        && let Some(first) = arguments.first_mut()
    {
        first.is_handle = false;
    }
    Ok(arguments)
}

fn apply_array(
    function: &str,
    arguments: &mut [Argument],
    slot: usize,
    param: &ParamAnnotation,
) -> Result<(), ParseError> {
    arguments[slot].array.is_array = param.is_array;
    arguments[slot].array.manual_size = param.manual_size;
    let mut size_slots = Vec::with_capacity(param.size_indices.len());
    for &size_index in &param.size_indices {
        let size_slot = checked_index(function, size_index, arguments.len())?;
        arguments[size_slot].is_sizearg = true;
        size_slots.push(size_slot);
    }
    arguments[slot].array.size_indices = size_slots;
    Ok(())
}

fn checked_index(function: &str, index: usize, count: usize) -> Result<usize, ParseError> {
    if index == 0 || index > count {
        return Err(ParseError::AnnotationIndex {
            function: function.to_string(),
            index,
        });
    }
    Ok(index - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bindweave_model::{ArrayInfo, ScalarType};

    fn arg(name: &str, ty: ScalarType, depth: u8, is_handle: bool) -> Argument {
        Argument {
            name: name.to_string(),
            raw_type: name.to_string(),
            ty,
            pointer_depth: depth,
            is_const: false,
            is_handle,
            is_string: ty == ScalarType::Char && depth > 0,
            is_outarg: false,
            is_sizearg: false,
            array: ArrayInfo::default(),
        }
    }

    #[test]
    fn test_default_inference_for_typical_getter() {
        // (handle, char* path, double* value)
        let args = infer_default_roles(vec![
            arg("handle", ScalarType::Handle, 0, true),
            arg("elementPath", ScalarType::Char, 1, false),
            arg("value", ScalarType::Double, 1, false),
        ]);
        assert!(args[0].is_handle);
        assert!(!args[1].is_outarg, "depth-1 char* stays an input string");
        assert!(args[2].is_outarg);
        assert!(!args[2].array.is_array);
    }

    #[test]
    fn test_nonfinal_single_star_string_is_not_an_array() {
        // (handle, char* elementPath, double* value): the path is the string
        // itself, not an array of strings
        let args = infer_default_roles(vec![
            arg("handle", ScalarType::Handle, 0, true),
            arg("elementPath", ScalarType::Char, 1, false),
            arg("value", ScalarType::Double, 1, false),
        ]);
        assert!(!args[1].array.is_array);
        assert!(!args[1].is_outarg);

        // a non-final char** is a genuine string array
        let args = infer_default_roles(vec![
            arg("names", ScalarType::Char, 2, false),
            arg("count", ScalarType::Int, 0, false),
        ]);
        assert!(args[0].array.is_array);
    }

    #[test]
    fn test_final_single_star_string_is_input() {
        let args = infer_default_roles(vec![
            arg("handle", ScalarType::Handle, 0, true),
            arg("text", ScalarType::Char, 1, false),
        ]);
        assert!(!args[1].is_outarg);
        let args = infer_default_roles(vec![
            arg("handle", ScalarType::Handle, 0, true),
            arg("text", ScalarType::Char, 2, false),
        ]);
        assert!(args[1].is_outarg, "char** in last position is an output");
    }

    #[test]
    fn test_handle_by_pointer_is_not_elided() {
        let args = infer_default_roles(vec![
            arg("path", ScalarType::Char, 1, false),
            arg("handle", ScalarType::Handle, 1, true),
        ]);
        assert!(!args[0].is_handle);
        assert!(args[1].is_handle, "type flag survives for output binding");
        assert!(args[1].is_outarg);
    }

    #[test]
    fn test_annotation_overrides_and_size_pairing() {
        let mut annotation = Annotation::default();
        annotation.out_args.insert(
            3,
            ParamAnnotation {
                is_array: true,
                size_indices: vec![4],
                manual_size: false,
            },
        );
        annotation.uses_handle = Some(false);
        let draft = infer_default_roles(vec![
            arg("handle", ScalarType::Handle, 0, true),
            arg("path", ScalarType::Char, 1, false),
            arg("values", ScalarType::Double, 2, false),
            arg("count", ScalarType::Int, 0, false),
        ]);
        let args = apply_annotation("tixiGetFloatVector", draft, &annotation).unwrap();
        assert!(!args[0].is_handle);
        assert!(args[2].is_outarg);
        assert!(args[2].array.is_array);
        assert_eq!(args[2].array.size_indices, vec![3]);
        assert!(args[3].is_sizearg);
    }

    #[test]
    fn test_annotation_index_out_of_range() {
        let mut annotation = Annotation::default();
        annotation.in_args.insert(7, ParamAnnotation::default());
        let draft = vec![arg("handle", ScalarType::Handle, 0, true)];
        let err = apply_annotation("tixiFoo", draft, &annotation).unwrap_err();
        assert!(matches!(err, ParseError::AnnotationIndex { index: 7, .. }));
    }

    #[test]
    fn test_zero_index_is_rejected() {
        let mut annotation = Annotation::default();
        annotation.in_args.insert(0, ParamAnnotation::default());
        let draft = vec![arg("handle", ScalarType::Handle, 0, true)];
        assert!(apply_annotation("tixiFoo", draft, &annotation).is_err());
    }
}
