//! The parsed form of an `#annotate ... #` comment.

use serde::Serialize;
use std::collections::BTreeMap;

/// Role override for a single argument referenced by an annotation entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParamAnnotation {
    pub is_array: bool,
    /// 1-based indices of the arguments carrying this array's size.
    pub size_indices: Vec<usize>,
    /// `AM`: the caller preallocates the array, no size pairing.
    pub manual_size: bool,
}

/// An author-supplied override of the default argument-role inference,
/// bound to the next function declaration in the source.
///
/// Indices are 1-based positions into that function's argument list. The
/// keyword fields use `Option` so that an absent keyword keeps the inferred
/// default instead of forcing one.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Annotation {
    pub in_args: BTreeMap<usize, ParamAnnotation>,
    pub out_args: BTreeMap<usize, ParamAnnotation>,
    /// `Some(false)` for `nohandle`, `Some(true)` for the confirming
    /// `handle` keyword.
    pub uses_handle: Option<bool>,
    /// `Some(false)` for `noerror`.
    pub returns_error_code: Option<bool>,
}
