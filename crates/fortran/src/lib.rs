//! Generates a Fortran 2003 module from the parsed model.
//!
//! Plain functions are exposed directly through `bind(C)` interface entries.
//! Functions that pass strings or `void*` get a private `_c` interface and a
//! public wrapper procedure in the `contains` section that appends
//! `C_NULL_CHAR` to input strings and converts returned `type(C_PTR)`
//! strings with a null-terminator scan helper.

pub mod generator;
pub mod options;

pub use generator::FortranGenerator;
pub use options::FortranOptions;
