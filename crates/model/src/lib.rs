//! The semantic model of a parsed C header.
//!
//! One parse pass over a header produces a [`HeaderInterface`]: an ordered
//! list of function declarations plus the enum table. The model is frozen on
//! completion and handed to exactly one backend generator per run; nothing in
//! here is mutated after generation begins.

pub mod annotation;
pub mod argument;
pub mod enums;
pub mod function;
pub mod scalar;

pub use annotation::{Annotation, ParamAnnotation};
pub use argument::{Argument, ArrayInfo};
pub use enums::{EnumDecl, EnumTable};
pub use function::{FunctionDeclaration, HeaderInterface};
pub use scalar::ScalarType;
