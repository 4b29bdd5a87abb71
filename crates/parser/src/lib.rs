//! Parses a restricted subset of C declarations into the semantic model.
//!
//! The grammar covers what the wrapped library's header actually uses:
//! `enum NAME { ... };` blocks, scalar `typedef` lines, and exported function
//! prototypes optionally preceded by an `#annotate ... #` comment. Everything
//! else in the header is ignored. One call to [`HeaderParser::parse`] builds
//! a frozen [`bindweave_model::HeaderInterface`]; no state is shared between
//! parse calls.

pub mod annotation;
pub mod declaration;
pub mod error;
pub mod header;
pub mod resolve;
pub mod roles;

pub use roles::{apply_annotation, infer_default_roles};

pub use annotation::parse_annotation;
pub use declaration::{RawArgument, RawDeclaration, parse_declaration};
pub use error::ParseError;
pub use header::{HeaderParser, ParserOptions};
