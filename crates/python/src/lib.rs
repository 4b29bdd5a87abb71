//! Generates a Python/ctypes wrapper module from the parsed model.
//!
//! The emitted file contains the license header, one constant class per
//! enum (with a `_names` reverse table), a structured exception type, a
//! `catch_error` helper, and a wrapper class with one method per
//! non-blacklisted native function. Hand-written method bodies and
//! constructor tail lines from the configuration are injected verbatim.

pub mod generator;
pub mod options;

pub use generator::PythonGenerator;
pub use options::PythonOptions;
