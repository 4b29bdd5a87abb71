//! Generates a directory of MATLAB wrapper functions from the parsed model.
//!
//! Each non-blacklisted native function becomes one `.m` file of the same
//! name that validates its inputs and forwards to a common MEX gateway.
//! Each enum becomes one `.m` lookup function mapping member names to their
//! numeric values.

pub mod generator;
pub mod options;

pub use generator::MatlabGenerator;
pub use options::MatlabOptions;
