//! Generates Python/ctypes, Fortran 2003 and MATLAB wrappers from a C
//! header whose exported functions follow a handle-and-status-code calling
//! convention, optionally refined by `#annotate ... #` comments.
//!
//! The pipeline has three stages: [`bindweave_parser`] extracts function
//! declarations, enums and typedefs into an immutable model, the configured
//! backend crate turns that model into wrapper source text, and
//! [`pipeline::run`] writes the result wholesale. A run either fully parses
//! and fully generates, or fails with a [`BindError`] without emitting
//! anything.

pub mod config;
pub mod error;
pub mod pipeline;

pub use config::{Backend, Config};
pub use error::BindError;
pub use pipeline::{generate, run};
