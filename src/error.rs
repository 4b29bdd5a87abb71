//! The top-level error type of the pipeline.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BindError {
    #[error("parse error: {0}")]
    Parse(#[from] bindweave_parser::ParseError),

    #[error("generation error: {0}")]
    Generate(#[from] bindweave_generate_core::GeneratorError),

    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
