//! Shared abstractions for the backend generators: the [`Generator`] trait,
//! generated-file records, the common emitter options, and helpers for
//! method naming and license comment blocks.

pub mod error;
pub mod naming;
pub mod options;

pub use error::GeneratorError;
pub use naming::exposed_method_name;
pub use options::EmitterOptions;

use bindweave_model::HeaderInterface;

/// One file of generated wrapper source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// File name relative to the output target, e.g. `tixi3wrapper.py`.
    pub name: String,
    pub contents: String,
}

/// A backend that turns the parsed model into wrapper source files.
///
/// Generation either produces the complete file set or fails with a
/// diagnostic; partially correct wrapper code is never emitted.
pub trait Generator {
    fn generate(&self, model: &HeaderInterface) -> Result<Vec<GeneratedFile>, GeneratorError>;
}

/// Prefixes every line of `text` with a comment marker, for license headers.
pub fn comment_block(text: &str, marker: &str) -> String {
    let mut out = String::new();
    for line in text.lines() {
        if line.is_empty() {
            out.push_str(marker.trim_end());
        } else {
            out.push_str(marker);
            out.push_str(line);
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_block_prefixes_each_line() {
        let text = "Copyright\n\nAll rights reserved.";
        let block = comment_block(text, "! ");
        assert_eq!(block, "! Copyright\n!\n! All rights reserved.\n");
    }
}
