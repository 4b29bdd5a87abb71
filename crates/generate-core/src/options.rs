//! Emitter options shared by every backend.

use std::collections::{BTreeMap, BTreeSet};

/// Configuration common to all backends. Deterministic (ordered) containers
/// throughout, so regenerating from identical inputs yields byte-identical
/// output.
#[derive(Debug, Clone, Default)]
pub struct EmitterOptions {
    /// Native name prefix dropped when deriving method names, e.g. `tixi3`.
    pub prefix: String,
    /// Base name of the native shared library, e.g. `tixi3`.
    pub library_name: String,
    /// License text reproduced as a comment block at the top of each file.
    pub license: Option<String>,
    /// Native function names to omit from the generated output.
    pub blacklist: BTreeSet<String>,
    /// Native name -> exposed name overrides.
    pub aliases: BTreeMap<String, String>,
}

impl EmitterOptions {
    pub fn is_blacklisted(&self, native: &str) -> bool {
        self.blacklist.contains(native)
    }
}
