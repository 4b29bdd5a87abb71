//! JSON run configuration for the binding pipeline.

use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};

/// The wrapper language to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Python,
    Fortran,
    Matlab,
}

/// One generation run, as read from a JSON file. Parser knobs (export macro,
/// handle and status-code type names, typedef overrides) and emitter knobs
/// (prefix, blacklist, aliases, injected method bodies) live side by side so
/// a single file describes the whole run.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub backend: Backend,
    /// Marker in front of exported declarations, e.g. `DLL_EXPORT`.
    pub export_macro: String,
    /// Name of the opaque handle type, e.g. `TixiDocumentHandle`.
    pub handle_type: String,
    /// Name of the status-code enum, e.g. `ReturnCode`.
    pub error_code_type: String,
    /// Native name prefix, e.g. `tixi`.
    pub prefix: String,
    /// Base name of the native shared library.
    pub library_name: String,
    /// Fortran module name; falls back to the prefix.
    #[serde(default)]
    pub module_name: Option<String>,
    /// Typedef overrides for aliases the header itself does not resolve.
    #[serde(default)]
    pub typedefs: BTreeMap<String, String>,
    #[serde(default)]
    pub blacklist: BTreeSet<String>,
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
    /// Existence-check carve-outs for the Python backend, native name to the
    /// status member treated as `False` (`null` for any failure).
    #[serde(default)]
    pub bool_methods: BTreeMap<String, Option<String>>,
    #[serde(default)]
    pub license: Option<String>,
    #[serde(default)]
    pub user_functions: Option<String>,
    #[serde(default)]
    pub post_constructor: Option<String>,
    #[serde(default)]
    pub close_function: Option<String>,
}

impl Config {
    pub fn module_name(&self) -> String {
        self.module_name.clone().unwrap_or_else(|| self.prefix.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_parses_with_defaults() {
        let json = r#"{
            "backend": "python",
            "export_macro": "DLL_EXPORT",
            "handle_type": "TixiDocumentHandle",
            "error_code_type": "ReturnCode",
            "prefix": "tixi",
            "library_name": "tixi3"
        }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.backend, Backend::Python);
        assert!(config.blacklist.is_empty());
        assert_eq!(config.module_name(), "tixi");
    }

    #[test]
    fn test_bool_methods_accept_null_failure_code() {
        let json = r#"{
            "backend": "fortran",
            "export_macro": "DLL_EXPORT",
            "handle_type": "H",
            "error_code_type": "ReturnCode",
            "prefix": "tixi",
            "library_name": "tixi3",
            "module_name": "tixi",
            "bool_methods": {
                "tixiCheckElement": "ELEMENT_NOT_FOUND",
                "tixiUIDCheckExists": null
            }
        }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(
            config.bool_methods["tixiCheckElement"],
            Some("ELEMENT_NOT_FOUND".to_string())
        );
        assert_eq!(config.bool_methods["tixiUIDCheckExists"], None);
        assert_eq!(config.module_name(), "tixi");
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        let json = r#"{
            "backend": "java",
            "export_macro": "DLL_EXPORT",
            "handle_type": "H",
            "error_code_type": "ReturnCode",
            "prefix": "tixi",
            "library_name": "tixi3"
        }"#;
        assert!(serde_json::from_str::<Config>(json).is_err());
    }
}
