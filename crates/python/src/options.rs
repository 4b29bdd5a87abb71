use bindweave_generate_core::EmitterOptions;
use std::collections::BTreeMap;

/// Python-specific emitter configuration.
#[derive(Debug, Clone, Default)]
pub struct PythonOptions {
    pub common: EmitterOptions,
    /// Name of the status-code enum; its first member is the success code.
    pub error_enum: String,
    /// Hand-written methods injected into the wrapper class verbatim.
    pub user_functions: Option<String>,
    /// Lines appended to the generated constructor.
    pub post_constructor: Option<String>,
    /// Exposed method the destructor calls, usually `close`.
    pub close_function: Option<String>,
    /// Native functions wrapped as existence checks: success returns
    /// `True`, the named failure code returns `False` (any failure when
    /// `None`), everything else raises. This table preserves the carve-outs
    /// of the hand-maintained reference wrapper.
    pub bool_methods: BTreeMap<String, Option<String>>,
}
