use thiserror::Error;

/// Generation-time failure. Carries the full attribute dump of the offending
/// argument so an unsupported header declaration can be diagnosed from the
/// message alone; generation aborts rather than emitting wrong bindings.
#[derive(Error, Debug, Clone)]
pub enum GeneratorError {
    #[error("Cannot create wrapper for input argument in '{function}'\nArgument was:\n{argument}")]
    UnsupportedInput { function: String, argument: String },

    #[error("Cannot create wrapper for output argument in '{function}'\nArgument was:\n{argument}")]
    UnsupportedOutput { function: String, argument: String },

    #[error("Cannot create wrapper for return value of '{function}'\nArgument was:\n{argument}")]
    UnsupportedReturn { function: String, argument: String },

    #[error("Required enum '{0}' was not found in the parsed header")]
    MissingEnum(String),

    #[error("Unknown enum member '{member}' referenced for '{function}'")]
    UnknownEnumMember { function: String, member: String },
}
