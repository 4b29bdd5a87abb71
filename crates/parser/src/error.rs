use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ParseError {
    #[error("Cannot parse function declaration '{0}': {1}")]
    MalformedDeclaration(String, String),

    #[error("Cannot parse enum block '{0}': {1}")]
    MalformedEnum(String, String),

    #[error("Cannot parse annotation '{0}': {1}")]
    MalformedAnnotation(String, String),

    #[error("Argument {index} is marked both as input and as output")]
    ConflictingRole { index: usize },

    #[error("Annotation index {index} is out of range for function '{function}'")]
    AnnotationIndex { function: String, index: usize },

    #[error("Annotation on line {line} is not followed by a function declaration")]
    DanglingAnnotation { line: usize },

    #[error("Annotation on line {line} found while the annotation on line {pending} is still unbound")]
    DoubleAnnotation { line: usize, pending: usize },

    #[error("Type alias '{0}' does not resolve to a scalar or enum type")]
    TypeResolution(String),

    #[error("Unknown type in function '{function}'\nArgument was:\n{argument}")]
    UnknownType { function: String, argument: String },

    #[error("'{0}' is not a valid argument name")]
    ReservedName(String),

    #[error("Enum member '{member}' of '{name}' declares value {given}, expected {expected}")]
    EnumValueMismatch {
        name: String,
        member: String,
        given: i64,
        expected: usize,
    },
}
