use thiserror::Error;

/// Error type returned by user supplied transformers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors surfaced by a transform call.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MapError {
    /// The JSON value is neither an object nor an array of objects.
    #[error("the JSON input must be either an object or an array of objects, found {found}")]
    InvalidInput { found: &'static str },

    /// A JSON array was paired with an existing instance.
    #[error("cannot transform a JSON array into an existing object")]
    InvalidTarget,

    /// A mapping names a destination that has no setter on the target type.
    #[error("`{type_name}` has no writable field named `{field}`")]
    UnknownField {
        type_name: &'static str,
        field: String,
    },

    /// The mapped result does not have the shape or type the caller asked for.
    #[error("expected {expected}, found {found}")]
    UnexpectedResult {
        expected: &'static str,
        found: &'static str,
    },

    /// A per-field transformer failed.
    #[error(transparent)]
    Callback(BoxError),
}

/// Conversion failure raised by a field setter.
///
/// The mapper treats it like a missing source value: the field is skipped and
/// keeps whatever it held before the transform.
#[derive(Debug, Error)]
pub enum FieldError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("expected {expected}, found {found}")]
    Type {
        expected: &'static str,
        found: &'static str,
    },
}
