//! Error types for the fallible edges of the gaze pipeline
//!
//! The numeric core (vergence, normalization) never fails; errors only come
//! from configuration, message parsing and caller-supplied geometry.

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    /// A vector had a component count other than 2 or 3,
    /// or a different count than the field declares
    #[error("Expected a {expected}-component vector, got {actual} components")]
    Dimension { expected: usize, actual: usize },

    #[error("Could not parse `{field}`: {reason}")]
    Parse { field: String, reason: String },

    #[error("Missing field: {0}")]
    MissingField(String),

    /// Gaze target coincides with the eye origin
    #[error("Gaze target coincides with the eye origin")]
    DegenerateTarget,
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}
