//! Error type shared by every stage of LUT generation.

/// Errors produced while parsing presets, building tables, or writing `.cube` files.
#[derive(Debug, thiserror::Error)]
pub enum LutError {
    #[error("unknown step type `{kind}`")]
    UnknownStep { kind: String },

    #[error("step `{step}` is missing required parameter `{param}`")]
    MissingParameter { step: &'static str, param: &'static str },

    #[error("step `{step}` has invalid parameter `{param}`: {reason}")]
    InvalidParameter {
        step: &'static str,
        param: String,
        reason: String,
    },

    #[error("pipeline contains no steps")]
    EmptyPipeline,

    #[error("preset title is empty")]
    EmptyTitle,

    #[error("preset title {0:?} contains a line break or double quote")]
    InvalidTitle(String),

    #[error("no preset named `{0}`")]
    UnknownPreset(String),

    #[error("grid size must be between 2 and 256, got {0}")]
    InvalidGridSize(u32),

    #[error("malformed .cube data at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid preset catalog: {0}")]
    Json(#[from] serde_json::Error),
}

impl LutError {
    /// Whether this error comes from malformed presets or generation options
    /// rather than from I/O or artifact decoding.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::UnknownStep { .. }
                | Self::MissingParameter { .. }
                | Self::InvalidParameter { .. }
                | Self::EmptyPipeline
                | Self::EmptyTitle
                | Self::InvalidTitle(_)
                | Self::UnknownPreset(_)
                | Self::InvalidGridSize(_)
        )
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, LutError>;
