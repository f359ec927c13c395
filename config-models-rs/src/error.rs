use thiserror::Error;

/// Errors raised while interpreting model values
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Unknown {kind} value: {value}")]
    UnknownVariant { kind: &'static str, value: String },
}

impl ModelError {
    pub fn unknown_variant(kind: &'static str, value: impl Into<String>) -> Self {
        ModelError::UnknownVariant {
            kind,
            value: value.into(),
        }
    }
}
