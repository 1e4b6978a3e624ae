use thiserror::Error;

use crate::params::{Feature, Language};

/// Errors raised while validating a request or composing a program.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("task description is empty")]
    EmptyInput,

    #[error("an API key is required")]
    MissingCredential,

    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("no {feature} fragment registered for {language}")]
    MissingFragment { feature: Feature, language: Language },

    #[error("template placeholder {{{name}}} has no binding")]
    UnboundPlaceholder { name: String },
}

pub type GenerationResult<T> = std::result::Result<T, GenerationError>;
