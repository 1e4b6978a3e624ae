use std::fmt;

use log::{info, warn};
use serde::Serialize;

use crate::composer::{ComposeOptions, compose};
use crate::config::GenerationConfig;
use crate::emitter::emit;
use crate::error::{GenerationError, GenerationResult};
use crate::interpreter::Interpreter;
use crate::params::{GenerationParams, Language};

/// Input collected by the front end.
#[derive(Debug, Clone, Default)]
pub struct GenerationRequest {
    pub task: String,
    pub credential: String,
    /// Explicit language name overriding the inferred one.
    pub language: Option<String>,
}

impl GenerationRequest {
    pub fn new(task: impl Into<String>, credential: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            credential: credential.into(),
            language: None,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail")]
pub enum GenerationStatus {
    Success,
    EmptyInput,
    MissingCredential,
    UnsupportedLanguage(String),
    Failure(String),
}

impl GenerationStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, GenerationStatus::Success)
    }
}

impl From<GenerationError> for GenerationStatus {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::EmptyInput => GenerationStatus::EmptyInput,
            GenerationError::MissingCredential => GenerationStatus::MissingCredential,
            GenerationError::UnsupportedLanguage(value) => GenerationStatus::UnsupportedLanguage(value),
            other => GenerationStatus::Failure(other.to_string()),
        }
    }
}

impl fmt::Display for GenerationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationStatus::Success => write!(f, "Code generated successfully"),
            GenerationStatus::EmptyInput => write!(f, "Please enter a task description"),
            GenerationStatus::MissingCredential => write!(f, "An API key is required"),
            GenerationStatus::UnsupportedLanguage(value) => write!(f, "Unsupported language: {}", value),
            GenerationStatus::Failure(reason) => write!(f, "Generation failed: {}", reason),
        }
    }
}

/// Result handed back to the front end. `source` is empty unless the
/// status is `Success`.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationOutcome {
    pub source: String,
    pub status: GenerationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<GenerationParams>,
}

impl GenerationOutcome {
    fn rejected(status: GenerationStatus) -> Self {
        Self {
            source: String::new(),
            status,
            params: None,
        }
    }
}

/// Shorter credentials are treated as missing. A key that short could occur
/// verbatim in the generated code.
pub const MIN_CREDENTIAL_CHARS: usize = 8;

/// Validates requests and drives interpreter, composer and emitter.
pub struct Generator {
    interpreter: Interpreter,
    settings: GenerationConfig,
}

impl Generator {
    pub fn new(settings: GenerationConfig) -> Self {
        Self {
            interpreter: Interpreter::new(),
            settings,
        }
    }

    /// Generate a program. Errors never escape: they are reported through
    /// the outcome's status.
    pub fn generate(&self, request: &GenerationRequest) -> GenerationOutcome {
        match self.try_generate(request) {
            Ok((params, source)) => {
                info!(
                    "Generated {} assistant for {} ({}), {} bytes",
                    params.language,
                    params.api,
                    params.model,
                    source.len()
                );
                GenerationOutcome {
                    source,
                    status: GenerationStatus::Success,
                    params: Some(params),
                }
            }
            Err(err) => {
                warn!("Generation rejected: {}", err);
                GenerationOutcome::rejected(err.into())
            }
        }
    }

    /// Parameters the request would be generated with.
    pub fn resolve(&self, request: &GenerationRequest) -> GenerationResult<GenerationParams> {
        if request.task.trim().is_empty() {
            return Err(GenerationError::EmptyInput);
        }
        let language = request
            .language
            .as_deref()
            .map(str::parse::<Language>)
            .transpose()?;
        let params = self.interpreter.interpret(&request.task);
        Ok(match language {
            Some(language) => params.with_language(language),
            None => params,
        })
    }

    fn try_generate(&self, request: &GenerationRequest) -> GenerationResult<(GenerationParams, String)> {
        if request.task.trim().is_empty() {
            return Err(GenerationError::EmptyInput);
        }
        if request.credential.trim().chars().count() < MIN_CREDENTIAL_CHARS {
            return Err(GenerationError::MissingCredential);
        }
        let params = self.resolve(request)?;
        let options = ComposeOptions {
            credential_preview: credential_preview(&request.credential, self.settings.credential_preview_chars),
            temperature: self.settings.default_temperature,
            system_prompt: self.settings.system_prompt.clone(),
            max_file_size: self.settings.max_file_size,
            history_file: self.settings.history_file.clone(),
        };
        let sections = compose(&params, &options)?;
        Ok((params, emit(&sections)))
    }
}

impl Default for Generator {
    fn default() -> Self {
        Self::new(GenerationConfig::default())
    }
}

/// Short prefix of `credential` that is safe to embed in generated code.
///
/// Takes at most `max_chars` characters and never more than half of the
/// credential, so the full value can't appear. Characters outside
/// `[A-Za-z0-9_-]` are masked so the preview never needs escaping.
pub fn credential_preview(credential: &str, max_chars: usize) -> String {
    let credential = credential.trim();
    let take = max_chars.min(credential.chars().count() / 2);
    let prefix: String = credential
        .chars()
        .take(take)
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '*' })
        .collect();
    format!("{}...", prefix)
}
