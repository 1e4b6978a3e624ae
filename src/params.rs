use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GenerationError;

/// Target language of the generated program.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Python,
    JavaScript,
    Php,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::Python, Language::JavaScript, Language::Php];

    /// File extension used when the generated source is written to disk.
    pub fn extension(&self) -> &'static str {
        match self {
            Language::Python => "py",
            Language::JavaScript => "js",
            Language::Php => "php",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::Python => write!(f, "python"),
            Language::JavaScript => write!(f, "javascript"),
            Language::Php => write!(f, "php"),
        }
    }
}

impl FromStr for Language {
    type Err = GenerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "python" | "py" => Ok(Language::Python),
            "javascript" | "js" | "node" | "nodejs" => Ok(Language::JavaScript),
            "php" => Ok(Language::Php),
            _ => Err(GenerationError::UnsupportedLanguage(s.to_string())),
        }
    }
}

/// AI provider the generated assistant talks to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Api {
    #[default]
    OpenAI,
    Anthropic,
    DeepSeek,
    Gemini,
    Mistral,
}

impl Api {
    pub const ALL: [Api; 5] = [Api::OpenAI, Api::Anthropic, Api::DeepSeek, Api::Gemini, Api::Mistral];
}

impl fmt::Display for Api {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Api::OpenAI => write!(f, "openai"),
            Api::Anthropic => write!(f, "anthropic"),
            Api::DeepSeek => write!(f, "deepseek"),
            Api::Gemini => write!(f, "gemini"),
            Api::Mistral => write!(f, "mistral"),
        }
    }
}

/// Optional capability added to the generated assistant.
///
/// Variant order is the canonical application order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    FileHandling,
    Memory,
    ExternalApi,
}

impl Feature {
    pub const CANONICAL: [Feature; 3] = [Feature::FileHandling, Feature::Memory, Feature::ExternalApi];
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feature::FileHandling => write!(f, "file_handling"),
            Feature::Memory => write!(f, "memory"),
            Feature::ExternalApi => write!(f, "external_api"),
        }
    }
}

/// Set of features, always iterated in canonical order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureSet(BTreeSet<Feature>);

impl FeatureSet {
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    pub fn insert(&mut self, feature: Feature) -> bool {
        self.0.insert(feature)
    }

    pub fn contains(&self, feature: Feature) -> bool {
        self.0.contains(&feature)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_subset(&self, other: &FeatureSet) -> bool {
        self.0.is_subset(&other.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = Feature> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Feature> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Structured parameters inferred from a task description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub language: Language,
    pub api: Api,
    pub model: String,
    pub features: FeatureSet,
    pub web_ui: bool,
    pub cli: bool,
}

impl GenerationParams {
    /// Replace the inferred language with an explicit choice.
    pub fn with_language(self, language: Language) -> Self {
        Self { language, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_from_str() {
        assert_eq!("Python".parse::<Language>().unwrap(), Language::Python);
        assert_eq!(" js ".parse::<Language>().unwrap(), Language::JavaScript);
        assert_eq!("php".parse::<Language>().unwrap(), Language::Php);
        assert_eq!(
            "cobol".parse::<Language>(),
            Err(GenerationError::UnsupportedLanguage("cobol".to_string()))
        );
    }

    #[test]
    fn test_feature_set_iterates_in_canonical_order() {
        let set: FeatureSet = [Feature::ExternalApi, Feature::FileHandling, Feature::ExternalApi]
            .into_iter()
            .collect();
        let order: Vec<_> = set.iter().collect();
        assert_eq!(order, vec![Feature::FileHandling, Feature::ExternalApi]);
        assert_eq!(set.len(), 2);
    }
}
