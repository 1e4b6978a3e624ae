//! Immutable catalog of provider client templates and feature fragments.
//!
//! The registry is built once on first use and shared read-only by every
//! generation request. Adding a provider or a feature means adding an entry
//! in `providers.rs` or `features.rs`; neither the interpreter nor the
//! composer needs to change.

mod features;
mod providers;

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::error::{GenerationError, GenerationResult};
use crate::params::{Api, Feature, Language};
use crate::template::Template;

static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::builtin);

/// The process-wide registry.
pub fn registry() -> &'static Registry {
    &REGISTRY
}

/// A vocabulary entry matched against lower-cased task text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    /// Matches anywhere in the text.
    Substring(&'static str),
    /// Matches only when not surrounded by letters or digits.
    Word(&'static str),
}

impl Keyword {
    /// `text` must already be lower-cased.
    pub fn matches(&self, text: &str) -> bool {
        match self {
            Keyword::Substring(needle) => text.contains(needle),
            Keyword::Word(word) => text.match_indices(word).any(|(start, matched)| {
                let before = text[..start].chars().next_back();
                let after = text[start + matched.len()..].chars().next();
                !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
            }),
        }
    }
}

/// Returns true if any keyword matches the lower-cased text.
pub fn any_matches(keywords: &[Keyword], text: &str) -> bool {
    keywords.iter().any(|k| k.matches(text))
}

/// How a provider's client is created and called in one language.
#[derive(Debug, Clone)]
pub struct ClientTemplate {
    pub imports: Vec<String>,
    /// Constructor statements; `{credential}` is the stored key field.
    pub setup: Template,
    /// Body of the AI-call method.
    pub call: Template,
}

#[derive(Debug, Clone)]
pub struct ProviderTemplate {
    pub api: Api,
    pub display_name: &'static str,
    /// Environment variable the generated program reads its key from.
    pub env_var: &'static str,
    /// Ordered model list; the first entry is the default.
    pub models: Vec<&'static str>,
    pub keywords: Vec<Keyword>,
    clients: HashMap<Language, ClientTemplate>,
}

impl ProviderTemplate {
    pub fn default_model(&self) -> &'static str {
        self.models[0]
    }

    pub fn supports_model(&self, model: &str) -> bool {
        self.models.iter().any(|m| *m == model)
    }

    pub fn client(&self, language: Language) -> GenerationResult<&ClientTemplate> {
        self.clients.get(&language).ok_or_else(|| {
            GenerationError::UnsupportedLanguage(format!("{} for {}", language, self.display_name))
        })
    }
}

/// Shape of a feature's contribution to the generated program.
#[derive(Debug, Clone)]
pub enum FragmentKind {
    /// Methods merged into the assistant type.
    Inline { methods: Template },
    /// A separate type emitted once, plus methods on the assistant that use it.
    StandaloneType {
        definition: Template,
        integration: Template,
    },
}

#[derive(Debug, Clone)]
pub struct FeatureFragment {
    pub imports: Vec<String>,
    pub kind: FragmentKind,
}

#[derive(Debug, Clone)]
pub struct FeatureEntry {
    pub feature: Feature,
    pub label: &'static str,
    pub keywords: Vec<Keyword>,
    fragments: HashMap<Language, FeatureFragment>,
}

pub struct Registry {
    providers: Vec<ProviderTemplate>,
    features: Vec<FeatureEntry>,
}

impl Registry {
    fn builtin() -> Self {
        let providers = providers::builtin();
        let features = features::builtin();
        debug_assert!(providers.iter().map(|p| p.api).eq(Api::ALL));
        debug_assert!(features.iter().map(|f| f.feature).eq(Feature::CANONICAL));
        Self { providers, features }
    }

    /// Providers in keyword priority order.
    pub fn providers(&self) -> &[ProviderTemplate] {
        &self.providers
    }

    pub fn provider(&self, api: Api) -> &ProviderTemplate {
        // builtin() registers exactly one entry per Api, in Api::ALL order
        &self.providers[api as usize]
    }

    /// Features in canonical order.
    pub fn features(&self) -> &[FeatureEntry] {
        &self.features
    }

    pub fn feature_entry(&self, feature: Feature) -> &FeatureEntry {
        &self.features[feature as usize]
    }

    pub fn feature(&self, feature: Feature, language: Language) -> GenerationResult<&FeatureFragment> {
        self.feature_entry(feature)
            .fragments
            .get(&language)
            .ok_or(GenerationError::MissingFragment { feature, language })
    }
}
