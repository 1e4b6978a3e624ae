use log::debug;

use crate::params::{Api, FeatureSet, GenerationParams, Language};
use crate::registry::{Keyword, Registry, any_matches, registry};

/// Language rules in priority order. The first matching rule wins.
const LANGUAGE_RULES: &[(Language, &[Keyword])] = &[
    (
        Language::Python,
        &[Keyword::Substring("python"), Keyword::Word("py")],
    ),
    (
        Language::JavaScript,
        &[
            Keyword::Substring("javascript"),
            Keyword::Substring("node.js"),
            Keyword::Substring("nodejs"),
            Keyword::Word("node"),
            Keyword::Word("js"),
        ],
    ),
    (
        Language::Php,
        &[Keyword::Substring("php"), Keyword::Substring("laravel")],
    ),
];

const WEB_UI_KEYWORDS: &[Keyword] = &[
    Keyword::Word("web"),
    Keyword::Substring("web interface"),
    Keyword::Substring("user interface"),
    Keyword::Substring("graphical interface"),
    Keyword::Substring("browser"),
    Keyword::Substring("website"),
    Keyword::Substring("oberfläche"),
    Keyword::Word("ui"),
    Keyword::Word("gui"),
];

const CLI_KEYWORDS: &[Keyword] = &[
    Keyword::Word("cli"),
    Keyword::Substring("command line"),
    Keyword::Substring("command-line"),
    Keyword::Substring("terminal"),
    Keyword::Substring("console"),
    Keyword::Substring("konsole"),
    Keyword::Substring("kommandozeile"),
    Keyword::Word("repl"),
];

/// Interprets a free-text task description into `GenerationParams`.
///
/// Interpretation never fails: every field falls back to a default when the
/// text says nothing about it.
pub struct Interpreter {
    registry: &'static Registry,
}

impl Interpreter {
    pub fn new() -> Self {
        Self { registry: registry() }
    }

    /// Interpret user input into `GenerationParams`.
    pub fn interpret(&self, input: &str) -> GenerationParams {
        let text = input.to_lowercase();

        let language = LANGUAGE_RULES
            .iter()
            .find(|(_, keywords)| any_matches(keywords, &text))
            .map(|(language, _)| *language)
            .unwrap_or_default();

        let api = self
            .registry
            .providers()
            .iter()
            .find(|provider| any_matches(&provider.keywords, &text))
            .map(|provider| provider.api)
            .unwrap_or_default();

        let model = self.resolve_model(api, &text);

        let features: FeatureSet = self
            .registry
            .features()
            .iter()
            .filter(|entry| any_matches(&entry.keywords, &text))
            .map(|entry| entry.feature)
            .collect();

        let params = GenerationParams {
            language,
            api,
            model,
            features,
            web_ui: any_matches(WEB_UI_KEYWORDS, &text),
            cli: any_matches(CLI_KEYWORDS, &text),
        };
        debug!("Interpreted {:?} as {:?}", input, params);
        params
    }

    /// First model of the provider, in declared order, named in the text.
    fn resolve_model(&self, api: Api, text: &str) -> String {
        let provider = self.registry.provider(api);
        provider
            .models
            .iter()
            .find(|model| text.contains(&model.to_lowercase()))
            .copied()
            .unwrap_or_else(|| provider.default_model())
            .to_string()
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
