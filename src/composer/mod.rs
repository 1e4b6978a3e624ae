//! Assembles the sections of a generated program.
//!
//! The algorithm is shared by every target language; a `LanguageStyle`
//! only supplies syntax (comments, class layout, method signatures,
//! entry-point code).

mod javascript;
mod php;
mod python;

use log::debug;

use crate::error::GenerationResult;
use crate::params::{GenerationParams, Language};
use crate::registry::{FragmentKind, registry};
use crate::template::{Bindings, Template, dedup_lines, reindent};

pub use javascript::JavaScriptStyle;
pub use php::PhpStyle;
pub use python::PythonStyle;

/// Prompt sent by the smoke-test entry point.
pub const SMOKE_GREETING: &str = "Hello! Please introduce yourself in one sentence.";

/// Words that end the interactive loop, compared case-insensitively.
pub const EXIT_COMMANDS: [&str; 3] = ["exit", "quit", "q"];

/// Runtime values that are not part of `GenerationParams`.
#[derive(Debug, Clone)]
pub struct ComposeOptions {
    /// Safe prefix of the credential, embedded as the fallback literal.
    pub credential_preview: String,
    pub temperature: f32,
    pub system_prompt: String,
    pub max_file_size: u64,
    pub history_file: String,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self {
            credential_preview: String::from("..."),
            temperature: 0.7,
            system_prompt: String::from("You are a helpful assistant."),
            max_file_size: 100_000,
            history_file: String::from("chat_history.json"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Header,
    Imports,
    Setup,
    Auxiliary,
    Assistant,
    EntryPoint,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub kind: SectionKind,
    pub body: String,
}

/// Sections of one program, already in emission order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderedSections {
    sections: Vec<Section>,
}

impl OrderedSections {
    fn push(&mut self, kind: SectionKind, body: String) {
        self.sections.push(Section { kind, body });
    }

    pub fn iter(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }

    pub fn of_kind(&self, kind: SectionKind) -> impl Iterator<Item = &Section> {
        self.sections.iter().filter(move |s| s.kind == kind)
    }
}

/// Entry-point shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryPoint {
    /// Web by default, the interactive loop when `--cli` is passed.
    Dispatch,
    Web,
    Cli,
    /// One call with `SMOKE_GREETING`, result printed.
    Smoke,
}

/// `(web_ui, cli) -> EntryPoint`, covering all four combinations.
pub const ENTRY_POINT_RULES: [((bool, bool), EntryPoint); 4] = [
    ((true, true), EntryPoint::Dispatch),
    ((true, false), EntryPoint::Web),
    ((false, true), EntryPoint::Cli),
    ((false, false), EntryPoint::Smoke),
];

impl EntryPoint {
    pub fn select(web_ui: bool, cli: bool) -> EntryPoint {
        ENTRY_POINT_RULES
            .iter()
            .find(|(key, _)| *key == (web_ui, cli))
            .map(|(_, entry)| *entry)
            .unwrap_or(EntryPoint::Smoke)
    }

    /// Building blocks of this entry point, in output order.
    pub fn parts(&self) -> &'static [EntryPart] {
        match self {
            EntryPoint::Dispatch => &[EntryPart::WebServer, EntryPart::Repl, EntryPart::DispatchMain],
            EntryPoint::Web => &[EntryPart::WebServer, EntryPart::WebMain],
            EntryPoint::Cli => &[EntryPart::Repl, EntryPart::CliMain],
            EntryPoint::Smoke => &[EntryPart::SmokeMain],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryPart {
    WebServer,
    Repl,
    WebMain,
    CliMain,
    DispatchMain,
    SmokeMain,
}

/// Code plus the imports it needs.
#[derive(Debug, Clone, Default)]
pub struct Snippet {
    pub imports: Vec<String>,
    pub code: String,
}

impl Snippet {
    pub fn new(imports: &[&str], code: impl Into<String>) -> Self {
        Self {
            imports: imports.iter().map(|s| s.to_string()).collect(),
            code: code.into(),
        }
    }
}

/// Names the generated code uses for runtime values.
#[derive(Debug, Clone, Copy)]
pub struct RuntimeNames {
    pub user_input: &'static str,
    pub system_prompt: &'static str,
    pub temperature: &'static str,
    pub credential: &'static str,
}

/// Syntax of one target language.
pub trait LanguageStyle: Sync {
    fn language(&self) -> Language;

    /// Line emitted before the header comment.
    fn prologue(&self) -> Option<&'static str> {
        None
    }

    fn comment_prefix(&self) -> &'static str;

    fn indent_unit(&self) -> &'static str;

    /// Imports every program needs, emitted after all others.
    fn base_imports(&self) -> &'static [&'static str] {
        &[]
    }

    fn runtime_names(&self) -> RuntimeNames;

    /// A string literal holding `value`.
    fn string_literal(&self, value: &str) -> String;

    /// Statement reading the key from `env_var`, falling back to `fallback`.
    fn credential_line(&self, env_var: &str, fallback: &str) -> String;

    fn class_open(&self) -> &'static str;

    fn class_close(&self) -> Option<&'static str>;

    /// Members placed before the constructor.
    fn fields(&self) -> Option<&'static str> {
        None
    }

    /// Constructor storing the key and running `setup`.
    fn constructor(&self, setup: &str) -> String;

    /// The AI-call method wrapping `call`.
    fn call_method(&self, call: &str, system_prompt: &str, temperature: f32) -> String;

    /// Private helpers the call templates depend on.
    fn support_methods(&self) -> &'static [&'static str] {
        &[]
    }

    fn entry_part(&self, part: EntryPart) -> Snippet;
}

static PYTHON: PythonStyle = PythonStyle;
static JAVASCRIPT: JavaScriptStyle = JavaScriptStyle;
static PHP: PhpStyle = PhpStyle;

pub fn style_for(language: Language) -> &'static dyn LanguageStyle {
    match language {
        Language::Python => &PYTHON,
        Language::JavaScript => &JAVASCRIPT,
        Language::Php => &PHP,
    }
}

/// Compose the sections of the program described by `params`.
pub fn compose(params: &GenerationParams, options: &ComposeOptions) -> GenerationResult<OrderedSections> {
    let registry = registry();
    let style = style_for(params.language);
    let provider = registry.provider(params.api);
    let client = provider.client(params.language)?;
    let names = style.runtime_names();
    let member_indent = style.indent_unit();

    let bindings = Bindings::new()
        .bind("model", params.model.as_str())
        .bind("system_prompt", names.system_prompt)
        .bind("user_input", names.user_input)
        .bind("temperature", names.temperature)
        .bind("credential", names.credential)
        .bind("max_file_size", options.max_file_size.to_string())
        .bind("history_file", style.string_literal(&options.history_file));

    let mut imports: Vec<String> = client.imports.clone();
    let mut auxiliary = Vec::new();
    let mut members = Vec::new();

    if let Some(fields) = style.fields() {
        members.push(fields.to_string());
    }
    members.push(style.constructor(&client.setup.render(&bindings)?));
    members.push(style.call_method(
        &client.call.render(&bindings)?,
        &options.system_prompt,
        options.temperature,
    ));
    members.extend(style.support_methods().iter().map(|m| m.to_string()));

    let mut labels = Vec::new();
    for feature in params.features.iter() {
        let fragment = registry.feature(feature, params.language)?;
        labels.push(registry.feature_entry(feature).label);
        imports.extend(fragment.imports.iter().cloned());
        match &fragment.kind {
            FragmentKind::Inline { methods } => {
                members.push(methods.render(&bindings)?);
            }
            FragmentKind::StandaloneType { definition, integration } => {
                let definition = definition.render(&bindings)?;
                if !auxiliary.contains(&definition) {
                    auxiliary.push(definition);
                }
                members.push(integration.render(&bindings)?);
            }
        }
    }

    let entry = EntryPoint::select(params.web_ui, params.cli);
    let mut entry_code = Vec::new();
    for part in entry.parts() {
        let snippet = style.entry_part(*part);
        imports.extend(snippet.imports);
        entry_code.push(Template::new(snippet.code).render(&bindings)?);
    }
    imports.extend(style.base_imports().iter().map(|s| s.to_string()));

    let mut sections = OrderedSections::default();
    sections.push(SectionKind::Header, header(style, provider.display_name, params, &labels));
    sections.push(SectionKind::Imports, dedup_lines(imports).join("\n"));
    sections.push(
        SectionKind::Setup,
        style.credential_line(provider.env_var, &style.string_literal(&options.credential_preview)),
    );
    for definition in auxiliary {
        sections.push(SectionKind::Auxiliary, definition);
    }
    sections.push(SectionKind::Assistant, assistant_body(style, &members, member_indent));
    sections.push(SectionKind::EntryPoint, entry_code.join("\n\n"));

    debug!(
        "Composed {} program: {:?} entry point, {} sections",
        params.language,
        entry,
        sections.sections.len()
    );
    Ok(sections)
}

fn header(style: &dyn LanguageStyle, provider: &str, params: &GenerationParams, labels: &[&str]) -> String {
    let features = if labels.is_empty() {
        "none (no additional features)".to_string()
    } else {
        labels.join(", ")
    };
    let prefix = style.comment_prefix();
    let mut lines = Vec::new();
    if let Some(prologue) = style.prologue() {
        lines.push(prologue.to_string());
    }
    lines.push(format!("{} Generated AI assistant", prefix));
    lines.push(format!("{} Provider: {}", prefix, provider));
    lines.push(format!("{} Model: {}", prefix, params.model));
    lines.push(format!("{} Features: {}", prefix, features));
    lines.join("\n")
}

fn assistant_body(style: &dyn LanguageStyle, members: &[String], indent: &str) -> String {
    let mut out = String::from(style.class_open());
    for (i, member) in members.iter().enumerate() {
        out.push('\n');
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&reindent(member, indent));
    }
    if let Some(close) = style.class_close() {
        out.push('\n');
        out.push_str(close);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitter::emit;
    use crate::interpreter::Interpreter;
    use crate::params::{Api, Feature, FeatureSet};

    const KEY: &str = "sk-123456";

    fn options() -> ComposeOptions {
        ComposeOptions {
            credential_preview: "sk-1...".to_string(),
            ..ComposeOptions::default()
        }
    }

    fn params(language: Language, api: Api, features: &[Feature], web_ui: bool, cli: bool) -> GenerationParams {
        GenerationParams {
            language,
            api,
            model: registry().provider(api).default_model().to_string(),
            features: features.iter().copied().collect::<FeatureSet>(),
            web_ui,
            cli,
        }
    }

    fn all_params() -> Vec<GenerationParams> {
        let mut out = Vec::new();
        for language in Language::ALL {
            for api in Api::ALL {
                for (web_ui, cli) in [(true, true), (true, false), (false, true), (false, false)] {
                    out.push(params(language, api, &Feature::CANONICAL, web_ui, cli));
                    out.push(params(language, api, &[], web_ui, cli));
                }
            }
        }
        out
    }

    #[test]
    fn test_entry_point_rules_are_exhaustive() {
        assert_eq!(EntryPoint::select(true, true), EntryPoint::Dispatch);
        assert_eq!(EntryPoint::select(true, false), EntryPoint::Web);
        assert_eq!(EntryPoint::select(false, true), EntryPoint::Cli);
        assert_eq!(EntryPoint::select(false, false), EntryPoint::Smoke);
        for ((web_ui, cli), entry) in ENTRY_POINT_RULES {
            assert_eq!(EntryPoint::select(web_ui, cli), entry);
            assert!(!entry.parts().is_empty());
        }
    }

    #[test]
    fn test_style_lookup() {
        for language in Language::ALL {
            assert_eq!(style_for(language).language(), language);
        }
    }

    #[test]
    fn test_section_order() {
        let params = params(Language::Python, Api::OpenAI, &[Feature::Memory], false, true);
        let sections = compose(&params, &options()).unwrap();
        let kinds: Vec<_> = sections.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SectionKind::Header,
                SectionKind::Imports,
                SectionKind::Setup,
                SectionKind::Auxiliary,
                SectionKind::Assistant,
                SectionKind::EntryPoint,
            ]
        );
    }

    #[test]
    fn test_python_memory_cli_program() {
        let params = Interpreter::new().interpret("build a python assistant using openai with memory, cli mode");
        let sections = compose(&params, &options()).unwrap();
        let auxiliary: Vec<_> = sections.of_kind(SectionKind::Auxiliary).collect();
        assert_eq!(auxiliary.len(), 1);
        assert!(auxiliary[0].body.starts_with("class ConversationMemory:"));

        let source = emit(&sections);
        assert_eq!(source.matches("class ConversationMemory").count(), 1);
        assert_eq!(source.matches("def run_cli(").count(), 1);
        assert!(source.contains("EXIT_COMMANDS = {\"exit\", \"quit\", \"q\"}"));
        assert!(source.contains("line.strip().lower() in EXIT_COMMANDS"));
        assert!(source.contains("print(\"Goodbye!\")"));
        assert!(!source.contains("run_web"));
        assert!(!source.contains("HTTPServer"));
        assert!(source.contains("    def init_memory(self, path=\"chat_history.json\"):"));
        assert!(source.contains("    def ask_with_memory(self, prompt):"));
        assert!(source.contains("model=\"gpt-4o-mini\""));
        assert!(source.contains("# Features: memory"));
    }

    #[test]
    fn test_dispatch_defaults_to_web() {
        for language in Language::ALL {
            let params = params(language, Api::OpenAI, &[], true, true);
            let source = emit(&compose(&params, &options()).unwrap());
            assert!(source.contains("--cli"), "{language}");
            let (web, cli) = match language {
                Language::Python => ("run_web(assistant)", "run_cli(assistant)"),
                Language::JavaScript => ("runWeb(assistant);", "runCli(assistant);"),
                Language::Php => ("runWeb($assistant);", "runCli($assistant);"),
            };
            let dispatch = source.rsplit("--cli").next().unwrap();
            let cli_at = dispatch.find(cli).unwrap();
            let web_at = dispatch.find(web).unwrap();
            assert!(cli_at < web_at, "{language}: flag branch selects cli, else web");
            let between = &dispatch[cli_at..web_at];
            assert!(between.contains("else"), "{language}: web is the fallback branch");
        }
    }

    #[test]
    fn test_smoke_entry_when_no_ui_requested() {
        for language in Language::ALL {
            let params = params(language, Api::Anthropic, &[], false, false);
            let sections = compose(&params, &options()).unwrap();
            let entry = sections.of_kind(SectionKind::EntryPoint).next().unwrap();
            assert!(entry.body.contains(SMOKE_GREETING), "{language}");
            assert!(!entry.body.trim().is_empty());
        }
    }

    #[test]
    fn test_imports_are_deduplicated() {
        for params in all_params() {
            let sections = compose(&params, &options()).unwrap();
            let imports = sections.of_kind(SectionKind::Imports).next().unwrap();
            let lines: Vec<_> = imports.body.lines().collect();
            let unique: std::collections::HashSet<_> = lines.iter().collect();
            assert_eq!(lines.len(), unique.len(), "{:?}", params);
        }
    }

    #[test]
    fn test_python_imports_keep_first_occurrence_order() {
        let params = params(Language::Python, Api::OpenAI, &Feature::CANONICAL, true, true);
        let sections = compose(&params, &options()).unwrap();
        let imports = &sections.of_kind(SectionKind::Imports).next().unwrap().body;
        assert_eq!(
            imports.lines().collect::<Vec<_>>(),
            vec![
                "from openai import OpenAI",
                "from pathlib import Path",
                "import json",
                "import urllib.request",
                "from http.server import BaseHTTPRequestHandler, HTTPServer",
                "import sys",
                "import os",
            ]
        );
    }

    #[test]
    fn test_no_placeholder_survives() {
        for params in all_params() {
            let source = emit(&compose(&params, &options()).unwrap());
            for name in crate::template::PLACEHOLDERS {
                assert!(!source.contains(&format!("{{{}}}", name)), "{name} left in {:?}", params);
            }
        }
    }

    #[test]
    fn test_credential_preview_only() {
        for params in all_params() {
            let source = emit(&compose(&params, &options()).unwrap());
            assert!(!source.contains(KEY));
            assert!(source.contains("sk-1..."));
        }
    }

    #[test]
    fn test_compose_is_deterministic() {
        for params in all_params() {
            let first = emit(&compose(&params, &options()).unwrap());
            let second = emit(&compose(&params, &options()).unwrap());
            assert_eq!(first, second);
        }
    }

    /// Rendered blocks of `feature` and the section each one lands in.
    fn feature_blocks(feature: Feature, language: Language, model: &str) -> Vec<(SectionKind, String)> {
        let style = style_for(language);
        let names = style.runtime_names();
        let bindings = Bindings::new()
            .bind("model", model)
            .bind("system_prompt", names.system_prompt)
            .bind("user_input", names.user_input)
            .bind("temperature", names.temperature)
            .bind("credential", names.credential)
            .bind("max_file_size", "100000")
            .bind("history_file", style.string_literal("chat_history.json"));
        let member = |template: &Template| reindent(&template.render(&bindings).unwrap(), style.indent_unit());
        match &registry().feature(feature, language).unwrap().kind {
            FragmentKind::Inline { methods } => vec![(SectionKind::Assistant, member(methods))],
            FragmentKind::StandaloneType { definition, integration } => vec![
                (SectionKind::Auxiliary, definition.render(&bindings).unwrap()),
                (SectionKind::Assistant, member(integration)),
            ],
        }
    }

    fn section_text(sections: &OrderedSections, kind: SectionKind) -> String {
        sections.of_kind(kind).map(|s| s.body.as_str()).collect::<Vec<_>>().join("\n")
    }

    #[test]
    fn test_feature_code_is_monotonic() {
        for language in Language::ALL {
            let larger = params(language, Api::DeepSeek, &Feature::CANONICAL, false, true);
            let large_sections = compose(&larger, &options()).unwrap();
            for feature in Feature::CANONICAL {
                let smaller = params(language, Api::DeepSeek, &[feature], false, true);
                assert!(smaller.features.is_subset(&larger.features));
                let small_sections = compose(&smaller, &options()).unwrap();
                for (kind, block) in feature_blocks(feature, language, &smaller.model) {
                    assert!(
                        section_text(&small_sections, kind).contains(block.trim()),
                        "{language} {feature} {kind:?} missing alone"
                    );
                    assert!(
                        section_text(&large_sections, kind).contains(block.trim()),
                        "{language} {feature} {kind:?} missing with all features"
                    );
                }
            }
            assert_eq!(large_sections.of_kind(SectionKind::Auxiliary).count(), 1, "{language}");
        }
    }

    #[test]
    fn test_feature_methods_are_indented_into_the_class() {
        let params = params(Language::JavaScript, Api::Mistral, &[Feature::ExternalApi], false, false);
        let source = emit(&compose(&params, &options()).unwrap());
        assert!(source.contains("\n  async callExternalApi(url, payload = null, headers = {}) {\n    const response"));
        assert!(source.contains("const { Mistral } = require(\"@mistralai/mistralai\");"));
        assert!(source.contains("this.client = new Mistral({ apiKey: this.apiKey });"));
    }

    #[test]
    fn test_empty_feature_marker() {
        let params = params(Language::Php, Api::Gemini, &[], true, false);
        let sections = compose(&params, &options()).unwrap();
        let header = &sections.of_kind(SectionKind::Header).next().unwrap().body;
        assert!(header.starts_with("<?php\n"));
        assert!(header.contains("// Features: none (no additional features)"));
        assert!(header.contains("// Model: gemini-1.5-flash"));
        assert_eq!(sections.of_kind(SectionKind::Auxiliary).count(), 0);
    }
}
