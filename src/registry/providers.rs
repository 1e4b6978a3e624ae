use std::collections::HashMap;

use super::{ClientTemplate, Keyword, ProviderTemplate};
use crate::params::{Api, Language};
use crate::template::Template;

fn client(imports: &[&str], setup: &str, call: &str) -> ClientTemplate {
    ClientTemplate {
        imports: imports.iter().map(|s| s.to_string()).collect(),
        setup: Template::new(setup),
        call: Template::new(call),
    }
}

/// Provider entries in keyword priority order: when the task text names
/// several providers the earliest entry wins.
pub(super) fn builtin() -> Vec<ProviderTemplate> {
    vec![
        ProviderTemplate {
            api: Api::OpenAI,
            display_name: "OpenAI",
            env_var: "OPENAI_API_KEY",
            models: vec!["gpt-4o-mini", "gpt-4o", "gpt-4-turbo", "gpt-3.5-turbo"],
            keywords: vec![
                Keyword::Substring("openai"),
                Keyword::Substring("chatgpt"),
                Keyword::Substring("gpt"),
            ],
            clients: openai_compatible(None, "https://api.openai.com/v1/chat/completions"),
        },
        ProviderTemplate {
            api: Api::Anthropic,
            display_name: "Anthropic",
            env_var: "ANTHROPIC_API_KEY",
            models: vec![
                "claude-3-5-sonnet-latest",
                "claude-3-5-haiku-latest",
                "claude-3-opus-latest",
            ],
            keywords: vec![Keyword::Substring("anthropic"), Keyword::Substring("claude")],
            clients: anthropic(),
        },
        ProviderTemplate {
            api: Api::DeepSeek,
            display_name: "DeepSeek",
            env_var: "DEEPSEEK_API_KEY",
            models: vec!["deepseek-chat", "deepseek-reasoner"],
            keywords: vec![Keyword::Substring("deepseek")],
            clients: openai_compatible(
                Some("https://api.deepseek.com"),
                "https://api.deepseek.com/chat/completions",
            ),
        },
        ProviderTemplate {
            api: Api::Gemini,
            display_name: "Google Gemini",
            env_var: "GEMINI_API_KEY",
            models: vec!["gemini-1.5-flash", "gemini-1.5-pro"],
            keywords: vec![Keyword::Substring("gemini"), Keyword::Substring("google")],
            clients: gemini(),
        },
        ProviderTemplate {
            api: Api::Mistral,
            display_name: "Mistral AI",
            env_var: "MISTRAL_API_KEY",
            models: vec!["mistral-large-latest", "mistral-small-latest", "open-mistral-nemo"],
            keywords: vec![Keyword::Substring("mistral")],
            clients: mistral(),
        },
    ]
}

/// OpenAI and every service speaking its chat-completions protocol.
fn openai_compatible(base_url: Option<&str>, endpoint: &str) -> HashMap<Language, ClientTemplate> {
    let python_setup = match base_url {
        Some(url) => format!("self.client = OpenAI(api_key={{credential}}, base_url=\"{}\")", url),
        None => "self.client = OpenAI(api_key={credential})".to_string(),
    };
    let js_setup = match base_url {
        Some(url) => format!("this.client = new OpenAI({{ apiKey: {{credential}}, baseURL: \"{}\" }});", url),
        None => "this.client = new OpenAI({ apiKey: {credential} });".to_string(),
    };

    HashMap::from([
        (
            Language::Python,
            client(
                &["from openai import OpenAI"],
                &python_setup,
                r#"response = self.client.chat.completions.create(
    model="{model}",
    messages=[
        {"role": "system", "content": {system_prompt}},
        {"role": "user", "content": {user_input}},
    ],
    temperature={temperature},
)
return response.choices[0].message.content"#,
            ),
        ),
        (
            Language::JavaScript,
            client(
                &[r#"const OpenAI = require("openai");"#],
                &js_setup,
                r#"const response = await this.client.chat.completions.create({
  model: "{model}",
  messages: [
    { role: "system", content: {system_prompt} },
    { role: "user", content: {user_input} },
  ],
  temperature: {temperature},
});
return response.choices[0].message.content;"#,
            ),
        ),
        (Language::Php, php_chat_completions(endpoint)),
    ])
}

fn php_chat_completions(endpoint: &str) -> ClientTemplate {
    let call = format!(
        r#"$payload = [
    'model' => '{{model}}',
    'messages' => [
        ['role' => 'system', 'content' => {{system_prompt}}],
        ['role' => 'user', 'content' => {{user_input}}],
    ],
    'temperature' => {{temperature}},
];
$data = $this->post('{}', $payload);
return $data['choices'][0]['message']['content'] ?? '';"#,
        endpoint
    );
    client(
        &[],
        r#"$this->headers = [
    'Content-Type: application/json',
    'Authorization: Bearer ' . {credential},
];"#,
        &call,
    )
}

fn anthropic() -> HashMap<Language, ClientTemplate> {
    HashMap::from([
        (
            Language::Python,
            client(
                &["import anthropic"],
                "self.client = anthropic.Anthropic(api_key={credential})",
                r#"message = self.client.messages.create(
    model="{model}",
    max_tokens=1024,
    system={system_prompt},
    messages=[{"role": "user", "content": {user_input}}],
    temperature={temperature},
)
return message.content[0].text"#,
            ),
        ),
        (
            Language::JavaScript,
            client(
                &[r#"const Anthropic = require("@anthropic-ai/sdk");"#],
                "this.client = new Anthropic({ apiKey: {credential} });",
                r#"const message = await this.client.messages.create({
  model: "{model}",
  max_tokens: 1024,
  system: {system_prompt},
  messages: [{ role: "user", content: {user_input} }],
  temperature: {temperature},
});
return message.content[0].text;"#,
            ),
        ),
        (
            Language::Php,
            client(
                &[],
                r#"$this->headers = [
    'Content-Type: application/json',
    'x-api-key: ' . {credential},
    'anthropic-version: 2023-06-01',
];"#,
                r#"$payload = [
    'model' => '{model}',
    'max_tokens' => 1024,
    'system' => {system_prompt},
    'messages' => [['role' => 'user', 'content' => {user_input}]],
    'temperature' => {temperature},
];
$data = $this->post('https://api.anthropic.com/v1/messages', $payload);
return $data['content'][0]['text'] ?? '';"#,
            ),
        ),
    ])
}

fn gemini() -> HashMap<Language, ClientTemplate> {
    HashMap::from([
        (
            Language::Python,
            client(
                &["import google.generativeai as genai"],
                r#"genai.configure(api_key={credential})
self.client = genai"#,
                r#"model = self.client.GenerativeModel("{model}", system_instruction={system_prompt})
response = model.generate_content(
    {user_input},
    generation_config={"temperature": {temperature}},
)
return response.text"#,
            ),
        ),
        (
            Language::JavaScript,
            client(
                &[r#"const { GoogleGenerativeAI } = require("@google/generative-ai");"#],
                "this.client = new GoogleGenerativeAI({credential});",
                r#"const model = this.client.getGenerativeModel({
  model: "{model}",
  systemInstruction: {system_prompt},
  generationConfig: { temperature: {temperature} },
});
const result = await model.generateContent({user_input});
return result.response.text();"#,
            ),
        ),
        (
            Language::Php,
            client(
                &[],
                r#"$this->headers = [
    'Content-Type: application/json',
    'x-goog-api-key: ' . {credential},
];"#,
                r#"$payload = [
    'systemInstruction' => ['parts' => [['text' => {system_prompt}]]],
    'contents' => [['role' => 'user', 'parts' => [['text' => {user_input}]]]],
    'generationConfig' => ['temperature' => {temperature}],
];
$data = $this->post('https://generativelanguage.googleapis.com/v1beta/models/{model}:generateContent', $payload);
return $data['candidates'][0]['content']['parts'][0]['text'] ?? '';"#,
            ),
        ),
    ])
}

fn mistral() -> HashMap<Language, ClientTemplate> {
    HashMap::from([
        (
            Language::Python,
            client(
                &["from mistralai import Mistral"],
                "self.client = Mistral(api_key={credential})",
                r#"response = self.client.chat.complete(
    model="{model}",
    messages=[
        {"role": "system", "content": {system_prompt}},
        {"role": "user", "content": {user_input}},
    ],
    temperature={temperature},
)
return response.choices[0].message.content"#,
            ),
        ),
        (
            Language::JavaScript,
            client(
                &[r#"const { Mistral } = require("@mistralai/mistralai");"#],
                "this.client = new Mistral({ apiKey: {credential} });",
                r#"const response = await this.client.chat.complete({
  model: "{model}",
  messages: [
    { role: "system", content: {system_prompt} },
    { role: "user", content: {user_input} },
  ],
  temperature: {temperature},
});
return response.choices[0].message.content;"#,
            ),
        ),
        (Language::Php, php_chat_completions("https://api.mistral.ai/v1/chat/completions")),
    ])
}
