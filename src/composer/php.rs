use super::{EXIT_COMMANDS, EntryPart, LanguageStyle, RuntimeNames, SMOKE_GREETING, Snippet};
use crate::params::Language;
use crate::template::reindent;

const POST_HELPER: &str = r#"private function post(string $url, array $payload): array
{
    $ch = curl_init($url);
    curl_setopt_array($ch, [
        CURLOPT_RETURNTRANSFER => true,
        CURLOPT_POST => true,
        CURLOPT_HTTPHEADER => $this->headers,
        CURLOPT_POSTFIELDS => json_encode($payload),
    ]);
    $body = curl_exec($ch);
    if ($body === false) {
        $error = curl_error($ch);
        curl_close($ch);
        throw new RuntimeException('Request failed: ' . $error);
    }
    curl_close($ch);
    return json_decode((string) $body, true) ?? [];
}"#;

/// PHP 8 programs talking to providers over curl.
pub struct PhpStyle;

impl LanguageStyle for PhpStyle {
    fn language(&self) -> Language {
        Language::Php
    }

    fn prologue(&self) -> Option<&'static str> {
        Some("<?php")
    }

    fn comment_prefix(&self) -> &'static str {
        "//"
    }

    fn indent_unit(&self) -> &'static str {
        "    "
    }

    fn base_imports(&self) -> &'static [&'static str] {
        &["declare(strict_types=1);"]
    }

    fn runtime_names(&self) -> RuntimeNames {
        RuntimeNames {
            user_input: "$prompt",
            system_prompt: "$systemPrompt",
            temperature: "$temperature",
            credential: "$this->apiKey",
        }
    }

    fn string_literal(&self, value: &str) -> String {
        format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
    }

    fn credential_line(&self, env_var: &str, fallback: &str) -> String {
        format!("define('API_KEY', getenv('{}') ?: {});", env_var, fallback)
    }

    fn class_open(&self) -> &'static str {
        "class Assistant\n{"
    }

    fn class_close(&self) -> Option<&'static str> {
        Some("}")
    }

    fn fields(&self) -> Option<&'static str> {
        Some("private string $apiKey;\nprivate array $headers = [];")
    }

    fn constructor(&self, setup: &str) -> String {
        format!(
            "public function __construct(string $apiKey = API_KEY)\n{{\n    $this->apiKey = $apiKey;\n{}\n}}",
            reindent(setup, "    ")
        )
    }

    fn call_method(&self, call: &str, system_prompt: &str, temperature: f32) -> String {
        format!(
            "public function ask(string $prompt, string $systemPrompt = {}, float $temperature = {}): string\n{{\n{}\n}}",
            self.string_literal(system_prompt),
            php_float(temperature),
            reindent(call, "    ")
        )
    }

    fn support_methods(&self) -> &'static [&'static str] {
        &[POST_HELPER]
    }

    fn entry_part(&self, part: EntryPart) -> Snippet {
        match part {
            EntryPart::WebServer => Snippet::new(
                &[],
                r#"function runWeb(Assistant $assistant): void
{
    header('Content-Type: application/json');
    if (($_SERVER['REQUEST_METHOD'] ?? 'GET') !== 'POST') {
        http_response_code(405);
        echo json_encode(['error' => 'POST a JSON body with a prompt field']);
        return;
    }
    $body = json_decode((string) file_get_contents('php://input'), true) ?? [];
    echo json_encode(['answer' => $assistant->ask((string) ($body['prompt'] ?? ''))]);
}"#,
            ),
            EntryPart::Repl => {
                let exits = EXIT_COMMANDS
                    .iter()
                    .map(|c| self.string_literal(c))
                    .collect::<Vec<_>>()
                    .join(", ");
                Snippet::new(
                    &[],
                    format!(
                        r#"const EXIT_COMMANDS = [{exits}];

function runCli(Assistant $assistant): void
{{
    echo "Type 'exit', 'quit' or 'q' to leave.\n";
    while (($line = fgets(STDIN)) !== false) {{
        $input = trim($line);
        if (in_array(strtolower($input), EXIT_COMMANDS, true)) {{
            break;
        }}
        if ($input !== '') {{
            echo 'Assistant: ' . $assistant->ask($input) . "\n";
        }}
    }}
    echo "Goodbye!\n";
}}"#
                    ),
                )
            }
            EntryPart::WebMain => Snippet::new(&[], "runWeb(new Assistant());"),
            EntryPart::CliMain => Snippet::new(&[], "runCli(new Assistant());"),
            EntryPart::DispatchMain => Snippet::new(
                &[],
                r#"$assistant = new Assistant();
if (PHP_SAPI === 'cli' && in_array('--cli', $argv ?? [], true)) {
    runCli($assistant);
} else {
    runWeb($assistant);
}"#,
            ),
            EntryPart::SmokeMain => Snippet::new(
                &[],
                format!(
                    "echo (new Assistant())->ask({}) . \"\\n\";",
                    self.string_literal(SMOKE_GREETING)
                ),
            ),
        }
    }
}

/// PHP float literal; integral values keep a fractional part.
fn php_float(value: f32) -> String {
    let text = value.to_string();
    if text.contains(['.', 'e', 'E']) || !value.is_finite() {
        text
    } else {
        format!("{}.0", text)
    }
}
