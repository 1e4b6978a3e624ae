use super::{EXIT_COMMANDS, EntryPart, LanguageStyle, RuntimeNames, SMOKE_GREETING, Snippet};
use crate::params::Language;
use crate::template::reindent;

pub struct PythonStyle;

impl LanguageStyle for PythonStyle {
    fn language(&self) -> Language {
        Language::Python
    }

    fn comment_prefix(&self) -> &'static str {
        "#"
    }

    fn indent_unit(&self) -> &'static str {
        "    "
    }

    fn base_imports(&self) -> &'static [&'static str] {
        &["import os"]
    }

    fn runtime_names(&self) -> RuntimeNames {
        RuntimeNames {
            user_input: "prompt",
            system_prompt: "system_prompt",
            temperature: "temperature",
            credential: "self.api_key",
        }
    }

    fn string_literal(&self, value: &str) -> String {
        // JSON string escapes are valid Python string escapes.
        serde_json::Value::from(value).to_string()
    }

    fn credential_line(&self, env_var: &str, fallback: &str) -> String {
        format!("API_KEY = os.getenv(\"{}\", {})", env_var, fallback)
    }

    fn class_open(&self) -> &'static str {
        "class Assistant:"
    }

    fn class_close(&self) -> Option<&'static str> {
        None
    }

    fn constructor(&self, setup: &str) -> String {
        format!(
            "def __init__(self, api_key=API_KEY):\n    self.api_key = api_key\n{}",
            reindent(setup, "    ")
        )
    }

    fn call_method(&self, call: &str, system_prompt: &str, temperature: f32) -> String {
        format!(
            "def ask(self, prompt, system_prompt={}, temperature={}):\n{}",
            self.string_literal(system_prompt),
            temperature,
            reindent(call, "    ")
        )
    }

    fn entry_part(&self, part: EntryPart) -> Snippet {
        match part {
            EntryPart::WebServer => Snippet::new(
                &["import json", "from http.server import BaseHTTPRequestHandler, HTTPServer"],
                r#"def run_web(assistant, host="127.0.0.1", port=8000):
    class Handler(BaseHTTPRequestHandler):
        def do_POST(self):
            length = int(self.headers.get("Content-Length", 0))
            body = json.loads(self.rfile.read(length) or b"{}")
            answer = assistant.ask(body.get("prompt", ""))
            payload = json.dumps({"answer": answer}).encode("utf-8")
            self.send_response(200)
            self.send_header("Content-Type", "application/json")
            self.end_headers()
            self.wfile.write(payload)

    server = HTTPServer((host, port), Handler)
    print(f"Assistant listening on http://{host}:{port}")
    server.serve_forever()"#,
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
                        r#"EXIT_COMMANDS = {{{exits}}}

def run_cli(assistant):
    print("Type 'exit', 'quit' or 'q' to leave.")
    while True:
        try:
            line = input("You: ")
        except EOFError:
            break
        if line.strip().lower() in EXIT_COMMANDS:
            break
        if line.strip():
            print(f"Assistant: {{assistant.ask(line)}}")
    print("Goodbye!")"#
                    ),
                )
            }
            EntryPart::WebMain => Snippet::new(
                &[],
                "if __name__ == \"__main__\":\n    run_web(Assistant())",
            ),
            EntryPart::CliMain => Snippet::new(
                &[],
                "if __name__ == \"__main__\":\n    run_cli(Assistant())",
            ),
            EntryPart::DispatchMain => Snippet::new(
                &["import sys"],
                r#"if __name__ == "__main__":
    assistant = Assistant()
    if "--cli" in sys.argv[1:]:
        run_cli(assistant)
    else:
        run_web(assistant)"#,
            ),
            EntryPart::SmokeMain => Snippet::new(
                &[],
                format!(
                    "if __name__ == \"__main__\":\n    assistant = Assistant()\n    print(assistant.ask({}))",
                    self.string_literal(SMOKE_GREETING)
                ),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_literal_escapes() {
        let style = PythonStyle;
        assert_eq!(style.string_literal("plain"), "\"plain\"");
        assert_eq!(style.string_literal("say \"hi\"\n"), "\"say \\\"hi\\\"\\n\"");
    }

    #[test]
    fn test_call_method_layout() {
        let method = PythonStyle.call_method("return 1", "Be brief.", 0.2);
        assert_eq!(
            method,
            "def ask(self, prompt, system_prompt=\"Be brief.\", temperature=0.2):\n    return 1"
        );
    }
}
