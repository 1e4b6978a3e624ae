use super::{EXIT_COMMANDS, EntryPart, LanguageStyle, RuntimeNames, SMOKE_GREETING, Snippet};
use crate::params::Language;
use crate::template::reindent;

/// Node.js (CommonJS) programs.
pub struct JavaScriptStyle;

impl LanguageStyle for JavaScriptStyle {
    fn language(&self) -> Language {
        Language::JavaScript
    }

    fn comment_prefix(&self) -> &'static str {
        "//"
    }

    fn indent_unit(&self) -> &'static str {
        "  "
    }

    fn runtime_names(&self) -> RuntimeNames {
        RuntimeNames {
            user_input: "prompt",
            system_prompt: "systemPrompt",
            temperature: "temperature",
            credential: "this.apiKey",
        }
    }

    fn string_literal(&self, value: &str) -> String {
        serde_json::Value::from(value).to_string()
    }

    fn credential_line(&self, env_var: &str, fallback: &str) -> String {
        format!("const API_KEY = process.env.{} || {};", env_var, fallback)
    }

    fn class_open(&self) -> &'static str {
        "class Assistant {"
    }

    fn class_close(&self) -> Option<&'static str> {
        Some("}")
    }

    fn constructor(&self, setup: &str) -> String {
        format!(
            "constructor(apiKey = API_KEY) {{\n  this.apiKey = apiKey;\n{}\n}}",
            reindent(setup, "  ")
        )
    }

    fn call_method(&self, call: &str, system_prompt: &str, temperature: f32) -> String {
        format!(
            "async ask(prompt, systemPrompt = {}, temperature = {}) {{\n{}\n}}",
            self.string_literal(system_prompt),
            temperature,
            reindent(call, "  ")
        )
    }

    fn entry_part(&self, part: EntryPart) -> Snippet {
        match part {
            EntryPart::WebServer => Snippet::new(
                &[r#"const http = require("http");"#],
                r#"function runWeb(assistant, port = Number(process.env.PORT) || 3000) {
  const server = http.createServer((req, res) => {
    if (req.method !== "POST") {
      res.writeHead(405, { "Content-Type": "application/json" });
      res.end(JSON.stringify({ error: "POST a JSON body with a prompt field" }));
      return;
    }
    let body = "";
    req.on("data", (chunk) => {
      body += chunk;
    });
    req.on("end", async () => {
      try {
        const { prompt = "" } = JSON.parse(body || "{}");
        const answer = await assistant.ask(prompt);
        res.writeHead(200, { "Content-Type": "application/json" });
        res.end(JSON.stringify({ answer }));
      } catch (err) {
        res.writeHead(500, { "Content-Type": "application/json" });
        res.end(JSON.stringify({ error: err.message }));
      }
    });
  });
  server.listen(port, () => {
    console.log(`Assistant listening on http://localhost:${port}`);
  });
}"#,
            ),
            EntryPart::Repl => {
                let exits = EXIT_COMMANDS
                    .iter()
                    .map(|c| self.string_literal(c))
                    .collect::<Vec<_>>()
                    .join(", ");
                Snippet::new(
                    &[r#"const readline = require("readline");"#],
                    format!(
                        r#"const EXIT_COMMANDS = new Set([{exits}]);

async function runCli(assistant) {{
  const rl = readline.createInterface({{ input: process.stdin, output: process.stdout }});
  console.log("Type 'exit', 'quit' or 'q' to leave.");
  for await (const line of rl) {{
    const input = line.trim();
    if (EXIT_COMMANDS.has(input.toLowerCase())) {{
      break;
    }}
    if (input) {{
      console.log(`Assistant: ${{await assistant.ask(input)}}`);
    }}
  }}
  rl.close();
  console.log("Goodbye!");
}}"#
                    ),
                )
            }
            EntryPart::WebMain => Snippet::new(
                &[],
                "if (require.main === module) {\n  runWeb(new Assistant());\n}",
            ),
            EntryPart::CliMain => Snippet::new(
                &[],
                "if (require.main === module) {\n  runCli(new Assistant());\n}",
            ),
            EntryPart::DispatchMain => Snippet::new(
                &[],
                r#"if (require.main === module) {
  const assistant = new Assistant();
  if (process.argv.slice(2).includes("--cli")) {
    runCli(assistant);
  } else {
    runWeb(assistant);
  }
}"#,
            ),
            EntryPart::SmokeMain => Snippet::new(
                &[],
                format!(
                    r#"if (require.main === module) {{
  new Assistant()
    .ask({})
    .then((answer) => console.log(answer))
    .catch((err) => console.error(err));
}}"#,
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
    fn test_constructor_layout() {
        let ctor = JavaScriptStyle.constructor("this.client = new OpenAI({ apiKey: this.apiKey });");
        assert_eq!(
            ctor,
            "constructor(apiKey = API_KEY) {\n  this.apiKey = apiKey;\n  this.client = new OpenAI({ apiKey: this.apiKey });\n}"
        );
    }

    #[test]
    fn test_repl_exit_set() {
        let repl = JavaScriptStyle.entry_part(EntryPart::Repl);
        assert!(repl.code.starts_with("const EXIT_COMMANDS = new Set([\"exit\", \"quit\", \"q\"]);"));
        assert!(repl.code.contains("input.toLowerCase()"));
        assert_eq!(repl.imports, vec!["const readline = require(\"readline\");".to_string()]);
    }
}
