use std::collections::HashMap;

use super::{FeatureEntry, FeatureFragment, FragmentKind, Keyword};
use crate::params::{Feature, Language};
use crate::template::Template;

fn inline(imports: &[&str], methods: &str) -> FeatureFragment {
    FeatureFragment {
        imports: imports.iter().map(|s| s.to_string()).collect(),
        kind: FragmentKind::Inline {
            methods: Template::new(methods),
        },
    }
}

fn standalone(imports: &[&str], definition: &str, integration: &str) -> FeatureFragment {
    FeatureFragment {
        imports: imports.iter().map(|s| s.to_string()).collect(),
        kind: FragmentKind::StandaloneType {
            definition: Template::new(definition),
            integration: Template::new(integration),
        },
    }
}

/// Feature entries in canonical application order.
pub(super) fn builtin() -> Vec<FeatureEntry> {
    vec![
        FeatureEntry {
            feature: Feature::FileHandling,
            label: "file handling",
            keywords: vec![
                Keyword::Substring("file"),
                Keyword::Substring("upload"),
                Keyword::Substring("document"),
                Keyword::Substring("datei"),
                Keyword::Substring("dokument"),
            ],
            fragments: file_handling(),
        },
        FeatureEntry {
            feature: Feature::Memory,
            label: "memory",
            keywords: vec![
                Keyword::Substring("memory"),
                Keyword::Substring("history"),
                Keyword::Substring("remember"),
                Keyword::Substring("gedächtnis"),
                Keyword::Substring("verlauf"),
                Keyword::Substring("erinnerung"),
            ],
            fragments: memory(),
        },
        FeatureEntry {
            feature: Feature::ExternalApi,
            label: "external API",
            keywords: vec![
                Keyword::Substring("external api"),
                Keyword::Substring("api call"),
                Keyword::Substring("api request"),
                Keyword::Substring("rest api"),
                Keyword::Substring("webhook"),
                Keyword::Substring("http request"),
                Keyword::Substring("externe api"),
            ],
            fragments: external_api(),
        },
    ]
}

fn file_handling() -> HashMap<Language, FeatureFragment> {
    HashMap::from([
        (
            Language::Python,
            inline(
                &["from pathlib import Path"],
                r#"def read_file(self, path):
    file_path = Path(path)
    if file_path.stat().st_size > {max_file_size}:
        raise ValueError(f"{file_path} exceeds {max_file_size} bytes")
    return file_path.read_text(encoding="utf-8")

def write_file(self, path, content):
    Path(path).write_text(content, encoding="utf-8")
    return path

def ask_about_file(self, path, question):
    content = self.read_file(path)
    return self.ask(f"{question}\n\n{content}")"#,
            ),
        ),
        (
            Language::JavaScript,
            inline(
                &[r#"const fs = require("fs");"#, r#"const path = require("path");"#],
                r#"readFile(filePath) {
  const stats = fs.statSync(filePath);
  if (stats.size > {max_file_size}) {
    throw new Error(`${filePath} exceeds {max_file_size} bytes`);
  }
  return fs.readFileSync(filePath, "utf8");
}

writeFile(filePath, content) {
  fs.mkdirSync(path.dirname(filePath), { recursive: true });
  fs.writeFileSync(filePath, content, "utf8");
  return filePath;
}

async askAboutFile(filePath, question) {
  const content = this.readFile(filePath);
  return this.ask(`${question}\n\n${content}`);
}"#,
            ),
        ),
        (
            Language::Php,
            inline(
                &[],
                r#"public function readFile(string $path): string
{
    if (filesize($path) > {max_file_size}) {
        throw new RuntimeException("$path exceeds {max_file_size} bytes");
    }
    return (string) file_get_contents($path);
}

public function writeFile(string $path, string $content): string
{
    file_put_contents($path, $content);
    return $path;
}

public function askAboutFile(string $path, string $question): string
{
    return $this->ask($question . "\n\n" . $this->readFile($path));
}"#,
            ),
        ),
    ])
}

fn memory() -> HashMap<Language, FeatureFragment> {
    HashMap::from([
        (
            Language::Python,
            standalone(
                &["import json", "from pathlib import Path"],
                r#"class ConversationMemory:
    """Conversation history persisted as JSON."""

    def __init__(self, path={history_file}, max_messages=50):
        self.path = Path(path)
        self.max_messages = max_messages
        self.messages = []
        if self.path.exists():
            self.messages = json.loads(self.path.read_text(encoding="utf-8"))

    def add(self, role, content):
        self.messages.append({"role": role, "content": content})
        self.messages = self.messages[-self.max_messages:]
        self.path.write_text(json.dumps(self.messages, indent=2), encoding="utf-8")

    def context(self):
        return "\n".join(f"{m['role']}: {m['content']}" for m in self.messages)

    def clear(self):
        self.messages = []
        if self.path.exists():
            self.path.unlink()"#,
                r#"def init_memory(self, path={history_file}):
    self.memory = ConversationMemory(path)
    return self.memory

def ask_with_memory(self, prompt):
    if getattr(self, "memory", None) is None:
        self.init_memory()
    history = self.memory.context()
    full_prompt = f"{history}\nuser: {prompt}" if history else prompt
    answer = self.ask(full_prompt)
    self.memory.add("user", prompt)
    self.memory.add("assistant", answer)
    return answer"#,
            ),
        ),
        (
            Language::JavaScript,
            standalone(
                &[r#"const fs = require("fs");"#],
                r#"class ConversationMemory {
  constructor(filePath = {history_file}, maxMessages = 50) {
    this.filePath = filePath;
    this.maxMessages = maxMessages;
    this.messages = fs.existsSync(filePath)
      ? JSON.parse(fs.readFileSync(filePath, "utf8"))
      : [];
  }

  add(role, content) {
    this.messages.push({ role, content });
    this.messages = this.messages.slice(-this.maxMessages);
    fs.writeFileSync(this.filePath, JSON.stringify(this.messages, null, 2), "utf8");
  }

  context() {
    return this.messages.map((m) => `${m.role}: ${m.content}`).join("\n");
  }

  clear() {
    this.messages = [];
    if (fs.existsSync(this.filePath)) {
      fs.unlinkSync(this.filePath);
    }
  }
}"#,
                r#"initMemory(filePath = {history_file}) {
  this.memory = new ConversationMemory(filePath);
  return this.memory;
}

async askWithMemory(prompt) {
  if (!this.memory) {
    this.initMemory();
  }
  const history = this.memory.context();
  const fullPrompt = history ? `${history}\nuser: ${prompt}` : prompt;
  const answer = await this.ask(fullPrompt);
  this.memory.add("user", prompt);
  this.memory.add("assistant", answer);
  return answer;
}"#,
            ),
        ),
        (
            Language::Php,
            standalone(
                &[],
                r#"class ConversationMemory
{
    private string $path;
    private int $maxMessages;
    private array $messages = [];

    public function __construct(string $path = {history_file}, int $maxMessages = 50)
    {
        $this->path = $path;
        $this->maxMessages = $maxMessages;
        if (is_file($path)) {
            $this->messages = json_decode((string) file_get_contents($path), true) ?: [];
        }
    }

    public function add(string $role, string $content): void
    {
        $this->messages[] = ['role' => $role, 'content' => $content];
        $this->messages = array_slice($this->messages, -$this->maxMessages);
        file_put_contents($this->path, json_encode($this->messages, JSON_PRETTY_PRINT));
    }

    public function context(): string
    {
        return implode("\n", array_map(fn ($m) => $m['role'] . ': ' . $m['content'], $this->messages));
    }

    public function clear(): void
    {
        $this->messages = [];
        if (is_file($this->path)) {
            unlink($this->path);
        }
    }
}"#,
                r#"private ?ConversationMemory $memory = null;

public function initMemory(string $path = {history_file}): ConversationMemory
{
    $this->memory = new ConversationMemory($path);
    return $this->memory;
}

public function askWithMemory(string $prompt): string
{
    if ($this->memory === null) {
        $this->initMemory();
    }
    $history = $this->memory->context();
    $answer = $this->ask($history !== '' ? $history . "\nuser: " . $prompt : $prompt);
    $this->memory->add('user', $prompt);
    $this->memory->add('assistant', $answer);
    return $answer;
}"#,
            ),
        ),
    ])
}

fn external_api() -> HashMap<Language, FeatureFragment> {
    HashMap::from([
        (
            Language::Python,
            inline(
                &["import json", "import urllib.request"],
                r#"def call_external_api(self, url, payload=None, headers=None, timeout=30):
    data = json.dumps(payload).encode("utf-8") if payload is not None else None
    request = urllib.request.Request(
        url,
        data=data,
        headers=headers or {"Content-Type": "application/json"},
    )
    with urllib.request.urlopen(request, timeout=timeout) as response:
        return json.loads(response.read().decode("utf-8"))

def summarize_api_result(self, url, question="Summarize this data."):
    result = self.call_external_api(url)
    return self.ask(f"{question}\n\n{json.dumps(result, indent=2)}")"#,
            ),
        ),
        (
            Language::JavaScript,
            inline(
                &[],
                r#"async callExternalApi(url, payload = null, headers = {}) {
  const response = await fetch(url, {
    method: payload ? "POST" : "GET",
    headers: { "Content-Type": "application/json", ...headers },
    body: payload ? JSON.stringify(payload) : undefined,
  });
  if (!response.ok) {
    throw new Error(`External API returned ${response.status}`);
  }
  return response.json();
}

async summarizeApiResult(url, question = "Summarize this data.") {
  const result = await this.callExternalApi(url);
  return this.ask(`${question}\n\n${JSON.stringify(result, null, 2)}`);
}"#,
            ),
        ),
        (
            Language::Php,
            inline(
                &[],
                r#"public function callExternalApi(string $url, ?array $payload = null, array $headers = []): array
{
    $ch = curl_init($url);
    curl_setopt($ch, CURLOPT_RETURNTRANSFER, true);
    curl_setopt($ch, CURLOPT_HTTPHEADER, array_merge(['Content-Type: application/json'], $headers));
    if ($payload !== null) {
        curl_setopt($ch, CURLOPT_POSTFIELDS, json_encode($payload));
    }
    $body = curl_exec($ch);
    curl_close($ch);
    return json_decode((string) $body, true) ?? [];
}

public function summarizeApiResult(string $url, string $question = 'Summarize this data.'): string
{
    $result = $this->callExternalApi($url);
    return $this->ask($question . "\n\n" . json_encode($result, JSON_PRETTY_PRINT));
}"#,
            ),
        ),
    ])
}
