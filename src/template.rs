use std::collections::HashSet;

use crate::error::{GenerationError, GenerationResult};

/// Placeholder names recognised inside fragment templates.
///
/// Any other `{...}` sequence is ordinary source text (dict literals,
/// object literals, f-string fields) and is copied through untouched.
pub const PLACEHOLDERS: [&str; 7] = [
    "model",
    "system_prompt",
    "user_input",
    "temperature",
    "credential",
    "max_file_size",
    "history_file",
];

/// Values bound to placeholder names for one render.
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    values: Vec<(&'static str, String)>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(mut self, name: &'static str, value: impl Into<String>) -> Self {
        let value = value.into();
        match self.values.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.values.push((name, value)),
        }
        self
    }

    fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// A source fragment with named `{placeholder}` slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
}

impl Template {
    pub fn new(source: impl Into<String>) -> Self {
        Self { source: source.into() }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_empty(&self) -> bool {
        self.source.trim().is_empty()
    }

    /// Placeholder names used by this template, in order of first use.
    pub fn placeholders(&self) -> Vec<&'static str> {
        let mut found = Vec::new();
        let mut rest = self.source.as_str();
        while let Some((name, after)) = next_placeholder(rest) {
            if let Some(name) = name {
                if !found.contains(&name) {
                    found.push(name);
                }
            }
            rest = after;
        }
        found
    }

    /// Substitute every known placeholder. A known placeholder without a
    /// binding is an error; unknown brace groups are left alone.
    pub fn render(&self, bindings: &Bindings) -> GenerationResult<String> {
        let mut out = String::with_capacity(self.source.len());
        let mut rest = self.source.as_str();
        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let tail = &rest[open..];
            match placeholder_at(tail) {
                Some((name, len)) => {
                    let value = bindings
                        .get(name)
                        .ok_or_else(|| GenerationError::UnboundPlaceholder { name: name.to_string() })?;
                    out.push_str(value);
                    rest = &tail[len..];
                }
                None => {
                    out.push('{');
                    rest = &tail[1..];
                }
            }
        }
        out.push_str(rest);
        Ok(out)
    }
}

/// If `text` starts with `{name}` for a known placeholder, return the name
/// and the length of the whole token.
fn placeholder_at(text: &str) -> Option<(&'static str, usize)> {
    let close = text.find('}')?;
    let inner = &text[1..close];
    PLACEHOLDERS
        .iter()
        .find(|p| **p == inner)
        .map(|p| (*p, close + 1))
}

fn next_placeholder(text: &str) -> Option<(Option<&'static str>, &str)> {
    let open = text.find('{')?;
    let tail = &text[open..];
    match placeholder_at(tail) {
        Some((name, len)) => Some((Some(name), &tail[len..])),
        None => Some((None, &tail[1..])),
    }
}

/// Strip the common leading whitespace of `block` and prefix every
/// non-blank line with `indent`. Leading and trailing blank lines are
/// dropped and blank lines inside the block carry no indentation.
pub fn reindent(block: &str, indent: &str) -> String {
    let lines: Vec<&str> = block.lines().map(|l| l.trim_end()).collect();
    let start = lines.iter().position(|l| !l.is_empty()).unwrap_or(lines.len());
    let end = lines.iter().rposition(|l| !l.is_empty()).map_or(start, |i| i + 1);
    let body = &lines[start..end];

    let common = body
        .iter()
        .filter(|l| !l.is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);

    body.iter()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{}{}", indent, &line[common..])
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Remove repeated lines, keeping the first occurrence of each.
pub fn dedup_lines<I, S>(lines: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for line in lines {
        let line = line.into();
        if line.trim().is_empty() {
            continue;
        }
        if seen.insert(line.clone()) {
            out.push(line);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_substitutes_known_placeholders_only() {
        let template = Template::new("client.create(model=\"{model}\", extra={\"a\": 1}, t={temperature})");
        let bindings = Bindings::new()
            .bind("model", "gpt-4o")
            .bind("temperature", "temperature");
        let rendered = template.render(&bindings).unwrap();
        assert_eq!(
            rendered,
            "client.create(model=\"gpt-4o\", extra={\"a\": 1}, t=temperature)"
        );
    }

    #[test]
    fn test_render_reports_unbound_placeholder() {
        let template = Template::new("key = {credential}");
        let err = template.render(&Bindings::new()).unwrap_err();
        assert_eq!(err, GenerationError::UnboundPlaceholder { name: "credential".to_string() });
    }

    #[test]
    fn test_render_leaves_fstring_fields() {
        let template = Template::new("print(f\"{name}: {user_input}\")");
        let rendered = template.render(&Bindings::new().bind("user_input", "prompt")).unwrap();
        assert_eq!(rendered, "print(f\"{name}: prompt\")");
    }

    #[test]
    fn test_placeholders_in_first_use_order() {
        let template = Template::new("{user_input} {model} {user_input} {other}");
        assert_eq!(template.placeholders(), vec!["user_input", "model"]);
    }

    #[test]
    fn test_reindent() {
        let block = "\n    def a(self):\n        return 1\n\n    def b(self):\n        return 2\n\n";
        assert_eq!(
            reindent(block, "  "),
            "  def a(self):\n      return 1\n\n  def b(self):\n      return 2"
        );
    }

    #[test]
    fn test_dedup_lines_keeps_first_occurrence() {
        let lines = vec!["import os", "import json", "import os", "", "import sys", "import json"];
        assert_eq!(dedup_lines(lines), vec!["import os", "import json", "import sys"]);
    }
}
