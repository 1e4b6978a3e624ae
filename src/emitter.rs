use crate::composer::OrderedSections;

/// Join composed sections into the final source text.
///
/// Each section is stripped of surrounding blank lines and trailing
/// whitespace, empty sections are skipped, and consecutive sections are
/// separated by exactly one blank line. The result ends with one newline.
pub fn emit(sections: &OrderedSections) -> String {
    let blocks: Vec<String> = sections
        .iter()
        .map(|section| normalize(&section.body))
        .filter(|body| !body.is_empty())
        .collect();

    if blocks.is_empty() {
        return String::new();
    }

    let mut out = blocks.join("\n\n");
    out.push('\n');
    out
}

fn normalize(body: &str) -> String {
    let lines: Vec<&str> = body.lines().map(str::trim_end).collect();
    let start = lines.iter().position(|l| !l.is_empty()).unwrap_or(lines.len());
    let end = lines.iter().rposition(|l| !l.is_empty()).map_or(start, |i| i + 1);
    lines[start..end].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composer::{ComposeOptions, compose};
    use crate::interpreter::Interpreter;

    #[test]
    fn test_normalize_strips_outer_blank_lines() {
        assert_eq!(normalize("\n\n  a  \n\nb\n\n\n"), "  a\n\nb");
        assert_eq!(normalize("\n \n"), "");
    }

    #[test]
    fn test_emit_empty() {
        assert_eq!(emit(&OrderedSections::default()), "");
    }

    #[test]
    fn test_sections_separated_by_single_blank_line() {
        let params = Interpreter::new().interpret("a php bot with gemini and a web ui");
        let sections = compose(&params, &ComposeOptions::default()).unwrap();
        let source = emit(&sections);
        assert!(source.starts_with("<?php\n"));
        assert!(source.ends_with("runWeb(new Assistant());\n"));
        assert!(!source.contains("\n\n\n"));
        let mut rest = source.as_str();
        for section in sections.iter() {
            let body = normalize(&section.body);
            let at = rest.find(&body).expect("section emitted in order");
            rest = &rest[at + body.len()..];
        }
    }

    #[test]
    fn test_emit_is_stable() {
        let params = Interpreter::new().interpret("javascript claude assistant with file upload and terminal");
        let sections = compose(&params, &ComposeOptions::default()).unwrap();
        assert_eq!(emit(&sections), emit(&sections.clone()));
    }
}
