//! Structured doc-comment parsing.
//!
//! A doc comment supplies the command description (its summary line) and a
//! description for each parameter. The comment syntax is pluggable through
//! [`DocCommentParser`]; the introspector only sees the parsed result.

use indexmap::IndexMap;

/// The parsed content of a handler's doc comment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDoc {
    /// First non-empty line, trimmed.
    pub summary: Option<String>,
    /// Parameter descriptions keyed by lowercased parameter name.
    pub parameters: IndexMap<String, String>,
}

/// Parses a doc comment into a summary and parameter descriptions.
pub trait DocCommentParser: Send + Sync {
    /// Parses `doc`.
    fn parse(&self, doc: &str) -> ParsedDoc;
}

/// Parses `:name: text` and `:param name: text` field lists.
///
/// ```
/// use slashgate::command::domain::{DocCommentParser, FieldListParser};
///
/// let doc = FieldListParser.parse("Roll a die.\n\n:sides: How many sides (default 6).");
/// assert_eq!(doc.summary.as_deref(), Some("Roll a die."));
/// assert_eq!(
///     doc.parameters.get("sides").map(String::as_str),
///     Some("How many sides (default 6)."),
/// );
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldListParser;

impl DocCommentParser for FieldListParser {
    fn parse(&self, doc: &str) -> ParsedDoc {
        let mut parsed = ParsedDoc {
            summary: summary_line(doc),
            parameters: IndexMap::new(),
        };
        let mut current: Option<String> = None;

        for line in doc.lines() {
            if let Some((name, text)) = parse_field(line) {
                parsed.parameters.insert(name.clone(), text);
                current = Some(name);
                continue;
            }

            let is_continuation = line.starts_with(char::is_whitespace) && !line.trim().is_empty();
            if !is_continuation {
                current = None;
            } else if let Some(name) = current.as_deref() {
                append_continuation(&mut parsed.parameters, name, line);
            }
        }

        parsed
    }
}

fn parse_field(line: &str) -> Option<(String, String)> {
    let rest = line.trim().strip_prefix(':')?;
    let (field, text) = rest.split_once(':')?;
    let name = field
        .strip_prefix("param ")
        .unwrap_or(field)
        .trim()
        .to_lowercase();
    if name.is_empty() || name.contains(char::is_whitespace) {
        return None;
    }
    Some((name, text.trim().to_owned()))
}

/// Parses rustdoc-style `# Arguments` sections.
///
/// Accepts ``* `name` - text`` and ``- `name`: text`` bullets.
#[derive(Debug, Clone, Copy, Default)]
pub struct RustdocParser;

impl DocCommentParser for RustdocParser {
    fn parse(&self, doc: &str) -> ParsedDoc {
        let mut parsed = ParsedDoc {
            summary: summary_line(doc),
            parameters: IndexMap::new(),
        };
        let mut in_arguments = false;
        let mut current: Option<String> = None;

        for line in doc.lines() {
            let trimmed = line.trim();
            if let Some(heading) = trimmed.strip_prefix('#') {
                in_arguments = heading.trim_start_matches('#').trim() == "Arguments";
                current = None;
                continue;
            }
            if !in_arguments {
                continue;
            }

            if let Some((name, text)) = parse_bullet(trimmed) {
                parsed.parameters.insert(name.clone(), text);
                current = Some(name);
            } else if trimmed.is_empty() {
                current = None;
            } else if let Some(name) = current.as_deref() {
                append_continuation(&mut parsed.parameters, name, trimmed);
            }
        }

        parsed
    }
}

fn parse_bullet(line: &str) -> Option<(String, String)> {
    let rest = line
        .strip_prefix('*')
        .or_else(|| line.strip_prefix('-'))?
        .trim_start()
        .strip_prefix('`')?;
    let (name, text) = rest.split_once('`')?;
    let text = text
        .trim_start()
        .trim_start_matches(['-', ':', '—'])
        .trim();
    Some((name.trim().to_lowercase(), text.to_owned()))
}

fn summary_line(doc: &str) -> Option<String> {
    doc.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .filter(|line| !line.starts_with(':') && !line.starts_with('#'))
        .map(ToOwned::to_owned)
}

fn append_continuation(parameters: &mut IndexMap<String, String>, name: &str, line: &str) {
    if let Some(text) = parameters.get_mut(name) {
        if !text.is_empty() {
            text.push(' ');
        }
        text.push_str(line.trim());
    }
}
