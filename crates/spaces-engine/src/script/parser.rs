//! Script line parser
//!
//! A script line is a command name followed by `key=value` tokens:
//!
//! ```text
//! # comment
//! Configuration file="data/1980 configuration.txt"
//! Rotate degrees=90
//! Invert dimensions=[Left-Right, "Up-Down"]
//! MDS n_components=2 use_metric=False
//! ```
//!
//! The command is the longest registered name prefixing the line at a word
//! boundary, so `Factor analysis machine learning` wins over `Factor analysis`.

use spaces_registry::{CommandKind, ParamValue, Params, Registry};
use std::iter::Peekable;
use std::str::Chars;

/// Script syntax errors, each carrying its 1-based line number
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("line {line}: unknown command '{text}'")]
    UnknownCommand { line: usize, text: String },

    #[error("line {line}: malformed parameter '{token}'")]
    Malformed { line: usize, token: String },

    #[error("line {line}: unterminated {what}")]
    Unterminated { line: usize, what: &'static str },

    #[error("line {line}: duplicate parameter '{name}'")]
    DuplicateParameter { line: usize, name: String },

    #[error("line {line}: {command} has no parameter '{name}'")]
    UnknownParameter {
        line: usize,
        command: &'static str,
        name: String,
    },
}

impl ParseError {
    #[must_use]
    pub fn line(&self) -> usize {
        match self {
            Self::UnknownCommand { line, .. }
            | Self::Malformed { line, .. }
            | Self::Unterminated { line, .. }
            | Self::DuplicateParameter { line, .. }
            | Self::UnknownParameter { line, .. } => *line,
        }
    }
}

/// One parsed command line
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptLine {
    /// 1-based line number in the script
    pub line: usize,
    pub kind: CommandKind,
    pub params: Params,
}

/// Parse a whole script
///
/// # Errors
/// Returns the first [`ParseError`] in the script.
pub fn parse_script(text: &str) -> Result<Vec<ScriptLine>, ParseError> {
    let mut lines = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        if let Some(line) = parse_line(raw, index + 1)? {
            lines.push(line);
        }
    }
    Ok(lines)
}

/// Parse one line; blank lines and comments yield `None`
///
/// # Errors
/// Returns [`ParseError`] for unknown commands and malformed parameters.
pub fn parse_line(raw: &str, line: usize) -> Result<Option<ScriptLine>, ParseError> {
    let Some((kind, rest)) = split_command(raw, line)? else {
        return Ok(None);
    };

    let descriptor = kind.descriptor();
    let mut params = Params::new();
    let mut cursor = Cursor::new(rest, line);
    while let Some((name, value)) = cursor.next_param()? {
        if descriptor.param(&name).is_none() {
            return Err(ParseError::UnknownParameter {
                line,
                command: descriptor.name,
                name,
            });
        }
        if params.contains(&name) {
            return Err(ParseError::DuplicateParameter { line, name });
        }
        params.insert(name, value);
    }
    Ok(Some(ScriptLine { line, kind, params }))
}

/// Command named by a line, without parsing its parameters
///
/// # Errors
/// Returns [`ParseError::UnknownCommand`] when no command name prefixes the line.
pub fn resolve_command(raw: &str, line: usize) -> Result<Option<CommandKind>, ParseError> {
    Ok(split_command(raw, line)?.map(|(kind, _)| kind))
}

fn split_command(raw: &str, line: usize) -> Result<Option<(CommandKind, &str)>, ParseError> {
    let text = raw.trim();
    if text.is_empty() || text.starts_with('#') {
        return Ok(None);
    }
    Registry::global()
        .longest_prefix(text)
        .map(Some)
        .ok_or_else(|| ParseError::UnknownCommand {
            line,
            text: text.to_string(),
        })
}

struct Cursor<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str, line: usize) -> Self {
        Self {
            chars: text.chars().peekable(),
            line,
        }
    }

    fn skip_whitespace(&mut self) {
        while self.chars.next_if(|c| c.is_whitespace()).is_some() {}
    }

    fn take_until(&mut self, stop: impl Fn(char) -> bool) -> String {
        let mut text = String::new();
        while let Some(c) = self.chars.next_if(|c| !stop(*c)) {
            text.push(c);
        }
        text
    }

    fn malformed(&self, token: impl Into<String>) -> ParseError {
        ParseError::Malformed {
            line: self.line,
            token: token.into(),
        }
    }

    fn unterminated(&self, what: &'static str) -> ParseError {
        ParseError::Unterminated {
            line: self.line,
            what,
        }
    }

    fn next_param(&mut self) -> Result<Option<(String, ParamValue)>, ParseError> {
        self.skip_whitespace();
        if self.chars.peek().is_none() {
            return Ok(None);
        }
        let name = self.take_until(|c| c == '=' || c.is_whitespace());
        if name.is_empty() || self.chars.next_if_eq(&'=').is_none() {
            return Err(self.malformed(name));
        }

        let value = match self.chars.peek().copied() {
            None => return Err(self.malformed(format!("{name}="))),
            Some(c) if c.is_whitespace() => return Err(self.malformed(format!("{name}="))),
            Some(quote @ ('"' | '\'')) => {
                self.chars.next();
                ParamValue::Text(self.quoted(quote)?)
            }
            Some('[') => {
                self.chars.next();
                ParamValue::List(self.list()?)
            }
            Some(_) => scalar(&self.take_until(char::is_whitespace)),
        };

        // values end at whitespace
        if self.chars.peek().is_some_and(|c| !c.is_whitespace()) {
            let trailing = self.take_until(char::is_whitespace);
            return Err(self.malformed(format!("{name}={value}{trailing}")));
        }
        Ok(Some((name, value)))
    }

    /// Quoted string after its opening quote
    fn quoted(&mut self, quote: char) -> Result<String, ParseError> {
        let mut text = String::new();
        loop {
            match self.chars.next() {
                None => return Err(self.unterminated("string")),
                Some('\\') => match self.chars.next() {
                    Some('n') => text.push('\n'),
                    Some('r') => text.push('\r'),
                    Some('t') => text.push('\t'),
                    Some(c) => text.push(c),
                    None => return Err(self.unterminated("string")),
                },
                Some(c) if c == quote => return Ok(text),
                Some(c) => text.push(c),
            }
        }
    }

    /// List items after the opening bracket
    fn list(&mut self) -> Result<Vec<String>, ParseError> {
        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            match self.chars.peek().copied() {
                None => return Err(self.unterminated("list")),
                Some(']') => {
                    self.chars.next();
                    return Ok(items);
                }
                Some(quote @ ('"' | '\'')) => {
                    self.chars.next();
                    items.push(self.quoted(quote)?);
                }
                Some(_) => {
                    let item = self.take_until(|c| c == ',' || c == ']');
                    items.push(item.trim().to_string());
                }
            }
            self.skip_whitespace();
            match self.chars.next() {
                Some(',') => {}
                Some(']') => return Ok(items),
                None => return Err(self.unterminated("list")),
                Some(c) => return Err(self.malformed(format!("unexpected '{c}' in list"))),
            }
        }
    }
}

/// Bare value: boolean, integer, float, or text
fn scalar(token: &str) -> ParamValue {
    match token {
        "True" => return ParamValue::Boolean(true),
        "False" => return ParamValue::Boolean(false),
        _ => {}
    }
    if let Ok(i) = token.parse::<i64>() {
        return ParamValue::Integer(i);
    }
    let numeric = token
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.'));
    match token.parse::<f64>() {
        Ok(f) if numeric && f.is_finite() => ParamValue::Float(f),
        _ => ParamValue::Text(token.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(text: &str) -> ScriptLine {
        parse_line(text, 1).unwrap().unwrap()
    }

    #[test]
    fn skips_blank_and_comment_lines() {
        assert_eq!(parse_line("   ", 1).unwrap(), None);
        assert_eq!(parse_line("# Rotate degrees=3", 1).unwrap(), None);
    }

    #[test]
    fn parses_value_forms() {
        let line = parse(r#"Similarities file="my data.txt" value_type=dissimilarities"#);
        assert_eq!(line.kind, CommandKind::Similarities);
        assert_eq!(line.params.text("file").unwrap(), "my data.txt");
        assert_eq!(line.params.text("value_type").unwrap(), "dissimilarities");

        let line = parse("MDS n_components=2 use_metric=False");
        assert_eq!(line.params.get("n_components"), Some(&ParamValue::Integer(2)));
        assert_eq!(line.params.get("use_metric"), Some(&ParamValue::Boolean(false)));

        let line = parse("Rotate degrees=-12.5");
        assert_eq!(line.params.get("degrees"), Some(&ParamValue::Float(-12.5)));
    }

    #[test]
    fn parses_lists_with_quoted_and_bare_items() {
        let line = parse(r#"Invert dimensions=[Left-Right, "Up, Down", 'a\'b']"#);
        assert_eq!(
            line.params.list("dimensions").unwrap(),
            &["Left-Right".to_string(), "Up, Down".to_string(), "a'b".to_string()]
        );
        let line = parse("Deactivate items=[]");
        assert!(line.params.list("items").unwrap().is_empty());
    }

    #[test]
    fn escapes_in_strings() {
        let line = parse(r#"Configuration file="C:\\data\\\"x\".txt""#);
        assert_eq!(line.params.text("file").unwrap(), r#"C:\data\"x".txt"#);
    }

    #[test]
    fn longest_name_wins() {
        let line = parse("Factor analysis machine learning n_components=2");
        assert_eq!(line.kind, CommandKind::FactorAnalysisMachineLearning);
        let line = parse("Factor analysis n_factors=2");
        assert_eq!(line.kind, CommandKind::FactorAnalysis);
    }

    #[test]
    fn reports_errors_with_line_numbers() {
        let err = parse_script("Center\n\nFrobnicate now\n").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnknownCommand {
                line: 3,
                text: "Frobnicate now".into()
            }
        );
        assert_eq!(err.line(), 3);

        assert!(matches!(
            parse_line("Rotate degrees", 2),
            Err(ParseError::Malformed { line: 2, .. })
        ));
        assert!(matches!(
            parse_line("Rotate degrees=", 2),
            Err(ParseError::Malformed { .. })
        ));
        assert!(matches!(
            parse_line(r#"Configuration file="open"#, 4),
            Err(ParseError::Unterminated { line: 4, what: "string" })
        ));
        assert!(matches!(
            parse_line("Invert dimensions=[a, b", 1),
            Err(ParseError::Unterminated { what: "list", .. })
        ));
        assert!(matches!(
            parse_line("Rotate degrees=1 degrees=2", 1),
            Err(ParseError::DuplicateParameter { .. })
        ));
        assert_eq!(
            parse_line("Rotate angle=3", 5).unwrap_err().to_string(),
            "line 5: Rotate has no parameter 'angle'"
        );
    }

    #[test]
    fn text_after_closing_quote_is_malformed() {
        assert!(matches!(
            parse_line(r#"Configuration file="a"b"#, 1),
            Err(ParseError::Malformed { .. })
        ));
    }

    #[test]
    fn resolve_command_ignores_parameters() {
        assert_eq!(
            resolve_command("Rotate degrees=[", 1).unwrap(),
            Some(CommandKind::Rotate)
        );
        assert_eq!(resolve_command("  # note", 1).unwrap(), None);
        assert!(resolve_command("Rotated", 7).is_err());
    }

    #[test]
    fn scalar_classification() {
        assert_eq!(scalar("42"), ParamValue::Integer(42));
        assert_eq!(scalar("1e3"), ParamValue::Float(1000.0));
        assert_eq!(scalar("inf"), ParamValue::Text("inf".into()));
        assert_eq!(scalar("true"), ParamValue::Text("true".into()));
        assert_eq!(scalar("data/a.txt"), ParamValue::Text("data/a.txt".into()));
    }
}
