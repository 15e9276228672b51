//! Parameter schema and values
//!
//! Every command declares its parameters as a static list of [`ParamSpec`].
//! Supplied values ([`ParamValue`]) are coerced against the schema before a
//! command runs; the coerced [`Params`] are what gets recorded in history and
//! written back out to scripts.

use indexmap::IndexMap;
use std::fmt;

/// Parameter errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParamError {
    /// Required parameter not supplied in non-interactive mode
    #[error("{command}: missing required parameter '{name}'")]
    Missing { command: String, name: String },

    /// Parameter name not in the command's schema
    #[error("{command}: unknown parameter '{name}'")]
    Unknown { command: String, name: String },

    /// Value of the wrong type
    #[error("parameter '{name}' expects {expected}, found {found}")]
    Type {
        name: String,
        expected: &'static str,
        found: &'static str,
    },

    /// Numeric value outside the allowed range
    #[error("parameter '{name}' = {value} is outside {min}..={max}")]
    OutOfRange {
        name: String,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Value not among the allowed options
    #[error("parameter '{name}' must be one of [{choices}], found '{value}'")]
    Choice {
        name: String,
        value: String,
        choices: String,
    },

    /// Value well-typed but meaningless for the current workspace
    #[error("parameter '{name}': {reason}")]
    Invalid { name: String, reason: String },

    /// User dismissed the request for a value
    #[error("{command}: no value given for '{name}'")]
    Cancelled { command: String, name: String },
}

impl ParamError {
    /// Invalid value error
    #[inline]
    pub fn invalid(name: &str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

/// Declared type of a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamType {
    Text,
    Integer,
    Float,
    Boolean,
    TextList,
}

impl ParamType {
    /// Name used in error messages
    #[inline]
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Integer => "an integer",
            Self::Float => "a number",
            Self::Boolean => "True or False",
            Self::TextList => "a list",
        }
    }
}

/// Default for an optional parameter
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefaultValue {
    Text(&'static str),
    Integer(i64),
    Float(f64),
    Boolean(bool),
}

impl DefaultValue {
    /// Owned value
    #[must_use]
    pub fn to_value(self) -> ParamValue {
        match self {
            Self::Text(s) => ParamValue::Text(s.to_string()),
            Self::Integer(i) => ParamValue::Integer(i),
            Self::Float(f) => ParamValue::Float(f),
            Self::Boolean(b) => ParamValue::Boolean(b),
        }
    }
}

/// Declaration of one command parameter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamType,
    pub required: bool,
    pub default: Option<DefaultValue>,
    /// Allowed values for text parameters; empty means any
    pub choices: &'static [&'static str],
    /// Inclusive numeric bounds
    pub range: Option<(f64, f64)>,
    /// Prompt shown when asking the user
    pub label: &'static str,
}

impl ParamSpec {
    /// Required parameter
    #[must_use]
    pub const fn new(name: &'static str, kind: ParamType) -> Self {
        Self {
            name,
            kind,
            required: true,
            default: None,
            choices: &[],
            range: None,
            label: name,
        }
    }

    /// Make the parameter optional with a default
    #[must_use]
    pub const fn optional(mut self, default: DefaultValue) -> Self {
        self.required = false;
        self.default = Some(default);
        self
    }

    /// Restrict text values to a set of options
    #[must_use]
    pub const fn with_choices(mut self, choices: &'static [&'static str]) -> Self {
        self.choices = choices;
        self
    }

    /// Restrict numeric values to an inclusive range
    #[must_use]
    pub const fn with_range(mut self, min: f64, max: f64) -> Self {
        self.range = Some((min, max));
        self
    }

    /// Prompt label
    #[must_use]
    pub const fn with_label(mut self, label: &'static str) -> Self {
        self.label = label;
        self
    }

    /// Coerce a supplied value to this parameter's type and check it
    ///
    /// Integers widen to floats, integral floats narrow to integers, scalars
    /// become text and a single text becomes a one-element list.
    ///
    /// # Errors
    /// Returns [`ParamError`] for type, range and choice violations.
    pub fn coerce(&self, value: ParamValue) -> Result<ParamValue, ParamError> {
        let value = match (self.kind, value) {
            (ParamType::Text, ParamValue::Text(s)) => ParamValue::Text(s),
            (ParamType::Text, ParamValue::Integer(i)) => ParamValue::Text(i.to_string()),
            (ParamType::Text, ParamValue::Float(f)) => ParamValue::Text(f.to_string()),
            (ParamType::Integer, ParamValue::Integer(i)) => ParamValue::Integer(i),
            #[allow(clippy::cast_possible_truncation)]
            (ParamType::Integer, ParamValue::Float(f)) if f.is_finite() && f.fract() == 0.0 => {
                ParamValue::Integer(f as i64)
            }
            (ParamType::Float, ParamValue::Float(f)) => ParamValue::Float(f),
            #[allow(clippy::cast_precision_loss)]
            (ParamType::Float, ParamValue::Integer(i)) => ParamValue::Float(i as f64),
            (ParamType::Boolean, ParamValue::Boolean(b)) => ParamValue::Boolean(b),
            (ParamType::TextList, ParamValue::List(items)) => ParamValue::List(items),
            (ParamType::TextList, ParamValue::Text(s)) => ParamValue::List(vec![s]),
            (kind, other) => {
                return Err(ParamError::Type {
                    name: self.name.to_string(),
                    expected: kind.describe(),
                    found: other.type_name(),
                })
            }
        };
        self.check(value)
    }

    fn check(&self, value: ParamValue) -> Result<ParamValue, ParamError> {
        if let (Some((min, max)), Some(number)) = (self.range, value.as_float()) {
            if !(min..=max).contains(&number) {
                return Err(ParamError::OutOfRange {
                    name: self.name.to_string(),
                    value: number,
                    min,
                    max,
                });
            }
        }
        if self.choices.is_empty() {
            return Ok(value);
        }
        if let ParamValue::Text(text) = &value {
            return match self.choices.iter().find(|c| c.eq_ignore_ascii_case(text)) {
                Some(choice) => Ok(ParamValue::Text((*choice).to_string())),
                None => Err(ParamError::Choice {
                    name: self.name.to_string(),
                    value: text.clone(),
                    choices: self.choices.join(", "),
                }),
            };
        }
        Ok(value)
    }
}

/// A parameter value
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    List(Vec<String>),
}

impl ParamValue {
    /// Name of the value's type for error messages
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Integer(_) => "an integer",
            Self::Float(_) => "a number",
            Self::Boolean(_) => "a boolean",
            Self::List(_) => "a list",
        }
    }

    #[inline]
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric value; integers widen
    #[inline]
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            #[allow(clippy::cast_precision_loss)]
            Self::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }
}

/// Quote text for a script
///
/// Backslashes and double quotes are escaped, and line breaks and tabs are
/// written as `\n`, `\r` and `\t` so the literal stays on one line.
#[must_use]
pub fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for c in text.chars() {
        match c {
            '"' | '\\' => {
                quoted.push('\\');
                quoted.push(c);
            }
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

/// Formats as a script literal that parses back to the same value
impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(&quote(s)),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x:?}"),
            Self::Boolean(true) => f.write_str("True"),
            Self::Boolean(false) => f.write_str("False"),
            Self::List(items) => {
                let quoted: Vec<String> = items.iter().map(|s| quote(s)).collect();
                write!(f, "[{}]", quoted.join(", "))
            }
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl From<&[&str]> for ParamValue {
    fn from(value: &[&str]) -> Self {
        Self::List(value.iter().map(|s| (*s).to_string()).collect())
    }
}

/// Parameters of one invocation, in insertion order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Params(IndexMap<String, ParamValue>);

impl Params {
    /// Create empty parameters
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// Insert a value, returning the previous one
    pub fn insert(&mut self, name: impl Into<String>, value: ParamValue) -> Option<ParamValue> {
        self.0.insert(name.into(), value)
    }

    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0.get(name)
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    fn required(&self, name: &str) -> Result<&ParamValue, ParamError> {
        self.get(name).ok_or_else(|| ParamError::invalid(name, "not bound"))
    }

    fn mismatch(name: &str, expected: ParamType, found: &ParamValue) -> ParamError {
        ParamError::Type {
            name: name.to_string(),
            expected: expected.describe(),
            found: found.type_name(),
        }
    }

    /// Text value of a bound parameter
    ///
    /// # Errors
    /// Returns [`ParamError`] when absent or not text.
    pub fn text(&self, name: &str) -> Result<&str, ParamError> {
        let value = self.required(name)?;
        value
            .as_text()
            .ok_or_else(|| Self::mismatch(name, ParamType::Text, value))
    }

    /// Integer value of a bound parameter
    ///
    /// # Errors
    /// Returns [`ParamError`] when absent or not an integer.
    pub fn integer(&self, name: &str) -> Result<i64, ParamError> {
        let value = self.required(name)?;
        value
            .as_integer()
            .ok_or_else(|| Self::mismatch(name, ParamType::Integer, value))
    }

    /// Numeric value of a bound parameter
    ///
    /// # Errors
    /// Returns [`ParamError`] when absent or not numeric.
    pub fn float(&self, name: &str) -> Result<f64, ParamError> {
        let value = self.required(name)?;
        value
            .as_float()
            .ok_or_else(|| Self::mismatch(name, ParamType::Float, value))
    }

    /// Boolean value of a bound parameter
    ///
    /// # Errors
    /// Returns [`ParamError`] when absent or not a boolean.
    pub fn boolean(&self, name: &str) -> Result<bool, ParamError> {
        let value = self.required(name)?;
        value
            .as_bool()
            .ok_or_else(|| Self::mismatch(name, ParamType::Boolean, value))
    }

    /// List value of a bound parameter
    ///
    /// # Errors
    /// Returns [`ParamError`] when absent or not a list.
    pub fn list(&self, name: &str) -> Result<&[String], ParamError> {
        let value = self.required(name)?;
        value
            .as_list()
            .ok_or_else(|| Self::mismatch(name, ParamType::TextList, value))
    }

    /// List of numbers given as text items
    ///
    /// # Errors
    /// Returns [`ParamError::Invalid`] when an item is not a finite number.
    pub fn numbers(&self, name: &str) -> Result<Vec<f64>, ParamError> {
        self.list(name)?
            .iter()
            .map(|item| match item.trim().parse::<f64>() {
                Ok(x) if x.is_finite() => Ok(x),
                Ok(_) => Err(ParamError::invalid(name, format!("'{item}' is not a finite number"))),
                Err(_) => Err(ParamError::invalid(name, format!("'{item}' is not a number"))),
            })
            .collect()
    }
}

impl FromIterator<(String, ParamValue)> for Params {
    fn from_iter<I: IntoIterator<Item = (String, ParamValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for Params {
    /// `key=value` pairs separated by spaces
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (name, value) in self.iter() {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{name}={value}")?;
            first = false;
        }
        Ok(())
    }
}
