//! Value coercion: command-line arguments are always strings, the config file
//! wants typed PHP literals.
//!
//! [`coerce`] restores the intended type from lexical shape, and
//! [`Literal::to_php`] renders the value the way PHP's `var_export` would, so
//! the file evaluates back to an equivalent value.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// A typed value destined for a configuration file.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    /// Caller-supplied PHP expression, emitted verbatim.
    Raw(String),
}

fn numeric_grammar() -> &'static Regex {
    static NUMERIC: OnceLock<Regex> = OnceLock::new();
    NUMERIC.get_or_init(|| {
        Regex::new(r"^[+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?$")
            .expect("numeric grammar is a valid regex")
    })
}

/// Convert a command-line string into a typed literal. Never fails.
///
/// Numeric strings become `Integer` (or `Float` when they carry a fraction,
/// an exponent, or overflow `i64`), `true`/`false` in any case become
/// `Boolean`, and everything else stays a `String`.
pub fn coerce(raw: &str) -> Literal {
    let trimmed = raw.trim_matches(|c: char| c.is_ascii_whitespace() || c == '\x0b');

    if numeric_grammar().is_match(trimmed) {
        let is_integral = !trimmed.contains(['.', 'e', 'E']);
        if is_integral {
            if let Ok(n) = trimmed.parse::<i64>() {
                return Literal::Integer(n);
            }
        }
        if let Ok(f) = trimmed.parse::<f64>() {
            return Literal::Float(f);
        }
    }

    if raw.eq_ignore_ascii_case("true") {
        return Literal::Boolean(true);
    }
    if raw.eq_ignore_ascii_case("false") {
        return Literal::Boolean(false);
    }

    Literal::String(raw.to_string())
}

impl Literal {
    /// Raw mode: `text` is written into the file exactly as given.
    pub fn raw(text: impl Into<String>) -> Self {
        Literal::Raw(text.into())
    }

    /// Build a literal from CLI input, honouring the plain (raw) switch.
    pub fn from_input(value: &str, plain: bool) -> Self {
        if plain {
            Literal::raw(value)
        } else {
            coerce(value)
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Literal::Boolean(_) => "boolean",
            Literal::Integer(_) => "integer",
            Literal::Float(_) => "float",
            Literal::String(_) => "string",
            Literal::Raw(_) => "raw",
        }
    }

    /// Serialize as PHP source.
    pub fn to_php(&self) -> String {
        match self {
            Literal::Boolean(b) => b.to_string(),
            Literal::Integer(n) => n.to_string(),
            Literal::Float(f) => php_float(*f),
            Literal::String(s) => php_string(s),
            Literal::Raw(text) => text.clone(),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_php())
    }
}

fn php_float(f: f64) -> String {
    if f.is_nan() {
        return "NAN".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "INF" } else { "-INF" }.to_string();
    }
    // Debug gives the shortest round-trip form and keeps `.0` on integral values
    format!("{f:?}")
}

fn php_string(s: &str) -> String {
    if s.contains(['\n', '\r', '\0']) {
        // Keep the declaration on one line
        let mut out = String::with_capacity(s.len() + 2);
        out.push('"');
        for c in s.chars() {
            match c {
                '\\' => out.push_str("\\\\"),
                '"' => out.push_str("\\\""),
                '$' => out.push_str("\\$"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\0' => out.push_str("\\0"),
                other => out.push(other),
            }
        }
        out.push('"');
        return out;
    }

    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        if c == '\\' || c == '\'' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('\'');
    out
}
