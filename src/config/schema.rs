use crate::directive::{Directive, DirectiveKind};
use crate::literal::{coerce, Literal};
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;

/// A batch of directive updates, usually loaded from a TOML file.
///
/// ```toml
/// [meta]
/// name = "staging"
///
/// [[directives]]
/// name = "WP_DEBUG"
/// value = true
///
/// [[directives]]
/// name = "table_prefix"
/// value = "stg_"
/// variable = true
/// ```
#[derive(Debug, Deserialize, Default, Clone)]
pub struct BatchConfig {
    #[serde(default)]
    pub meta: Metadata,
    #[serde(default)]
    pub directives: Vec<DirectiveEntry>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Metadata {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Overrides the default "stop editing" markers
    #[serde(default)]
    pub anchors: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DirectiveEntry {
    pub name: String,
    pub value: EntryValue,
    /// Use a string value verbatim as PHP source
    #[serde(default)]
    pub plain: bool,
    /// Set `$name` instead of `define('name', ...)`
    #[serde(default)]
    pub variable: bool,
}

/// TOML already carries types; strings still go through coercion so a file
/// behaves like the command line.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum EntryValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl DirectiveEntry {
    pub fn directive(&self) -> Directive {
        Directive::new(self.name.clone(), DirectiveKind::from_flag(self.variable))
    }

    pub fn literal(&self) -> Literal {
        match &self.value {
            EntryValue::Bool(b) => Literal::Boolean(*b),
            EntryValue::Integer(n) => Literal::Integer(*n),
            EntryValue::Float(f) => Literal::Float(*f),
            EntryValue::Text(text) if self.plain => Literal::raw(text.clone()),
            EntryValue::Text(text) => coerce(text),
        }
    }
}

impl BatchConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();

        if self.directives.is_empty() {
            issues.push(ValidationIssue::EmptyDirectiveList);
        }

        if let Some(anchors) = &self.meta.anchors {
            if anchors.is_empty() || anchors.iter().any(|a| a.trim().is_empty()) {
                issues.push(ValidationIssue::EmptyAnchor);
            }
        }

        let mut seen = HashSet::new();
        for entry in &self.directives {
            let directive = entry.directive();

            if entry.name.trim().is_empty() {
                issues.push(ValidationIssue::MissingField { field: "name" });
                continue;
            }
            if directive.validate().is_err() {
                issues.push(ValidationIssue::InvalidName {
                    name: entry.name.clone(),
                });
            }
            if entry.plain && !matches!(entry.value, EntryValue::Text(_)) {
                issues.push(ValidationIssue::InvalidCombo {
                    directive: Some(directive.to_string()),
                    message: "plain requires a string value".to_string(),
                });
            }
            if !seen.insert(directive.clone()) {
                issues.push(ValidationIssue::Duplicate {
                    directive: directive.to_string(),
                });
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }
}

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, issue) in self.issues.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone)]
pub enum ValidationIssue {
    EmptyDirectiveList,
    EmptyAnchor,
    MissingField {
        field: &'static str,
    },
    InvalidName {
        name: String,
    },
    Duplicate {
        directive: String,
    },
    InvalidCombo {
        directive: Option<String>,
        message: String,
    },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::EmptyDirectiveList => write!(f, "batch file contains no directives"),
            ValidationIssue::EmptyAnchor => write!(f, "meta.anchors must list non-empty markers"),
            ValidationIssue::MissingField { field } => {
                write!(f, "directive missing required field '{field}'")
            }
            ValidationIssue::InvalidName { name } => {
                write!(f, "directive name '{name}' is not a valid PHP identifier")
            }
            ValidationIssue::Duplicate { directive } => {
                write!(f, "directive '{directive}' is listed more than once")
            }
            ValidationIssue::InvalidCombo { directive, message } => match directive {
                Some(name) => write!(f, "directive '{name}' has invalid configuration: {message}"),
                None => write!(f, "invalid directive configuration: {message}"),
            },
        }
    }
}
