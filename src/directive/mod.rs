//! Directive patching for `wp-config.php`.
//!
//! A directive is either a constant (`define('NAME', value);`) or a variable
//! (`$name = value;`). Existing declarations are found with line-anchored
//! patterns and only their value token is rewritten; missing ones are
//! inserted just before the "stop editing" marker.

pub mod errors;
pub mod patcher;
pub mod pattern;

pub use errors::PatchError;
pub use patcher::{
    find_declaration, patch, patch_bytes, patch_with_anchors, Change, Declaration, Patched,
    PatchedBytes, DEFAULT_ANCHORS,
};
pub use pattern::{DeclarationMatch, DeclarationPattern};

use std::fmt;

/// Declaration style of a directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectiveKind {
    Constant,
    Variable,
}

impl DirectiveKind {
    pub fn from_flag(variable: bool) -> Self {
        if variable {
            DirectiveKind::Variable
        } else {
            DirectiveKind::Constant
        }
    }
}

impl fmt::Display for DirectiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectiveKind::Constant => f.write_str("constant"),
            DirectiveKind::Variable => f.write_str("variable"),
        }
    }
}

/// A named constant or variable in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Directive {
    pub name: String,
    pub kind: DirectiveKind,
}

impl Directive {
    pub fn new(name: impl Into<String>, kind: DirectiveKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn constant(name: impl Into<String>) -> Self {
        Self::new(name, DirectiveKind::Constant)
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Self::new(name, DirectiveKind::Variable)
    }

    /// Reject names that are not PHP identifiers.
    ///
    /// The name is spliced into both the search pattern and the generated
    /// declaration, so anything outside `[A-Za-z_][A-Za-z0-9_]*` (plus the
    /// non-ASCII range PHP allows) is refused.
    pub fn validate(&self) -> Result<(), PatchError> {
        let mut chars = self.name.chars();
        let valid = match chars.next() {
            Some(first) => {
                (first == '_' || first.is_ascii_alphabetic() || !first.is_ascii())
                    && chars.all(|c| c == '_' || c.is_ascii_alphanumeric() || !c.is_ascii())
            }
            None => false,
        };

        if valid {
            Ok(())
        } else {
            Err(PatchError::InvalidName {
                name: self.name.clone(),
            })
        }
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            DirectiveKind::Constant => write!(f, "{}", self.name),
            DirectiveKind::Variable => write!(f, "${}", self.name),
        }
    }
}
