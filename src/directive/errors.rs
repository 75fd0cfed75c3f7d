use crate::directive::DirectiveKind;
use crate::edit::EditError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PatchError {
    #[error("Cannot find place for defining the {kind}. Config was probably edited manually.")]
    AnchorNotFound { kind: DirectiveKind },

    #[error(
        "{kind} '{name}' is declared on {count} lines ({line_list}); refusing to guess which one to edit",
        count = .lines.len(),
        line_list = join_lines(.lines)
    )]
    AmbiguousDeclaration {
        kind: DirectiveKind,
        name: String,
        lines: Vec<usize>,
    },

    #[error("invalid literal: {reason}")]
    InvalidLiteral { reason: String },

    #[error("'{name}' is not a valid PHP identifier")]
    InvalidName { name: String },

    #[error(transparent)]
    Edit(#[from] EditError),
}

fn join_lines(lines: &[usize]) -> String {
    lines
        .iter()
        .map(|line| format!("line {line}"))
        .collect::<Vec<_>>()
        .join(", ")
}
