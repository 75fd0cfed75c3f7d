use crate::directive::errors::PatchError;
use crate::directive::pattern::DeclarationPattern;
use crate::directive::{Directive, DirectiveKind};
use crate::edit::{Edit, EditError, EditResult};
use crate::literal::Literal;
use tracing::debug;

/// Markers closing the editable part of `wp-config.php`, tried in order.
///
/// The first is the historical wording, the second what current WordPress
/// generates.
pub const DEFAULT_ANCHORS: &[&str] = &[
    "/* That's all, stop editing! Happy blogging. */",
    "/* That's all, stop editing! Happy publishing. */",
];

/// What a patch did to the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// An existing declaration's value was rewritten
    Replaced { line: usize, previous: String },
    /// A new declaration was inserted before the anchor
    Inserted { line: usize },
    /// The declaration already held the value
    Unchanged { line: usize },
}

/// New text plus a description of the change.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "Patched holds the new text; nothing is written until the caller saves it"]
pub struct Patched {
    pub text: String,
    pub change: Change,
}

impl Patched {
    pub fn is_unchanged(&self) -> bool {
        matches!(self.change, Change::Unchanged { .. })
    }
}

/// New file bytes plus a description of the change.
///
/// Returned by [`patch_bytes`]; bytes outside the edited span are the input's,
/// whatever their encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "PatchedBytes holds the new content; nothing is written until the caller saves it"]
pub struct PatchedBytes {
    pub content: Vec<u8>,
    pub change: Change,
}

impl PatchedBytes {
    pub fn is_unchanged(&self) -> bool {
        matches!(self.change, Change::Unchanged { .. })
    }
}

/// The current declaration of a directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub line: usize,
    /// Value token as written in the file (invalid UTF-8 shown as U+FFFD)
    pub value: String,
}

/// Set `directive` to `value` in `text`, anchoring insertions on
/// [`DEFAULT_ANCHORS`].
pub fn patch(text: &str, directive: &Directive, value: &Literal) -> Result<Patched, PatchError> {
    patch_with_anchors(text, directive, value, DEFAULT_ANCHORS)
}

/// Set `directive` to `value` in `text`.
///
/// Exactly one existing declaration has its value token replaced; with none,
/// a declaration line is inserted right before the first anchor found.
/// Pure: returns the complete new text or an error, never a partial result.
pub fn patch_with_anchors<S: AsRef<str>>(
    text: &str,
    directive: &Directive,
    value: &Literal,
    anchors: &[S],
) -> Result<Patched, PatchError> {
    let patched = patch_bytes(text.as_bytes(), directive, value, anchors)?;
    let text = String::from_utf8(patched.content).map_err(|_| EditError::InvalidUtf8Edit)?;

    Ok(Patched {
        text,
        change: patched.change,
    })
}

/// Set `directive` to `value` in the raw bytes of a config file.
///
/// Same rules as [`patch_with_anchors`]. The file need not be valid UTF-8:
/// only the value span or the insertion point is touched, every other byte
/// comes through as it was.
pub fn patch_bytes<S: AsRef<str>>(
    content: &[u8],
    directive: &Directive,
    value: &Literal,
    anchors: &[S],
) -> Result<PatchedBytes, PatchError> {
    directive.validate()?;
    check_literal(value)?;

    let php = value.to_php();
    let matches = DeclarationPattern::new(directive).find_all(content);

    match matches.as_slice() {
        [] => {}
        [found] => {
            let previous = String::from_utf8_lossy(found.value_bytes(content)).into_owned();
            debug!(%directive, line = found.line, %previous, "replacing declaration value");

            let edit = Edit::new(found.value.start, found.value.end, php);
            return Ok(match edit.apply_to(content)? {
                EditResult::Applied { content, .. } => PatchedBytes {
                    content,
                    change: Change::Replaced {
                        line: found.line,
                        previous,
                    },
                },
                EditResult::AlreadyApplied { content } => PatchedBytes {
                    content,
                    change: Change::Unchanged { line: found.line },
                },
            });
        }
        many => {
            return Err(PatchError::AmbiguousDeclaration {
                kind: directive.kind,
                name: directive.name.clone(),
                lines: many.iter().map(|m| m.line).collect(),
            });
        }
    }

    let Some(offset) = anchors
        .iter()
        .find_map(|anchor| find_subslice(content, anchor.as_ref().as_bytes()))
    else {
        return Err(PatchError::AnchorNotFound {
            kind: directive.kind,
        });
    };

    let line = content[..offset].iter().filter(|&&b| b == b'\n').count() + 1;
    debug!(%directive, line, "inserting declaration before anchor");

    let declaration = declaration_line(directive, &php, line_ending(content));
    let content = Edit::insert(offset, declaration)
        .apply_to(content)?
        .into_content();

    Ok(PatchedBytes {
        content,
        change: Change::Inserted { line },
    })
}

/// Look up the current declaration of `directive` without changing anything.
pub fn find_declaration(
    content: impl AsRef<[u8]>,
    directive: &Directive,
) -> Result<Option<Declaration>, PatchError> {
    directive.validate()?;

    let content = content.as_ref();
    let matches = DeclarationPattern::new(directive).find_all(content);
    match matches.as_slice() {
        [] => Ok(None),
        [found] => Ok(Some(Declaration {
            line: found.line,
            value: String::from_utf8_lossy(found.value_bytes(content)).into_owned(),
        })),
        many => Err(PatchError::AmbiguousDeclaration {
            kind: directive.kind,
            name: directive.name.clone(),
            lines: many.iter().map(|m| m.line).collect(),
        }),
    }
}

/// Raw text goes in verbatim, but must be a single non-empty line.
fn check_literal(value: &Literal) -> Result<(), PatchError> {
    if let Literal::Raw(text) = value {
        if text.trim().is_empty() {
            return Err(PatchError::InvalidLiteral {
                reason: "raw value is empty".to_string(),
            });
        }
        if text.contains(['\n', '\r']) {
            return Err(PatchError::InvalidLiteral {
                reason: "raw value spans multiple lines".to_string(),
            });
        }
    }
    Ok(())
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack.windows(needle.len()).position(|window| window == needle)
}

fn line_ending(content: &[u8]) -> &'static str {
    if find_subslice(content, b"\r\n").is_some() {
        "\r\n"
    } else {
        "\n"
    }
}

fn declaration_line(directive: &Directive, php: &str, newline: &str) -> String {
    match directive.kind {
        DirectiveKind::Constant => format!("define('{}', {});{}", directive.name, php, newline),
        DirectiveKind::Variable => format!("${} = {};{}", directive.name, php, newline),
    }
}
