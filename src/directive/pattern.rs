use crate::directive::{Directive, DirectiveKind};
use regex::bytes::Regex;
use std::ops::Range;

/// One line matching a directive's declaration syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationMatch {
    /// 1-based line number
    pub line: usize,
    /// Byte span of everything up to and including the separator
    pub prefix: Range<usize>,
    /// Byte span of the value token
    pub value: Range<usize>,
    /// Byte span of the terminator and trailing whitespace
    pub suffix: Range<usize>,
}

impl DeclarationMatch {
    pub fn value_bytes<'a>(&self, content: &'a [u8]) -> &'a [u8] {
        &content[self.value.clone()]
    }
}

/// Line-anchored pattern for a directive's declaration.
///
/// Captures three groups: prefix, value, suffix. The value is the shortest
/// span that still lets the terminator reach end of line, so a value such as
/// `'a;b'` or `foo(1)` is taken whole. CRLF line endings are understood.
/// Matching runs on bytes and the value may hold bytes that are not UTF-8.
#[derive(Debug, Clone)]
pub struct DeclarationPattern {
    regex: Regex,
}

impl DeclarationPattern {
    pub fn new(directive: &Directive) -> Self {
        let name = regex::escape(&directive.name);
        let source = match directive.kind {
            DirectiveKind::Constant => format!(
                r#"(?mR)^([ \t]*define[ \t]*\([ \t]*['"]{name}['"][ \t]*,[ \t]*)((?-u:.)*?)([ \t]*\)[ \t]*;[ \t]*)$"#
            ),
            DirectiveKind::Variable => {
                format!(r"(?mR)^([ \t]*\${name}[ \t]*=[ \t]*)((?-u:.)*?)([ \t]*;[ \t]*)$")
            }
        };

        // The name is escaped and the rest of the pattern is fixed
        let regex = Regex::new(&source).expect("declaration pattern is a valid regex");
        Self { regex }
    }

    /// Find every declaration of the directive in `content`, in file order.
    pub fn find_all(&self, content: &[u8]) -> Vec<DeclarationMatch> {
        let mut matches = Vec::new();
        let mut line = 1;
        let mut counted_to = 0;

        for caps in self.regex.captures_iter(content) {
            let (Some(prefix), Some(value), Some(suffix)) = (caps.get(1), caps.get(2), caps.get(3))
            else {
                continue;
            };

            line += content[counted_to..prefix.start()]
                .iter()
                .filter(|&&b| b == b'\n')
                .count();
            counted_to = prefix.start();

            matches.push(DeclarationMatch {
                line,
                prefix: prefix.range(),
                value: value.range(),
                suffix: suffix.range(),
            });
        }

        matches
    }
}
