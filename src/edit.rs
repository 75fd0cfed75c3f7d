use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The fundamental edit primitive: a byte-span splice.
///
/// Both replacing a declaration's value and inserting a new declaration
/// compile down to this. Insertion is a zero-width span at the anchor offset.
/// Spans are byte offsets, so buffers that are not valid UTF-8 are edited
/// like any other.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "Edit does nothing until apply_to() is called"]
pub struct Edit {
    /// Starting byte offset (inclusive)
    pub byte_start: usize,
    /// Ending byte offset (exclusive)
    pub byte_end: usize,
    /// New text to put at [byte_start, byte_end)
    pub new_text: String,
}

#[derive(Error, Debug)]
pub enum EditError {
    #[error("Invalid byte range: [{byte_start}, {byte_end}) in buffer of length {len}")]
    InvalidByteRange {
        byte_start: usize,
        byte_end: usize,
        len: usize,
    },

    #[error("Invalid edit would create malformed UTF-8")]
    InvalidUtf8Edit,

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Result of applying an edit to a buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "EditResult should be checked for applied/already-applied"]
pub enum EditResult {
    /// The span was rewritten
    Applied { content: Vec<u8>, bytes_changed: usize },
    /// The span already held the new text; the buffer is returned untouched
    AlreadyApplied { content: Vec<u8> },
}

impl EditResult {
    pub fn into_content(self) -> Vec<u8> {
        match self {
            EditResult::Applied { content, .. } | EditResult::AlreadyApplied { content } => content,
        }
    }
}

impl Edit {
    pub fn new(byte_start: usize, byte_end: usize, new_text: impl Into<String>) -> Self {
        Self {
            byte_start,
            byte_end,
            new_text: new_text.into(),
        }
    }

    /// Create a zero-width insertion at `offset`.
    pub fn insert(offset: usize, new_text: impl Into<String>) -> Self {
        Self::new(offset, offset, new_text)
    }

    /// Apply this edit to an in-memory buffer, producing the new buffer.
    ///
    /// The input is never modified; on error the caller still holds the
    /// original bytes untouched.
    pub fn apply_to(&self, content: &[u8]) -> Result<EditResult, EditError> {
        if self.byte_start > self.byte_end || self.byte_end > content.len() {
            return Err(EditError::InvalidByteRange {
                byte_start: self.byte_start,
                byte_end: self.byte_end,
                len: content.len(),
            });
        }

        // A zero-width insertion of non-empty text is never "already applied"
        let current = &content[self.byte_start..self.byte_end];
        if current == self.new_text.as_bytes() && self.byte_start != self.byte_end {
            return Ok(EditResult::AlreadyApplied {
                content: content.to_vec(),
            });
        }

        let mut new_content =
            Vec::with_capacity(content.len() - current.len() + self.new_text.len());
        new_content.extend_from_slice(&content[..self.byte_start]);
        new_content.extend_from_slice(self.new_text.as_bytes());
        new_content.extend_from_slice(&content[self.byte_end..]);

        Ok(EditResult::Applied {
            content: new_content,
            bytes_changed: self.new_text.len(),
        })
    }
}

/// Atomic file write: tempfile + fsync + rename.
///
/// Either the full write lands or the original file stays as it was. A
/// symlink at `path` is followed, so the link stays in place and its target
/// receives the new content. The permissions of an existing file are carried
/// over to the new one.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<(), EditError> {
    let target = resolve_target(path)?;

    // Tempfile next to the real file so the rename stays on one filesystem
    let parent = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(content)?;

    if let Ok(metadata) = fs::metadata(&target) {
        temp.as_file().set_permissions(metadata.permissions())?;
    }

    temp.as_file().sync_all()?;
    temp.persist(&target).map_err(|e| e.error)?;

    Ok(())
}

/// The file a write to `path` should land in; `path` itself when it does
/// not exist yet.
fn resolve_target(path: &Path) -> io::Result<PathBuf> {
    match fs::canonicalize(path) {
        Ok(target) => Ok(target),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(path.to_path_buf()),
        Err(err) => Err(err),
    }
}
