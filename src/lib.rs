//! wpconfig-patcher: set constants and variables in `wp-config.php`
//!
//! Rewrites or inserts `define('NAME', value);` and `$name = value;`
//! declarations while leaving every other byte of the file alone.
//!
//! # Architecture
//!
//! Both a value replacement and an insertion compile down to a single
//! primitive: [`Edit`], a byte-span splice applied to an in-memory buffer.
//! [`patch`] decides which span to touch; the caller reads and writes the
//! file ([`ConfigFile`]). Files are handled as bytes ([`patch_bytes`]), so a
//! config that is not valid UTF-8 is patched like any other.
//!
//! # Safety
//!
//! - Exactly one matching declaration is edited; duplicates are an error
//! - Insertions only happen before the "stop editing" marker
//! - Atomic file writes (tempfile + fsync + rename) that follow symlinks
//! - The file is re-checked before writing to catch concurrent edits
//! - Idempotent: setting the current value leaves the text untouched
//!
//! # Example
//!
//! ```
//! use wpconfig_patcher::{coerce, patch, Directive};
//!
//! let text = "<?php\ndefine('DEBUG', false);\n";
//! let patched = patch(text, &Directive::constant("DEBUG"), &coerce("true")).unwrap();
//! assert_eq!(patched.text, "<?php\ndefine('DEBUG', true);\n");
//! ```

pub mod config;
pub mod directive;
pub mod edit;
pub mod internal;
pub mod literal;
pub mod wpconfig;

// Re-exports
pub use config::{apply_batch, load_from_path, load_from_str, BatchConfig, ConfigError};
pub use directive::{
    find_declaration, patch, patch_bytes, patch_with_anchors, Change, Declaration, Directive,
    DirectiveKind, PatchError, Patched, PatchedBytes, DEFAULT_ANCHORS,
};
pub use edit::{Edit, EditError, EditResult};
pub use literal::{coerce, Literal};
pub use wpconfig::{ConfigFile, FileError};
