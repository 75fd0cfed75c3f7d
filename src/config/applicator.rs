//! Batch applicator - applies every directive of a [`BatchConfig`] to one
//! config file's bytes.
//!
//! Directives are applied in file order against an in-memory buffer. The
//! first failure aborts the whole batch, so callers either get complete new
//! content or nothing to write.

use crate::config::schema::BatchConfig;
use crate::directive::{patch_bytes, Change, Directive, PatchError, DEFAULT_ANCHORS};
use thiserror::Error;
use tracing::debug;

/// Outcome of a successful batch.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "BatchOutcome holds the new content; nothing is written until the caller saves it"]
pub struct BatchOutcome {
    pub content: Vec<u8>,
    pub changes: Vec<(Directive, Change)>,
}

impl BatchOutcome {
    /// Number of directives that actually changed the content.
    pub fn changed(&self) -> usize {
        self.changes
            .iter()
            .filter(|(_, change)| !matches!(change, Change::Unchanged { .. }))
            .count()
    }
}

/// A batch failed on one directive; nothing from the batch was kept.
#[derive(Error, Debug)]
#[error("failed to set {directive}")]
pub struct BatchError {
    pub directive: Directive,
    #[source]
    pub source: PatchError,
}

/// Apply a batch configuration to the contents of a config file.
pub fn apply_batch(
    content: impl AsRef<[u8]>,
    config: &BatchConfig,
) -> Result<BatchOutcome, BatchError> {
    let custom_anchors = config.meta.anchors.as_deref();

    let mut current = content.as_ref().to_vec();
    let mut changes = Vec::with_capacity(config.directives.len());

    for entry in &config.directives {
        let directive = entry.directive();
        let literal = entry.literal();

        let patched = match custom_anchors {
            Some(anchors) => patch_bytes(&current, &directive, &literal, anchors),
            None => patch_bytes(&current, &directive, &literal, DEFAULT_ANCHORS),
        }
        .map_err(|source| BatchError {
            directive: directive.clone(),
            source,
        })?;

        debug!(%directive, change = ?patched.change, "batch directive applied");
        current = patched.content;
        changes.push((directive, patched.change));
    }

    Ok(BatchOutcome {
        content: current,
        changes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_from_str;

    const WP_CONFIG: &str = "<?php\n\
define('DB_NAME', 'wordpress');\n\
$table_prefix = 'wp_';\n\
/* That's all, stop editing! Happy blogging. */\n";

    #[test]
    fn applies_all_directives_in_order() {
        let config = load_from_str(
            r#"
[[directives]]
name = "DB_NAME"
value = "staging"

[[directives]]
name = "WP_DEBUG"
value = true

[[directives]]
name = "table_prefix"
value = "wp_"
variable = true
"#,
        )
        .unwrap();

        let outcome = apply_batch(WP_CONFIG, &config).unwrap();
        assert_eq!(
            String::from_utf8_lossy(&outcome.content),
            "<?php\n\
define('DB_NAME', 'staging');\n\
$table_prefix = 'wp_';\n\
define('WP_DEBUG', true);\n\
/* That's all, stop editing! Happy blogging. */\n"
        );
        assert_eq!(outcome.changes.len(), 3);
        assert_eq!(outcome.changed(), 2);
        assert_eq!(outcome.changes[2].1, Change::Unchanged { line: 3 });
    }

    #[test]
    fn failure_aborts_batch() {
        let config = load_from_str(
            r#"
[meta]
anchors = ["// custom end"]

[[directives]]
name = "DB_NAME"
value = "staging"

[[directives]]
name = "WP_DEBUG"
value = true
"#,
        )
        .unwrap();

        let err = apply_batch(WP_CONFIG, &config).unwrap_err();
        assert_eq!(err.directive, Directive::constant("WP_DEBUG"));
        assert!(matches!(err.source, PatchError::AnchorNotFound { .. }));
        assert_eq!(err.to_string(), "failed to set WP_DEBUG");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn custom_anchor_is_used() {
        let config = load_from_str(
            r#"
[meta]
anchors = ["// custom end"]

[[directives]]
name = "WP_DEBUG"
value = false
"#,
        )
        .unwrap();

        let outcome = apply_batch("<?php\n// custom end\n", &config).unwrap();
        assert_eq!(outcome.content, b"<?php\ndefine('WP_DEBUG', false);\n// custom end\n");
    }
}
