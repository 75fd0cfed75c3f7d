//! Reading batch files.
//!
//! Both entry points share one parse step; a path, when there is one, is
//! attached to the error at the point it is raised.

use crate::config::schema::{BatchConfig, ValidationError};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read batch file {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse batch file{}", origin(.path))]
    Toml {
        path: Option<PathBuf>,
        #[source]
        source: toml_edit::de::Error,
    },

    #[error("invalid batch file{}", origin(.path))]
    Validation {
        path: Option<PathBuf>,
        #[source]
        source: ValidationError,
    },
}

fn origin(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|path| format!(" {}", path.display()))
        .unwrap_or_default()
}

pub fn load_from_str(input: &str) -> Result<BatchConfig, ConfigError> {
    parse(input, None)
}

pub fn load_from_path(path: impl AsRef<Path>) -> Result<BatchConfig, ConfigError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&contents, Some(path))
}

fn parse(input: &str, path: Option<&Path>) -> Result<BatchConfig, ConfigError> {
    let owned_path = || path.map(Path::to_path_buf);

    let config: BatchConfig = toml_edit::de::from_str(input).map_err(|source| {
        ConfigError::Toml {
            path: owned_path(),
            source,
        }
    })?;
    config.validate().map_err(|source| ConfigError::Validation {
        path: owned_path(),
        source,
    })?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{EntryValue, ValidationIssue};
    use crate::literal::Literal;

    #[test]
    fn parses_typed_values() {
        let config = load_from_str(
            r#"
[meta]
name = "staging"

[[directives]]
name = "WP_DEBUG"
value = true

[[directives]]
name = "WP_MEMORY"
value = 256

[[directives]]
name = "RATIO"
value = 0.5

[[directives]]
name = "table_prefix"
value = "stg_"
variable = true

[[directives]]
name = "WP_HOME"
value = "'http://' . $_SERVER['HTTP_HOST']"
plain = true
"#,
        )
        .unwrap();

        assert_eq!(config.meta.name.as_deref(), Some("staging"));
        let literals: Vec<_> = config.directives.iter().map(|d| d.literal()).collect();
        assert_eq!(
            literals,
            [
                Literal::Boolean(true),
                Literal::Integer(256),
                Literal::Float(0.5),
                Literal::String("stg_".to_string()),
                Literal::raw("'http://' . $_SERVER['HTTP_HOST']"),
            ]
        );
        assert_eq!(config.directives[3].directive().to_string(), "$table_prefix");
    }

    #[test]
    fn string_values_are_coerced() {
        let config = load_from_str(
            r#"
[[directives]]
name = "WP_DEBUG"
value = "TRUE"
"#,
        )
        .unwrap();
        assert_eq!(config.directives[0].value, EntryValue::Text("TRUE".into()));
        assert_eq!(config.directives[0].literal(), Literal::Boolean(true));
    }

    #[test]
    fn empty_file_is_invalid() {
        let err = load_from_str("").unwrap_err();
        match err {
            ConfigError::Validation { source, .. } => {
                assert!(matches!(
                    source.issues.as_slice(),
                    [ValidationIssue::EmptyDirectiveList]
                ));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn collects_every_issue() {
        let err = load_from_str(
            r#"
[meta]
anchors = []

[[directives]]
name = "A"
value = 1

[[directives]]
name = "A"
value = 2

[[directives]]
name = "bad name"
value = 3
plain = true
"#,
        )
        .unwrap_err();

        let ConfigError::Validation { source, .. } = err else {
            panic!("expected validation error");
        };
        assert_eq!(source.issues.len(), 4);
        let message = source.to_string();
        assert!(message.contains("meta.anchors"));
        assert!(message.contains("'A' is listed more than once"));
        assert!(message.contains("'bad name' is not a valid PHP identifier"));
        assert!(message.contains("plain requires a string value"));
    }

    #[test]
    fn same_name_as_constant_and_variable_is_allowed() {
        let config = load_from_str(
            r#"
[[directives]]
name = "prefix"
value = "a"

[[directives]]
name = "prefix"
value = "b"
variable = true
"#,
        );
        assert!(config.is_ok());
    }

    #[test]
    fn blank_name_is_a_missing_field() {
        let err = load_from_str(
            r#"
[[directives]]
name = " "
value = 1
"#,
        )
        .unwrap_err();

        let ConfigError::Validation { source, .. } = err else {
            panic!("expected validation error");
        };
        assert!(matches!(
            source.issues.as_slice(),
            [ValidationIssue::MissingField { field: "name" }]
        ));
        assert_eq!(
            source.issues[0].to_string(),
            "directive missing required field 'name'"
        );
    }

    #[test]
    fn load_from_path_reports_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("batch.toml");
        fs::write(&path, "directives = 5").unwrap();

        let err = load_from_path(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Toml { path: Some(_), .. }));
        assert_eq!(
            err.to_string(),
            format!("failed to parse batch file {}", path.display())
        );
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn load_from_str_has_no_path() {
        let err = load_from_str("").unwrap_err();
        assert!(matches!(err, ConfigError::Validation { path: None, .. }));
        assert_eq!(err.to_string(), "invalid batch file");
    }

    #[test]
    fn unreadable_file_keeps_io_cause() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("missing.toml");

        let err = load_from_path(&path).unwrap_err();
        let ConfigError::Io { source, .. } = &err else {
            panic!("expected I/O error");
        };
        assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        assert!(!err.to_string().contains(&source.to_string()));
    }
}
