pub mod applicator;
pub mod loader;
pub mod schema;

pub use applicator::{apply_batch, BatchError, BatchOutcome};
pub use loader::{load_from_path, load_from_str, ConfigError};
pub use schema::{
    BatchConfig, DirectiveEntry, EntryValue, Metadata, ValidationError, ValidationIssue,
};
