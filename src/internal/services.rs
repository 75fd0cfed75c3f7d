/// Error type collaborators report through.
pub type BackendError = Box<dyn std::error::Error + Send + Sync>;

/// Handle to the site database.
pub trait Database {
    /// Names of every table belonging to the site.
    fn tables(&self) -> Vec<String>;
    /// Name of the options table, which survives clone finalization by default.
    fn options_table(&self) -> String;
    /// Table name prefix (`$table_prefix`).
    fn prefix(&self) -> String;
    fn execute(&self, sql: &str) -> Result<(), BackendError>;
    /// Run a query and return its first column.
    fn query_column(&self, sql: &str) -> Result<Vec<String>, BackendError>;
}

/// Rebuilds the database from the versioned files.
pub trait Synchronizer {
    /// Idempotent; safe after any bulk data change.
    fn synchronize_all(&self) -> Result<(), BackendError>;
}

/// Maps local numeric ids to stable 16-byte identifiers (hex encoded).
pub trait VpidRepository {
    fn vpid_for_entity(&self, entity: &str, id: u64) -> Result<Option<String>, BackendError>;
}

/// Site-level switches and cache notifications.
pub trait SiteState {
    fn enable_maintenance(&self) -> Result<(), BackendError>;
    fn disable_maintenance(&self) -> Result<(), BackendError>;
    /// Drop options that are derived from other data.
    fn flush_regenerable_options(&self) -> Result<(), BackendError>;
    /// Schedule a rewrite rule flush and trigger it with a request to the site.
    fn flush_rewrite_rules(&self) -> Result<(), BackendError>;
}

/// Creates the plugin's own tables.
pub trait Initializer {
    fn create_tables(&self) -> Result<(), BackendError>;
}

/// The site's checked-out files.
pub trait WorkingCopy {
    /// Discard local changes so the files match the last commit.
    fn reset_hard(&self) -> Result<(), BackendError>;
}

/// Everything the multi-step handlers need, borrowed for one call.
#[derive(Clone, Copy)]
pub struct Services<'a> {
    pub database: &'a dyn Database,
    pub synchronizer: &'a dyn Synchronizer,
    pub site: &'a dyn SiteState,
    pub initializer: &'a dyn Initializer,
    pub working_copy: &'a dyn WorkingCopy,
}
