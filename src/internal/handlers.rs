use crate::internal::services::{BackendError, Database, Services, SiteState, VpidRepository};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("'{0}' is not a 32-character hexadecimal identifier")]
    InvalidVpid(String),

    #[error("invalid maintenance mode '{0}', expected 'on' or 'off'")]
    InvalidMode(String),

    #[error("Working directory couldn't be reset")]
    ResetFailed(#[source] BackendError),

    #[error("{step} failed")]
    Backend {
        step: &'static str,
        #[source]
        source: BackendError,
    },
}

fn step(step: &'static str) -> impl FnOnce(BackendError) -> CommandError {
    move |source| CommandError::Backend { step, source }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaintenanceMode {
    On,
    Off,
}

impl FromStr for MaintenanceMode {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "on" => Ok(MaintenanceMode::On),
            "off" => Ok(MaintenanceMode::Off),
            other => Err(CommandError::InvalidMode(other.to_string())),
        }
    }
}

impl fmt::Display for MaintenanceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaintenanceMode::On => f.write_str("on"),
            MaintenanceMode::Off => f.write_str("off"),
        }
    }
}

/// Finish initializing a clone: empty the copied tables, recreate the
/// plugin tables and rebuild everything from the versioned files.
///
/// The options table is kept unless `truncate_options` is set. Returns the
/// tables that were truncated.
pub fn finish_init_clone(
    services: Services<'_>,
    truncate_options: bool,
) -> Result<Vec<String>, CommandError> {
    let options_table = services.database.options_table();
    let tables: Vec<String> = services
        .database
        .tables()
        .into_iter()
        .filter(|table| truncate_options || *table != options_table)
        .collect();

    for table in &tables {
        let sql = format!("TRUNCATE TABLE `{}`", table.replace('`', "``"));
        debug!(%sql, "truncating table");
        services.database.execute(&sql).map_err(step("truncate"))?;
    }

    services
        .initializer
        .create_tables()
        .map_err(step("create tables"))?;
    info!("VersionPress tables created");

    services
        .synchronizer
        .synchronize_all()
        .map_err(step("synchronization"))?;
    services
        .site
        .flush_regenerable_options()
        .map_err(step("flush options"))?;
    services
        .site
        .flush_rewrite_rules()
        .map_err(step("flush rewrite rules"))?;
    info!("Database synchronized");

    Ok(tables)
}

/// Turn maintenance mode on or off.
pub fn set_maintenance(site: &dyn SiteState, mode: MaintenanceMode) -> Result<(), CommandError> {
    match mode {
        MaintenanceMode::On => site.enable_maintenance(),
        MaintenanceMode::Off => site.disable_maintenance(),
    }
    .map_err(step("maintenance"))?;
    info!(%mode, "maintenance mode switched");
    Ok(())
}

/// Finish a push: reset the files, rebuild the database, and flush rewrite
/// rules with maintenance briefly lifted so the site can answer the request.
pub fn finish_push(services: Services<'_>) -> Result<(), CommandError> {
    services
        .working_copy
        .reset_hard()
        .map_err(CommandError::ResetFailed)?;

    services
        .synchronizer
        .synchronize_all()
        .map_err(step("synchronization"))?;
    services
        .site
        .flush_regenerable_options()
        .map_err(step("flush options"))?;

    services
        .site
        .disable_maintenance()
        .map_err(step("maintenance"))?;
    services
        .site
        .flush_rewrite_rules()
        .map_err(step("flush rewrite rules"))?;
    services
        .site
        .enable_maintenance()
        .map_err(step("maintenance"))?;

    Ok(())
}

/// Look up the local id of the entity identified by `vpid`.
pub fn get_entity_id(db: &dyn Database, vpid: &str) -> Result<Option<String>, CommandError> {
    if vpid.len() != 32 || !vpid.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(CommandError::InvalidVpid(vpid.to_string()));
    }

    let sql = format!(
        "SELECT ID FROM {}vp_id WHERE vp_id=UNHEX('{}')",
        db.prefix(),
        vpid
    );
    let ids = db.query_column(&sql).map_err(step("id lookup"))?;
    Ok(ids.into_iter().next())
}

/// Look up the stable identifier of entity `id` of type `entity`.
pub fn get_entity_vpid(
    repo: &dyn VpidRepository,
    entity: &str,
    id: u64,
) -> Result<Option<String>, CommandError> {
    repo.vpid_for_entity(entity, id)
        .map_err(step("vpid lookup"))
}
