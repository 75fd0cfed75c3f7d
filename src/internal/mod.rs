//! Maintenance commands that delegate to services owned elsewhere.
//!
//! The handlers never look services up on their own: the harness builds the
//! collaborators and passes them in at call time.

pub mod handlers;
pub mod services;

pub use handlers::{
    finish_init_clone, finish_push, get_entity_id, get_entity_vpid, set_maintenance,
    CommandError, MaintenanceMode,
};
pub use services::{
    BackendError, Database, Initializer, Services, SiteState, Synchronizer, VpidRepository,
    WorkingCopy,
};
