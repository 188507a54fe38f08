pub mod plan;
pub mod runner;

pub use plan::{
    ACTIVE_FIELD, DEFAULT_STATUS, PendingUpdate, STATUS_FIELD, current_active, desired_active,
    normalize_status, plan_update, plan_updates,
};
pub use runner::{MigrationPhase, MigrationReport, MigrationRunner};
