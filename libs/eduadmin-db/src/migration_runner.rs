//! Schema migrations for eduadmin modules.
//!
//! Modules hand in a `MigratorTrait` implementation; history is kept in the standard
//! `seaql_migrations` table, so rerunning is a no-op.

use sea_orm::DbErr;
use sea_orm_migration::MigratorTrait;
use thiserror::Error;
use tracing::{debug, info};

use crate::DbHandle;

#[derive(Debug, Error)]
pub enum MigrationError {
    /// Failed to read the migration history.
    #[error("failed to query migration history: {0}")]
    QueryHistory(#[source] DbErr),

    /// A pending migration failed; earlier ones in the same run stay applied.
    #[error("migration run failed: {0}")]
    MigrationFailed(#[source] DbErr),
}

/// Result of a migration run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// Number of migrations that were applied.
    pub applied: usize,
    /// Number of migrations that were already applied.
    pub skipped: usize,
    /// Names of the migrations that were applied, in order.
    pub applied_names: Vec<String>,
}

/// Apply every pending migration of `M`.
///
/// # Errors
/// [`MigrationError`] if the history cannot be read or a migration fails.
pub async fn run_migrations<M: MigratorTrait>(db: &DbHandle) -> Result<MigrationReport, MigrationError> {
    let conn = db.conn();
    let total = M::migrations().len();
    let pending: Vec<String> = M::get_pending_migrations(conn)
        .await
        .map_err(MigrationError::QueryHistory)?
        .iter()
        .map(|m| m.name().to_owned())
        .collect();

    if pending.is_empty() {
        debug!(total, "schema up to date");
        return Ok(MigrationReport {
            applied: 0,
            skipped: total,
            applied_names: Vec::new(),
        });
    }

    info!(pending = ?pending, engine = db.engine().as_str(), "applying migrations");
    M::up(conn, None)
        .await
        .map_err(MigrationError::MigrationFailed)?;

    Ok(MigrationReport {
        applied: pending.len(),
        skipped: total - pending.len(),
        applied_names: pending,
    })
}
