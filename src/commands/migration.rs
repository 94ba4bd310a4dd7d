use crate::commands::AppContext;
use crate::error::Result;
use crate::migration::{
    self, read_snapshot_file, restore_snapshot, JsonFileTarget, MigrationStatus,
};
use std::path::Path;

/// Exports all CMS data to `output` and marks the migration as done
pub fn migrate(ctx: &AppContext, output: &Path, force: bool) -> Result<MigrationStatus> {
    migration::run_migration(&ctx.store, &JsonFileTarget::new(output), force)
}

pub fn migration_status(ctx: &AppContext) -> Result<MigrationStatus> {
    migration::migration_status(&ctx.store)
}

pub fn reset_migration(ctx: &AppContext) -> Result<()> {
    migration::reset_migration(&ctx.store)
}

pub fn restore(ctx: &AppContext, input: &Path) -> Result<()> {
    let snapshot = read_snapshot_file(input)?;
    restore_snapshot(&ctx.store, &snapshot)
}
