// SPDX-FileCopyrightText: 2026 Butler Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ledger schema, embedded from `migrations/` at build time.

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Apply pending migrations. Safe to call on every open.
pub fn run_migrations(conn: &mut rusqlite::Connection) -> Result<(), refinery::Error> {
    let report = embedded::migrations::runner().run(conn)?;
    for migration in report.applied_migrations() {
        tracing::info!(migration = %migration, "applied ledger migration");
    }
    Ok(())
}

/// Highest migration version compiled into this build.
pub fn latest_version() -> Option<i32> {
    embedded::migrations::runner()
        .get_migrations()
        .iter()
        .map(|m| m.version())
        .max()
}

/// Version of the last migration applied to `conn`, if any.
pub fn applied_version(conn: &mut rusqlite::Connection) -> Result<Option<i32>, refinery::Error> {
    Ok(embedded::migrations::runner()
        .get_last_applied_migration(conn)?
        .map(|m| m.version()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_database_is_brought_to_latest() {
        let mut conn = rusqlite::Connection::open_in_memory().unwrap();
        run_migrations(&mut conn).unwrap();
        run_migrations(&mut conn).unwrap();

        assert_eq!(applied_version(&mut conn).unwrap(), latest_version());
        assert_eq!(latest_version(), Some(1));
    }
}
