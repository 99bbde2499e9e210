//! Database migrations
//!
//! Schema: parking_lots (seeded catalog) and parking_sessions (lifecycle
//! records). Sessions deliberately carry no foreign key to lots: a session
//! keeps its denormalized lot name displayable even if the lot row is gone,
//! and a failed rate lookup degrades to a zero cost instead of a constraint
//! violation.

use crate::Result;
use rusqlite::Connection;

const SCHEMA_VERSION: i32 = 1;

pub fn run_migrations(conn: &Connection) -> Result<()> {
    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        migrate_v1(conn)?;
    }

    set_schema_version(conn, SCHEMA_VERSION)?;
    Ok(())
}

fn get_schema_version(conn: &Connection) -> Result<i32> {
    let result: std::result::Result<i32, _> =
        conn.query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        });

    match result {
        Ok(v) => Ok(v),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
        Err(rusqlite::Error::SqliteFailure(_, _)) => {
            // Table doesn't exist yet
            conn.execute(
                "CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL)",
                [],
            )?;
            conn.execute("INSERT INTO schema_version (version) VALUES (0)", [])?;
            Ok(0)
        }
        Err(e) => Err(e.into()),
    }
}

fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

fn migrate_v1(conn: &Connection) -> Result<()> {
    tracing::info!("Running migration v1: Initial schema");

    // Lot catalog. Names are unique; rates are per vehicle category.
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS parking_lots (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            image TEXT NOT NULL,
            car_rate_first_hour REAL NOT NULL,
            car_rate_per_hour REAL NOT NULL,
            motorcycle_rate_first_hour REAL NOT NULL,
            motorcycle_rate_per_hour REAL NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_lots_name ON parking_lots(name);
    "#,
    )?;

    // Session records. end_time IS NULL marks the single active session;
    // total_cost stays NULL until the session ends.
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS parking_sessions (
            id TEXT PRIMARY KEY,
            lot_id TEXT NOT NULL,
            lot_name TEXT NOT NULL,
            vehicle_type TEXT NOT NULL,
            start_time TEXT NOT NULL,
            end_time TEXT,
            reminder_enabled INTEGER NOT NULL DEFAULT 0,
            reminder_hours REAL,
            position TEXT,
            total_cost REAL
        );

        CREATE INDEX IF NOT EXISTS idx_sessions_start ON parking_sessions(start_time);
        CREATE INDEX IF NOT EXISTS idx_sessions_end ON parking_sessions(end_time);
    "#,
    )?;

    Ok(())
}
