//! Database schema and data migrations.
//!
//! Migrations are versioned and applied automatically when opening the database.
//! The `schema_version` table tracks the current migration version.

use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult};
use tracing::{info, warn};

use super::{KEY_COMPLETED_DAYS, KEY_LAST_COMPLETION};
use crate::day::LocalDay;

/// Current schema version.
pub const SCHEMA_VERSION: i32 = 2;

/// Apply all pending migrations to bring the database to the current schema version.
///
/// # Errors
/// Returns an error if migration fails.
pub fn migrate(conn: &Connection) -> SqliteResult<()> {
    create_schema_version_table(conn)?;

    let current_version = get_schema_version(conn);

    if current_version < 1 {
        migrate_v1(conn)?;
    }
    if current_version < 2 {
        migrate_v2(conn)?;
    }

    Ok(())
}

fn create_schema_version_table(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );",
    )
}

/// Get the current schema version from the database.
///
/// Returns 0 if no version is set (initial database).
pub fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row("SELECT version FROM schema_version", [], |row| {
        row.get::<_, i32>(0)
    })
    .unwrap_or_else(|e| {
        if !matches!(e, rusqlite::Error::QueryReturnedNoRows) {
            warn!("failed to read schema_version: {e}");
        }
        0
    })
}

fn set_schema_version(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

/// Migration v1: baseline. The `kv` table is created by `Database` itself.
fn migrate_v1(conn: &Connection) -> SqliteResult<()> {
    set_schema_version(conn, 1)
}

/// Migration v2: rewrite day keys to `YYYY-MM-DD`.
///
/// Early imports could carry `DD-MM-YYYY` keys in `completedDays` and
/// `lastCompletion`. Unreadable keys are left for the lenient reader to drop.
fn migrate_v2(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;

    let completed: Option<String> = tx
        .query_row(
            "SELECT value FROM kv WHERE key = ?1",
            params![KEY_COMPLETED_DAYS],
            |row| row.get(0),
        )
        .optional()?;
    if let Some(raw) = completed {
        if let Some(rewritten) = normalize_completed_days(&raw) {
            tx.execute(
                "UPDATE kv SET value = ?1 WHERE key = ?2",
                params![rewritten, KEY_COMPLETED_DAYS],
            )?;
            info!("normalized legacy completedDays keys");
        }
    }

    let last: Option<String> = tx
        .query_row(
            "SELECT value FROM kv WHERE key = ?1",
            params![KEY_LAST_COMPLETION],
            |row| row.get(0),
        )
        .optional()?;
    if let Some(raw) = last {
        if LocalDay::parse(&raw).is_err() {
            if let Ok(day) = LocalDay::parse_legacy(&raw) {
                tx.execute(
                    "UPDATE kv SET value = ?1 WHERE key = ?2",
                    params![day.to_string(), KEY_LAST_COMPLETION],
                )?;
            }
        }
    }

    set_schema_version(&tx, 2)?;
    tx.commit()
}

/// Returns the rewritten document only when at least one key changed.
fn normalize_completed_days(raw: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(raw).ok()?;
    let map = value.as_object()?;

    let mut changed = false;
    let mut out = serde_json::Map::new();
    for (key, flag) in map {
        let key = match LocalDay::parse(key) {
            Ok(_) => key.clone(),
            Err(_) => match LocalDay::parse_legacy(key) {
                Ok(day) => {
                    changed = true;
                    day.to_string()
                }
                Err(_) => key.clone(),
            },
        };
        out.insert(key, flag.clone());
    }

    if changed {
        serde_json::to_string(&out).ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kv_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE kv (key TEXT PRIMARY KEY, value TEXT NOT NULL);")
            .unwrap();
        conn
    }

    fn kv(conn: &Connection, key: &str) -> String {
        conn.query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn test_migrate_from_scratch() {
        let conn = kv_conn();
        migrate(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), SCHEMA_VERSION);
    }

    #[test]
    fn test_migrate_idempotent() {
        let conn = kv_conn();
        migrate(&conn).unwrap();
        migrate(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), SCHEMA_VERSION);
    }

    #[test]
    fn test_v2_rewrites_legacy_day_keys() {
        let conn = kv_conn();
        conn.execute(
            "INSERT INTO kv (key, value) VALUES ('completedDays', ?1), ('lastCompletion', '10-03-2024')",
            [r#"{"08-03-2024":true,"2024-03-09":true,"junk":true}"#],
        )
        .unwrap();

        migrate(&conn).unwrap();

        let days: serde_json::Value = serde_json::from_str(&kv(&conn, "completedDays")).unwrap();
        assert_eq!(days["2024-03-08"], serde_json::Value::Bool(true));
        assert_eq!(days["2024-03-09"], serde_json::Value::Bool(true));
        assert!(days.get("08-03-2024").is_none());
        assert!(days.get("junk").is_some());
        assert_eq!(kv(&conn, "lastCompletion"), "2024-03-10");
    }

    #[test]
    fn test_v2_leaves_canonical_data_untouched() {
        let conn = kv_conn();
        let raw = r#"{"2024-03-09":true}"#;
        conn.execute("INSERT INTO kv (key, value) VALUES ('completedDays', ?1)", [raw])
            .unwrap();
        migrate(&conn).unwrap();
        assert_eq!(kv(&conn, "completedDays"), raw);
    }
}
