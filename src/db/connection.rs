use std::fs;
use std::path::Path;

use rusqlite::Connection;

use crate::error::StoreError;

/// Column set of the `biodata` table. Names and types must stay exactly like
/// this so existing database files keep working.
const CREATE_BIODATA_TABLE: &str = "CREATE TABLE IF NOT EXISTS biodata (
    id INTEGER PRIMARY KEY NOT NULL,
    name TEXT,
    gender TEXT,
    birthPlace TEXT,
    birthDate TEXT,
    religion TEXT,
    address TEXT
)";

/// Open the database at `path`, creating the parent directory first when it
/// does not exist yet. The schema is not touched here.
pub fn open_database(path: &Path) -> Result<Connection, StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| StoreError::StorageUnavailable {
            path: parent.to_path_buf(),
            source: Box::new(err),
        })?;
    }

    Connection::open(path).map_err(|err| StoreError::StorageUnavailable {
        path: path.to_path_buf(),
        source: Box::new(err),
    })
}

/// Create the `biodata` table if it is missing. Safe to call on every
/// activation.
pub fn ensure_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute(CREATE_BIODATA_TABLE, [])
        .map_err(StoreError::statement("create biodata table"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();
        ensure_schema(&conn).unwrap();

        let columns: Vec<(String, String)> = conn
            .prepare("SELECT name, type FROM pragma_table_info('biodata') ORDER BY cid")
            .unwrap()
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        let expected = [
            ("id", "INTEGER"),
            ("name", "TEXT"),
            ("gender", "TEXT"),
            ("birthPlace", "TEXT"),
            ("birthDate", "TEXT"),
            ("religion", "TEXT"),
            ("address", "TEXT"),
        ];
        let actual: Vec<(&str, &str)> = columns
            .iter()
            .map(|(n, t)| (n.as_str(), t.as_str()))
            .collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn open_database_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("db.sqlite");
        let conn = open_database(&path).unwrap();
        ensure_schema(&conn).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn open_database_reports_unavailable_storage() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, b"not a directory").unwrap();

        let err = open_database(&blocker.join("db.sqlite")).unwrap_err();
        assert!(matches!(err, StoreError::StorageUnavailable { .. }));
    }
}
