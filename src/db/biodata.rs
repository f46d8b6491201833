use rusqlite::{params, Connection, Row};
use tracing::debug;

use crate::error::StoreError;
use crate::models::{BiodataFields, BiodataRecord};

/// Map a `SELECT id, name, ...` row. Columns are nullable in the schema, so
/// rows written by other tools may carry NULLs; those read as "".
fn record_from_row(row: &Row<'_>) -> rusqlite::Result<BiodataRecord> {
    let text = |idx: usize| -> rusqlite::Result<String> {
        Ok(row.get::<_, Option<String>>(idx)?.unwrap_or_default())
    };
    Ok(BiodataRecord {
        id: row.get(0)?,
        name: text(1)?,
        gender: text(2)?,
        birth_place: text(3)?,
        birth_date: text(4)?,
        religion: text(5)?,
        address: text(6)?,
    })
}

/// Load the whole table ordered by id. An empty table is an empty `Vec`.
pub fn fetch_all_biodata(conn: &Connection) -> Result<Vec<BiodataRecord>, StoreError> {
    let mut stmt = conn
        .prepare(
            "SELECT id, name, gender, birthPlace, birthDate, religion, address
             FROM biodata
             ORDER BY id",
        )
        .map_err(StoreError::statement("prepare biodata query"))?;

    let records = stmt
        .query_map([], record_from_row)
        .map_err(StoreError::statement("load biodata"))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(StoreError::statement("collect biodata"))?;

    debug!(count = records.len(), "loaded biodata");
    Ok(records)
}

/// Insert a new row and return the id SQLite assigned to it.
pub fn insert_biodata(conn: &Connection, fields: &BiodataFields) -> Result<i64, StoreError> {
    conn.execute(
        "INSERT INTO biodata (name, gender, birthPlace, birthDate, religion, address)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            fields.name,
            fields.gender,
            fields.birth_place,
            fields.birth_date,
            fields.religion,
            fields.address
        ],
    )
    .map_err(StoreError::statement("insert biodata"))?;

    let id = conn.last_insert_rowid();
    debug!(id, "inserted biodata");
    Ok(id)
}

/// Overwrite every mutable column of row `id`. Updating an id that does not
/// exist changes nothing and is not an error.
pub fn update_biodata(conn: &Connection, id: i64, fields: &BiodataFields) -> Result<(), StoreError> {
    let updated = conn
        .execute(
            "UPDATE biodata
             SET name = ?1, gender = ?2, birthPlace = ?3, birthDate = ?4, religion = ?5, address = ?6
             WHERE id = ?7",
            params![
                fields.name,
                fields.gender,
                fields.birth_place,
                fields.birth_date,
                fields.religion,
                fields.address,
                id
            ],
        )
        .map_err(StoreError::statement("update biodata"))?;

    debug!(id, updated, "updated biodata");
    Ok(())
}

/// Permanently delete row `id`; a missing row is a no-op.
pub fn delete_biodata(conn: &Connection, id: i64) -> Result<(), StoreError> {
    let deleted = conn
        .execute("DELETE FROM biodata WHERE id = ?1", params![id])
        .map_err(StoreError::statement("delete biodata"))?;

    debug!(id, deleted, "deleted biodata");
    Ok(())
}
