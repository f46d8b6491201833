use std::path::Path;

use rusqlite::Connection;
use tracing::info;

use crate::error::StoreError;
use crate::models::{BiodataFields, BiodataRecord};

use super::{
    delete_biodata, ensure_schema, fetch_all_biodata, insert_biodata, open_database,
    update_biodata,
};

/// Process-wide handle to the biodata table. It is opened once at startup and
/// shared by both controllers, so there is exactly one connection per file.
#[derive(Debug)]
pub struct RecordStore {
    conn: Connection,
}

impl RecordStore {
    /// Open (or create) the database file and make sure the table exists.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = open_database(path)?;
        let store = Self::from_connection(conn)?;
        info!(path = %path.display(), "opened biodata store");
        Ok(store)
    }

    /// Same as [`RecordStore::open`] over a private in-memory database.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(|err| StoreError::StorageUnavailable {
            path: ":memory:".into(),
            source: Box::new(err),
        })?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        ensure_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn ensure_schema(&self) -> Result<(), StoreError> {
        ensure_schema(&self.conn)
    }

    pub fn insert(&self, fields: &BiodataFields) -> Result<i64, StoreError> {
        insert_biodata(&self.conn, fields)
    }

    pub fn list_all(&self) -> Result<Vec<BiodataRecord>, StoreError> {
        fetch_all_biodata(&self.conn)
    }

    pub fn update(&self, id: i64, fields: &BiodataFields) -> Result<(), StoreError> {
        update_biodata(&self.conn, id, fields)
    }

    pub fn remove(&self, id: i64) -> Result<(), StoreError> {
        delete_biodata(&self.conn, id)
    }

    #[cfg(test)]
    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }
}
