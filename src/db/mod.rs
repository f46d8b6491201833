//! Persistence module split across logical submodules.

mod biodata;
mod connection;
mod store;

pub use biodata::{delete_biodata, fetch_all_biodata, insert_biodata, update_biodata};
pub use connection::{ensure_schema, open_database};
pub use store::RecordStore;
