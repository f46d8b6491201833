//! Screen-independent state machines for the two screens. Both hold a shared
//! [`RecordStore`](crate::db::RecordStore) handle and nothing else in common;
//! the table is the only state they share.

mod form;
mod list;

pub use form::{local_today, Clock, FormController, FormState};
pub use list::{ListController, RecordRow, EMPTY_PLACEHOLDER};
