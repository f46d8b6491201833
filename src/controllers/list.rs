use std::rc::Rc;

use tracing::{debug, info};

use crate::db::RecordStore;
use crate::error::StoreError;
use crate::models::{BiodataField, BiodataRecord, Draft};

/// Shown by the list screen when the snapshot is empty.
pub const EMPTY_PLACEHOLDER: &str = "No biodata yet.";

/// The single record currently open for editing.
struct EditSession {
    id: i64,
    draft: Draft,
}

/// How the list screen should present one record.
#[derive(Debug, PartialEq, Eq)]
pub enum RecordRow<'a> {
    ReadOnly(&'a BiodataRecord),
    Editing {
        record: &'a BiodataRecord,
        draft: &'a Draft,
    },
}

impl<'a> RecordRow<'a> {
    pub fn record(&self) -> &'a BiodataRecord {
        match self {
            RecordRow::ReadOnly(record) => record,
            RecordRow::Editing { record, .. } => record,
        }
    }
}

/// Snapshot of the table plus at most one edit in progress. The snapshot is
/// only refreshed by [`ListController::activate`], which mutations call
/// themselves once the write has finished.
pub struct ListController {
    store: Rc<RecordStore>,
    records: Vec<BiodataRecord>,
    editing: Option<EditSession>,
}

impl ListController {
    pub fn new(store: Rc<RecordStore>) -> Self {
        Self {
            store,
            records: Vec::new(),
            editing: None,
        }
    }

    pub fn records(&self) -> &[BiodataRecord] {
        &self.records
    }

    pub fn editing_id(&self) -> Option<i64> {
        self.editing.as_ref().map(|session| session.id)
    }

    pub fn draft(&self) -> Option<&Draft> {
        self.editing.as_ref().map(|session| &session.draft)
    }

    /// Re-read the whole table. Called on every focus and after every write.
    /// An edit whose record vanished from the table is dropped.
    pub fn activate(&mut self) -> Result<(), StoreError> {
        self.records = self.store.list_all()?;
        if let Some(id) = self.editing_id() {
            if !self.records.iter().any(|record| record.id == id) {
                debug!(id, "edited biodata disappeared, dropping draft");
                self.editing = None;
            }
        }
        Ok(())
    }

    /// Open `id` for editing, seeding the draft from the snapshot. Any other
    /// unsaved draft is discarded. Returns `false` if `id` is not in the
    /// snapshot.
    pub fn begin_edit(&mut self, id: i64) -> bool {
        let Some(record) = self.records.iter().find(|record| record.id == id) else {
            return false;
        };
        self.editing = Some(EditSession {
            id,
            draft: Draft::from_record(record),
        });
        true
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Change one draft field. Nothing is persisted until [`Self::save_edit`].
    pub fn update_draft_field(&mut self, field: BiodataField, value: impl Into<String>) -> bool {
        match self.editing.as_mut() {
            Some(session) => {
                session.draft.set(field, value);
                true
            }
            None => false,
        }
    }

    /// Mutable view of one draft field for keystroke editing.
    pub fn draft_field_mut(&mut self, field: BiodataField) -> Option<&mut String> {
        self.editing
            .as_mut()
            .map(|session| session.draft.entry(field))
    }

    /// Write the draft back and refresh. Returns `Ok(false)` when nothing was
    /// being edited. A failed write leaves the draft open.
    pub fn save_edit(&mut self) -> Result<bool, StoreError> {
        let Some(session) = self.editing.as_ref() else {
            return Ok(false);
        };
        self.store.update(session.id, &session.draft.to_fields())?;
        info!(id = session.id, "biodata updated");

        self.editing = None;
        self.activate()?;
        Ok(true)
    }

    pub fn delete(&mut self, id: i64) -> Result<(), StoreError> {
        self.store.remove(id)?;
        info!(id, "biodata deleted");
        self.activate()
    }

    /// Rendering view: every record, editable only when it is the one being
    /// edited.
    pub fn rows(&self) -> impl Iterator<Item = RecordRow<'_>> + '_ {
        self.records.iter().map(move |record| match &self.editing {
            Some(session) if session.id == record.id => RecordRow::Editing {
                record,
                draft: &session.draft,
            },
            _ => RecordRow::ReadOnly(record),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BiodataFields;

    fn person(name: &str) -> BiodataFields {
        BiodataFields {
            name: name.into(),
            gender: "P".into(),
            birth_place: "Medan".into(),
            birth_date: "1990-05-20".into(),
            religion: "Kristen".into(),
            address: "Jl. Sudirman".into(),
        }
    }

    fn seeded(names: &[&str]) -> (Rc<RecordStore>, ListController) {
        let store = Rc::new(RecordStore::open_in_memory().unwrap());
        for name in names {
            store.insert(&person(name)).unwrap();
        }
        let mut list = ListController::new(Rc::clone(&store));
        list.activate().unwrap();
        (store, list)
    }

    #[test]
    fn activate_replaces_the_snapshot() {
        let (store, mut list) = seeded(&["Ana"]);
        assert_eq!(list.records().len(), 1);

        store.insert(&person("Budi")).unwrap();
        assert_eq!(list.records().len(), 1);

        list.activate().unwrap();
        let names: Vec<_> = list.records().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Ana", "Budi"]);
    }

    #[test]
    fn begin_edit_seeds_draft_and_abandons_previous_one() {
        let (_store, mut list) = seeded(&["Ana", "Budi"]);
        let ana = list.records()[0].id;
        let budi = list.records()[1].id;

        assert!(list.begin_edit(ana));
        list.update_draft_field(BiodataField::Name, "Ana Maria");

        assert!(list.begin_edit(budi));
        assert_eq!(list.editing_id(), Some(budi));
        assert_eq!(list.draft().unwrap().get(BiodataField::Name), "Budi");

        assert!(!list.begin_edit(999));
        assert_eq!(list.editing_id(), Some(budi));
    }

    #[test]
    fn save_edit_writes_draft_clears_edit_and_refreshes() {
        let (store, mut list) = seeded(&["Ana", "Budi"]);
        let ana = list.records()[0].id;

        list.begin_edit(ana);
        list.update_draft_field(BiodataField::Address, "Jl. B");
        list.draft_field_mut(BiodataField::Name).unwrap().push('!');

        assert!(list.save_edit().unwrap());
        assert_eq!(list.editing_id(), None);

        let mut expected = person("Ana!");
        expected.address = "Jl. B".into();
        assert_eq!(list.records()[0], expected.with_id(ana));
        assert_eq!(list.records()[1].fields(), person("Budi"));
        assert_eq!(store.list_all().unwrap(), list.records());
    }

    #[test]
    fn save_without_edit_is_a_no_op() {
        let (_store, mut list) = seeded(&["Ana"]);
        assert!(!list.save_edit().unwrap());
        assert!(!list.update_draft_field(BiodataField::Name, "x"));
        assert!(list.draft_field_mut(BiodataField::Name).is_none());
    }

    #[test]
    fn cancel_edit_discards_draft() {
        let (store, mut list) = seeded(&["Ana"]);
        let id = list.records()[0].id;
        list.begin_edit(id);
        list.update_draft_field(BiodataField::Name, "Changed");
        list.cancel_edit();

        assert_eq!(list.editing_id(), None);
        assert_eq!(store.list_all().unwrap()[0].name, "Ana");
    }

    #[test]
    fn delete_removes_row_and_refreshes() {
        let (_store, mut list) = seeded(&["Ana", "Budi"]);
        let ana = list.records()[0].id;

        list.delete(ana).unwrap();
        assert!(list.records().iter().all(|r| r.id != ana));

        list.delete(ana).unwrap();
        assert_eq!(list.records().len(), 1);
    }

    #[test]
    fn draft_of_a_row_deleted_elsewhere_is_dropped() {
        let (store, mut list) = seeded(&["Ana"]);
        let id = list.records()[0].id;
        list.begin_edit(id);

        store.remove(id).unwrap();
        list.activate().unwrap();

        assert_eq!(list.editing_id(), None);
        assert!(list.is_empty());
    }

    #[test]
    fn rows_mark_only_the_edited_record() {
        let (_store, mut list) = seeded(&["Ana", "Budi"]);
        let budi = list.records()[1].id;
        list.begin_edit(budi);

        let rows: Vec<_> = list.rows().collect();
        assert!(matches!(rows[0], RecordRow::ReadOnly(r) if r.name == "Ana"));
        assert!(matches!(rows[1], RecordRow::Editing { record, .. } if record.id == budi));
    }

    #[test]
    fn failed_save_keeps_the_draft() {
        let (store, mut list) = seeded(&["Ana"]);
        let id = list.records()[0].id;
        list.begin_edit(id);
        store
            .connection()
            .execute_batch("DROP TABLE biodata")
            .unwrap();

        assert!(list.save_edit().is_err());
        assert_eq!(list.editing_id(), Some(id));
    }
}
