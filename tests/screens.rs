use std::path::PathBuf;
use std::rc::Rc;

use biodata_manager::config::AppConfig;
use biodata_manager::{
    BiodataField, BiodataFields, FormController, ListController, RecordRow, RecordStore,
};
use chrono::NaiveDate;
use tempfile::TempDir;

fn new_year() -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 1).unwrap()
}

fn setup_store() -> (TempDir, PathBuf, Rc<RecordStore>) {
    let dir = TempDir::new().expect("create temp dir");
    let path = AppConfig::in_dir(dir.path().join("data")).database_path();
    let store = Rc::new(RecordStore::open(&path).expect("open store"));
    (dir, path, store)
}

fn ana(address: &str) -> BiodataFields {
    BiodataFields {
        name: "Ana".into(),
        gender: "P".into(),
        birth_place: "Bandung".into(),
        birth_date: "2000-01-01".into(),
        religion: "Islam".into(),
        address: address.into(),
    }
}

#[test]
fn ana_scenario_through_both_screens() {
    let (_dir, _path, store) = setup_store();
    let mut form = FormController::with_clock(Rc::clone(&store), new_year);
    let mut list = ListController::new(Rc::clone(&store));

    form.set_field(BiodataField::Name, "Ana").unwrap();
    form.cycle_gender();
    form.set_field(BiodataField::BirthPlace, "Bandung").unwrap();
    form.set_field(BiodataField::Address, "Jl. A").unwrap();
    assert_eq!(form.submit().unwrap(), 1);

    list.activate().unwrap();
    assert_eq!(list.records(), [ana("Jl. A").with_id(1)]);

    assert!(list.begin_edit(1));
    list.update_draft_field(BiodataField::Address, "Jl. B");
    assert!(list.save_edit().unwrap());
    assert_eq!(list.records(), [ana("Jl. B").with_id(1)]);

    list.delete(1).unwrap();
    assert!(list.is_empty());
    assert!(store.list_all().unwrap().is_empty());
}

#[test]
fn list_sees_form_inserts_only_after_activation() {
    let (_dir, _path, store) = setup_store();
    let mut form = FormController::with_clock(Rc::clone(&store), new_year);
    let mut list = ListController::new(Rc::clone(&store));

    list.activate().unwrap();
    form.set_field(BiodataField::Name, "Budi").unwrap();
    form.submit().unwrap();
    assert!(list.is_empty());

    list.activate().unwrap();
    let rows: Vec<_> = list.rows().collect();
    assert_eq!(rows.len(), 1);
    assert!(matches!(rows[0], RecordRow::ReadOnly(record) if record.name == "Budi"));
}

#[test]
fn data_survives_reopening_the_file() {
    let (_dir, path, store) = setup_store();
    store.insert(&ana("Jl. A")).unwrap();
    store.insert(&ana("Jl. C")).unwrap();
    drop(store);

    let reopened = RecordStore::open(&path).unwrap();
    let addresses: Vec<_> = reopened
        .list_all()
        .unwrap()
        .into_iter()
        .map(|record| record.address)
        .collect();
    assert_eq!(addresses, ["Jl. A", "Jl. C"]);
}

#[test]
fn update_of_unknown_id_leaves_table_unchanged() {
    let (_dir, _path, store) = setup_store();
    let id = store.insert(&ana("Jl. A")).unwrap();
    let before = store.list_all().unwrap();

    store.update(id + 1, &ana("Elsewhere")).unwrap();

    assert_eq!(store.list_all().unwrap(), before);
}
