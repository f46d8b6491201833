//! Core library surface for the Biodata Manager TUI application.
//!
//! The store owns the single `biodata` table, the controllers hold per-screen
//! state on top of it, and the `ui` module is one possible front-end driving
//! those controllers.
pub mod config;
pub mod controllers;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod ui;

/// Persistence entry point shared by both screens.
pub use db::RecordStore;

pub use controllers::{FormController, FormState, ListController, RecordRow};
pub use error::{FormError, StoreError};
pub use models::{BiodataField, BiodataFields, BiodataRecord, Draft};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
