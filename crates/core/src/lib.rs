//! # clinform core
//!
//! Core logic for dynamic clinical forms: templates designed from typed fields, filled in for a
//! patient, saved as records and read back as reports.
//!
//! This crate contains pure data operations over named JSON collections:
//! - Template documents and the designer that edits drafts of them
//! - Data entry sessions that validate and commit records
//! - Report views that resolve a record's template (exact, heuristic, or none)
//! - One generic field renderer shared by the designer preview, entry form and report
//!
//! **No UI concerns**: how controls are drawn and how the user interacts with them belongs to
//! the front end. The `clinform` CLI is one such front end.

pub mod config;
pub mod constants;
pub mod defaults;
pub mod designer;
pub mod entry;
pub mod error;
pub mod field;
pub mod patient;
pub mod print;
pub mod render;
pub mod report;
pub mod repositories;
pub mod storage;
pub mod template;

pub use config::CoreConfig;
pub use designer::{FieldUpdate, FormDesigner, Selection};
pub use entry::DataEntrySession;
pub use error::{FormError, FormResult, StorageError, StorageResult, ValidationError};
pub use field::{FieldDefinition, FieldKind, FieldType, FieldValue, FormData, Presentation};
pub use patient::PatientRef;
pub use render::{render, RenderMode, Rendered};
pub use report::{resolve_template, ReportView, Resolution};
pub use repositories::current::{AppliedTemplate, CurrentTemplate};
pub use repositories::patients::PatientRoster;
pub use repositories::records::{
    JsonRecordStore, Record, RecordCollection, RecordDraft, RecordStore,
};
pub use repositories::templates::{JsonTemplateStore, TemplateStore};
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use template::{Section, TemplateDocument, TemplateDraft};
