//! Record stores, one per record collection.
//!
//! Records are append-only. There is no update in place: "editing" a record means loading its
//! values into a data-entry session and saving the result as a new record, leaving the old one
//! where it was.

use crate::constants::{FERTILITY_ID_PREFIX, FERTILITY_RECORDS_KEY, REPORTS_KEY, REPORT_ID_PREFIX};
use crate::error::{FormError, FormResult};
use crate::field::{opt_string_or_number, FormData};
use crate::storage::{load_collection, persist_document, Storage};
use chrono::{DateTime, Utc};
use clinform_ids::{Clock, IdGenerator};
use clinform_types::NonEmptyText;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Which logical record collection a store holds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordCollection {
    key: String,
    id_prefix: String,
}

impl RecordCollection {
    /// # Errors
    ///
    /// [`FormError::InvalidInput`] if `key` is blank.
    pub fn new(key: impl Into<String>, id_prefix: impl Into<String>) -> FormResult<Self> {
        let key: String = key.into();
        let key = NonEmptyText::new(key).map_err(|_| {
            FormError::InvalidInput("record collection key cannot be empty".into())
        })?;
        Ok(Self {
            key: key.into_inner(),
            id_prefix: id_prefix.into(),
        })
    }

    /// Generic reports (`allReports`, ids `RPT...`).
    pub fn reports() -> Self {
        Self {
            key: REPORTS_KEY.into(),
            id_prefix: REPORT_ID_PREFIX.into(),
        }
    }

    /// Fertility form records (`fertilityRecords`, ids `FERT...`).
    pub fn fertility() -> Self {
        Self {
            key: FERTILITY_RECORDS_KEY.into(),
            id_prefix: FERTILITY_ID_PREFIX.into(),
        }
    }

    /// Resolves a built-in collection by its short name.
    pub fn from_name(name: &str) -> FormResult<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "reports" | "report" => Ok(Self::reports()),
            "fertility" => Ok(Self::fertility()),
            other => Err(FormError::InvalidInput(format!(
                "unknown record collection '{other}' (expected 'reports' or 'fertility')"
            ))),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn id_prefix(&self) -> &str {
        &self.id_prefix
    }
}

/// A record about to be appended; the store assigns the id and timestamps.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordDraft {
    pub patient_id: String,
    pub patient_name: String,
    pub template_id: Option<String>,
    pub template_name: String,
    pub form_data: FormData,
}

/// A completed fill-in.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: String,
    pub patient_id: String,
    #[serde(default)]
    pub patient_name: String,
    /// `None` when the built-in default field set was used.
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub template_id: Option<String>,
    #[serde(default)]
    pub template_name: String,
    #[serde(default, alias = "data")]
    pub form_data: FormData,
    #[serde(alias = "generatedAt")]
    pub created_at: DateTime<Utc>,
    /// Display date (`YYYY-MM-DD`).
    #[serde(default)]
    pub date: String,
}

pub trait RecordStore {
    /// All records in creation order.
    fn list(&self) -> &[Record];

    fn get(&self, id: &str) -> FormResult<&Record>;

    /// Assigns `id`, `createdAt` and `date`, then persists.
    ///
    /// # Errors
    ///
    /// [`FormError::Storage`] if the write failed. The store is unchanged.
    fn append(&mut self, draft: RecordDraft) -> FormResult<Record>;

    /// Removes one record wholesale and returns it.
    fn remove(&mut self, id: &str) -> FormResult<Record>;

    /// A patient's records in creation order.
    fn for_patient(&self, patient_id: &str) -> Vec<&Record> {
        self.list()
            .iter()
            .filter(|r| r.patient_id == patient_id)
            .collect()
    }
}

/// [`RecordStore`] persisted as one JSON array under the collection key.
pub struct JsonRecordStore<S> {
    storage: S,
    collection: RecordCollection,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
    records: Vec<Record>,
}

impl<S: Storage> JsonRecordStore<S> {
    pub fn open(
        storage: S,
        collection: RecordCollection,
        ids: Arc<dyn IdGenerator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let records = load_collection(&storage, collection.key());
        Self {
            storage,
            collection,
            ids,
            clock,
            records,
        }
    }

    pub fn collection(&self) -> &RecordCollection {
        &self.collection
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    fn persist(&mut self) -> FormResult<()> {
        persist_document(&mut self.storage, self.collection.key(), &self.records)?;
        Ok(())
    }
}

impl<S: Storage> RecordStore for JsonRecordStore<S> {
    fn list(&self) -> &[Record] {
        &self.records
    }

    fn get(&self, id: &str) -> FormResult<&Record> {
        self.records
            .iter()
            .find(|r| r.id == id)
            .ok_or_else(|| FormError::not_found("record", id))
    }

    fn append(&mut self, draft: RecordDraft) -> FormResult<Record> {
        let prefix = self.collection.id_prefix().to_owned();
        let mut id = self.ids.next_id(&prefix);
        while self.records.iter().any(|r| r.id == id) {
            id = self.ids.next_id(&prefix);
        }

        let created_at = self.clock.now();
        let record = Record {
            id,
            patient_id: draft.patient_id,
            patient_name: draft.patient_name,
            template_id: draft.template_id,
            template_name: draft.template_name,
            form_data: draft.form_data,
            created_at,
            date: created_at.format("%Y-%m-%d").to_string(),
        };

        self.records.push(record.clone());
        if let Err(e) = self.persist() {
            self.records.pop();
            return Err(e);
        }

        tracing::info!(
            "saved record {} for patient {} into '{}'",
            record.id,
            record.patient_id,
            self.collection.key()
        );
        Ok(record)
    }

    fn remove(&mut self, id: &str) -> FormResult<Record> {
        let index = self
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| FormError::not_found("record", id))?;

        let removed = self.records.remove(index);
        if let Err(e) = self.persist() {
            self.records.insert(index, removed);
            return Err(e);
        }

        tracing::info!("deleted record {} from '{}'", removed.id, self.collection.key());
        Ok(removed)
    }
}
