//! Template document store.
//!
//! Saved templates are immutable: [`TemplateStore::save`] always appends a new document with a
//! freshly allocated id, and editing a saved template means loading it into the designer and
//! saving the result as another document.

use crate::constants::{TEMPLATES_KEY, TEMPLATE_ID_PREFIX};
use crate::error::{FormError, FormResult, ValidationError};
use crate::storage::{load_collection, persist_document, Storage};
use crate::template::{TemplateDocument, TemplateDraft};
use clinform_ids::{Clock, IdGenerator};
use clinform_types::NonEmptyText;
use std::sync::Arc;

pub trait TemplateStore {
    /// All documents in creation order.
    fn list(&self) -> &[TemplateDocument];

    /// # Errors
    ///
    /// [`FormError::NotFound`] when no document has this id.
    fn get(&self, id: &str) -> FormResult<&TemplateDocument>;

    /// Assigns `id` and `createdAt` and appends the document.
    ///
    /// # Errors
    ///
    /// - [`FormError::Validation`] if the draft has no fields, a blank name, or duplicate field
    ///   ids. Nothing is written.
    /// - [`FormError::Storage`] if the write failed. The store is unchanged.
    fn save(&mut self, draft: TemplateDraft) -> FormResult<TemplateDocument>;

    /// Removes one document and returns it. Records referencing it keep their snapshot.
    fn delete(&mut self, id: &str) -> FormResult<TemplateDocument>;
}

/// [`TemplateStore`] persisted as one JSON array under [`TEMPLATES_KEY`].
pub struct JsonTemplateStore<S> {
    storage: S,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
    templates: Vec<TemplateDocument>,
}

impl<S: Storage> JsonTemplateStore<S> {
    pub fn open(storage: S, ids: Arc<dyn IdGenerator>, clock: Arc<dyn Clock>) -> Self {
        let templates = load_collection(&storage, TEMPLATES_KEY);
        Self {
            storage,
            ids,
            clock,
            templates,
        }
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    fn persist(&mut self) -> FormResult<()> {
        persist_document(&mut self.storage, TEMPLATES_KEY, &self.templates)?;
        Ok(())
    }
}

impl<S: Storage> TemplateStore for JsonTemplateStore<S> {
    fn list(&self) -> &[TemplateDocument] {
        &self.templates
    }

    fn get(&self, id: &str) -> FormResult<&TemplateDocument> {
        self.templates
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| FormError::not_found("template", id))
    }

    fn save(&mut self, draft: TemplateDraft) -> FormResult<TemplateDocument> {
        draft.validate()?;
        let name = NonEmptyText::new(&draft.name).map_err(|_| ValidationError::EmptyName)?;

        let mut id = self.ids.next_id(TEMPLATE_ID_PREFIX);
        while self.templates.iter().any(|t| t.id == id) {
            id = self.ids.next_id(TEMPLATE_ID_PREFIX);
        }

        let document = TemplateDocument {
            id,
            name: name.into_inner(),
            sections: draft.sections,
            created_at: self.clock.now(),
        };

        self.templates.push(document.clone());
        if let Err(e) = self.persist() {
            self.templates.pop();
            return Err(e);
        }

        tracing::info!(
            "saved template '{}' ({}) with {} fields",
            document.name,
            document.id,
            document.field_count()
        );
        Ok(document)
    }

    fn delete(&mut self, id: &str) -> FormResult<TemplateDocument> {
        let index = self
            .templates
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| FormError::not_found("template", id))?;

        let removed = self.templates.remove(index);
        if let Err(e) = self.persist() {
            self.templates.insert(index, removed);
            return Err(e);
        }

        tracing::info!("deleted template '{}' ({})", removed.name, removed.id);
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{FieldDefinition, FieldKind, FieldType};
    use crate::storage::tests::ReadOnlyStorage;
    use crate::storage::MemoryStorage;
    use crate::template::Section;
    use chrono::{TimeZone, Utc};
    use clinform_ids::{FixedClock, SequentialIdGenerator};

    fn test_store<S: Storage>(storage: S) -> JsonTemplateStore<S> {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2025, 1, 11, 9, 0, 0).unwrap());
        JsonTemplateStore::open(
            storage,
            Arc::new(SequentialIdGenerator::new()),
            Arc::new(clock),
        )
    }

    fn age_draft() -> TemplateDraft {
        TemplateDraft::new(
            "T",
            vec![Section::new("s1", "S").with_fields(vec![FieldDefinition::new(
                "age",
                "Age",
                FieldKind::defaults_for(FieldType::Number),
            )
            .required(true)])],
        )
    }

    #[test]
    fn test_save_then_get_round_trips_sections() {
        let mut store = test_store(MemoryStorage::new());
        let draft = age_draft();

        let saved = store.save(draft.clone()).expect("save should succeed");
        assert_eq!(saved.id, "1");
        assert_eq!(saved.name, "T");

        let first = store.get(&saved.id).expect("should find saved template").clone();
        let second = store.get(&saved.id).expect("should find saved template").clone();
        assert_eq!(first.sections, draft.sections);
        assert_eq!(first, second, "repeated reads should be identical");
        assert_eq!(first.created_at, saved.created_at);
    }

    #[test]
    fn test_save_persists_and_reopen_sees_it() {
        let mut store = test_store(MemoryStorage::new());
        let saved = store.save(age_draft()).expect("save should succeed");

        let reopened = test_store(store.into_storage());
        assert_eq!(reopened.list(), &[saved]);
    }

    #[test]
    fn test_save_rejects_template_without_fields_and_writes_nothing() {
        let mut store = test_store(MemoryStorage::new());
        let draft = TemplateDraft::new("T", vec![Section::new("s1", "S")]);

        let err = store.save(draft).expect_err("save should fail");
        assert!(matches!(
            err,
            FormError::Validation(ValidationError::NoFields)
        ));
        assert!(store.list().is_empty());

        let storage = store.into_storage();
        assert_eq!(storage.get_item(TEMPLATES_KEY).expect("read"), None);
    }

    #[test]
    fn test_list_keeps_creation_order() {
        let mut store = test_store(MemoryStorage::new());
        for name in ["First", "Second", "Third"] {
            let mut draft = age_draft();
            draft.name = name.into();
            store.save(draft).expect("save should succeed");
        }

        let names: Vec<&str> = store.list().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_delete_removes_one_document() {
        let mut store = test_store(MemoryStorage::new());
        let a = store.save(age_draft()).expect("save should succeed");
        let b = store.save(age_draft()).expect("save should succeed");

        let removed = store.delete(&a.id).expect("delete should succeed");
        assert_eq!(removed.id, a.id);
        assert_eq!(store.list(), &[b]);

        assert!(store.get(&a.id).is_err_and(|e| e.is_not_found()));
        assert!(store.delete(&a.id).is_err_and(|e| e.is_not_found()));
    }

    #[test]
    fn test_failed_write_leaves_store_unchanged() {
        let mut store = test_store(ReadOnlyStorage::default());

        let err = store.save(age_draft()).expect_err("save should fail");
        assert!(matches!(err, FormError::Storage(_)));
        assert!(store.list().is_empty());
    }

    #[test]
    fn test_failed_delete_keeps_template_in_place() {
        let mut seeded = test_store(MemoryStorage::new());
        let first = seeded.save(age_draft()).expect("save should succeed");
        let second = seeded.save(age_draft()).expect("save should succeed");

        let mut store = test_store(ReadOnlyStorage {
            inner: seeded.into_storage(),
        });
        let err = store.delete(&first.id).expect_err("delete should fail");
        assert!(matches!(err, FormError::Storage(_)));
        assert_eq!(store.list(), &[first, second]);
    }

    #[test]
    fn test_malformed_collection_opens_empty() {
        let storage = MemoryStorage::new().with_item(TEMPLATES_KEY, "[{\"id\": 1,");
        let store = test_store(storage);
        assert!(store.list().is_empty());
    }
}
