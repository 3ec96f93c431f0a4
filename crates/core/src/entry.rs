//! Data entry: filling a form for one patient and committing it as a record.
//!
//! A [`DataEntrySession`] binds a form structure (a saved template, the applied current
//! template, or the built-in default field set) to an optional patient and collects values by
//! field id. Nothing is validated while values are being entered; [`DataEntrySession::save`]
//! checks for a patient and for blank required fields, and only then appends a record.

use crate::constants::{CURRENT_FORM_NAME, DEFAULT_FORM_NAME};
use crate::defaults::default_entry_sections;
use crate::error::{FormError, FormResult, ValidationError};
use crate::field::{FieldDefinition, FieldValue, FormData};
use crate::patient::PatientRef;
use crate::render::{render_sections, RenderMode, RenderedSection};
use crate::repositories::current::CurrentTemplate;
use crate::repositories::records::{Record, RecordDraft, RecordStore};
use crate::storage::Storage;
use crate::template::{fields_of, Section, TemplateDocument};

/// The structure a session is filling in.
#[derive(Clone, Debug, PartialEq, Eq)]
struct FormSource {
    template_id: Option<String>,
    template_name: String,
    sections: Vec<Section>,
}

impl FormSource {
    fn from_template(template: Option<&TemplateDocument>) -> Self {
        match template {
            Some(doc) => Self {
                template_id: Some(doc.id.clone()),
                template_name: doc.name.clone(),
                sections: doc.sections.clone(),
            },
            None => Self {
                template_id: None,
                template_name: DEFAULT_FORM_NAME.to_owned(),
                sections: default_entry_sections(),
            },
        }
    }
}

#[derive(Clone, Debug)]
pub struct DataEntrySession {
    patient: Option<PatientRef>,
    source: FormSource,
    form_data: FormData,
}

impl DataEntrySession {
    /// Starts a session over `template`, or the built-in default field set when `None`.
    pub fn new(patient: Option<PatientRef>, template: Option<&TemplateDocument>) -> Self {
        Self::from_source(patient, FormSource::from_template(template))
    }

    /// Starts a session over the current template snapshot, falling back to the default field
    /// set when there is none. A snapshot applied from a saved template carries that template's
    /// id and name into the record; a designer draft is recorded as [`CURRENT_FORM_NAME`].
    pub fn from_current<S: Storage>(
        patient: Option<PatientRef>,
        current: &CurrentTemplate<S>,
    ) -> Self {
        let source = match current.load() {
            Some(sections) => match current.applied() {
                Some(applied) => FormSource {
                    template_id: Some(applied.template_id),
                    template_name: applied.template_name,
                    sections,
                },
                None => FormSource {
                    template_id: None,
                    template_name: CURRENT_FORM_NAME.to_owned(),
                    sections,
                },
            },
            None => FormSource::from_template(None),
        };
        Self::from_source(patient, source)
    }

    /// Reopens a saved record for editing. Saving the session appends a new record; the
    /// original is left as it was.
    pub fn load_record(record: &Record, template: Option<&TemplateDocument>) -> Self {
        let patient = PatientRef::new(record.patient_id.clone(), record.patient_name.clone());
        let mut session = Self::new(Some(patient), template);
        for (key, value) in &record.form_data {
            session.form_data.insert(key.clone(), value.clone());
        }
        tracing::debug!("loaded record {} into a data entry session", record.id);
        session
    }

    fn from_source(patient: Option<PatientRef>, source: FormSource) -> Self {
        let mut session = Self {
            patient,
            source,
            form_data: FormData::new(),
        };
        session.reset_form_data();
        session
    }

    pub fn patient(&self) -> Option<&PatientRef> {
        self.patient.as_ref()
    }

    pub fn template_id(&self) -> Option<&str> {
        self.source.template_id.as_deref()
    }

    pub fn template_name(&self) -> &str {
        &self.source.template_name
    }

    pub fn sections(&self) -> &[Section] {
        &self.source.sections
    }

    pub fn form_data(&self) -> &FormData {
        &self.form_data
    }

    pub fn value(&self, field_id: &str) -> Option<&FieldValue> {
        self.form_data.get(field_id)
    }

    /// Fields that hold values, in form order. Submit buttons are excluded.
    pub fn active_fields(&self) -> impl Iterator<Item = &FieldDefinition> {
        fields_of(&self.source.sections).filter(|f| f.is_bound())
    }

    /// Switches patient. Entered values are discarded.
    pub fn select_patient(&mut self, patient: Option<PatientRef>) {
        self.patient = patient;
        self.reset_form_data();
    }

    /// Switches template. Entered values are discarded.
    pub fn select_template(&mut self, template: Option<&TemplateDocument>) {
        self.source = FormSource::from_template(template);
        self.reset_form_data();
    }

    /// Merges a value in as given. Any key is accepted.
    pub fn set_value(&mut self, field_id: impl Into<String>, value: impl Into<FieldValue>) {
        self.form_data.insert(field_id.into(), value.into());
    }

    /// Merges raw text input, coerced for the field's type (checkbox and toggle input become
    /// booleans). Keys without a field are kept as text.
    pub fn set_input(&mut self, field_id: &str, raw: &str) {
        let field_type = self
            .active_fields()
            .find(|f| f.id == field_id)
            .and_then(FieldDefinition::field_type);
        self.form_data
            .insert(field_id.to_owned(), FieldValue::from_input(field_type, raw));
    }

    /// Labels of required fields that are still blank, in form order.
    pub fn missing_required(&self) -> Vec<String> {
        self.active_fields()
            .filter(|f| f.required)
            .filter(|f| self.form_data.get(&f.id).map_or(true, FieldValue::is_blank))
            .map(|f| f.label.clone())
            .collect()
    }

    /// Validates and appends a record. The session keeps its values afterwards.
    ///
    /// # Errors
    ///
    /// - [`FormError::MissingPatient`] if no patient is selected.
    /// - [`FormError::Validation`] with [`ValidationError::MissingRequired`] naming the blank
    ///   required fields.
    /// - Whatever [`RecordStore::append`] returns.
    ///
    /// Nothing is written on error.
    pub fn save<R: RecordStore + ?Sized>(&self, store: &mut R) -> FormResult<Record> {
        let patient = self.patient.as_ref().ok_or(FormError::MissingPatient)?;

        let missing = self.missing_required();
        if !missing.is_empty() {
            return Err(ValidationError::MissingRequired(missing).into());
        }

        let form_data = self
            .active_fields()
            .map(|f| {
                let value = self.form_data.get(&f.id).cloned().unwrap_or_default();
                (f.id.clone(), value)
            })
            .collect();

        store.append(RecordDraft {
            patient_id: patient.id.clone(),
            patient_name: patient.name.clone(),
            template_id: self.source.template_id.clone(),
            template_name: self.source.template_name.clone(),
            form_data,
        })
    }

    /// The active sections as editable controls bound to the current values.
    pub fn render(&self) -> Vec<RenderedSection> {
        render_sections(&self.source.sections, &self.form_data, RenderMode::Editable)
    }

    fn reset_form_data(&mut self) {
        let patient = self.patient.as_ref();
        self.form_data = fields_of(&self.source.sections)
            .filter(|f| f.is_bound())
            .map(|f| {
                let seeded = patient
                    .and_then(|p| p.demographic(&f.id))
                    .map(FieldValue::from)
                    .unwrap_or_default();
                (f.id.clone(), seeded)
            })
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{FieldKind, FieldType};
    use crate::render::ControlKind;
    use crate::repositories::records::{JsonRecordStore, RecordCollection};
    use crate::storage::MemoryStorage;
    use chrono::{TimeZone, Utc};
    use clinform_ids::{FixedClock, SequentialIdGenerator};
    use serde_json::json;
    use std::sync::Arc;

    fn record_store() -> JsonRecordStore<MemoryStorage> {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2025, 1, 11, 9, 0, 0).unwrap());
        JsonRecordStore::open(
            MemoryStorage::new(),
            RecordCollection::reports(),
            Arc::new(SequentialIdGenerator::new()),
            Arc::new(clock),
        )
    }

    fn age_template() -> TemplateDocument {
        serde_json::from_value(json!({
            "id": "1",
            "name": "T",
            "sections": [{"id": "s1", "title": "S", "fields": [
                {"id": "age", "type": "number", "label": "Age", "required": true}
            ]}],
            "createdAt": "2025-01-11T09:00:00Z"
        }))
        .expect("should parse template")
    }

    fn patient() -> PatientRef {
        let mut p = PatientRef::new("ASCAS03579", "Mrs NANDHINI E");
        p.email = Some("nandhini@example.com".into());
        p
    }

    #[test]
    fn test_required_age_blocks_save_until_filled() {
        let template = age_template();
        let mut store = record_store();
        let mut session = DataEntrySession::new(Some(patient()), Some(&template));

        let err = session.save(&mut store).expect_err("save should fail");
        assert!(matches!(
            err,
            FormError::Validation(ValidationError::MissingRequired(ref labels)) if labels == &["Age"]
        ));
        assert!(store.list().is_empty());

        session.set_value("age", "34");
        let record = session.save(&mut store).expect("save should succeed");

        assert_eq!(store.list().len(), 1);
        assert_eq!(record.form_data["age"], FieldValue::from("34"));
        assert_eq!(record.template_id.as_deref(), Some("1"));
        assert_eq!(record.template_name, "T");
        assert_eq!(record.patient_name, "Mrs NANDHINI E");
    }

    #[test]
    fn test_missing_patient_is_checked_first() {
        let template = age_template();
        let mut store = record_store();
        let session = DataEntrySession::new(None, Some(&template));

        let err = session.save(&mut store).expect_err("save should fail");
        assert!(matches!(err, FormError::MissingPatient));
        assert!(store.list().is_empty());
    }

    #[test]
    fn test_default_field_set_seeds_demographics() {
        let session = DataEntrySession::new(Some(patient()), None);

        assert_eq!(session.template_id(), None);
        assert_eq!(session.template_name(), DEFAULT_FORM_NAME);
        assert_eq!(session.value("patientName"), Some(&FieldValue::from("Mrs NANDHINI E")));
        assert_eq!(session.value("patientId"), Some(&FieldValue::from("ASCAS03579")));
        assert_eq!(session.value("age"), Some(&FieldValue::empty()));
        assert_eq!(session.missing_required(), vec!["Gender", "Age"]);
    }

    #[test]
    fn test_email_seeded_only_when_template_has_it() {
        let template: TemplateDocument = serde_json::from_value(json!({
            "id": "2",
            "name": "Contact",
            "sections": [{"id": "s1", "title": "S", "fields": [
                {"id": "email", "type": "email", "label": "Email"}
            ]}],
            "createdAt": "2025-01-11T09:00:00Z"
        }))
        .expect("should parse template");

        let session = DataEntrySession::new(Some(patient()), Some(&template));
        assert_eq!(session.form_data().len(), 1);
        assert_eq!(
            session.value("email"),
            Some(&FieldValue::from("nandhini@example.com"))
        );
    }

    #[test]
    fn test_submit_never_reaches_form_data() {
        let mut template = age_template();
        template.sections[0].fields.push(FieldDefinition::new(
            "go",
            "Submit Button",
            FieldKind::defaults_for(FieldType::Submit),
        ));
        let mut store = record_store();
        let mut session = DataEntrySession::new(Some(patient()), Some(&template));
        assert!(session.value("go").is_none());

        session.set_value("age", "40");
        session.set_value("go", "clicked");
        let record = session.save(&mut store).expect("save should succeed");

        assert_eq!(record.form_data.keys().collect::<Vec<_>>(), vec!["age"]);

        let rendered = session.render();
        assert!(matches!(
            rendered[0].controls[1].kind,
            ControlKind::Button { .. }
        ));
    }

    #[test]
    fn test_saved_form_data_keeps_only_active_fields() {
        let template = age_template();
        let mut store = record_store();
        let mut session = DataEntrySession::new(Some(patient()), Some(&template));

        session.set_value("age", "34");
        session.set_value("stale", "left over");
        assert_eq!(session.value("stale"), Some(&FieldValue::from("left over")));

        let record = session.save(&mut store).expect("save should succeed");
        assert!(!record.form_data.contains_key("stale"));
    }

    #[test]
    fn test_switching_patient_or_template_resets_values() {
        let template = age_template();
        let mut session = DataEntrySession::new(Some(patient()), Some(&template));
        session.set_value("age", "34");

        session.select_patient(Some(PatientRef::new("ASCAS75260", "Mr TEST TAMIL")));
        assert_eq!(session.value("age"), Some(&FieldValue::empty()));

        session.set_value("age", "34");
        session.select_template(None);
        assert!(session.value("age").is_some_and(FieldValue::is_blank));
        assert_eq!(session.value("patientName"), Some(&FieldValue::from("Mr TEST TAMIL")));
    }

    #[test]
    fn test_set_input_coerces_checkbox() {
        let template: TemplateDocument = serde_json::from_value(json!({
            "id": "3",
            "name": "Consent",
            "sections": [{"id": "s1", "title": "S", "fields": [
                {"id": "consent", "type": "checkbox", "label": "Consent", "required": true}
            ]}],
            "createdAt": "2025-01-11T09:00:00Z"
        }))
        .expect("should parse template");
        let mut store = record_store();
        let mut session = DataEntrySession::new(Some(patient()), Some(&template));

        session.set_input("consent", "no");
        assert_eq!(session.value("consent"), Some(&FieldValue::Bool(false)));
        assert!(session.missing_required().is_empty());

        let record = session.save(&mut store).expect("save should succeed");
        assert_eq!(record.form_data["consent"], FieldValue::Bool(false));
    }

    #[test]
    fn test_load_record_saves_as_new_record() {
        let template = age_template();
        let mut store = record_store();
        let mut session = DataEntrySession::new(Some(patient()), Some(&template));
        session.set_value("age", "34");
        let first = session.save(&mut store).expect("save should succeed");

        let mut editing = DataEntrySession::load_record(&first, Some(&template));
        assert_eq!(editing.patient().map(|p| p.id.as_str()), Some("ASCAS03579"));
        assert_eq!(editing.value("age"), Some(&FieldValue::from("34")));

        editing.set_value("age", "35");
        let second = editing.save(&mut store).expect("save should succeed");

        assert_ne!(first.id, second.id);
        assert_eq!(store.get(&first.id).expect("still there").form_data["age"], FieldValue::from("34"));
        assert_eq!(store.list().len(), 2);
    }

    #[test]
    fn test_from_current_uses_applied_sections() {
        let mut current = CurrentTemplate::new(MemoryStorage::new());
        let fallback = DataEntrySession::from_current(None, &current);
        assert_eq!(fallback.template_name(), DEFAULT_FORM_NAME);

        current
            .store(&age_template().sections)
            .expect("store should succeed");
        let session = DataEntrySession::from_current(None, &current);
        assert_eq!(session.template_name(), CURRENT_FORM_NAME);
        assert_eq!(session.template_id(), None);
        assert_eq!(session.form_data().len(), 1);
    }

    #[test]
    fn test_record_filled_from_applied_template_reports_exactly() {
        use crate::repositories::templates::{JsonTemplateStore, TemplateStore};
        use crate::report::{ReportSource, ReportView};
        use crate::template::TemplateDraft;

        let clock = FixedClock::new(Utc.with_ymd_and_hms(2025, 1, 11, 9, 0, 0).unwrap());
        let mut templates = JsonTemplateStore::open(
            MemoryStorage::new(),
            Arc::new(SequentialIdGenerator::new()),
            Arc::new(clock),
        );
        let section = |ids: &[&str]| {
            vec![Section::new("s1", "S").with_fields(
                ids.iter()
                    .map(|id| {
                        FieldDefinition::new(*id, id.to_uppercase(), FieldKind::Text {
                            placeholder: None,
                        })
                    })
                    .collect(),
            )]
        };
        templates
            .save(TemplateDraft::new("Older", section(&["a", "b", "c"])))
            .expect("save should succeed");
        let applied = templates
            .save(TemplateDraft::new("Applied", section(&["a", "b", "c", "d"])))
            .expect("save should succeed");

        let mut current = CurrentTemplate::new(MemoryStorage::new());
        current.apply(&applied).expect("apply should succeed");

        let mut session = DataEntrySession::from_current(Some(patient()), &current);
        for id in ["a", "b", "c", "d"] {
            session.set_value(id, format!("value {id}"));
        }
        let mut store = record_store();
        let record = session.save(&mut store).expect("save should succeed");

        assert_eq!(record.template_id.as_deref(), Some(applied.id.as_str()));
        assert_eq!(record.template_name, "Applied");

        let view = ReportView::for_record(&record, &templates);
        assert_eq!(view.source, ReportSource::Exact);
        let rows: Vec<&str> = view.sections[0]
            .rows
            .iter()
            .map(|r| r.label.as_str())
            .collect();
        assert_eq!(rows, ["A", "B", "C", "D"]);
    }
}
