//! Sections, template drafts and saved template documents.

use crate::error::{FormResult, ValidationError};
use crate::field::{string_or_number, FieldDefinition};
use chrono::{DateTime, Utc};
use clinform_types::is_blank;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// A titled, ordered group of fields. Field order is render and report order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

impl Section {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_fields(mut self, fields: Vec<FieldDefinition>) -> Self {
        self.fields = fields;
        self
    }
}

/// Every field across `sections`, in order.
pub fn fields_of(sections: &[Section]) -> impl Iterator<Item = &FieldDefinition> {
    sections.iter().flat_map(|s| s.fields.iter())
}

/// Checks the invariants every saved template must hold.
///
/// # Errors
///
/// - [`ValidationError::EmptyName`] if `name` is blank,
/// - [`ValidationError::NoFields`] if no section has a field (including no sections at all),
/// - [`ValidationError::DuplicateFieldId`] if two fields share an id, in any sections.
pub fn validate_template(name: &str, sections: &[Section]) -> Result<(), ValidationError> {
    if is_blank(name) {
        return Err(ValidationError::EmptyName);
    }

    if fields_of(sections).next().is_none() {
        return Err(ValidationError::NoFields);
    }

    let mut seen = HashSet::new();
    for field in fields_of(sections) {
        if !seen.insert(field.id.as_str()) {
            return Err(ValidationError::DuplicateFieldId(field.id.clone()));
        }
    }

    Ok(())
}

/// The designer's mutable working copy of a template.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateDraft {
    pub name: String,
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl TemplateDraft {
    pub fn new(name: impl Into<String>, sections: Vec<Section>) -> Self {
        Self {
            name: name.into(),
            sections,
        }
    }

    pub fn validate(&self) -> FormResult<()> {
        validate_template(&self.name, &self.sections)?;
        Ok(())
    }
}

/// A saved, addressable template. Never edited in place.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDocument {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub sections: Vec<Section>,
    pub created_at: DateTime<Utc>,
}

impl TemplateDocument {
    pub fn fields(&self) -> impl Iterator<Item = &FieldDefinition> {
        fields_of(&self.sections)
    }

    pub fn field(&self, field_id: &str) -> Option<&FieldDefinition> {
        self.fields().find(|f| f.id == field_id)
    }

    pub fn field_ids(&self) -> BTreeSet<&str> {
        self.fields().map(|f| f.id.as_str()).collect()
    }

    pub fn field_count(&self) -> usize {
        self.fields().count()
    }

    /// A fresh draft copy; editing it never touches this document.
    pub fn to_draft(&self) -> TemplateDraft {
        TemplateDraft::new(self.name.clone(), self.sections.clone())
    }
}
