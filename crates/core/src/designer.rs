//! The form designer.
//!
//! [`FormDesigner`] owns a mutable draft (a name and its sections) and a selection state:
//!
//! ```text
//! Idle --select_field(id)--> FieldSelected(id)
//! FieldSelected --deselect / remove field / remove its section / load_template--> Idle
//! ```
//!
//! Every edit works on the draft only. Nothing reaches storage until
//! [`FormDesigner::save_as_template`] or [`FormDesigner::save_as_current`] is called, and a
//! saved template is never edited in place: loading it copies it into the draft, and saving
//! again creates a new document.

use crate::constants::{
    DEFAULT_TEMPLATE_NAME, FIELD_ID_PREFIX, NEW_SECTION_TITLE, SECTION_ID_PREFIX,
};
use crate::defaults::{default_fertility_sections, FERTILITY_TEMPLATE_NAME};
use crate::error::FormResult;
use crate::field::{FieldDefinition, FieldKind, FieldType, FormData, Presentation};
use crate::render::{render_sections, RenderMode, RenderedSection};
use crate::repositories::current::CurrentTemplate;
use crate::repositories::templates::TemplateStore;
use crate::storage::Storage;
use crate::template::{fields_of, Section, TemplateDocument, TemplateDraft};
use clinform_ids::IdGenerator;
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selection {
    Idle,
    FieldSelected(String),
}

/// A partial update to one field. `None` leaves the attribute unchanged.
///
/// Attributes that do not apply to the field's (possibly new) type are ignored, e.g. options on
/// a text field.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldUpdate {
    pub label: Option<String>,
    pub required: Option<bool>,
    pub field_type: Option<FieldType>,
    /// An empty placeholder clears it.
    pub placeholder: Option<String>,
    pub options: Option<Vec<String>>,
    pub button_text: Option<String>,
    pub presentation: Option<Presentation>,
}

impl FieldUpdate {
    fn apply(self, field: &mut FieldDefinition) {
        if let Some(label) = self.label {
            field.label = label;
        }
        if let Some(required) = self.required {
            field.required = required;
        }
        if let Some(field_type) = self.field_type {
            if field.field_type() != Some(field_type) {
                field.kind = field.kind.converted_to(field_type);
            }
        }

        match &mut field.kind {
            FieldKind::Text { placeholder }
            | FieldKind::Number { placeholder }
            | FieldKind::Email { placeholder }
            | FieldKind::Textarea { placeholder } => {
                if let Some(new) = self.placeholder {
                    *placeholder = (!new.is_empty()).then_some(new);
                }
            }
            FieldKind::Dropdown { options } | FieldKind::Radio { options } => {
                if let Some(new) = self.options {
                    *options = new;
                }
            }
            FieldKind::Submit { button_text } => {
                if let Some(new) = self.button_text {
                    *button_text = new;
                }
            }
            FieldKind::Date
            | FieldKind::Checkbox
            | FieldKind::Toggle
            | FieldKind::Unknown { .. } => {}
        }

        if let Some(presentation) = self.presentation {
            field.presentation = presentation;
        }
    }
}

pub struct FormDesigner {
    ids: Arc<dyn IdGenerator>,
    name: String,
    sections: Vec<Section>,
    selection: Selection,
}

impl FormDesigner {
    /// A fresh draft with one empty section.
    pub fn new(ids: Arc<dyn IdGenerator>) -> Self {
        let mut designer = Self::with_draft(ids, TemplateDraft::new(DEFAULT_TEMPLATE_NAME, vec![]));
        designer.add_section();
        designer
    }

    pub fn with_draft(ids: Arc<dyn IdGenerator>, draft: TemplateDraft) -> Self {
        Self {
            ids,
            name: draft.name,
            sections: draft.sections,
            selection: Selection::Idle,
        }
    }

    /// Picks up the current template snapshot, or starts from the built-in fertility form when
    /// there is none.
    pub fn resume<S: Storage>(ids: Arc<dyn IdGenerator>, current: &CurrentTemplate<S>) -> Self {
        match current.load() {
            Some(sections) => {
                tracing::debug!("resuming designer with {} sections", sections.len());
                let name = current
                    .applied()
                    .map_or_else(|| DEFAULT_TEMPLATE_NAME.to_owned(), |a| a.template_name);
                Self::with_draft(ids, TemplateDraft::new(name, sections))
            }
            None => Self::with_draft(
                ids,
                TemplateDraft::new(FERTILITY_TEMPLATE_NAME, default_fertility_sections()),
            ),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selected_field(&self) -> Option<&FieldDefinition> {
        match &self.selection {
            Selection::FieldSelected(id) => self.field(id),
            Selection::Idle => None,
        }
    }

    pub fn field(&self, field_id: &str) -> Option<&FieldDefinition> {
        fields_of(&self.sections).find(|f| f.id == field_id)
    }

    /// A copy of the draft as it stands.
    pub fn draft(&self) -> TemplateDraft {
        TemplateDraft::new(self.name.clone(), self.sections.clone())
    }

    /// Field types offered for dragging, with their palette labels.
    pub fn palette() -> Vec<(FieldType, &'static str)> {
        FieldType::ALL
            .into_iter()
            .map(|t| (t, t.palette_label()))
            .collect()
    }

    /// Selects a field for editing. Unknown ids leave the selection as it was.
    pub fn select_field(&mut self, field_id: &str) -> bool {
        if self.field(field_id).is_none() {
            return false;
        }
        self.selection = Selection::FieldSelected(field_id.to_owned());
        true
    }

    pub fn deselect(&mut self) {
        self.selection = Selection::Idle;
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Appends an empty section and returns its id.
    pub fn add_section(&mut self) -> String {
        let id = self.unique_id(SECTION_ID_PREFIX, |s, id| s.sections.iter().any(|x| x.id == id));
        self.sections.push(Section::new(id.clone(), NEW_SECTION_TITLE));
        tracing::debug!("added section {}", id);
        id
    }

    pub fn remove_section(&mut self, section_id: &str) -> bool {
        let Some(index) = self.section_index(section_id) else {
            return false;
        };
        let removed = self.sections.remove(index);

        if let Selection::FieldSelected(selected) = &self.selection {
            if removed.fields.iter().any(|f| &f.id == selected) {
                self.selection = Selection::Idle;
            }
        }
        tracing::debug!("removed section {} with {} fields", removed.id, removed.fields.len());
        true
    }

    pub fn rename_section(&mut self, section_id: &str, title: impl Into<String>) -> bool {
        match self.sections.iter_mut().find(|s| s.id == section_id) {
            Some(section) => {
                section.title = title.into();
                true
            }
            None => false,
        }
    }

    /// Appends a new field of `field_type` to a section and returns its id, or `None` when the
    /// section does not exist.
    pub fn drop_field(&mut self, section_id: &str, field_type: FieldType) -> Option<String> {
        let index = self.section_index(section_id)?;
        let id = self.unique_id(FIELD_ID_PREFIX, |s, id| s.field(id).is_some());

        let mut field = FieldDefinition::new(
            id.clone(),
            field_type.palette_label(),
            FieldKind::defaults_for(field_type),
        );
        if field_type == FieldType::Submit {
            field.presentation = Presentation::submit_accent();
        }

        self.sections[index].fields.push(field);
        tracing::debug!("dropped {} field {} into section {}", field_type, id, section_id);
        Some(id)
    }

    pub fn update_field(&mut self, field_id: &str, update: FieldUpdate) -> bool {
        match self.field_mut(field_id) {
            Some(field) => {
                update.apply(field);
                tracing::debug!("updated field {}", field_id);
                true
            }
            None => false,
        }
    }

    pub fn remove_field(&mut self, field_id: &str) -> bool {
        let mut removed = false;
        for section in &mut self.sections {
            let before = section.fields.len();
            section.fields.retain(|f| f.id != field_id);
            removed |= section.fields.len() != before;
        }

        if removed && self.selection == Selection::FieldSelected(field_id.to_owned()) {
            self.selection = Selection::Idle;
        }
        removed
    }

    /// Moves the dragged section to the target's position.
    pub fn reorder_sections(&mut self, dragged_id: &str, target_id: &str) -> bool {
        if dragged_id == target_id {
            return false;
        }
        let (Some(from), Some(to)) = (self.section_index(dragged_id), self.section_index(target_id))
        else {
            return false;
        };

        let section = self.sections.remove(from);
        self.sections.insert(to, section);
        tracing::debug!("moved section {} to position {}", dragged_id, to);
        true
    }

    /// Moves a field to the end of another section.
    pub fn move_field(&mut self, field_id: &str, target_section_id: &str) -> bool {
        let Some(target) = self.section_index(target_section_id) else {
            return false;
        };
        let Some((from, position)) = self.sections.iter().enumerate().find_map(|(i, s)| {
            s.fields.iter().position(|f| f.id == field_id).map(|p| (i, p))
        }) else {
            return false;
        };

        let field = self.sections[from].fields.remove(position);
        self.sections[target].fields.push(field);
        true
    }

    /// Replaces the draft with a copy of a saved document.
    pub fn load_template(&mut self, document: &TemplateDocument) {
        let draft = document.to_draft();
        self.name = draft.name;
        self.sections = draft.sections;
        self.selection = Selection::Idle;
        tracing::debug!("loaded template {} into the designer", document.id);
    }

    /// Saves the draft as a new template document.
    ///
    /// # Errors
    ///
    /// Whatever [`TemplateStore::save`] returns; a draft without fields is rejected with nothing
    /// written.
    pub fn save_as_template<T: TemplateStore + ?Sized>(
        &self,
        store: &mut T,
    ) -> FormResult<TemplateDocument> {
        store.save(self.draft())
    }

    /// Stores the draft sections as the current template.
    pub fn save_as_current<S: Storage>(&self, current: &mut CurrentTemplate<S>) -> FormResult<()> {
        current.store(&self.sections)
    }

    /// Every field as a disabled control, submit buttons included.
    pub fn preview(&self) -> Vec<RenderedSection> {
        render_sections(&self.sections, &FormData::new(), RenderMode::ReadOnlyPreview)
    }

    fn section_index(&self, section_id: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.id == section_id)
    }

    fn field_mut(&mut self, field_id: &str) -> Option<&mut FieldDefinition> {
        self.sections
            .iter_mut()
            .flat_map(|s| s.fields.iter_mut())
            .find(|f| f.id == field_id)
    }

    fn unique_id(&self, prefix: &str, taken: impl Fn(&Self, &str) -> bool) -> String {
        loop {
            let id = self.ids.next_id(prefix);
            if !taken(self, &id) {
                return id;
            }
        }
    }
}
