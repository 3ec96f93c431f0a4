//! Snapshot of the current designer draft.
//!
//! The sections are stored on their own, so the designer can resume where it left off and the
//! entry screen can pick up the structure most recently applied. When the snapshot is a saved
//! template applied unchanged, that template's id and name are kept next to it under a separate
//! key, so records filled from the snapshot still point at their template.

use crate::constants::{CURRENT_TEMPLATE_KEY, CURRENT_TEMPLATE_META_KEY};
use crate::error::FormResult;
use crate::storage::{load_document, persist_document, Storage};
use crate::template::{Section, TemplateDocument};
use serde::{Deserialize, Serialize};

/// The saved template a current snapshot was applied from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedTemplate {
    pub template_id: String,
    pub template_name: String,
}

pub struct CurrentTemplate<S> {
    storage: S,
}

impl<S: Storage> CurrentTemplate<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// `None` when nothing was stored or the snapshot is malformed.
    pub fn load(&self) -> Option<Vec<Section>> {
        load_document(&self.storage, CURRENT_TEMPLATE_KEY)
    }

    /// The template the snapshot was applied from. `None` once the snapshot has been replaced by
    /// a designer draft.
    pub fn applied(&self) -> Option<AppliedTemplate> {
        load_document(&self.storage, CURRENT_TEMPLATE_META_KEY)
    }

    /// Stores a designer draft. The draft is not a saved template, so any applied-template
    /// marker is dropped.
    pub fn store(&mut self, sections: &[Section]) -> FormResult<()> {
        persist_document(&mut self.storage, CURRENT_TEMPLATE_KEY, sections)?;
        self.storage.remove_item(CURRENT_TEMPLATE_META_KEY)?;
        tracing::debug!("stored current template with {} sections", sections.len());
        Ok(())
    }

    /// Makes a saved template the current one, remembering its id and name.
    pub fn apply(&mut self, document: &TemplateDocument) -> FormResult<()> {
        persist_document(&mut self.storage, CURRENT_TEMPLATE_KEY, &document.sections)?;
        let applied = AppliedTemplate {
            template_id: document.id.clone(),
            template_name: document.name.clone(),
        };
        if let Err(e) = persist_document(&mut self.storage, CURRENT_TEMPLATE_META_KEY, &applied) {
            self.storage.remove_item(CURRENT_TEMPLATE_META_KEY).ok();
            return Err(e.into());
        }
        tracing::info!("applied template {} as the current template", document.id);
        Ok(())
    }

    pub fn clear(&mut self) -> FormResult<()> {
        self.storage.remove_item(CURRENT_TEMPLATE_KEY)?;
        self.storage.remove_item(CURRENT_TEMPLATE_META_KEY)?;
        Ok(())
    }
}
