//! Patient references as read from the roster.
//!
//! The roster belongs to the patient screens; this crate only reads it, to seed demographics in
//! a data-entry session and to show patient identity on reports.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientRef {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl PatientRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: None,
            phone_number: None,
            date: None,
            created_at: None,
        }
    }

    /// The demographic value a form field with this id is seeded from, if any.
    pub fn demographic(&self, field_id: &str) -> Option<&str> {
        match field_id {
            "patientName" => Some(&self.name),
            "patientId" => Some(&self.id),
            "email" => self.email.as_deref(),
            "phoneNumber" => self.phone_number.as_deref(),
            _ => None,
        }
    }
}
