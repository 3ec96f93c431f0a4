//! Read-only view of the patient roster.

use crate::constants::PATIENTS_KEY;
use crate::error::{FormError, FormResult};
use crate::patient::PatientRef;
use crate::storage::{load_collection, Storage};

#[derive(Clone, Debug, Default)]
pub struct PatientRoster {
    patients: Vec<PatientRef>,
}

impl PatientRoster {
    /// Loads the roster; a missing or malformed roster is empty.
    pub fn load<S: Storage + ?Sized>(storage: &S) -> Self {
        Self {
            patients: load_collection(storage, PATIENTS_KEY),
        }
    }

    pub fn from_patients(patients: Vec<PatientRef>) -> Self {
        Self { patients }
    }

    pub fn list(&self) -> &[PatientRef] {
        &self.patients
    }

    pub fn get(&self, id: &str) -> FormResult<&PatientRef> {
        self.patients
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| FormError::not_found("patient", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_load_and_get() {
        let storage = MemoryStorage::new().with_item(
            PATIENTS_KEY,
            r#"[{"id":"ASCAS75260","name":"Mr TEST TAMIL","email":"","phoneNumber":"+91 9876543210"},
                {"id":"ASCAS03579","name":"Mrs NANDHINI E"}]"#,
        );
        let roster = PatientRoster::load(&storage);

        assert_eq!(roster.list().len(), 2);
        assert_eq!(
            roster.get("ASCAS03579").map(|p| p.name.as_str()).ok(),
            Some("Mrs NANDHINI E")
        );
        assert!(roster.get("missing").is_err_and(|e| e.is_not_found()));
    }

    #[test]
    fn test_malformed_roster_is_empty() {
        let storage = MemoryStorage::new().with_item(PATIENTS_KEY, "{\"oops\":");
        assert!(PatientRoster::load(&storage).list().is_empty());
    }
}
