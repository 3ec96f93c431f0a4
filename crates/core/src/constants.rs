//! Collection keys and built-in names.
//!
//! Keys double as file stems for [`crate::FileStorage`], so they must stay within
//! `[A-Za-z0-9_-]`.

/// Saved template documents.
pub const TEMPLATES_KEY: &str = "fertilityTemplates";

/// Sections of the draft most recently saved or applied in the designer.
pub const CURRENT_TEMPLATE_KEY: &str = "currentFertilityTemplate";

/// Id and name of the saved template behind [`CURRENT_TEMPLATE_KEY`], present only while the
/// snapshot is an unedited copy of that template.
pub const CURRENT_TEMPLATE_META_KEY: &str = "currentFertilityTemplateMeta";

/// Generic report records.
pub const REPORTS_KEY: &str = "allReports";

/// Fertility form records.
pub const FERTILITY_RECORDS_KEY: &str = "fertilityRecords";

/// Patient roster, owned by the roster screens and read here.
pub const PATIENTS_KEY: &str = "patients";

/// Default data directory when none is configured.
pub const DEFAULT_DATA_DIR: &str = "clinform_data";

/// Template name recorded when the built-in default field set was used.
pub const DEFAULT_FORM_NAME: &str = "Default Form";

/// Template name recorded when the current snapshot was used without a saved template
/// behind it.
pub const CURRENT_FORM_NAME: &str = "Current Form";

/// Name given to a fresh designer draft.
pub const DEFAULT_TEMPLATE_NAME: &str = "New Form Template";

/// Title given to sections added in the designer.
pub const NEW_SECTION_TITLE: &str = "New Section";

pub const REPORT_ID_PREFIX: &str = "RPT";
pub const FERTILITY_ID_PREFIX: &str = "FERT";
pub const FIELD_ID_PREFIX: &str = "field_";
pub const SECTION_ID_PREFIX: &str = "section_";

/// Template ids are bare generated ids, e.g. `1736605322045`.
pub const TEMPLATE_ID_PREFIX: &str = "";
