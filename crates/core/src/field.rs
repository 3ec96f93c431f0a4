//! Field definitions and field values.
//!
//! A [`FieldDefinition`] is one typed input descriptor inside a template section. Its per-type
//! data (options, placeholder, button text) lives in the tagged [`FieldKind`] variant so that
//! every consumer (designer preview, entry form, report) dispatches through the same renderer.
//!
//! ## Wire form
//!
//! Fields are stored flat, with the variant tag under `type`:
//!
//! ```json
//! { "id": "painInPeriods", "type": "dropdown", "label": "Pain in Periods",
//!   "required": false, "options": ["No", "Mild", "Moderate", "Severe"] }
//! ```
//!
//! `select` is read as `dropdown` and numeric ids are read as their decimal string. An unknown
//! type name is read as [`FieldKind::Unknown`], which keeps its attributes for the next save.

use clinform_types::is_blank;
use serde::de::{self, DeserializeOwned};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Field values keyed by field id.
pub type FormData = BTreeMap<String, FieldValue>;

/// The field types offered by the designer palette.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Number,
    Email,
    Date,
    Textarea,
    #[serde(alias = "select")]
    Dropdown,
    Checkbox,
    Radio,
    Toggle,
    Submit,
}

impl FieldType {
    /// Palette order.
    pub const ALL: [FieldType; 10] = [
        FieldType::Text,
        FieldType::Number,
        FieldType::Email,
        FieldType::Date,
        FieldType::Dropdown,
        FieldType::Textarea,
        FieldType::Checkbox,
        FieldType::Radio,
        FieldType::Toggle,
        FieldType::Submit,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Email => "email",
            FieldType::Date => "date",
            FieldType::Textarea => "textarea",
            FieldType::Dropdown => "dropdown",
            FieldType::Checkbox => "checkbox",
            FieldType::Radio => "radio",
            FieldType::Toggle => "toggle",
            FieldType::Submit => "submit",
        }
    }

    /// Label shown in the palette and given to freshly dropped fields.
    pub fn palette_label(self) -> &'static str {
        match self {
            FieldType::Text => "Text Input",
            FieldType::Number => "Number Input",
            FieldType::Email => "Email Input",
            FieldType::Date => "Date Picker",
            FieldType::Textarea => "Text Area",
            FieldType::Dropdown => "Dropdown",
            FieldType::Checkbox => "Checkbox",
            FieldType::Radio => "Radio Button",
            FieldType::Toggle => "Toggle",
            FieldType::Submit => "Submit Button",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        let normalised = input.trim().to_ascii_lowercase();
        if normalised == "select" {
            return Some(FieldType::Dropdown);
        }
        Self::ALL.into_iter().find(|t| t.as_str() == normalised)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Default text on a freshly dropped submit button.
pub const DEFAULT_BUTTON_TEXT: &str = "Submit";

/// Placeholder options given to freshly dropped dropdown and radio fields.
pub const DEFAULT_OPTIONS: [&str; 3] = ["Option 1", "Option 2", "Option 3"];

fn default_button_text() -> String {
    DEFAULT_BUTTON_TEXT.to_owned()
}

/// Per-type data of a field, tagged by `type`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Text { placeholder: Option<String> },
    Number { placeholder: Option<String> },
    Email { placeholder: Option<String> },
    Date,
    Textarea { placeholder: Option<String> },
    Dropdown { options: Vec<String> },
    Checkbox,
    Radio { options: Vec<String> },
    Toggle,
    Submit { button_text: String },
    /// A type this crate does not know. The raw type name and every attribute not claimed by
    /// [`FieldDefinition`] or [`Presentation`] are kept and written back unchanged.
    Unknown {
        type_name: String,
        extra: serde_json::Map<String, serde_json::Value>,
    },
}

const TYPE_KEY: &str = "type";
const PLACEHOLDER_KEY: &str = "placeholder";
const OPTIONS_KEY: &str = "options";
const BUTTON_TEXT_KEY: &str = "buttonText";

/// Keys owned by [`Presentation`], which sits next to the kind in a flattened field.
const PRESENTATION_KEYS: [&str; 7] = [
    "backgroundColor",
    "textColor",
    "fontSize",
    "fontWeight",
    "borderRadius",
    "padding",
    "marginBottom",
];

impl Serialize for FieldKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        match self {
            FieldKind::Unknown { type_name, extra } => {
                map.serialize_entry(TYPE_KEY, type_name)?;
                for (key, value) in extra {
                    map.serialize_entry(key, value)?;
                }
            }
            FieldKind::Text { placeholder }
            | FieldKind::Number { placeholder }
            | FieldKind::Email { placeholder }
            | FieldKind::Textarea { placeholder } => {
                map.serialize_entry(TYPE_KEY, self.type_name())?;
                if let Some(placeholder) = placeholder {
                    map.serialize_entry(PLACEHOLDER_KEY, placeholder)?;
                }
            }
            FieldKind::Dropdown { options } | FieldKind::Radio { options } => {
                map.serialize_entry(TYPE_KEY, self.type_name())?;
                map.serialize_entry(OPTIONS_KEY, options)?;
            }
            FieldKind::Submit { button_text } => {
                map.serialize_entry(TYPE_KEY, self.type_name())?;
                map.serialize_entry(BUTTON_TEXT_KEY, button_text)?;
            }
            FieldKind::Date | FieldKind::Checkbox | FieldKind::Toggle => {
                map.serialize_entry(TYPE_KEY, self.type_name())?;
            }
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FieldKind {
    /// Known type names are matched exactly (plus the legacy `select`); attributes a known
    /// kind has no use for are ignored.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut map = serde_json::Map::deserialize(deserializer)?;
        let type_name = match map.remove(TYPE_KEY) {
            Some(serde_json::Value::String(s)) => s,
            Some(other) => {
                return Err(de::Error::custom(format!(
                    "expected a string field type, got {other}"
                )))
            }
            None => return Err(de::Error::missing_field(TYPE_KEY)),
        };

        let known = if type_name == "select" {
            Some(FieldType::Dropdown)
        } else {
            FieldType::ALL.into_iter().find(|t| t.as_str() == type_name)
        };
        let Some(field_type) = known else {
            map.retain(|key, _| !PRESENTATION_KEYS.contains(&key.as_str()));
            return Ok(FieldKind::Unknown {
                type_name,
                extra: map,
            });
        };

        Ok(match field_type {
            FieldType::Text => FieldKind::Text {
                placeholder: take_placeholder::<D::Error>(&mut map)?,
            },
            FieldType::Number => FieldKind::Number {
                placeholder: take_placeholder::<D::Error>(&mut map)?,
            },
            FieldType::Email => FieldKind::Email {
                placeholder: take_placeholder::<D::Error>(&mut map)?,
            },
            FieldType::Textarea => FieldKind::Textarea {
                placeholder: take_placeholder::<D::Error>(&mut map)?,
            },
            FieldType::Date => FieldKind::Date,
            FieldType::Checkbox => FieldKind::Checkbox,
            FieldType::Toggle => FieldKind::Toggle,
            FieldType::Dropdown => FieldKind::Dropdown {
                options: take::<Vec<String>, D::Error>(&mut map, OPTIONS_KEY)?.unwrap_or_default(),
            },
            FieldType::Radio => FieldKind::Radio {
                options: take::<Vec<String>, D::Error>(&mut map, OPTIONS_KEY)?.unwrap_or_default(),
            },
            FieldType::Submit => FieldKind::Submit {
                button_text: take::<String, D::Error>(&mut map, BUTTON_TEXT_KEY)?
                    .unwrap_or_else(default_button_text),
            },
        })
    }
}

fn take_placeholder<E: de::Error>(
    map: &mut serde_json::Map<String, serde_json::Value>,
) -> Result<Option<String>, E> {
    Ok(take::<Option<String>, E>(map, PLACEHOLDER_KEY)?.flatten())
}

/// Removes and decodes `key`; `None` when it is absent.
fn take<T, E>(
    map: &mut serde_json::Map<String, serde_json::Value>,
    key: &str,
) -> Result<Option<T>, E>
where
    T: DeserializeOwned,
    E: de::Error,
{
    map.remove(key)
        .map(|value| {
            serde_json::from_value(value).map_err(|e| E::custom(format!("invalid {key}: {e}")))
        })
        .transpose()
}

impl FieldKind {
    /// The kind a freshly dropped field of `field_type` starts with.
    pub fn defaults_for(field_type: FieldType) -> Self {
        let options = || DEFAULT_OPTIONS.iter().map(|o| o.to_string()).collect();
        match field_type {
            FieldType::Text => FieldKind::Text { placeholder: None },
            FieldType::Number => FieldKind::Number { placeholder: None },
            FieldType::Email => FieldKind::Email { placeholder: None },
            FieldType::Date => FieldKind::Date,
            FieldType::Textarea => FieldKind::Textarea { placeholder: None },
            FieldType::Dropdown => FieldKind::Dropdown { options: options() },
            FieldType::Checkbox => FieldKind::Checkbox,
            FieldType::Radio => FieldKind::Radio { options: options() },
            FieldType::Toggle => FieldKind::Toggle,
            FieldType::Submit => FieldKind::Submit {
                button_text: default_button_text(),
            },
        }
    }

    /// The name written under `type`.
    pub fn type_name(&self) -> &str {
        match self {
            FieldKind::Unknown { type_name, .. } => type_name.as_str(),
            known => known.field_type().map_or("", FieldType::as_str),
        }
    }

    /// `None` for [`FieldKind::Unknown`].
    pub fn field_type(&self) -> Option<FieldType> {
        Some(match self {
            FieldKind::Text { .. } => FieldType::Text,
            FieldKind::Number { .. } => FieldType::Number,
            FieldKind::Email { .. } => FieldType::Email,
            FieldKind::Date => FieldType::Date,
            FieldKind::Textarea { .. } => FieldType::Textarea,
            FieldKind::Dropdown { .. } => FieldType::Dropdown,
            FieldKind::Checkbox => FieldType::Checkbox,
            FieldKind::Radio { .. } => FieldType::Radio,
            FieldKind::Toggle => FieldType::Toggle,
            FieldKind::Submit { .. } => FieldType::Submit,
            FieldKind::Unknown { .. } => return None,
        })
    }

    pub fn placeholder(&self) -> Option<&str> {
        match self {
            FieldKind::Text { placeholder }
            | FieldKind::Number { placeholder }
            | FieldKind::Email { placeholder }
            | FieldKind::Textarea { placeholder } => placeholder.as_deref(),
            FieldKind::Unknown { extra, .. } => extra.get(PLACEHOLDER_KEY)?.as_str(),
            _ => None,
        }
    }

    /// Options of a dropdown or radio field; empty for every other kind.
    pub fn options(&self) -> &[String] {
        match self {
            FieldKind::Dropdown { options } | FieldKind::Radio { options } => options,
            _ => &[],
        }
    }

    /// Converts to another type, carrying over the placeholder and options where both kinds
    /// have them. Options are not invented: a text field turned into a dropdown has none until
    /// the author adds some.
    pub fn converted_to(&self, field_type: FieldType) -> Self {
        let placeholder = self.placeholder().map(str::to_owned);
        let options = self.options().to_vec();
        match field_type {
            FieldType::Text => FieldKind::Text { placeholder },
            FieldType::Number => FieldKind::Number { placeholder },
            FieldType::Email => FieldKind::Email { placeholder },
            FieldType::Textarea => FieldKind::Textarea { placeholder },
            FieldType::Date => FieldKind::Date,
            FieldType::Dropdown => FieldKind::Dropdown { options },
            FieldType::Radio => FieldKind::Radio { options },
            FieldType::Checkbox => FieldKind::Checkbox,
            FieldType::Toggle => FieldKind::Toggle,
            FieldType::Submit => match self {
                FieldKind::Submit { button_text } => FieldKind::Submit {
                    button_text: button_text.clone(),
                },
                _ => FieldKind::defaults_for(FieldType::Submit),
            },
        }
    }
}

/// Optional cosmetic overrides. None of these affect validation or stored values.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Presentation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin_bottom: Option<String>,
}

impl Presentation {
    /// Accent colours given to freshly dropped submit buttons.
    pub fn submit_accent() -> Self {
        Self {
            background_color: Some("#007bff".into()),
            text_color: Some("#ffffff".into()),
            ..Self::default()
        }
    }

    /// Resolves every attribute, filling in the defaults.
    pub fn effective(&self) -> Style {
        fn pick(value: &Option<String>, default: &str) -> String {
            value
                .as_deref()
                .filter(|v| !is_blank(v))
                .unwrap_or(default)
                .to_owned()
        }

        Style {
            background_color: pick(&self.background_color, "#ffffff"),
            text_color: pick(&self.text_color, "#000000"),
            font_size: pick(&self.font_size, "14px"),
            font_weight: pick(&self.font_weight, "normal"),
            border_radius: pick(&self.border_radius, "6px"),
            padding: pick(&self.padding, "10px"),
            margin_bottom: pick(&self.margin_bottom, "12px"),
        }
    }
}

/// Fully resolved presentation attributes of a rendered control.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Style {
    pub background_color: String,
    pub text_color: String,
    pub font_size: String,
    pub font_weight: String,
    pub border_radius: String,
    pub padding: String,
    pub margin_bottom: String,
}

/// One typed input descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Unique within the enclosing template; the key of this field's value in a record.
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub required: bool,
    #[serde(flatten)]
    pub kind: FieldKind,
    #[serde(flatten)]
    pub presentation: Presentation,
}

impl FieldDefinition {
    pub fn new(id: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            required: false,
            kind,
            presentation: Presentation::default(),
        }
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn field_type(&self) -> Option<FieldType> {
        self.kind.field_type()
    }

    /// Whether the field stores a value. Submit buttons are UI-only markers.
    pub fn is_bound(&self) -> bool {
        !matches!(self.kind, FieldKind::Submit { .. })
    }

    pub fn options(&self) -> &[String] {
        self.kind.options()
    }

    pub fn placeholder(&self) -> Option<&str> {
        self.kind.placeholder().filter(|p| !is_blank(p))
    }
}

/// Accepts `"field_1"` as well as the legacy numeric form `1736605322045`.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or number id, got {other}"
        ))),
    }
}

/// Optional form of [`string_or_number`]; `null` and absent read as `None`.
pub(crate) fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a string or number id, got {other}"
        ))),
    }
}

/// A stored field value. The empty string means "unset".
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
}

impl FieldValue {
    pub fn empty() -> Self {
        FieldValue::Text(String::new())
    }

    /// Empty or whitespace-only text. Numbers and booleans are never blank.
    pub fn is_blank(&self) -> bool {
        matches!(self, FieldValue::Text(s) if is_blank(s))
    }

    /// Interprets the value as a checkbox/toggle state.
    pub fn as_bool(&self) -> bool {
        match self {
            FieldValue::Bool(b) => *b,
            FieldValue::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
            FieldValue::Text(s) => matches!(
                s.trim().to_ascii_lowercase().as_str(),
                "true" | "yes" | "on" | "1"
            ),
        }
    }

    /// Coerces raw user input for a field of `field_type`: checkbox and toggle input becomes a
    /// boolean, everything else is kept as entered.
    pub fn from_input(field_type: Option<FieldType>, raw: &str) -> Self {
        match field_type {
            Some(FieldType::Checkbox | FieldType::Toggle) => {
                FieldValue::Bool(FieldValue::Text(raw.to_owned()).as_bool())
            }
            _ => FieldValue::Text(raw.to_owned()),
        }
    }
}

impl Default for FieldValue {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Bool(b) => write!(f, "{b}"),
            FieldValue::Number(n) => write!(f, "{n}"),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value.into())
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    /// Tolerates whatever a hand-edited or legacy collection holds: `null` reads as unset, and
    /// nested arrays/objects are kept as their JSON text rather than failing the whole record.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::Null => FieldValue::empty(),
            serde_json::Value::Bool(b) => FieldValue::Bool(b),
            serde_json::Value::Number(n) => FieldValue::Number(n),
            serde_json::Value::String(s) => FieldValue::Text(s),
            nested => FieldValue::Text(nested.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_dropdown_reads_legacy_select_alias() {
        let field: FieldDefinition = serde_json::from_value(json!({
            "id": "gender",
            "type": "select",
            "label": "Gender",
            "options": ["Male", "Female", "Other"],
            "required": true
        }))
        .expect("should parse select field");

        assert_eq!(field.field_type(), Some(FieldType::Dropdown));
        assert_eq!(field.options(), ["Male", "Female", "Other"]);
        assert!(field.required);
    }

    #[test]
    fn test_numeric_id_is_read_as_string() {
        let field: FieldDefinition = serde_json::from_value(json!({
            "id": 1736605322045u64,
            "type": "text",
            "label": "Partner Name"
        }))
        .expect("should parse numeric id");

        assert_eq!(field.id, "1736605322045");
    }

    #[test]
    fn test_unknown_type_is_tolerated() {
        let field: FieldDefinition = serde_json::from_value(json!({
            "id": "sig",
            "type": "signature",
            "label": "Signature"
        }))
        .expect("should parse unknown type");

        assert!(matches!(&field.kind, FieldKind::Unknown { type_name, .. } if type_name == "signature"));
        assert_eq!(field.field_type(), None);
        assert!(field.options().is_empty());
    }

    #[test]
    fn test_unknown_type_survives_resave() {
        let stored = json!({
            "id": "sig",
            "type": "signature",
            "label": "Sig",
            "required": false,
            "placeholder": "sign here",
            "penColor": "#123456",
            "options": ["ink", "stylus"],
            "textColor": "#333333"
        });
        let field: FieldDefinition =
            serde_json::from_value(stored.clone()).expect("should parse unknown type");

        assert_eq!(field.placeholder(), Some("sign here"));
        assert_eq!(field.presentation.text_color.as_deref(), Some("#333333"));
        let FieldKind::Unknown { extra, .. } = &field.kind else {
            panic!("expected an unknown kind");
        };
        assert!(!extra.contains_key("textColor"));

        let resaved = serde_json::to_value(&field).expect("should serialize");
        assert_eq!(resaved, stored);
    }

    #[test]
    fn test_unit_kinds_ignore_stray_keys() {
        let field: FieldDefinition = serde_json::from_value(json!({
            "id": "lmp",
            "type": "date",
            "label": "Last Menstrual Period (LMP)",
            "placeholder": "",
            "options": []
        }))
        .expect("should parse date field with stray keys");

        assert_eq!(field.kind, FieldKind::Date);
    }

    #[test]
    fn test_submit_serializes_button_text_and_presentation_camel_case() {
        let mut field = FieldDefinition::new(
            "field_9",
            "Submit Button",
            FieldKind::defaults_for(FieldType::Submit),
        );
        field.presentation = Presentation::submit_accent();

        let value = serde_json::to_value(&field).expect("should serialize");
        assert_eq!(value["type"], "submit");
        assert_eq!(value["buttonText"], "Submit");
        assert_eq!(value["backgroundColor"], "#007bff");
        assert_eq!(value["textColor"], "#ffffff");
        assert!(value.get("fontSize").is_none());
        assert!(!field.is_bound());

        let back: FieldDefinition = serde_json::from_value(value).expect("should parse back");
        assert_eq!(back, field);
    }

    #[test]
    fn test_effective_presentation_fills_defaults() {
        let style = Presentation {
            font_weight: Some("bold".into()),
            padding: Some("  ".into()),
            ..Presentation::default()
        }
        .effective();

        assert_eq!(style.font_weight, "bold");
        assert_eq!(style.padding, "10px");
        assert_eq!(style.background_color, "#ffffff");
        assert_eq!(style.font_size, "14px");
    }

    #[test]
    fn test_converted_to_carries_compatible_data() {
        let dropdown = FieldKind::Dropdown {
            options: vec!["IVF".into(), "IUI".into()],
        };
        assert_eq!(
            dropdown.converted_to(FieldType::Radio),
            FieldKind::Radio {
                options: vec!["IVF".into(), "IUI".into()]
            }
        );

        let text = FieldKind::Text {
            placeholder: Some("cm".into()),
        };
        assert_eq!(
            text.converted_to(FieldType::Textarea),
            FieldKind::Textarea {
                placeholder: Some("cm".into())
            }
        );
        assert_eq!(
            text.converted_to(FieldType::Dropdown),
            FieldKind::Dropdown { options: vec![] }
        );
    }

    #[test]
    fn test_field_value_tolerates_legacy_shapes() {
        let data: FormData = serde_json::from_value(json!({
            "age": "34",
            "gravida": 2,
            "consent": true,
            "notes": null,
            "obstetricHistory": [{"gravida": "1"}]
        }))
        .expect("should parse form data");

        assert_eq!(data["age"], FieldValue::from("34"));
        assert_eq!(data["gravida"].to_string(), "2");
        assert_eq!(data["consent"], FieldValue::Bool(true));
        assert!(data["notes"].is_blank());
        assert_eq!(data["obstetricHistory"].to_string(), r#"[{"gravida":"1"}]"#);
    }

    #[test]
    fn test_field_value_blank_and_bool_rules() {
        assert!(FieldValue::from("   ").is_blank());
        assert!(!FieldValue::from("70").is_blank());
        assert!(!FieldValue::Bool(false).is_blank());

        assert_eq!(
            FieldValue::from_input(Some(FieldType::Checkbox), "yes"),
            FieldValue::Bool(true)
        );
        assert_eq!(
            FieldValue::from_input(Some(FieldType::Toggle), "off"),
            FieldValue::Bool(false)
        );
        assert_eq!(
            FieldValue::from_input(Some(FieldType::Number), "34"),
            FieldValue::from("34")
        );
    }

    #[test]
    fn test_field_type_parse() {
        assert_eq!(FieldType::parse("Select"), Some(FieldType::Dropdown));
        assert_eq!(FieldType::parse("textarea"), Some(FieldType::Textarea));
        assert_eq!(FieldType::parse("slider"), None);
    }
}
