//! The generic field renderer.
//!
//! [`render`] is the one dispatcher every consumer goes through: the designer preview, the entry
//! form and the report view. It is pure and total. It never persists anything, missing options
//! render as an empty list, and field kinds it does not know render as a plain text input.
//!
//! In [`RenderMode::ReportDisplay`] a field with a blank or missing value is
//! [`Rendered::Omitted`] rather than shown empty, and submit buttons are always omitted.

use crate::field::{FieldDefinition, FieldKind, FieldValue, FormData, Style};
use crate::template::Section;
use serde::Serialize;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderMode {
    /// Interactive control on the entry form.
    Editable,
    /// Disabled control in the designer preview.
    ReadOnlyPreview,
    /// Label/value row on a report.
    ReportDisplay,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputType {
    Text,
    Number,
    Email,
    Date,
}

impl InputType {
    pub fn as_str(self) -> &'static str {
        match self {
            InputType::Text => "text",
            InputType::Number => "number",
            InputType::Email => "email",
            InputType::Date => "date",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChoiceOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// Label of the leading "nothing chosen" dropdown entry.
pub const UNSELECTED_LABEL: &str = "Select an option";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControlKind {
    Input {
        input_type: InputType,
        value: String,
        placeholder: Option<String>,
    },
    TextArea {
        value: String,
        placeholder: Option<String>,
    },
    /// Single select; the first option is always the empty "unselected" entry.
    Select { options: Vec<ChoiceOption> },
    Checkbox { checked: bool },
    Toggle { on: bool },
    /// At most one option is selected: the one equal to the current value.
    RadioGroup { options: Vec<ChoiceOption> },
    /// Submit marker. Never bound to a value and never clickable outside a live form shell.
    Button { text: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Control {
    pub field_id: String,
    pub label: String,
    pub required: bool,
    pub disabled: bool,
    pub kind: ControlKind,
    pub style: Style,
}

/// One `Label: value` line of a report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DisplayRow {
    pub field_id: String,
    pub label: String,
    pub value: String,
}

impl fmt::Display for DisplayRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, self.value)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rendered {
    Control(Control),
    Display(DisplayRow),
    Omitted,
}

impl Rendered {
    pub fn into_control(self) -> Option<Control> {
        match self {
            Rendered::Control(c) => Some(c),
            _ => None,
        }
    }

    pub fn into_row(self) -> Option<DisplayRow> {
        match self {
            Rendered::Display(row) => Some(row),
            _ => None,
        }
    }
}

pub fn render(field: &FieldDefinition, value: Option<&FieldValue>, mode: RenderMode) -> Rendered {
    match mode {
        RenderMode::Editable => Rendered::Control(render_control(field, value, false)),
        RenderMode::ReadOnlyPreview => Rendered::Control(render_control(field, value, true)),
        RenderMode::ReportDisplay => match display_row(field, value) {
            Some(row) => Rendered::Display(row),
            None => Rendered::Omitted,
        },
    }
}

fn render_control(field: &FieldDefinition, value: Option<&FieldValue>, disabled: bool) -> Control {
    let text = value.map(ToString::to_string).unwrap_or_default();
    let placeholder = field.placeholder().map(str::to_owned);
    let input = |input_type| ControlKind::Input {
        input_type,
        value: text.clone(),
        placeholder: placeholder.clone(),
    };

    let (kind, disabled) = match &field.kind {
        FieldKind::Text { .. } | FieldKind::Unknown { .. } => (input(InputType::Text), disabled),
        FieldKind::Number { .. } => (input(InputType::Number), disabled),
        FieldKind::Email { .. } => (input(InputType::Email), disabled),
        FieldKind::Date => (input(InputType::Date), disabled),
        FieldKind::Textarea { .. } => (
            ControlKind::TextArea {
                value: text.clone(),
                placeholder: placeholder.clone(),
            },
            disabled,
        ),
        FieldKind::Dropdown { options } => {
            let unselected = ChoiceOption {
                value: String::new(),
                label: UNSELECTED_LABEL.to_owned(),
                selected: !options.contains(&text),
            };
            let mut choices = vec![unselected];
            choices.extend(choices_for(options, &text));
            (ControlKind::Select { options: choices }, disabled)
        }
        FieldKind::Radio { options } => (
            ControlKind::RadioGroup {
                options: choices_for(options, &text),
            },
            disabled,
        ),
        FieldKind::Checkbox => (
            ControlKind::Checkbox {
                checked: value.is_some_and(FieldValue::as_bool),
            },
            disabled,
        ),
        FieldKind::Toggle => (
            ControlKind::Toggle {
                on: value.is_some_and(FieldValue::as_bool),
            },
            disabled,
        ),
        FieldKind::Submit { button_text } => (
            ControlKind::Button {
                text: button_text.clone(),
            },
            true,
        ),
    };

    Control {
        field_id: field.id.clone(),
        label: field.label.clone(),
        required: field.required,
        disabled,
        kind,
        style: field.presentation.effective(),
    }
}

fn choices_for(options: &[String], current: &str) -> Vec<ChoiceOption> {
    options
        .iter()
        .map(|option| ChoiceOption {
            value: option.clone(),
            label: option.clone(),
            selected: option == current,
        })
        .collect()
}

/// A section of controls, as shown by the designer preview and the entry form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedSection {
    pub id: String,
    pub title: String,
    pub controls: Vec<Control>,
}

/// Renders every field of `sections` as controls. `mode` must not be
/// [`RenderMode::ReportDisplay`]; report rows are built by [`crate::report`].
pub fn render_sections(
    sections: &[Section],
    data: &FormData,
    mode: RenderMode,
) -> Vec<RenderedSection> {
    sections
        .iter()
        .map(|section| RenderedSection {
            id: section.id.clone(),
            title: section.title.clone(),
            controls: section
                .fields
                .iter()
                .filter_map(|f| render(f, data.get(&f.id), mode).into_control())
                .collect(),
        })
        .collect()
}

/// The report row for a field, or `None` when the field is omitted.
pub fn display_row(field: &FieldDefinition, value: Option<&FieldValue>) -> Option<DisplayRow> {
    if !field.is_bound() {
        return None;
    }
    let value = value.filter(|v| !v.is_blank())?;

    let shown = match field.kind {
        FieldKind::Checkbox => yes_no(value.as_bool()).to_owned(),
        _ => value.to_string(),
    };

    Some(DisplayRow {
        field_id: field.id.clone(),
        label: field.label.clone(),
        value: shown,
    })
}

fn yes_no(b: bool) -> &'static str {
    if b {
        "Yes"
    } else {
        "No"
    }
}

/// Row for a value with no field definition, labelled from its key.
pub fn unstructured_row(key: &str, value: &FieldValue) -> Option<DisplayRow> {
    if value.is_blank() {
        return None;
    }
    Some(DisplayRow {
        field_id: key.to_owned(),
        label: humanize_key(key),
        value: value.to_string(),
    })
}

/// `bloodPressure` -> `Blood Pressure`, `patientID` -> `Patient ID`.
///
/// Splits before every uppercase letter that follows a lowercase letter or digit, then
/// capitalises the first letter.
pub fn humanize_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    let mut prev: Option<char> = None;

    for c in key.chars() {
        if c.is_uppercase() && prev.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit()) {
            out.push(' ');
        }
        out.push(c);
        prev = Some(c);
    }

    let mut chars = out.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => out,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{FieldType, Presentation};

    fn field(id: &str, label: &str, field_type: FieldType) -> FieldDefinition {
        FieldDefinition::new(id, label, FieldKind::defaults_for(field_type))
    }

    #[test]
    fn test_report_display_is_idempotent() {
        let cases = [
            (field("weight", "Weight", FieldType::Text), FieldValue::from("70")),
            (field("consent", "Consent", FieldType::Checkbox), FieldValue::Bool(true)),
            (field("notes", "Notes", FieldType::Textarea), FieldValue::from("")),
            (field("go", "Go", FieldType::Submit), FieldValue::from("x")),
        ];

        for (f, v) in &cases {
            let first = render(f, Some(v), RenderMode::ReportDisplay);
            let second = render(f, Some(v), RenderMode::ReportDisplay);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_report_display_omits_blank_and_missing_values() {
        let height = field("height", "Height", FieldType::Text);
        assert_eq!(
            render(&height, Some(&FieldValue::from("")), RenderMode::ReportDisplay),
            Rendered::Omitted
        );
        assert_eq!(
            render(&height, Some(&FieldValue::from("   ")), RenderMode::ReportDisplay),
            Rendered::Omitted
        );
        assert_eq!(
            render(&height, None, RenderMode::ReportDisplay),
            Rendered::Omitted
        );

        let weight = field("weight", "Weight", FieldType::Text);
        let row = display_row(&weight, Some(&FieldValue::from("70"))).expect("should render");
        assert_eq!(row.to_string(), "Weight: 70");
    }

    #[test]
    fn test_report_display_checkbox_yes_no() {
        let consent = field("consent", "Consent", FieldType::Checkbox);
        let yes = display_row(&consent, Some(&FieldValue::Bool(true))).expect("should render");
        let no = display_row(&consent, Some(&FieldValue::Bool(false))).expect("should render");
        assert_eq!(yes.value, "Yes");
        assert_eq!(no.value, "No");

        let other = field("married", "Married", FieldType::Toggle);
        let raw = display_row(&other, Some(&FieldValue::Bool(true))).expect("should render");
        assert_eq!(raw.value, "true");
    }

    #[test]
    fn test_submit_is_never_a_report_row() {
        let submit = field("go", "Submit Button", FieldType::Submit);
        assert_eq!(
            render(&submit, Some(&FieldValue::from("Submit")), RenderMode::ReportDisplay),
            Rendered::Omitted
        );
    }

    #[test]
    fn test_editable_dropdown_has_leading_unselected_option() {
        let gender = FieldDefinition::new(
            "gender",
            "Gender",
            FieldKind::Dropdown {
                options: vec!["Male".into(), "Female".into()],
            },
        );

        let control = render(&gender, Some(&FieldValue::from("Female")), RenderMode::Editable)
            .into_control()
            .expect("should be a control");
        let ControlKind::Select { options } = control.kind else {
            panic!("expected a select control");
        };

        assert_eq!(options.len(), 3);
        assert_eq!(options[0].value, "");
        assert_eq!(options[0].label, UNSELECTED_LABEL);
        assert!(!options[0].selected);
        assert!(options[2].selected);
        assert!(!control.disabled);
    }

    #[test]
    fn test_radio_selects_matching_option_only() {
        let radio = FieldDefinition::new(
            "type",
            "Type of Infertility",
            FieldKind::Radio {
                options: vec!["Primary".into(), "Secondary".into()],
            },
        );

        let control = render(&radio, Some(&FieldValue::from("Tertiary")), RenderMode::Editable)
            .into_control()
            .expect("should be a control");
        let ControlKind::RadioGroup { options } = control.kind else {
            panic!("expected a radio group");
        };
        assert!(options.iter().all(|o| !o.selected));
    }

    #[test]
    fn test_missing_options_and_unknown_kind_do_not_fail() {
        let empty = FieldDefinition::new("x", "X", FieldKind::Dropdown { options: vec![] });
        let control = render(&empty, None, RenderMode::Editable)
            .into_control()
            .expect("should be a control");
        assert!(matches!(control.kind, ControlKind::Select { ref options } if options.len() == 1));

        let unknown = FieldDefinition::new(
            "sig",
            "Signature",
            FieldKind::Unknown {
                type_name: "signature".into(),
                extra: serde_json::Map::new(),
            },
        );
        let control = render(&unknown, Some(&FieldValue::from("JS")), RenderMode::Editable)
            .into_control()
            .expect("should be a control");
        assert_eq!(
            control.kind,
            ControlKind::Input {
                input_type: InputType::Text,
                value: "JS".into(),
                placeholder: None
            }
        );
    }

    #[test]
    fn test_preview_disables_controls_and_submit_is_always_disabled() {
        let mut submit = field("go", "Submit Button", FieldType::Submit);
        submit.presentation = Presentation::submit_accent();

        let editable = render(&submit, None, RenderMode::Editable)
            .into_control()
            .expect("should be a control");
        assert!(editable.disabled);
        assert_eq!(editable.style.background_color, "#007bff");
        assert_eq!(
            editable.kind,
            ControlKind::Button {
                text: "Submit".into()
            }
        );

        let text = field("name", "Name", FieldType::Text);
        let preview = render(&text, None, RenderMode::ReadOnlyPreview)
            .into_control()
            .expect("should be a control");
        assert!(preview.disabled);
    }

    #[test]
    fn test_checkbox_control_binds_boolean() {
        let consent = field("consent", "Consent", FieldType::Checkbox);
        let control = render(&consent, Some(&FieldValue::Bool(true)), RenderMode::Editable)
            .into_control()
            .expect("should be a control");
        assert_eq!(control.kind, ControlKind::Checkbox { checked: true });

        let unset = render(&consent, Some(&FieldValue::empty()), RenderMode::Editable)
            .into_control()
            .expect("should be a control");
        assert_eq!(unset.kind, ControlKind::Checkbox { checked: false });
    }

    #[test]
    fn test_humanize_key() {
        assert_eq!(humanize_key("bloodPressure"), "Blood Pressure");
        assert_eq!(humanize_key("weight"), "Weight");
        assert_eq!(humanize_key("patientID"), "Patient ID");
        assert_eq!(humanize_key("noOfEggsEmbryos"), "No Of Eggs Embryos");
        assert_eq!(humanize_key(""), "");
    }
}
