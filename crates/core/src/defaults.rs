//! Built-in field sets: the demographics form used when data entry runs without a template, and
//! the fertility form the designer starts from when there is no current draft.

use crate::field::{FieldDefinition, FieldKind};
use crate::template::Section;

pub const DEFAULT_SECTION_ID: &str = "demographics";

/// Name given to a designer draft started from [`default_fertility_sections`].
pub const FERTILITY_TEMPLATE_NAME: &str = "Fertility Form Template";

/// The minimal demographics form: name, id, gender, age, occupation, referred by.
pub fn default_entry_sections() -> Vec<Section> {
    vec![Section::new(DEFAULT_SECTION_ID, "Patient Demographics").with_fields(vec![
        text("patientName", "Patient Name").required(true),
        text("patientId", "Patient ID").required(true),
        dropdown("gender", "Gender", &["Male", "Female", "Other"]).required(true),
        number("age", "Age").required(true),
        text("occupation", "Occupation"),
        text("referredBy", "Referred By"),
    ])]
}

fn text(id: &str, label: &str) -> FieldDefinition {
    FieldDefinition::new(id, label, FieldKind::Text { placeholder: None })
}

fn text_with_unit(id: &str, label: &str, unit: &str) -> FieldDefinition {
    FieldDefinition::new(
        id,
        label,
        FieldKind::Text {
            placeholder: Some(unit.to_owned()),
        },
    )
}

fn number(id: &str, label: &str) -> FieldDefinition {
    FieldDefinition::new(id, label, FieldKind::Number { placeholder: None })
}

fn textarea(id: &str, label: &str) -> FieldDefinition {
    FieldDefinition::new(id, label, FieldKind::Textarea { placeholder: None })
}

fn dropdown(id: &str, label: &str, options: &[&str]) -> FieldDefinition {
    FieldDefinition::new(
        id,
        label,
        FieldKind::Dropdown {
            options: options.iter().map(|o| o.to_string()).collect(),
        },
    )
}

/// Height, weight, BMI, blood pressure and pulse rate under the given ids.
fn measurements(ids: [&str; 5]) -> Vec<FieldDefinition> {
    let [height, weight, bmi, blood_pressure, pulse_rate] = ids;
    vec![
        text_with_unit(height, "Height", "cm"),
        text_with_unit(weight, "Weight", "kg"),
        text(bmi, "BMI"),
        text_with_unit(blood_pressure, "Blood Pressure", "120/80"),
        text_with_unit(pulse_rate, "Pulse Rate", "bpm"),
    ]
}

/// The six-section fertility intake form.
pub fn default_fertility_sections() -> Vec<Section> {
    let no_yes = ["No", "Yes"];

    let mut female = measurements(["height", "weight", "bmi", "bloodPressure", "pulseRate"]);
    female.push(number("marriedYears", "Married Years"));
    female.push(number("subfertilityYears", "Subfertility Years"));

    let mut male = measurements([
        "maleHeight",
        "maleWeight",
        "maleBmi",
        "maleBloodPressure",
        "malePulseRate",
    ]);
    male.extend([
        dropdown("sexualDysfunction", "Sexual Dysfunction", &no_yes),
        dropdown("erectileProblem", "Erectile Problem", &no_yes),
        dropdown("ejaculateProblem", "Ejaculate Problem", &no_yes),
        textarea("others", "Others"),
    ]);

    let mut sections = default_entry_sections();
    sections.extend([
        Section::new("femaleGeneral", "Female Information - General Measurements")
            .with_fields(female),
        Section::new("menstrualHistory", "Menstrual History (H/O)").with_fields(vec![
            FieldDefinition::new("lmp", "Last Menstrual Period (LMP)", FieldKind::Date),
            text_with_unit("cycleLength", "Cycle Length", "days"),
            text("cyclesPattern", "Cycles Pattern"),
            dropdown(
                "painInPeriods",
                "Pain in Periods",
                &["No", "Mild", "Moderate", "Severe"],
            ),
            dropdown("needWithdrawal", "Need Withdrawal", &no_yes),
        ]),
        Section::new("obstetricHistory", "Obstetric History").with_fields(vec![
            number("gravida", "Gravida (G)"),
            number("para", "Para"),
            number("abortions", "Abortions (A)"),
            number("livingChild", "Living Child"),
            number("ectopic", "Ectopic"),
        ]),
        Section::new("fertilityHistory", "Fertility History").with_fields(vec![
            dropdown(
                "typeOfInfertility",
                "Type of Infertility",
                &["Primary", "Secondary"],
            ),
            number("durationYears", "Duration (Years)"),
            number("durationMonths", "Duration (Months)"),
            textarea("chiefComplaints", "Chief Complaints"),
        ]),
        Section::new("maleInfo", "Male Information").with_fields(male),
    ]);
    sections
}
