//! Report views: showing a saved record with the best template still available.
//!
//! A record stores only values keyed by field id plus a snapshot of its template's id and name.
//! The template may since have changed or been deleted, so [`resolve_template`] picks the
//! structure to show the record with, strictly in this order:
//!
//! 1. **Exact**: the record's `templateId` is set and still in the store.
//! 2. **Heuristic**: the first template, in store order, sharing field ids with more than half
//!    of the record's keys ([`heuristic_match`]).
//! 3. **Unstructured**: no template; every non-blank value is listed under a label derived from
//!    its key.

use crate::field::FormData;
use crate::render::{display_row, unstructured_row, DisplayRow};
use crate::repositories::records::Record;
use crate::repositories::templates::TemplateStore;
use crate::template::TemplateDocument;
use chrono::{DateTime, Utc};
use clinform_types::is_blank;
use serde::Serialize;
use std::fmt::Write;

/// Title used when neither the record nor a resolved template carries a name.
pub const FALLBACK_REPORT_TITLE: &str = "Report";

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Resolution<'a> {
    Exact(&'a TemplateDocument),
    Heuristic {
        template: &'a TemplateDocument,
        matches: usize,
    },
    Unstructured,
}

impl<'a> Resolution<'a> {
    pub fn template(&self) -> Option<&'a TemplateDocument> {
        match *self {
            Resolution::Exact(t) | Resolution::Heuristic { template: t, .. } => Some(t),
            Resolution::Unstructured => None,
        }
    }

    pub fn source(&self) -> ReportSource {
        match self {
            Resolution::Exact(_) => ReportSource::Exact,
            Resolution::Heuristic { .. } => ReportSource::Heuristic,
            Resolution::Unstructured => ReportSource::Unstructured,
        }
    }
}

pub fn resolve_template<'a, T>(record: &Record, store: &'a T) -> Resolution<'a>
where
    T: TemplateStore + ?Sized,
{
    if let Some(id) = record.template_id.as_deref() {
        if let Ok(template) = store.get(id) {
            return Resolution::Exact(template);
        }
        tracing::debug!(
            "template {} of record {} is gone, falling back to field matching",
            id,
            record.id
        );
    }

    match heuristic_match(&record.form_data, store.list()) {
        Some((template, matches)) => Resolution::Heuristic { template, matches },
        None => Resolution::Unstructured,
    }
}

/// The first template in `templates` whose field ids cover strictly more than half of the
/// record's keys, with the number of shared ids.
///
/// With `n` record keys and `m` shared ids the test is `2 * m > n`, so `{a,b,c,d}` is not
/// matched by a template holding `{a,b}` but is matched by one holding `{a,b,c}`.
pub fn heuristic_match<'a>(
    form_data: &FormData,
    templates: &'a [TemplateDocument],
) -> Option<(&'a TemplateDocument, usize)> {
    let n = form_data.len();
    templates.iter().find_map(|template| {
        let field_ids = template.field_ids();
        let matches = form_data
            .keys()
            .filter(|k| field_ids.contains(k.as_str()))
            .count();
        (2 * matches > n).then_some((template, matches))
    })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportSource {
    Exact,
    Heuristic,
    Unstructured,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReportSection {
    /// Empty for the single section of an unstructured report.
    pub title: String,
    pub rows: Vec<DisplayRow>,
}

/// A record laid out for reading or printing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportView {
    pub record_id: String,
    pub title: String,
    pub patient_id: String,
    pub patient_name: String,
    pub date: String,
    pub created_at: DateTime<Utc>,
    pub source: ReportSource,
    pub template_id: Option<String>,
    pub sections: Vec<ReportSection>,
}

impl ReportView {
    /// Resolves the template for `record` against `store` and lays the record out with it.
    pub fn for_record<T: TemplateStore + ?Sized>(record: &Record, store: &T) -> Self {
        Self::build(record, resolve_template(record, store))
    }

    pub fn build(record: &Record, resolution: Resolution<'_>) -> Self {
        let sections = match resolution.template() {
            Some(template) => structured_sections(record, template),
            None => unstructured_sections(record),
        };

        let title = [
            Some(record.template_name.as_str()),
            resolution.template().map(|t| t.name.as_str()),
        ]
        .into_iter()
        .flatten()
        .find(|name| !is_blank(name))
        .unwrap_or(FALLBACK_REPORT_TITLE)
        .to_owned();

        Self {
            record_id: record.id.clone(),
            title,
            patient_id: record.patient_id.clone(),
            patient_name: record.patient_name.clone(),
            date: record.date.clone(),
            created_at: record.created_at,
            source: resolution.source(),
            template_id: resolution.template().map(|t| t.id.clone()),
            sections,
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = &DisplayRow> {
        self.sections.iter().flat_map(|s| s.rows.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.rows().next().is_none()
    }

    /// Plain-text rendition, one `Label: value` line per row.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.title);
        let _ = writeln!(out, "Patient: {} ({})", self.patient_name, self.patient_id);
        let _ = writeln!(out, "Date: {}", self.date);
        let _ = writeln!(out, "Report ID: {}", self.record_id);

        for section in &self.sections {
            out.push('\n');
            if !section.title.is_empty() {
                let _ = writeln!(out, "== {} ==", section.title);
            }
            for row in &section.rows {
                let _ = writeln!(out, "{row}");
            }
        }

        if self.is_empty() {
            out.push_str("\nNo data recorded.\n");
        }
        out
    }
}

fn structured_sections(record: &Record, template: &TemplateDocument) -> Vec<ReportSection> {
    template
        .sections
        .iter()
        .filter_map(|section| {
            let rows: Vec<DisplayRow> = section
                .fields
                .iter()
                .filter_map(|f| display_row(f, record.form_data.get(&f.id)))
                .collect();
            (!rows.is_empty()).then(|| ReportSection {
                title: section.title.clone(),
                rows,
            })
        })
        .collect()
}

fn unstructured_sections(record: &Record) -> Vec<ReportSection> {
    let rows: Vec<DisplayRow> = record
        .form_data
        .iter()
        .filter_map(|(key, value)| unstructured_row(key, value))
        .collect();

    if rows.is_empty() {
        Vec::new()
    } else {
        vec![ReportSection {
            title: String::new(),
            rows,
        }]
    }
}
