//! Printable HTML output for report views.
//!
//! The document is rendered from the same [`ReportView`] the text output uses, so it has the
//! same section order and the same omitted rows. Values are HTML-escaped.

use crate::error::FormResult;
use crate::report::ReportView;
use chrono::{DateTime, Utc};
use minijinja::{context, Environment};

const REPORT_TEMPLATE_NAME: &str = "report.html";

const REPORT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>{{ report.title }} - {{ report.patientName }}</title>
    <style>
        body { font-family: Arial, sans-serif; margin: 2em; color: #222; }
        header { border-bottom: 2px solid #007bff; margin-bottom: 1.5em; }
        h1 { color: #007bff; margin-bottom: 0.2em; }
        .patient-info span { margin-right: 2em; }
        section { margin-bottom: 1.5em; page-break-inside: avoid; }
        h2 { font-size: 1.1em; border-bottom: 1px solid #ddd; padding-bottom: 0.2em; }
        .row { margin: 0.3em 0; }
        .label { font-weight: bold; }
        footer { margin-top: 2em; font-size: 0.8em; color: #666; border-top: 1px solid #ddd; }
    </style>
</head>
<body>
    <header>
        <h1>{{ report.title }}</h1>
        <div class="patient-info">
            <span><span class="label">Patient:</span> {{ report.patientName }}</span>
            <span><span class="label">Patient ID:</span> {{ report.patientId }}</span>
            <span><span class="label">Date:</span> {{ report.date }}</span>
        </div>
    </header>
{%- for section in report.sections %}
    <section>
        {%- if section.title %}
        <h2>{{ section.title }}</h2>
        {%- endif %}
        {%- for row in section.rows %}
        <div class="row"><span class="label">{{ row.label }}:</span> {{ row.value }}</div>
        {%- endfor %}
    </section>
{%- else %}
    <p>No data recorded.</p>
{%- endfor %}
    <footer>
        <p>Generated on {{ generated_at }}</p>
        <p>Report ID: {{ report.recordId }} | Patient ID: {{ report.patientId }}</p>
    </footer>
</body>
</html>
"#;

/// Renders `view` as a standalone HTML document.
pub fn render_html(view: &ReportView, generated_at: DateTime<Utc>) -> FormResult<String> {
    let mut env = Environment::new();
    env.add_template(REPORT_TEMPLATE_NAME, REPORT_TEMPLATE)?;

    let template = env.get_template(REPORT_TEMPLATE_NAME)?;
    let html = template.render(context! {
        report => view,
        generated_at => generated_at.format("%Y-%m-%d %H:%M UTC").to_string(),
    })?;

    tracing::debug!("rendered printable report {}", view.record_id);
    Ok(html)
}
