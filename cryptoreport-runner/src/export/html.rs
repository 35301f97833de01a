//! Styled HTML report (askama template `templates/report.html`).

use askama::Template;
use cryptoreport_core::{ReportError, ReportRow};

use super::REPORT_TITLE;

#[derive(Template)]
#[template(path = "report.html")]
struct ReportTemplate<'a> {
    title: &'a str,
    generated: &'a str,
    columns: &'a [&'a str],
    rows: Vec<Vec<String>>,
}

/// Render the report page. Cell text is HTML-escaped by the template.
pub fn render_html(rows: &[ReportRow], generated: &str) -> Result<String, ReportError> {
    ReportTemplate {
        title: REPORT_TITLE,
        generated,
        columns: &ReportRow::COLUMNS,
        rows: rows.iter().map(ReportRow::cells).collect(),
    }
    .render()
    .map_err(|e| ReportError::render("HTML", e))
}
