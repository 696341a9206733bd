//! SOQL rendering for [`RecordQuery`] values.

use crate::sync::ports::RecordQuery;

/// Renders `SELECT <fields> FROM <object> WHERE <field> = '<value>'`.
pub(super) fn render(query: &RecordQuery) -> String {
    format!(
        "SELECT {} FROM {} WHERE {} = '{}'",
        query.fields().join(", "),
        query.object().as_str(),
        query.filter_field(),
        escape_literal(query.filter_value())
    )
}

/// Escapes a value for use inside a single-quoted SOQL string literal.
fn escape_literal(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '\'' => escaped.push_str("\\'"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            other => escaped.push(other),
        }
    }
    escaped
}
