//! Rendering of comma-separated rows into an HTML table.
//!
//! The first non-empty row supplies the header cells; every later row
//! becomes a body row. Rows are not reconciled against each other, so short
//! and long rows render exactly as written.

/// Field delimiter within a row.
pub const FIELD_DELIMITER: char = ',';

/// Split a row into trimmed fields.
///
/// # Examples
///
/// ```
/// use markrite::table::split_fields;
///
/// assert_eq!(split_fields(" a , b,c "), vec!["a", "b", "c"]);
/// ```
#[must_use]
pub fn split_fields(row: &str) -> Vec<&str> {
    row.split(FIELD_DELIMITER).map(str::trim).collect()
}

fn push_row(out: &mut String, cell: &str, fields: &[&str]) {
    out.push_str("<tr>");
    for field in fields {
        out.push('<');
        out.push_str(cell);
        out.push('>');
        out.push_str(&html_escape::encode_text(field));
        out.push_str("</");
        out.push_str(cell);
        out.push('>');
    }
    out.push_str("</tr>");
}

/// Render delimited rows as a table fragment.
///
/// Field text is escaped as plain text and never interpreted as markup.
///
/// # Examples
///
/// ```
/// use markrite::render_table;
///
/// let html = render_table("a,b\n1,2");
/// assert_eq!(
///     html,
///     "<table><thead><tr><th>a</th><th>b</th></tr></thead>\
///      <tbody><tr><td>1</td><td>2</td></tr></tbody></table>"
/// );
/// ```
#[must_use]
pub fn render_table(raw_rows: &str) -> String {
    let mut rows = raw_rows
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(split_fields);
    let Some(header) = rows.next() else {
        return "<table></table>".to_string();
    };

    let mut out = String::from("<table><thead>");
    push_row(&mut out, "th", &header);
    out.push_str("</thead><tbody>");
    for row in rows {
        push_row(&mut out, "td", &row);
    }
    out.push_str("</tbody></table>");
    out
}
