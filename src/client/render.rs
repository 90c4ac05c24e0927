//! Set list rendering
//!
//! HTML for the browser page and an aligned text table for terminals.
//! Both emit the fixed header followed by one row per record, in order.

use std::fmt::Write;

use crate::sets::SetRecord;

/// Table header, in column order
pub const COLUMNS: [&str; 3] = ["Movement", "Volume", "Intensity"];

/// Heading shown above the table
pub const HEADING: &str = "All Sets";

/// Heading plus the set table
pub fn set_list_html(records: &[SetRecord]) -> String {
    let mut html = String::new();
    html.push_str("<div>\n");
    let _ = writeln!(
        html,
        "  <h1 style=\"margin-bottom: 40px\">{}</h1>",
        HEADING
    );
    html.push_str(&set_table_html(records));
    html.push_str("</div>\n");
    html
}

/// Just the `<table>` element
pub fn set_table_html(records: &[SetRecord]) -> String {
    let mut html = String::new();
    html.push_str("  <table class=\"table\">\n    <thead>\n      <tr>");
    for column in COLUMNS {
        let _ = write!(html, "<th>{}</th>", column);
    }
    html.push_str("</tr>\n    </thead>\n    <tbody>\n");

    // Index is a display key only
    for (key, record) in records.iter().enumerate() {
        let _ = write!(html, "      <tr data-key=\"{}\">", key);
        for cell in record.cells() {
            let _ = write!(html, "<td>{}</td>", escape_html(&cell));
        }
        html.push_str("</tr>\n");
    }

    html.push_str("    </tbody>\n  </table>\n");
    html
}

/// Static navigation bar
pub fn nav_html() -> String {
    r##"<nav class="navbar navbar-expand-lg navbar-light bg-light">
  <div class="container">
    <a class="navbar-brand" href="#home">Sets</a>
    <div class="navbar-collapse" id="basic-navbar-nav">
      <div class="navbar-nav me-auto">
        <a class="nav-link" href="#home">Home</a>
        <a class="nav-link" href="#link">Link</a>
      </div>
    </div>
  </div>
</nav>
"##
    .to_string()
}

/// Full document: navigation shell wrapped around `body`
pub fn page_html(body: &str) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str("<title>Sets</title>\n");
    html.push_str("<link rel=\"stylesheet\" href=\"https://cdn.jsdelivr.net/npm/bootstrap@5.1.3/dist/css/bootstrap.min.css\">\n");
    html.push_str("</head>\n<body>\n<div class=\"App\">\n");
    html.push_str(&nav_html());
    html.push_str(body);
    html.push_str("</div>\n</body>\n</html>\n");
    html
}

/// Column-aligned text table
pub fn set_table_text(records: &[SetRecord]) -> String {
    let rows: Vec<[String; 3]> = records.iter().map(SetRecord::cells).collect();

    let mut widths = COLUMNS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_text_row(&mut out, &COLUMNS.map(String::from), &widths);
    let total = widths.iter().sum::<usize>() + 3 * (widths.len() - 1);
    let _ = writeln!(out, "{}", "-".repeat(total));
    for row in &rows {
        push_text_row(&mut out, row, &widths);
    }
    out
}

fn push_text_row(out: &mut String, cells: &[String; 3], widths: &[usize; 3]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = width))
        .collect::<Vec<_>>()
        .join(" | ");
    let _ = writeln!(out, "{}", line.trim_end());
}

/// Escape text for use inside an element
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sets::Cell;

    /// Cell text of every `<tbody>` row
    fn body_rows(html: &str) -> Vec<Vec<String>> {
        let start = html.find("<tbody>").expect("tbody present") + "<tbody>".len();
        let end = html.find("</tbody>").expect("tbody closed");

        html[start..end]
            .split("</tr>")
            .filter(|chunk| chunk.contains("<tr"))
            .map(|row| {
                row.split("<td>")
                    .skip(1)
                    .map(|cell| cell.trim_end_matches("</td>").to_string())
                    .collect()
            })
            .collect()
    }

    fn parse(json: &str) -> Vec<SetRecord> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_header_always_present() {
        let html = set_list_html(&[]);
        assert!(html.contains("<th>Movement</th><th>Volume</th><th>Intensity</th>"));
        assert!(html.contains("All Sets"));
    }

    #[test]
    fn test_empty_response_has_no_rows() {
        assert!(body_rows(&set_table_html(&parse("[]"))).is_empty());
    }

    #[test]
    fn test_single_record() {
        let records = parse(r#"[{"movement":"Squat","volume":5,"intensity":80}]"#);
        assert_eq!(
            body_rows(&set_table_html(&records)),
            vec![vec!["Squat", "5", "80"]]
        );
    }

    #[test]
    fn test_rows_follow_response_order() {
        let records = parse(
            r#"[
                {"movement":"Deadlift","volume":3,"intensity":85},
                {"movement":"Bench","volume":8,"intensity":70.5},
                {"movement":"Squat","volume":5,"intensity":80}
            ]"#,
        );

        let rows = body_rows(&set_table_html(&records));
        assert_eq!(rows.len(), 3);
        let movements: Vec<&str> = rows.iter().map(|r| r[0].as_str()).collect();
        assert_eq!(movements, ["Deadlift", "Bench", "Squat"]);
        assert_eq!(rows[1][2], "70.5");
    }

    #[test]
    fn test_missing_field_renders_blank_cell() {
        let records = parse(r#"[{"movement":"Squat","volume":5}]"#);
        assert_eq!(
            body_rows(&set_table_html(&records)),
            vec![vec!["Squat", "5", ""]]
        );
    }

    #[test]
    fn test_movement_is_escaped() {
        let records = vec![SetRecord {
            movement: Some(Cell::from("<b>Squat</b> & co")),
            ..Default::default()
        }];
        let html = set_table_html(&records);
        assert!(html.contains("&lt;b&gt;Squat&lt;/b&gt; &amp; co"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn test_page_wraps_nav() {
        let page = page_html(&set_list_html(&[]));
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains(">Sets</a>"));
        assert!(page.contains(">Home</a>"));
        assert!(page.contains(">Link</a>"));
        assert!(page.find("<nav").unwrap() < page.find("<table").unwrap());
    }

    #[test]
    fn test_text_table() {
        let records = vec![
            SetRecord::new("Squat", 5.0, 80.0),
            SetRecord::new("Romanian Deadlift", 8.0, 60.0),
        ];
        let text = set_table_text(&records);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Movement          | Volume | Intensity"));
        assert!(lines[1].chars().all(|c| c == '-'));
        assert_eq!(lines[2], "Squat             | 5      | 80");
        assert_eq!(lines[3], "Romanian Deadlift | 8      | 60");
    }

    #[test]
    fn test_text_table_empty() {
        let text = set_table_text(&[]);
        assert_eq!(text.lines().count(), 2);
    }
}
