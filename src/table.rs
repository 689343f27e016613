//! Plain-text table rendering for the `preview` command.

use std::fmt::Write as _;

use crate::{io_utils, model::LongRecord};

pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let column_count = headers.len();
    let mut widths = headers.iter().map(|h| h.chars().count()).collect::<Vec<_>>();
    for row in rows {
        for (idx, cell) in row.iter().enumerate().take(column_count) {
            widths[idx] = widths[idx].max(cell.chars().count());
        }
    }
    for width in &mut widths {
        *width = (*width).max(3);
    }

    let mut output = String::new();
    let _ = writeln!(output, "{}", format_row(headers, &widths));
    let separator = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>();
    let _ = writeln!(output, "{}", format_row(&separator, &widths));
    for row in rows {
        let _ = writeln!(output, "{}", format_row(row, &widths));
    }
    output
}

pub fn print_table(headers: &[String], rows: &[Vec<String>]) {
    print!("{}", render_table(headers, rows));
}

/// Renders the first `limit` rows of a processed long table.
pub fn render_preview(rows: &[LongRecord], limit: usize) -> String {
    let headers = io_utils::LONG_TABLE_HEADERS
        .iter()
        .map(|h| h.to_string())
        .collect::<Vec<_>>();
    let cells = rows
        .iter()
        .take(limit)
        .map(io_utils::long_record_cells)
        .collect::<Vec<_>>();
    render_table(&headers, &cells)
}

fn format_row(values: &[String], widths: &[usize]) -> String {
    let mut cells = Vec::with_capacity(values.len());
    for (idx, width) in widths.iter().copied().enumerate() {
        let value = values.get(idx).map(|v| v.as_str()).unwrap_or("");
        cells.push(format!("{value:<width$}"));
    }
    cells.join("  ").trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Year;

    #[test]
    fn render_table_aligns_columns() {
        let headers = vec!["col".to_string(), "value".to_string()];
        let rows = vec![
            vec!["a".to_string(), "1".to_string()],
            vec!["longer".to_string(), "2".to_string()],
        ];
        let rendered = render_table(&headers, &rows);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("col"));
        assert!(lines[1].starts_with("---"));
        assert!(lines[2].starts_with("a     "));
    }

    #[test]
    fn render_preview_honors_limit() {
        let rows: Vec<LongRecord> = Year::all()
            .map(|year| LongRecord::new("Freedonia", "FRD", year, Some(10.0)))
            .collect();
        let rendered = render_preview(&rows, 5);
        // Header, separator, five data rows.
        assert_eq!(rendered.lines().count(), 7);
    }
}
