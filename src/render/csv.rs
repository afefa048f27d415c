//! CSV preview.
//!
//! Lines are split with a deliberately small quote-aware splitter rather than
//! a full RFC 4180 parser: a `"` toggles quoted mode, commas outside quotes
//! separate cells, and quote characters themselves are dropped. Quoted fields
//! spanning several lines are not reassembled.

use super::{Rendered, data_table, preview_header};
use crate::types::PreviewFile;
use maud::html;

/// Rows shown in the preview table, header row included.
pub const MAX_PREVIEW_ROWS: usize = 100;

/// Split one CSV line into trimmed cells.
///
/// An unbalanced quote leaves the splitter in quoted mode, so the rest of the
/// line becomes part of the current cell.
///
/// ```
/// # use file_preview::render::csv::split_line;
/// assert_eq!(split_line(r#"a, "b,c" ,d"#), vec!["a", "b,c", "d"]);
/// assert_eq!(split_line(r#""x,y"#), vec!["x,y"]);
/// ```
pub fn split_line(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                cells.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    cells.push(current.trim().to_string());
    cells
}

/// Render the first [`MAX_PREVIEW_ROWS`] non-blank lines as a table.
pub fn render_csv(file: &PreviewFile) -> Rendered {
    let text = String::from_utf8_lossy(file.bytes());
    let lines: Vec<&str> = text.split('\n').filter(|l| !l.trim().is_empty()).collect();
    let total = lines.len();
    let rows: Vec<Vec<String>> = lines
        .iter()
        .take(MAX_PREVIEW_ROWS)
        .map(|l| split_line(l))
        .collect();
    let summary = format!("Showing {} of {} rows", rows.len(), total);

    Rendered::new(html! {
        div.csv-preview {
            (preview_header("📊 CSV Data", &[summary]))
            (data_table(&rows))
        }
    })
}
