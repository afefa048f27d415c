//! Spreadsheet preview (xls and xlsx, via calamine).

use super::{RenderError, Rendered, data_table, preview_header};
use crate::types::PreviewFile;
use calamine::{Reader, open_workbook_auto_from_rs};
use maud::html;
use std::io::Cursor;

/// Rows shown from the selected sheet, header row included.
pub const MAX_PREVIEW_ROWS: usize = 50;

/// Render the first sheet.
pub fn render_spreadsheet(file: &PreviewFile) -> Result<Rendered, RenderError> {
    render_sheet(file, None)
}

/// Render the sheet called `sheet`, or the first sheet when `None`.
pub fn render_sheet(file: &PreviewFile, sheet: Option<&str>) -> Result<Rendered, RenderError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(file.bytes().to_vec()))?;
    let sheet_names = workbook.sheet_names();
    let selected = match sheet {
        Some(name) => sheet_names
            .iter()
            .find(|n| n.as_str() == name)
            .cloned()
            .ok_or_else(|| RenderError::SheetNotFound(name.to_string()))?,
        None => sheet_names
            .first()
            .cloned()
            .ok_or_else(|| RenderError::Custom("Workbook contains no sheets".to_string()))?,
    };

    let range = workbook.worksheet_range(&selected)?;
    let total = range.height();
    let rows: Vec<Vec<String>> = range
        .rows()
        .take(MAX_PREVIEW_ROWS)
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect();
    let meta = [
        format!("Sheet: {selected}"),
        format!("{} sheets total", sheet_names.len()),
        format!("Showing {} of {} rows", rows.len(), total),
    ];

    let markup = html! {
        div.excel-preview {
            (preview_header("📗 Excel Workbook", &meta))
            @if sheet_names.len() > 1 {
                div.sheet-tabs {
                    @for name in &sheet_names {
                        button.sheet-tab.active[*name == selected] data-sheet=(name) { (name) }
                    }
                }
            }
            (data_table(&rows))
        }
    };

    Ok(Rendered {
        sheet_names: Some(sheet_names),
        ..Rendered::new(markup)
    })
}
