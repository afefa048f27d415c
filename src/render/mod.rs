//! Per-type renderers.
//!
//! Every renderer turns a [`PreviewFile`] into a [`Rendered`] fragment: the
//! markup plus whatever extra metadata the format can report (page count,
//! sheet names, dimensions). Markup is built with maud, so every interpolated
//! value is escaped, including filenames and numbers.
//!
//! | Type | Module | Library |
//! |---|---|---|
//! | pdf | [`pdf`] | `lopdf` |
//! | xls, xlsx | [`spreadsheet`] | `calamine` |
//! | docx, doc | [`docx`] | `zip` + `quick-xml` |
//! | csv | [`csv`] | hand-rolled line splitter |
//! | txt, json, html, xml | [`text`] | |
//! | image | [`image`] | `image` via [`ImageBackend`](crate::imaging::ImageBackend) |

pub mod csv;
pub mod docx;
pub mod image;
pub mod pdf;
pub mod spreadsheet;
pub mod text;

use crate::types::{Dimensions, FileMetadata, PreviewFile};
use maud::{Markup, html};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to render PDF: {0}")]
    Pdf(String),
    #[error("PDF rendering timeout")]
    Timeout,
    #[error("Failed to read spreadsheet: {0}")]
    Spreadsheet(#[from] calamine::Error),
    #[error("Sheet '{0}' not found")]
    SheetNotFound(String),
    #[error("Failed to process DOCX file: {0}")]
    Docx(String),
    #[error("{0}")]
    Custom(String),
}

/// A caller-supplied rendering routine for one file type.
///
/// Closures of the right shape implement this automatically:
///
/// ```
/// # use file_preview::render::{RenderError, Renderer};
/// # use file_preview::types::PreviewFile;
/// fn takes(_: impl Renderer) {}
/// takes(|file: &PreviewFile| -> Result<String, RenderError> {
///     Ok(format!("<p>{} bytes</p>", file.size))
/// });
/// ```
pub trait Renderer: Send + Sync {
    fn render(&self, file: &PreviewFile) -> Result<String, RenderError>;
}

impl<F> Renderer for F
where
    F: Fn(&PreviewFile) -> Result<String, RenderError> + Send + Sync,
{
    fn render(&self, file: &PreviewFile) -> Result<String, RenderError> {
        self(file)
    }
}

/// Output of a built-in renderer.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub markup: Markup,
    pub page_count: Option<usize>,
    pub sheet_names: Option<Vec<String>>,
    pub dimensions: Option<Dimensions>,
    pub display_dimensions: Option<Dimensions>,
}

impl Rendered {
    pub fn new(markup: Markup) -> Self {
        Self {
            markup,
            page_count: None,
            sheet_names: None,
            dimensions: None,
            display_dimensions: None,
        }
    }

    /// Copy the format-specific fields onto `metadata`, returning the markup.
    pub fn apply(self, metadata: &mut FileMetadata) -> String {
        if self.page_count.is_some() {
            metadata.page_count = self.page_count;
        }
        if self.sheet_names.is_some() {
            metadata.sheet_names = self.sheet_names;
        }
        if self.dimensions.is_some() {
            metadata.dimensions = self.dimensions;
        }
        if self.display_dimensions.is_some() {
            metadata.display_dimensions = self.display_dimensions;
        }
        self.markup.into_string()
    }
}

/// `"1.50 MB"`
pub fn format_mb(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / 1024.0 / 1024.0)
}

/// `"12.3 KB"`
pub fn format_kb(bytes: u64) -> String {
    format!("{:.1} KB", bytes as f64 / 1024.0)
}

/// Title bar shared by every preview.
pub(crate) fn preview_header(title: &str, meta: &[String]) -> Markup {
    html! {
        div.preview-header {
            h3 { (title) }
            div.file-meta {
                @for item in meta {
                    span { (item) }
                }
            }
        }
    }
}

/// First row becomes the header, the rest the body.
pub(crate) fn data_table(rows: &[Vec<String>]) -> Markup {
    html! {
        div.table-container {
            table.data-table {
                thead {
                    tr {
                        @if let Some(head) = rows.first() {
                            @for cell in head {
                                th { (cell) }
                            }
                        }
                    }
                }
                tbody {
                    @for row in rows.iter().skip(1) {
                        tr {
                            @for cell in row {
                                td { (cell) }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::file_with;

    #[test]
    fn size_formatting() {
        assert_eq!(format_mb(1_572_864), "1.50 MB");
        assert_eq!(format_kb(12_595), "12.3 KB");
        assert_eq!(format_kb(0), "0.0 KB");
    }

    #[test]
    fn header_escapes_meta() {
        let html = preview_header("Title", &["<b>x</b>".to_string()]).into_string();
        assert!(html.contains("preview-header"));
        assert!(html.contains("&lt;b&gt;x&lt;/b&gt;"));
    }

    #[test]
    fn data_table_splits_head_and_body() {
        let rows = vec![
            vec!["name".to_string(), "qty".to_string()],
            vec!["apple".to_string(), "3".to_string()],
        ];
        let html = data_table(&rows).into_string();
        assert!(html.contains("<th>name</th><th>qty</th>"));
        assert!(html.contains("<td>apple</td><td>3</td>"));
    }

    #[test]
    fn data_table_handles_no_rows() {
        let html = data_table(&[]).into_string();
        assert!(html.contains("<thead><tr></tr></thead><tbody></tbody>"));
    }

    #[test]
    fn closures_are_renderers() {
        let r = |f: &PreviewFile| -> Result<String, RenderError> { Ok(f.name.clone()) };
        let file = file_with("x.txt", "text/plain", b"");
        assert_eq!(r.render(&file).unwrap(), "x.txt");
    }

    #[test]
    fn apply_only_overwrites_present_fields() {
        let file = file_with("x.pdf", "application/pdf", b"");
        let mut meta = FileMetadata::from_file(&file);
        meta.sheet_names = Some(vec!["keep".to_string()]);
        let rendered = Rendered {
            page_count: Some(4),
            ..Rendered::new(html! { p { "hi" } })
        };
        let content = rendered.apply(&mut meta);
        assert_eq!(content, "<p>hi</p>");
        assert_eq!(meta.page_count, Some(4));
        assert_eq!(meta.sheet_names, Some(vec!["keep".to_string()]));
    }
}
