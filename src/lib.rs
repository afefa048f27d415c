//! # File Preview
//!
//! Validate a file, pick a renderer for its type, and get back an HTML
//! fragment plus metadata that a host page can embed directly.
//!
//! # Architecture: Validate, Dispatch, Render
//!
//! ```text
//! PreviewFile ──validate──▶ FileType ──dispatch──▶ renderer ──▶ PreviewResult
//!               (config)              (overrides           (content + metadata)
//!                                      or built-in)
//! ```
//!
//! Validation is a pure predicate over the file and a [`PreviewConfig`]
//! (size, MIME type, allowed types, filename, dangerous extensions). Files
//! that pass are dispatched on their [`FileType`] to a built-in renderer, or to
//! one the caller registered for that type.
//!
//! ```no_run
//! use file_preview::{Previewer, PreviewConfig};
//! use file_preview::types::PreviewFile;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let previewer = Previewer::new(PreviewConfig::default());
//! let file = PreviewFile::from_path("report.pdf".as_ref())?;
//! let result = previewer.preview(&file)?;
//! println!("{} pages", result.metadata.page_count.unwrap_or(0));
//! # Ok(())
//! # }
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | `PreviewFile`, `FileType`, the MIME table, `FileMetadata`, `PreviewResult` |
//! | [`config`] | `PreviewConfig` defaults, TOML overlays, validation, theme CSS |
//! | [`validate`] | File and batch validation |
//! | [`processor`] | Type dispatch and the custom renderer registry |
//! | [`previewer`] | Facade: global config + processor, parallel batch preview |
//! | [`render`] | One renderer per format (PDF, spreadsheet, Word, CSV, text, image) |
//! | [`imaging`] | Image dimension probing and display-size math |
//! | [`document`] | Standalone HTML pages around a preview (CLI) |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Maud Everywhere
//!
//! All markup is generated with [Maud](https://maud.lambda.xyz/). Every
//! interpolated value is escaped: filenames, cell contents, document text,
//! PDF metadata and numbers alike. Only a custom renderer's output is
//! inserted as-is, because the caller produced it.
//!
//! ## Text Over Rasters for PDF
//!
//! PDF pages are shown as their extracted text rather than a rendered bitmap,
//! keeping the crate free of system rendering libraries. Parsing runs on a
//! worker thread with a fixed timeout.
//!
//! ## Pure-Rust Parsers
//!
//! `lopdf`, `calamine`, `zip` + `quick-xml` and `image` cover every format.
//! No LibreOffice, no Poppler, no ImageMagick.

pub mod config;
pub mod document;
pub mod imaging;
pub mod output;
pub mod previewer;
pub mod processor;
pub mod render;
pub mod types;
pub mod validate;

pub use config::PreviewConfig;
pub use previewer::Previewer;
pub use processor::{PreviewError, Processor};

#[cfg(test)]
pub(crate) mod test_helpers;
