//! Dispatch from a resolved [`FileType`] to its renderer.
//!
//! Built-in renderers cover every supported type. Callers can replace any of
//! them with [`Processor::register`]; the registry lives on the `Processor`
//! value, is written during setup and only read while previewing.

use crate::config::ConfigError;
use crate::imaging::{DEFAULT_DISPLAY_BOUNDS, ImageBackend, RustBackend};
use crate::render::{self, RenderError, Rendered, Renderer};
use crate::types::{Dimensions, FileMetadata, FileType, PreviewFile, PreviewResult, resolve_type};
use crate::validate::ValidationError;
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum PreviewError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Failed to process file: Unsupported file type: {0}")]
    Unsupported(FileType),
    #[error("Failed to process file: {0}")]
    Render(#[from] RenderError),
}

pub struct Processor {
    overrides: HashMap<FileType, Box<dyn Renderer>>,
    image_backend: Box<dyn ImageBackend>,
    image_bounds: Dimensions,
}

impl Default for Processor {
    fn default() -> Self {
        Self::new()
    }
}

impl Processor {
    pub fn new() -> Self {
        Self::with_image_backend(RustBackend::new())
    }

    /// Use `backend` to read image dimensions.
    pub fn with_image_backend(backend: impl ImageBackend + 'static) -> Self {
        Self {
            overrides: HashMap::new(),
            image_backend: Box::new(backend),
            image_bounds: DEFAULT_DISPLAY_BOUNDS,
        }
    }

    /// Bounds images are scaled into for display.
    pub fn with_image_bounds(mut self, bounds: Dimensions) -> Self {
        self.image_bounds = bounds;
        self
    }

    /// Replace the renderer for `file_type`. A later registration for the
    /// same type wins.
    pub fn register(&mut self, file_type: FileType, renderer: impl Renderer + 'static) {
        debug!(%file_type, "registered custom renderer");
        self.overrides.insert(file_type, Box::new(renderer));
    }

    pub fn has_override(&self, file_type: FileType) -> bool {
        self.overrides.contains_key(&file_type)
    }

    /// Render `file` as `file_type`.
    pub fn process(&self, file: &PreviewFile, file_type: FileType) -> Result<PreviewResult, PreviewError> {
        if let Some(result) = self.render_custom(file, file_type) {
            return result;
        }

        debug!(file = %file.name, %file_type, "dispatching to built-in renderer");
        let rendered = self.render_builtin(file, file_type)?;
        Ok(finish(file, file_type, rendered))
    }

    /// Resolve the type from the MIME type, then [`process`](Self::process).
    pub fn process_detected(&self, file: &PreviewFile) -> Result<PreviewResult, PreviewError> {
        self.process(file, resolve_type(&file.mime_type))
    }

    /// Render one page of a PDF at `scale`. Page and scale are clamped.
    ///
    /// A custom `pdf` renderer takes the whole request; it has no notion of
    /// pages, so `page` and `scale` are ignored.
    pub fn render_pdf_page(
        &self,
        file: &PreviewFile,
        page: usize,
        scale: f64,
    ) -> Result<PreviewResult, PreviewError> {
        if let Some(result) = self.render_custom(file, FileType::Pdf) {
            return result;
        }
        let rendered = render::pdf::render_pdf_page(file, page, scale)?;
        Ok(finish(file, FileType::Pdf, rendered))
    }

    /// Render the sheet called `sheet` of a workbook already resolved as
    /// `file_type`. A custom renderer for that type takes the whole request.
    pub fn render_sheet(
        &self,
        file: &PreviewFile,
        file_type: FileType,
        sheet: &str,
    ) -> Result<PreviewResult, PreviewError> {
        if !matches!(file_type, FileType::Xls | FileType::Xlsx) {
            return Err(PreviewError::Unsupported(file_type));
        }
        if let Some(result) = self.render_custom(file, file_type) {
            return result;
        }
        let rendered = render::spreadsheet::render_sheet(file, Some(sheet))?;
        Ok(finish(file, file_type, rendered))
    }

    /// Run the registered override for `file_type`, if any. Its result
    /// carries base metadata only.
    fn render_custom(
        &self,
        file: &PreviewFile,
        file_type: FileType,
    ) -> Option<Result<PreviewResult, PreviewError>> {
        let renderer = self.overrides.get(&file_type)?;
        debug!(file = %file.name, %file_type, "dispatching to custom renderer");
        Some(renderer.render(file).map_err(Into::into).map(|content| PreviewResult {
            content,
            file_type,
            metadata: FileMetadata::from_file(file),
        }))
    }

    fn render_builtin(&self, file: &PreviewFile, file_type: FileType) -> Result<Rendered, PreviewError> {
        let rendered = match file_type {
            FileType::Pdf => render::pdf::render_pdf(file)?,
            FileType::Csv => render::csv::render_csv(file),
            FileType::Xls | FileType::Xlsx => render::spreadsheet::render_spreadsheet(file)?,
            FileType::Docx => render::docx::render_docx(file)?,
            FileType::Doc => render::docx::render_legacy_doc(file),
            FileType::Txt | FileType::Json | FileType::Html | FileType::Xml => {
                render::text::render_text(file, file_type)
            }
            FileType::Image => {
                render::image::render_image(file, self.image_backend.as_ref(), self.image_bounds)
            }
            FileType::Unknown => return Err(PreviewError::Unsupported(file_type)),
        };
        Ok(rendered)
    }
}

fn finish(file: &PreviewFile, file_type: FileType, rendered: Rendered) -> PreviewResult {
    let mut metadata = FileMetadata::from_file(file);
    let content = rendered.apply(&mut metadata);
    PreviewResult {
        content,
        file_type,
        metadata,
    }
}
