//! The previewer facade: a global [`PreviewConfig`] plus a [`Processor`].
//!
//! Every entry point validates before rendering, so a file that fails
//! validation never reaches a parser.

use crate::config::{ConfigError, PreviewConfig, resolve_config};
use crate::processor::{PreviewError, Processor};
use crate::render::Renderer;
use crate::types::{FileType, PreviewFile, PreviewResult};
use crate::validate::{validate_file, validate_files};
use rayon::prelude::*;
use tracing::{debug, info, warn};

/// What happened when a file was handed to [`Previewer::select`].
#[derive(Debug)]
pub struct Selection {
    pub file_type: FileType,
    /// Present when `auto_preview` is enabled.
    pub preview: Option<PreviewResult>,
}

#[derive(Default)]
pub struct Previewer {
    config: PreviewConfig,
    processor: Processor,
}

impl Previewer {
    pub fn new(config: PreviewConfig) -> Self {
        Self::with_processor(config, Processor::new())
    }

    pub fn with_processor(config: PreviewConfig, processor: Processor) -> Self {
        Self { config, processor }
    }

    pub fn config(&self) -> &PreviewConfig {
        &self.config
    }

    /// Merge a partial TOML overlay onto the current config. The config is
    /// left untouched when the merged result is invalid.
    pub fn set_config(&mut self, overlay: toml::Value) -> Result<(), ConfigError> {
        self.config = resolve_config(&self.config, Some(overlay))?;
        debug!(config = ?self.config, "updated preview config");
        Ok(())
    }

    /// Validate against the current config, optionally merged with `overlay`.
    pub fn validate(
        &self,
        file: &PreviewFile,
        overlay: Option<toml::Value>,
    ) -> Result<FileType, PreviewError> {
        let config = resolve_config(&self.config, overlay)?;
        Ok(validate_file(file, &config)?)
    }

    /// Validate, then render with the processor.
    pub fn preview(&self, file: &PreviewFile) -> Result<PreviewResult, PreviewError> {
        let file_type = validate_file(file, &self.config)?;
        self.processor.process(file, file_type).inspect_err(|e| {
            warn!(file = %file.name, error = %e, "preview failed");
        })
    }

    /// Validate a PDF and render `page` at `scale`.
    pub fn preview_page(
        &self,
        file: &PreviewFile,
        page: usize,
        scale: f64,
    ) -> Result<PreviewResult, PreviewError> {
        match validate_file(file, &self.config)? {
            FileType::Pdf => self.processor.render_pdf_page(file, page, scale),
            other => Err(PreviewError::Unsupported(other)),
        }
    }

    /// Validate a workbook and render the sheet called `sheet`.
    pub fn preview_sheet(&self, file: &PreviewFile, sheet: &str) -> Result<PreviewResult, PreviewError> {
        match validate_file(file, &self.config)? {
            file_type @ (FileType::Xls | FileType::Xlsx) => {
                self.processor.render_sheet(file, file_type, sheet)
            }
            other => Err(PreviewError::Unsupported(other)),
        }
    }

    /// Validate a newly selected file and, if `auto_preview` is on, render it.
    pub fn select(&self, file: &PreviewFile) -> Result<Selection, PreviewError> {
        let file_type = validate_file(file, &self.config)?;
        let preview = if self.config.auto_preview {
            Some(self.processor.process(file, file_type)?)
        } else {
            None
        };
        Ok(Selection { file_type, preview })
    }

    /// Validate the whole batch, then render every file in parallel.
    ///
    /// Results come back in input order; one file failing to render does not
    /// affect the others.
    pub fn preview_all(
        &self,
        files: &[PreviewFile],
    ) -> Result<Vec<Result<PreviewResult, PreviewError>>, PreviewError> {
        let types = validate_files(files, &self.config)?;
        info!(count = files.len(), "previewing batch");
        Ok(files
            .par_iter()
            .zip(&types)
            .map(|(file, file_type)| self.processor.process(file, *file_type))
            .collect())
    }

    /// Replace the renderer for `file_type`.
    pub fn register(&mut self, file_type: FileType, renderer: impl Renderer + 'static) {
        self.processor.register(file_type, renderer);
    }
}
