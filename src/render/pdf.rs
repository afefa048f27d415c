//! PDF preview.
//!
//! The document is parsed with `lopdf` and one page is shown as its extracted
//! text, together with navigation and zoom controls for the host page to wire
//! up. [`PageCursor`] holds the navigation state those controls drive.
//!
//! Parsing runs on a worker thread raced against [`PDF_RENDER_TIMEOUT`], so a
//! pathological document fails with [`RenderError::Timeout`] instead of hanging
//! the caller. The worker is detached on timeout and finishes in the
//! background.

use super::{RenderError, Rendered, format_mb, preview_header};
use crate::types::PreviewFile;
use lopdf::{Dictionary, Document, Object};
use maud::html;
use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

pub const PDF_RENDER_TIMEOUT: Duration = Duration::from_secs(10);

pub const DEFAULT_SCALE: f64 = 1.2;
pub const MIN_SCALE: f64 = 0.5;
pub const MAX_SCALE: f64 = 3.0;
/// Step applied by the zoom controls.
pub const SCALE_STEP: f64 = 0.2;

// ============================================================================
// Document info
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfInfo {
    pub page_count: usize,
    pub title: Option<String>,
    pub author: Option<String>,
}

/// Page count plus `/Title` and `/Author` from the info dictionary.
pub fn pdf_info(bytes: &[u8]) -> Result<PdfInfo, RenderError> {
    let doc = load(bytes)?;
    Ok(read_info(&doc))
}

fn load(bytes: &[u8]) -> Result<Document, RenderError> {
    Document::load_mem(bytes).map_err(|e| RenderError::Pdf(e.to_string()))
}

fn read_info(doc: &Document) -> PdfInfo {
    let info: Option<&Dictionary> = doc.trailer.get(b"Info").ok().and_then(|obj| match obj {
        Object::Reference(id) => doc.get_dictionary(*id).ok(),
        Object::Dictionary(dict) => Some(dict),
        _ => None,
    });
    let field = |key: &[u8]| {
        info.and_then(|dict| dict.get(key).ok())
            .and_then(decode_text_string)
    };
    PdfInfo {
        page_count: doc.get_pages().len(),
        title: field(b"Title"),
        author: field(b"Author"),
    }
}

/// Decode a PDF text string: UTF-16BE with a byte-order mark, otherwise
/// treated as Latin-1 compatible bytes.
fn decode_text_string(obj: &Object) -> Option<String> {
    let Object::String(bytes, _) = obj else {
        return None;
    };
    let text = match bytes.strip_prefix(&[0xFE, 0xFF]) {
        Some(utf16) => {
            let units: Vec<u16> = utf16
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
        None => bytes.iter().map(|&b| b as char).collect(),
    };
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

// ============================================================================
// Navigation state
// ============================================================================

/// Clamp a zoom factor to `[MIN_SCALE, MAX_SCALE]`.
pub fn clamp_scale(scale: f64) -> f64 {
    if scale.is_nan() {
        return DEFAULT_SCALE;
    }
    scale.clamp(MIN_SCALE, MAX_SCALE)
}

/// Current page and zoom for one open document.
#[derive(Debug, Clone, PartialEq)]
pub struct PageCursor {
    current: usize,
    total: usize,
    scale: f64,
}

impl PageCursor {
    /// Start on page 1 at [`DEFAULT_SCALE`].
    pub fn new(total: usize) -> Self {
        Self {
            current: 1,
            total,
            scale: DEFAULT_SCALE,
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Move by `delta` pages. Moves that leave `1..=total` are ignored and
    /// return `false`.
    pub fn navigate(&mut self, delta: isize) -> bool {
        let target = self.current as isize + delta;
        if target < 1 || target as usize > self.total {
            return false;
        }
        self.current = target as usize;
        true
    }

    /// Jump to `page`, with the same bounds as [`navigate`](Self::navigate).
    pub fn go_to(&mut self, page: usize) -> bool {
        if page < 1 || page > self.total {
            return false;
        }
        self.current = page;
        true
    }

    /// Adjust zoom by `delta`, clamped. Returns whether the scale changed.
    pub fn change_scale(&mut self, delta: f64) -> bool {
        let next = clamp_scale(self.scale + delta);
        if (next - self.scale).abs() < 1e-9 {
            return false;
        }
        self.scale = next;
        true
    }

    pub fn zoom_in(&mut self) -> bool {
        self.change_scale(SCALE_STEP)
    }

    pub fn zoom_out(&mut self) -> bool {
        self.change_scale(-SCALE_STEP)
    }

    pub fn can_prev(&self) -> bool {
        self.current > 1
    }

    pub fn can_next(&self) -> bool {
        self.current < self.total
    }

    /// Zoom as a whole percentage, e.g. `"120%"`.
    pub fn scale_percentage(&self) -> String {
        format!("{}%", percent(self.scale))
    }
}

fn percent(scale: f64) -> u32 {
    (scale * 100.0).round() as u32
}

// ============================================================================
// Rendering
// ============================================================================

struct PageText {
    info: PdfInfo,
    page: usize,
    text: Option<String>,
}

fn extract_page(bytes: &[u8], requested: usize) -> Result<PageText, RenderError> {
    let doc = load(bytes)?;
    let info = read_info(&doc);
    if info.page_count == 0 {
        return Err(RenderError::Pdf("document has no pages".to_string()));
    }
    let page = requested.clamp(1, info.page_count);
    let text = match doc.extract_text(&[page as u32]) {
        Ok(text) => Some(text),
        Err(e) => {
            warn!(page, error = %e, "no text extracted from PDF page");
            None
        }
    };
    Ok(PageText { info, page, text })
}

/// Run `job` on a worker thread; give up after `timeout`.
pub(crate) fn run_with_timeout<T, F>(timeout: Duration, job: F) -> Result<T, RenderError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, RenderError> + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        // The receiver is gone if we already timed out.
        let _ = tx.send(job());
    });
    match rx.recv_timeout(timeout) {
        Ok(result) => result,
        Err(RecvTimeoutError::Timeout) => Err(RenderError::Timeout),
        Err(RecvTimeoutError::Disconnected) => {
            Err(RenderError::Pdf("render worker exited unexpectedly".to_string()))
        }
    }
}

/// Render page 1 at the default zoom.
pub fn render_pdf(file: &PreviewFile) -> Result<Rendered, RenderError> {
    render_pdf_page(file, 1, DEFAULT_SCALE)
}

/// Render `page` (clamped into range) at `scale` (clamped to the zoom limits).
pub fn render_pdf_page(file: &PreviewFile, page: usize, scale: f64) -> Result<Rendered, RenderError> {
    let data: Arc<[u8]> = file.shared_bytes();
    let extracted = run_with_timeout(PDF_RENDER_TIMEOUT, move || extract_page(&data, page))?;
    debug!(
        file = %file.name,
        page = extracted.page,
        pages = extracted.info.page_count,
        "rendered PDF page"
    );

    let PageText { info, page, text } = extracted;
    let mut cursor = PageCursor::new(info.page_count);
    cursor.go_to(page);
    let font_size = format!("font-size: {}%;", percent(clamp_scale(scale)));
    let total = info.page_count;
    let position = format!("Page {page} of {total}");
    let meta = [file.name.clone(), format_mb(file.size), position.clone()];
    let text = text.filter(|t| !t.trim().is_empty());

    let markup = html! {
        div.pdf-viewer
            data-file-name=(file.name)
            data-total-pages=(total)
            data-current-page=(page)
        {
            (preview_header("📄 PDF Document", &meta))
            div.pdf-controls {
                button.pdf-btn data-action="prev" disabled[!cursor.can_prev()] { "← Previous" }
                span.page-info { (position) }
                button.pdf-btn data-action="next" disabled[!cursor.can_next()] { "Next →" }
                button.pdf-btn data-action="zoom-out" { "🔍-" }
                span.zoom-level { (percent(clamp_scale(scale))) "%" }
                button.pdf-btn data-action="zoom-in" { "🔍+" }
            }
            div.pdf-page-container {
                @match &text {
                    Some(text) => {
                        pre.pdf-page-text style=(font_size) { (text) }
                    }
                    None => {
                        p.pdf-no-text { "No extractable text on this page." }
                    }
                }
            }
            div.pdf-info {
                p { strong { "Document:" } " " (file.name) }
                @if let Some(title) = &info.title {
                    p { strong { "Title:" } " " (title) }
                }
                @if let Some(author) = &info.author {
                    p { strong { "Author:" } " " (author) }
                }
                p { strong { "Pages:" } " " (total) }
                p { strong { "Size:" } " " (format_mb(file.size)) }
                p { strong { "Current Page:" } " " (page) }
            }
        }
    };

    Ok(Rendered {
        page_count: Some(total),
        ..Rendered::new(markup)
    })
}
