//! Pure Rust image backend.
//!
//! ## Crate mapping
//!
//! | Format | How dimensions are read |
//! |---|---|
//! | JPEG, PNG, GIF, WebP | `image::ImageReader` header probe (format guessed from content) |
//! | SVG | root `<svg>` `width`/`height`, falling back to `viewBox` (via `quick-xml`) |
//!
//! Only headers are read; pixels are never decoded.

use super::backend::{BackendError, ImageBackend};
use crate::types::Dimensions;
use image::ImageReader;
use quick_xml::Reader;
use quick_xml::events::Event;
use std::io::Cursor;

/// Backend using the `image` crate ecosystem.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageBackend for RustBackend {
    fn identify(&self, data: &[u8]) -> Result<Dimensions, BackendError> {
        if looks_like_svg(data) {
            return identify_svg(data);
        }
        let reader = ImageReader::new(Cursor::new(data)).with_guessed_format()?;
        if reader.format().is_none() {
            return Err(BackendError::UnknownFormat);
        }
        let (width, height) = reader
            .into_dimensions()
            .map_err(|e| BackendError::DecodeFailed(e.to_string()))?;
        Ok(Dimensions { width, height })
    }
}

fn looks_like_svg(data: &[u8]) -> bool {
    let head = &data[..data.len().min(1024)];
    let text = String::from_utf8_lossy(head);
    let trimmed = text.trim_start_matches('\u{feff}').trim_start();
    trimmed.starts_with('<') && text.contains("<svg")
}

/// Parse an SVG length like `"120"`, `"120px"`, `"64.5"`. Relative units
/// (`%`, `em`) have no intrinsic size and yield `None`.
fn parse_svg_length(value: &str) -> Option<u32> {
    let v = value.trim();
    let v = v.strip_suffix("px").unwrap_or(v);
    let n: f64 = v.trim().parse().ok()?;
    (n.is_finite() && n >= 0.0).then(|| n.round() as u32)
}

fn parse_view_box(value: &str) -> Option<(u32, u32)> {
    let parts: Vec<f64> = value
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect::<Result<_, _>>()
        .ok()?;
    match parts.as_slice() {
        [_, _, w, h] if *w >= 0.0 && *h >= 0.0 => Some((w.round() as u32, h.round() as u32)),
        _ => None,
    }
}

fn identify_svg(data: &[u8]) -> Result<Dimensions, BackendError> {
    let mut reader = Reader::from_reader(data);
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if e.local_name().as_ref() == b"svg" => {
                let mut width = None;
                let mut height = None;
                let mut view_box = None;
                for attr in e.attributes().flatten() {
                    let value = attr
                        .unescape_value()
                        .map_err(|err| BackendError::DecodeFailed(err.to_string()))?;
                    match attr.key.local_name().as_ref() {
                        b"width" => width = parse_svg_length(&value),
                        b"height" => height = parse_svg_length(&value),
                        b"viewBox" => view_box = parse_view_box(&value),
                        _ => {}
                    }
                }
                return match (width, height, view_box) {
                    (Some(width), Some(height), _) => Ok(Dimensions { width, height }),
                    (_, _, Some((width, height))) => Ok(Dimensions { width, height }),
                    _ => Err(BackendError::DecodeFailed(
                        "SVG has no intrinsic size".to_string(),
                    )),
                };
            }
            Ok(Event::Eof) => return Err(BackendError::UnknownFormat),
            Err(e) => return Err(BackendError::DecodeFailed(e.to_string())),
            _ => {}
        }
        buf.clear();
    }
}
