//! Plain text and code preview.

use super::{Rendered, format_kb, preview_header};
use crate::types::{FileType, PreviewFile};
use maud::html;

/// Characters shown before the content is cut off.
pub const MAX_TEXT_CHARS: usize = 50_000;

pub const TRUNCATION_MARKER: &str = "\n\n[Content truncated...]";

/// Highlighting language for a lower-cased file extension.
pub fn language_for_extension(ext: Option<&str>) -> &'static str {
    match ext {
        Some("js") => "javascript",
        Some("ts") => "typescript",
        Some("html") => "html",
        Some("css") => "css",
        Some("json") => "json",
        Some("xml") => "xml",
        _ => "text",
    }
}

fn icon_for(file_type: FileType) -> &'static str {
    match file_type {
        FileType::Json | FileType::Xml => "📋",
        FileType::Html => "🌐",
        _ => "📄",
    }
}

/// Cut `text` after [`MAX_TEXT_CHARS`] characters, appending a marker.
pub fn truncate_text(text: &str) -> (String, bool) {
    match text.char_indices().nth(MAX_TEXT_CHARS) {
        Some((cut, _)) => (format!("{}{}", &text[..cut], TRUNCATION_MARKER), true),
        None => (text.to_string(), false),
    }
}

pub fn render_text(file: &PreviewFile, file_type: FileType) -> Rendered {
    let text = String::from_utf8_lossy(file.bytes());
    let line_count = text.split('\n').count();
    let (shown, _) = truncate_text(&text);
    let language = language_for_extension(file.extension().as_deref());
    let title = format!("{} {} File", icon_for(file_type), language.to_uppercase());
    let meta = [format!("{line_count} lines"), format_kb(file.size)];

    Rendered::new(html! {
        div.text-preview {
            (preview_header(&title, &meta))
            div.code-container {
                pre class={ "code-preview " (language) } {
                    code { (shown) }
                }
            }
        }
    })
}
