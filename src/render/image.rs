//! Image preview: inline data URL, scaled display size and a details table.

use super::{Rendered, format_kb, preview_header};
use crate::imaging::{ImageBackend, fit_within};
use crate::types::{Dimensions, PreviewFile};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use maud::html;
use tracing::warn;

/// `data:<mime>;base64,<payload>`
pub fn data_url(file: &PreviewFile) -> String {
    format!("data:{};base64,{}", file.mime_type, STANDARD.encode(file.bytes()))
}

/// Render `file` as an `<img>` sized to fit `bounds`.
///
/// A file the backend cannot read is still shown, with 0×0 dimensions.
pub fn render_image(file: &PreviewFile, backend: &dyn ImageBackend, bounds: Dimensions) -> Rendered {
    let intrinsic = backend.identify(file.bytes()).unwrap_or_else(|e| {
        warn!(file = %file.name, error = %e, "could not read image dimensions");
        Dimensions {
            width: 0,
            height: 0,
        }
    });
    let display = fit_within(intrinsic, bounds);
    let modified = file.last_modified.format("%Y-%m-%d %H:%M:%S UTC").to_string();
    let meta = [
        format!("{} × {}px", intrinsic.width, intrinsic.height),
        format_kb(file.size),
    ];

    let markup = html! {
        div.image-preview {
            (preview_header("🖼️ Image File", &meta))
            div.image-container {
                img.preview-image
                    src=(data_url(file))
                    alt=(file.name)
                    width=(display.width)
                    height=(display.height);
            }
            div.image-details {
                table.details-table {
                    tr { td { strong { "Filename:" } } td { (file.name) } }
                    tr { td { strong { "Type:" } } td { (file.mime_type) } }
                    tr { td { strong { "Size:" } } td { (format_kb(file.size)) } }
                    tr {
                        td { strong { "Dimensions:" } }
                        td { (intrinsic.width) " × " (intrinsic.height) " pixels" }
                    }
                    tr { td { strong { "Last Modified:" } } td { (modified) } }
                }
            }
        }
    };

    Rendered {
        dimensions: Some(intrinsic),
        display_dimensions: Some(display),
        ..Rendered::new(markup)
    }
}
