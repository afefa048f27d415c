//! Full HTML pages around a preview fragment.
//!
//! Fragments from [`render`](crate::render) are meant to be embedded in a host
//! page. This module wraps one in a standalone document for the CLI: doctype,
//! theme colors from [`theme_css`], the base stylesheet, and an optional file
//! details panel (`show_file_info`).
//!
//! ## CSS
//!
//! `static/preview.css` is embedded at compile time via `include_str!`; the
//! theme's custom properties are prepended so the sheet itself stays
//! color-agnostic.

use crate::config::{PreviewConfig, theme_css};
use crate::render::format_kb;
use crate::types::{FileMetadata, PreviewResult};
use maud::{DOCTYPE, Markup, PreEscaped, html};

const CSS_STATIC: &str = include_str!("../static/preview.css");

fn stylesheet(config: &PreviewConfig) -> String {
    format!("{}\n\n{}", theme_css(config.theme), CSS_STATIC)
}

fn base_document(title: &str, css: &str, body_class: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(css)) }
            }
            body class=(body_class) {
                (content)
            }
        }
    }
}

fn body_class(config: &PreviewConfig) -> String {
    format!("theme-{}", config.theme.as_str())
}

/// Side panel listing everything known about the file.
fn file_info_panel(metadata: &FileMetadata) -> Markup {
    html! {
        aside.file-info {
            h4 { "File Information" }
            dl {
                dt { "Filename" } dd { (metadata.filename) }
                dt { "Type" } dd { (metadata.mime_type) }
                dt { "Size" } dd { (format_kb(metadata.size)) }
                dt { "Last Modified" }
                dd { (metadata.last_modified.format("%Y-%m-%d %H:%M:%S UTC")) }
                @if let Some(d) = metadata.dimensions {
                    dt { "Dimensions" } dd { (d.width) " × " (d.height) }
                }
                @if let Some(d) = metadata.display_dimensions {
                    dt { "Display Size" } dd { (d.width) " × " (d.height) }
                }
                @if let Some(pages) = metadata.page_count {
                    dt { "Pages" } dd { (pages) }
                }
                @if let Some(sheets) = &metadata.sheet_names {
                    dt { "Sheets" } dd { (sheets.join(", ")) }
                }
            }
        }
    }
}

/// A standalone page showing `result`.
pub fn render_document(result: &PreviewResult, config: &PreviewConfig) -> Markup {
    let content = html! {
        div.preview-layout {
            main.preview-root data-file-type=(result.file_type) {
                // Fragments are built escaped by the renderers; custom
                // renderers own their output.
                (PreEscaped(&result.content))
            }
            @if config.show_file_info {
                (file_info_panel(&result.metadata))
            }
        }
    };
    base_document(
        &result.metadata.filename,
        &stylesheet(config),
        &body_class(config),
        content,
    )
}

/// Placeholder page used when a file could not be previewed.
pub fn render_error_document(filename: &str, message: &str, config: &PreviewConfig) -> Markup {
    let content = html! {
        div.preview-error {
            h3 { "Preview unavailable" }
            p.file-name { (filename) }
            p.error-message { (message) }
        }
    };
    base_document(filename, &stylesheet(config), &body_class(config), content)
}
