//! End-to-end tests against the public API: files on disk, through
//! validation and dispatch, out to a finished preview.

use file_preview::config::parse_overlay;
use file_preview::render::{RenderError, Renderer};
use file_preview::types::{Dimensions, FileType, PreviewFile};
use file_preview::{PreviewConfig, PreviewError, Previewer, document};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use std::io::{Cursor, Write};
use std::path::Path;
use tempfile::TempDir;

fn write(dir: &Path, name: &str, bytes: &[u8]) -> PreviewFile {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    PreviewFile::from_path(&path).unwrap()
}

fn pdf(pages: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });
    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }
    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

fn png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([10, 20, 30]));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
    buf.into_inner()
}

fn xlsx() -> Vec<u8> {
    let mut workbook = rust_xlsxwriter::Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Inventory").unwrap();
    sheet.write_string(0, 0, "item").unwrap();
    sheet.write_string(0, 1, "count").unwrap();
    sheet.write_string(1, 0, "bolts").unwrap();
    sheet.write_number(1, 1, 40.0).unwrap();
    workbook.add_worksheet().set_name("Archive").unwrap();
    workbook.save_to_buffer().unwrap()
}

fn docx(body: &str) -> Vec<u8> {
    let document = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
    );
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    zip.start_file("word/document.xml", zip::write::SimpleFileOptions::default())
        .unwrap();
    zip.write_all(document.as_bytes()).unwrap();
    zip.finish().unwrap().into_inner()
}

fn everything_allowed() -> Previewer {
    let mut previewer = Previewer::default();
    previewer
        .set_config(
            parse_overlay(
                r#"
                allow_multiple_files = true
                supported_types = ["pdf", "doc", "docx", "xls", "xlsx", "csv", "txt", "json", "html", "xml", "image"]
                "#,
            )
            .unwrap(),
        )
        .unwrap();
    previewer
}

#[test]
fn previews_each_format_from_disk() {
    let tmp = TempDir::new().unwrap();
    let previewer = everything_allowed();

    let report = write(tmp.path(), "report.pdf", &pdf(&["Quarterly results", "Appendix"]));
    let result = previewer.preview(&report).unwrap();
    assert_eq!(result.file_type, FileType::Pdf);
    assert_eq!(result.metadata.page_count, Some(2));
    assert!(result.content.contains("Quarterly"));

    let book = write(tmp.path(), "stock.xlsx", &xlsx());
    let result = previewer.preview(&book).unwrap();
    assert_eq!(
        result.metadata.sheet_names,
        Some(vec!["Inventory".to_string(), "Archive".to_string()])
    );
    assert!(result.content.contains("<td>bolts</td><td>40</td>"));

    let letter = write(
        tmp.path(),
        "letter.docx",
        &docx(r#"<w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t>Dear reader</w:t></w:r></w:p>"#),
    );
    let result = previewer.preview(&letter).unwrap();
    assert!(result.content.contains("<h1>Dear reader</h1>"));

    let photo = write(tmp.path(), "photo.png", &png(1200, 1600));
    let result = previewer.preview(&photo).unwrap();
    assert_eq!(result.metadata.dimensions, Some(Dimensions { width: 1200, height: 1600 }));
    assert_eq!(
        result.metadata.display_dimensions,
        Some(Dimensions { width: 450, height: 600 })
    );

    let table = write(tmp.path(), "people.csv", b"name,city\n\"Lee, A\",Oslo\n");
    let result = previewer.preview(&table).unwrap();
    assert!(result.content.contains("<td>Lee, A</td><td>Oslo</td>"));

    let data = write(tmp.path(), "data.json", br#"{"ok": true}"#);
    let result = previewer.preview(&data).unwrap();
    assert_eq!(result.file_type, FileType::Json);
    assert!(result.content.contains("JSON File"));
}

#[test]
fn default_config_rejects_disabled_types() {
    let tmp = TempDir::new().unwrap();
    let data = write(tmp.path(), "data.json", b"{}");
    let err = Previewer::default().preview(&data).unwrap_err();
    assert_eq!(
        err.to_string(),
        "File type 'json' is not supported. Supported types: pdf, docx, xlsx, csv, txt, image"
    );
}

#[test]
fn unknown_mime_never_reaches_a_renderer() {
    let tmp = TempDir::new().unwrap();
    let archive = write(tmp.path(), "bundle.zip", b"PK\x03\x04");
    let err = everything_allowed().preview(&archive).unwrap_err();
    assert!(matches!(err, PreviewError::Validation(_)));
    assert_eq!(err.to_string(), "Unsupported file type: application/zip");
}

#[test]
fn oversized_file_is_rejected_before_parsing() {
    let previewer = Previewer::new(PreviewConfig {
        max_file_size: 1024 * 1024,
        ..PreviewConfig::default()
    });
    let file = PreviewFile::new(
        "huge.pdf",
        "application/pdf",
        chrono::Utc::now(),
        b"not even a pdf".to_vec(),
    )
    .with_size(3 * 1024 * 1024);
    let err = previewer.preview(&file).unwrap_err();
    assert_eq!(
        err.to_string(),
        "File size (3.00MB) exceeds maximum allowed size (1.00MB)"
    );
}

#[test]
fn batch_preview_in_parallel() {
    let tmp = TempDir::new().unwrap();
    let previewer = everything_allowed();
    let files: Vec<PreviewFile> = (0..8)
        .map(|i| write(tmp.path(), &format!("{i}.txt"), format!("file {i}").as_bytes()))
        .chain(std::iter::once(write(tmp.path(), "broken.docx", b"not a zip")))
        .collect();

    let results = previewer.preview_all(&files).unwrap();
    assert_eq!(results.len(), 9);
    for (i, result) in results.iter().take(8).enumerate() {
        let result = result.as_ref().unwrap();
        assert!(result.content.contains(&format!("file {i}")));
    }
    let err = results[8].as_ref().unwrap_err();
    assert!(err.to_string().starts_with("Failed to process file: Failed to process DOCX file"));
}

struct Banner(&'static str);

impl Renderer for Banner {
    fn render(&self, file: &PreviewFile) -> Result<String, RenderError> {
        Ok(format!("<p>{} for {}</p>", self.0, file.name))
    }
}

#[test]
fn custom_renderer_struct_replaces_builtin() {
    let tmp = TempDir::new().unwrap();
    let mut previewer = Previewer::default();
    previewer.register(FileType::Pdf, Banner("custom viewer"));
    let report = write(tmp.path(), "report.pdf", b"anything");
    let result = previewer.preview(&report).unwrap();
    assert_eq!(result.content, "<p>custom viewer for report.pdf</p>");
    assert_eq!(result.metadata.page_count, None);
}

#[test]
fn full_page_document_wraps_preview() {
    let tmp = TempDir::new().unwrap();
    let previewer = Previewer::default();
    let notes = write(tmp.path(), "notes.txt", b"<b>not bold</b>");
    let result = previewer.preview(&notes).unwrap();
    let page = document::render_document(&result, previewer.config()).into_string();
    assert!(page.starts_with("<!DOCTYPE html>"));
    assert!(page.contains("&lt;b&gt;not bold&lt;/b&gt;"));
    assert!(page.contains("File Information"));
}
