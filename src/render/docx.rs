//! Word document preview.
//!
//! A docx file is a zip archive; the body lives in `word/document.xml`. That
//! part is read (bounded) and walked with `quick-xml` into a small block
//! model of paragraphs, runs and tables, which is then rendered with maud.
//!
//! | WordprocessingML | HTML |
//! |---|---|
//! | `w:pStyle` `Heading1`..`Heading6`, `Title` | `h1`..`h6` |
//! | paragraphs with `w:numPr` | `ul > li` |
//! | `w:b` / `w:i` / `w:u` run properties | `strong` / `em` / `u` |
//! | `w:br`, `w:cr` | `br` |
//! | `w:tbl` | `table` (nested tables flattened into their cell) |
//! | `w:drawing`, `w:pict`, `w:object` | skipped with everything inside them (text boxes included), reported as a conversion note |
//! | `mc:Fallback` | skipped silently; the `mc:Choice` branch is already counted |
//!
//! Legacy `.doc` files are binary and only get [`render_legacy_doc`].

use super::{RenderError, Rendered, format_mb, preview_header};
use crate::types::PreviewFile;
use maud::{Markup, html};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::io::{Cursor, Read};
use zip::ZipArchive;

/// Upper bound on the uncompressed size of `word/document.xml`.
pub const MAX_DOCUMENT_XML_BYTES: u64 = 64 * 1024 * 1024;

const DOCUMENT_PART: &str = "word/document.xml";

// ============================================================================
// Document model
// ============================================================================

#[derive(Debug, Default, Clone, PartialEq)]
struct Run {
    text: String,
    bold: bool,
    italic: bool,
    underline: bool,
}

#[derive(Debug, Default, Clone, PartialEq)]
struct Paragraph {
    heading: Option<u8>,
    list_item: bool,
    runs: Vec<Run>,
}

impl Paragraph {
    fn is_blank(&self) -> bool {
        self.runs.iter().all(|r| r.text.trim().is_empty())
    }
}

type Cell = Vec<Paragraph>;
type Row = Vec<Cell>;

#[derive(Debug, Clone, PartialEq)]
enum Block {
    Paragraph(Paragraph),
    Table(Vec<Row>),
}

#[derive(Debug, Default)]
struct ParsedDocument {
    blocks: Vec<Block>,
    skipped_objects: usize,
    nested_tables: usize,
}

impl ParsedDocument {
    fn notes(&self) -> Vec<String> {
        let mut notes = Vec::new();
        if self.skipped_objects > 0 {
            notes.push(format!(
                "Skipped {} embedded image(s) or object(s)",
                self.skipped_objects
            ));
        }
        if self.nested_tables > 0 {
            notes.push(format!(
                "Flattened {} nested table(s) into their cells",
                self.nested_tables
            ));
        }
        notes
    }
}

// ============================================================================
// Reading
// ============================================================================

fn docx_error(e: impl std::fmt::Display) -> RenderError {
    RenderError::Docx(e.to_string())
}

fn read_document_part(bytes: &[u8]) -> Result<Vec<u8>, RenderError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(docx_error)?;
    let entry = archive
        .by_name(DOCUMENT_PART)
        .map_err(|_| RenderError::Docx(format!("missing {DOCUMENT_PART}")))?;
    let mut out = Vec::new();
    entry
        .take(MAX_DOCUMENT_XML_BYTES + 1)
        .read_to_end(&mut out)
        .map_err(docx_error)?;
    if out.len() as u64 > MAX_DOCUMENT_XML_BYTES {
        return Err(RenderError::Docx(format!(
            "{DOCUMENT_PART} exceeds size limit ({MAX_DOCUMENT_XML_BYTES} bytes)"
        )));
    }
    Ok(out)
}

/// Value of the element's `w:val` attribute.
fn val_attr(e: &BytesStart) -> Result<Option<String>, RenderError> {
    for attr in e.attributes() {
        let attr = attr.map_err(docx_error)?;
        if attr.key.local_name().as_ref() == b"val" {
            return Ok(Some(attr.unescape_value().map_err(docx_error)?.into_owned()));
        }
    }
    Ok(None)
}

fn heading_level(style: &str) -> Option<u8> {
    if style.eq_ignore_ascii_case("title") {
        return Some(1);
    }
    let level: u8 = style
        .strip_prefix("Heading")
        .or_else(|| style.strip_prefix("heading"))?
        .trim()
        .parse()
        .ok()?;
    (1..=6).contains(&level).then_some(level)
}

/// Toggle properties are on unless `w:val` says otherwise.
fn toggle_on(e: &BytesStart) -> Result<bool, RenderError> {
    Ok(!matches!(
        val_attr(e)?.as_deref(),
        Some("0" | "false" | "none")
    ))
}

#[derive(Default)]
struct Walker {
    doc: ParsedDocument,
    tables: Vec<Vec<Row>>,
    paragraph: Option<Paragraph>,
    run: Option<Run>,
    in_text: bool,
    /// Open elements inside a skipped object, the object itself included.
    skip_depth: usize,
}

impl Walker {
    fn current_cell(&mut self) -> Option<&mut Cell> {
        self.tables.last_mut()?.last_mut()?.last_mut()
    }

    fn push_text(&mut self, text: &str) {
        if let Some(run) = self.run.as_mut() {
            run.text.push_str(text);
        }
    }

    fn start(&mut self, e: &BytesStart) -> Result<(), RenderError> {
        if self.skip_depth > 0 {
            self.skip_depth += 1;
            return Ok(());
        }
        match e.local_name().as_ref() {
            b"drawing" | b"pict" | b"object" => {
                self.doc.skipped_objects += 1;
                self.skip_depth = 1;
            }
            b"Fallback" => self.skip_depth = 1,
            b"tbl" => self.tables.push(Vec::new()),
            b"tr" => {
                if let Some(table) = self.tables.last_mut() {
                    table.push(Vec::new());
                }
            }
            b"tc" => {
                if let Some(row) = self.tables.last_mut().and_then(|t| t.last_mut()) {
                    row.push(Vec::new());
                }
            }
            b"p" => self.paragraph = Some(Paragraph::default()),
            b"r" => self.run = Some(Run::default()),
            b"t" => self.in_text = self.run.is_some(),
            _ => self.property(e)?,
        }
        Ok(())
    }

    fn empty(&mut self, e: &BytesStart) -> Result<(), RenderError> {
        if self.skip_depth > 0 {
            return Ok(());
        }
        match e.local_name().as_ref() {
            b"tab" => self.push_text("\t"),
            b"br" | b"cr" => self.push_text("\n"),
            _ => self.property(e)?,
        }
        Ok(())
    }

    /// Elements meaningful both as `Start` and `Empty` events.
    fn property(&mut self, e: &BytesStart) -> Result<(), RenderError> {
        match e.local_name().as_ref() {
            b"drawing" | b"pict" | b"object" => self.doc.skipped_objects += 1,
            b"pStyle" => {
                let level = val_attr(e)?.as_deref().and_then(heading_level);
                if let Some(p) = self.paragraph.as_mut() {
                    p.heading = level;
                }
            }
            b"numPr" => {
                if let Some(p) = self.paragraph.as_mut() {
                    p.list_item = true;
                }
            }
            name @ (b"b" | b"i" | b"u") if self.run.is_some() => {
                let on = toggle_on(e)?;
                if let Some(run) = self.run.as_mut() {
                    match name {
                        b"b" => run.bold = on,
                        b"i" => run.italic = on,
                        _ => run.underline = on,
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn end(&mut self, local_name: &[u8]) {
        if self.skip_depth > 0 {
            self.skip_depth -= 1;
            return;
        }
        match local_name {
            b"t" => self.in_text = false,
            b"r" => {
                if let Some(run) = self.run.take().filter(|r| !r.text.is_empty())
                    && let Some(p) = self.paragraph.as_mut()
                {
                    p.runs.push(run);
                }
            }
            b"p" => {
                if let Some(p) = self.paragraph.take() {
                    match self.current_cell() {
                        Some(cell) => cell.push(p),
                        None => self.doc.blocks.push(Block::Paragraph(p)),
                    }
                }
            }
            b"tbl" => {
                if let Some(rows) = self.tables.pop() {
                    if self.tables.is_empty() {
                        self.doc.blocks.push(Block::Table(rows));
                    } else {
                        self.doc.nested_tables += 1;
                        if let Some(cell) = self.current_cell() {
                            cell.extend(rows.into_iter().flatten().flatten());
                        }
                    }
                }
            }
            _ => {}
        }
    }
}

fn parse_document(xml: &[u8]) -> Result<ParsedDocument, RenderError> {
    let mut reader = Reader::from_reader(xml);
    let mut walker = Walker::default();
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf).map_err(docx_error)? {
            Event::Start(e) => walker.start(&e)?,
            Event::Empty(e) => walker.empty(&e)?,
            Event::Text(t) if walker.in_text && walker.skip_depth == 0 => {
                let text = t.unescape().map_err(docx_error)?;
                walker.push_text(&text);
            }
            Event::End(e) => walker.end(e.local_name().as_ref()),
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(walker.doc)
}

// ============================================================================
// Rendering
// ============================================================================

enum Node<'a> {
    Paragraph(&'a Paragraph),
    List(Vec<&'a Paragraph>),
    Table(&'a [Row]),
}

/// Drop blank paragraphs and merge consecutive list items.
fn group(blocks: &[Block]) -> Vec<Node<'_>> {
    let mut nodes: Vec<Node<'_>> = Vec::new();
    for block in blocks {
        match block {
            Block::Paragraph(p) if p.is_blank() => {}
            Block::Paragraph(p) if p.list_item && p.heading.is_none() => match nodes.last_mut() {
                Some(Node::List(items)) => items.push(p),
                _ => nodes.push(Node::List(vec![p])),
            },
            Block::Paragraph(p) => nodes.push(Node::Paragraph(p)),
            Block::Table(rows) => nodes.push(Node::Table(rows)),
        }
    }
    nodes
}

fn render_run(run: &Run) -> Markup {
    let text = html! {
        @for (i, line) in run.text.split('\n').enumerate() {
            @if i > 0 { br; }
            (line)
        }
    };
    let text = if run.underline { html! { u { (text) } } } else { text };
    let text = if run.italic { html! { em { (text) } } } else { text };
    if run.bold { html! { strong { (text) } } } else { text }
}

fn render_runs(runs: &[Run]) -> Markup {
    html! { @for run in runs { (render_run(run)) } }
}

fn render_paragraph(p: &Paragraph) -> Markup {
    let inner = render_runs(&p.runs);
    match p.heading {
        Some(1) => html! { h1 { (inner) } },
        Some(2) => html! { h2 { (inner) } },
        Some(3) => html! { h3 { (inner) } },
        Some(4) => html! { h4 { (inner) } },
        Some(5) => html! { h5 { (inner) } },
        Some(_) => html! { h6 { (inner) } },
        None => html! { p { (inner) } },
    }
}

fn render_table(rows: &[Row]) -> Markup {
    html! {
        table {
            @for row in rows {
                tr {
                    @for cell in row {
                        td {
                            @for p in cell.iter().filter(|p| !p.is_blank()) {
                                p { (render_runs(&p.runs)) }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn render_body(doc: &ParsedDocument) -> Markup {
    let nodes = group(&doc.blocks);
    html! {
        @if nodes.is_empty() {
            p.empty-document { "This document contains no text." }
        }
        @for node in &nodes {
            @match node {
                Node::Paragraph(p) => { (render_paragraph(p)) }
                Node::List(items) => {
                    ul {
                        @for item in items {
                            li { (render_runs(&item.runs)) }
                        }
                    }
                }
                Node::Table(rows) => { (render_table(rows)) }
            }
        }
    }
}

/// Convert a docx file to HTML.
pub fn render_docx(file: &PreviewFile) -> Result<Rendered, RenderError> {
    let xml = read_document_part(file.bytes())?;
    let doc = parse_document(&xml)?;
    let notes = doc.notes();

    Ok(Rendered::new(html! {
        div.docx-preview {
            (preview_header("📝 Word Document", &[file.name.clone()]))
            div.document-content { (render_body(&doc)) }
            @if !notes.is_empty() {
                div.conversion-notes {
                    h4 { "Conversion Notes:" }
                    ul {
                        @for note in &notes {
                            li { (note) }
                        }
                    }
                }
            }
        }
    }))
}

/// Notice shown for binary `.doc` files, which are not parsed.
pub fn render_legacy_doc(file: &PreviewFile) -> Rendered {
    Rendered::new(html! {
        div.doc-preview {
            (preview_header("📄 Word Document (Legacy)", &[file.name.clone(), format_mb(file.size)]))
            div.legacy-notice {
                div.notice-icon { "⚠️" }
                h4 { "Legacy Format Detected" }
                p { "DOC files require server-side conversion for preview." }
                div.suggestions {
                    h5 { "Recommended Solutions:" }
                    ul {
                        li { "Convert to DOCX format for instant preview" }
                        li { "Use server-side conversion service" }
                        li { "Integrate with cloud APIs (Google Docs, Office 365)" }
                    }
                }
            }
        }
    })
}
