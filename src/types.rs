//! Shared types used by the validator, the processor and every renderer.
//!
//! A [`PreviewFile`] goes in, a [`PreviewResult`] comes out. The
//! [`FileType`] tag produced from the file's MIME type decides which renderer
//! runs in between.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Internal file category derived from the MIME type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Pdf,
    Doc,
    Docx,
    Xls,
    Xlsx,
    Csv,
    Txt,
    Json,
    Html,
    Xml,
    Image,
    Unknown,
}

/// MIME type → file type. Anything not listed is unsupported.
pub const SUPPORTED_MIME_TYPES: &[(&str, FileType)] = &[
    ("application/pdf", FileType::Pdf),
    ("application/msword", FileType::Doc),
    (
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        FileType::Docx,
    ),
    ("application/vnd.ms-excel", FileType::Xls),
    (
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        FileType::Xlsx,
    ),
    ("text/csv", FileType::Csv),
    ("text/plain", FileType::Txt),
    ("application/json", FileType::Json),
    ("text/html", FileType::Html),
    ("text/xml", FileType::Xml),
    ("application/xml", FileType::Xml),
    ("image/jpeg", FileType::Image),
    ("image/jpg", FileType::Image),
    ("image/png", FileType::Image),
    ("image/gif", FileType::Image),
    ("image/webp", FileType::Image),
    ("image/svg+xml", FileType::Image),
];

impl FileType {
    pub const ALL: [FileType; 12] = [
        FileType::Pdf,
        FileType::Doc,
        FileType::Docx,
        FileType::Xls,
        FileType::Xlsx,
        FileType::Csv,
        FileType::Txt,
        FileType::Json,
        FileType::Html,
        FileType::Xml,
        FileType::Image,
        FileType::Unknown,
    ];

    /// Look up a MIME type in [`SUPPORTED_MIME_TYPES`].
    pub fn from_mime(mime: &str) -> Option<Self> {
        SUPPORTED_MIME_TYPES
            .iter()
            .find(|(m, _)| *m == mime)
            .map(|(_, t)| *t)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FileType::Pdf => "pdf",
            FileType::Doc => "doc",
            FileType::Docx => "docx",
            FileType::Xls => "xls",
            FileType::Xlsx => "xlsx",
            FileType::Csv => "csv",
            FileType::Txt => "txt",
            FileType::Json => "json",
            FileType::Html => "html",
            FileType::Xml => "xml",
            FileType::Image => "image",
            FileType::Unknown => "unknown",
        }
    }

    /// Filename extensions accepted for this type (with leading dot).
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            FileType::Pdf => &[".pdf"],
            FileType::Doc => &[".doc"],
            FileType::Docx => &[".docx"],
            FileType::Xls => &[".xls"],
            FileType::Xlsx => &[".xlsx"],
            FileType::Csv => &[".csv"],
            FileType::Txt => &[".txt"],
            FileType::Json => &[".json"],
            FileType::Html => &[".html", ".htm"],
            FileType::Xml => &[".xml"],
            FileType::Image => &[".png", ".jpg", ".jpeg", ".gif", ".webp", ".svg"],
            FileType::Unknown => &[],
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve a MIME type to its file type, or [`FileType::Unknown`].
pub fn resolve_type(mime: &str) -> FileType {
    FileType::from_mime(mime).unwrap_or(FileType::Unknown)
}

/// A file handed to the previewer. Bytes are shared and never modified.
#[derive(Debug, Clone)]
pub struct PreviewFile {
    pub name: String,
    pub size: u64,
    pub mime_type: String,
    pub last_modified: DateTime<Utc>,
    data: Arc<[u8]>,
}

impl PreviewFile {
    /// Build a file from in-memory content. Size is taken from the bytes.
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        last_modified: DateTime<Utc>,
        data: impl Into<Arc<[u8]>>,
    ) -> Self {
        let data = data.into();
        Self {
            name: name.into(),
            size: data.len() as u64,
            mime_type: mime_type.into(),
            last_modified,
            data,
        }
    }

    /// Read a file from disk, guessing the MIME type from its extension.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        Self::from_path_within(path, 0)
    }

    /// Like [`from_path`](Self::from_path), but the contents are only read
    /// when the file is at most `max_size` bytes (`0` means no limit).
    ///
    /// A larger file comes back with its real `size` and no data, so
    /// validation rejects it without loading it into memory.
    pub fn from_path_within(path: &Path, max_size: u64) -> std::io::Result<Self> {
        let meta = std::fs::metadata(path)?;
        let data = if max_size > 0 && meta.len() > max_size {
            Vec::new()
        } else {
            std::fs::read(path)?
        };
        let last_modified = meta
            .modified()
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| Utc::now());
        let mime_type = mime_guess::from_path(path)
            .first()
            .map(|m| m.essence_str().to_string())
            .unwrap_or_default();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self {
            name,
            size: meta.len(),
            mime_type,
            last_modified,
            data: data.into(),
        })
    }

    /// Override the reported size (useful when the host reports it separately).
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn shared_bytes(&self) -> Arc<[u8]> {
        Arc::clone(&self.data)
    }

    /// Lower-cased extension after the last dot, without the dot.
    pub fn extension(&self) -> Option<String> {
        self.name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
    }
}

/// Pixel dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileMetadata {
    pub filename: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub last_modified: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_dimensions: Option<Dimensions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet_names: Option<Vec<String>>,
}

impl FileMetadata {
    /// Base metadata every preview carries.
    pub fn from_file(file: &PreviewFile) -> Self {
        Self {
            filename: file.name.clone(),
            size: file.size,
            mime_type: file.mime_type.clone(),
            last_modified: file.last_modified,
            dimensions: None,
            display_dimensions: None,
            page_count: None,
            sheet_names: None,
        }
    }
}

/// Rendered preview for one file.
#[derive(Debug, Clone, Serialize)]
pub struct PreviewResult {
    pub content: String,
    #[serde(rename = "type")]
    pub file_type: FileType,
    pub metadata: FileMetadata,
}
