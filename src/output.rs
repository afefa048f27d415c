//! CLI output formatting for every command.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! ok    report.pdf (pdf, 1.50 MB)
//! FAIL  setup.exe
//!     File extension '.exe' is not allowed for security reasons
//!
//! Checked 2 files: 1 accepted, 1 rejected
//! ```
//!
//! ## Preview
//!
//! ```text
//! report.pdf → report.html
//!     Type: pdf
//!     Pages: 3
//! ```
//!
//! ## Batch
//!
//! ```text
//! 001 report.pdf → out/report.pdf.html
//! 002 broken.pdf
//!     Failed to process file: Failed to render PDF: invalid file header
//!
//! Previewed 2 files: 1 rendered, 1 failed
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that does the writing. Format functions
//! are pure: no I/O, no side effects.

use crate::config::PreviewConfig;
use crate::render::format_mb;
use crate::types::{FileType, PreviewResult, SUPPORTED_MIME_TYPES};
use std::path::{Path, PathBuf};

fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

// ============================================================================
// check
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum CheckOutcome {
    Accepted { file_type: FileType, size: u64 },
    Rejected(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckEntry {
    pub path: PathBuf,
    pub outcome: CheckOutcome,
}

pub fn format_check_output(entries: &[CheckEntry]) -> Vec<String> {
    let mut lines = Vec::new();
    let mut rejected = 0;
    for entry in entries {
        let name = entry.path.display();
        match &entry.outcome {
            CheckOutcome::Accepted { file_type, size } => {
                lines.push(format!("ok    {name} ({file_type}, {})", format_mb(*size)));
            }
            CheckOutcome::Rejected(reason) => {
                rejected += 1;
                lines.push(format!("FAIL  {name}"));
                lines.push(format!("{}{reason}", indent(1)));
            }
        }
    }
    lines.push(String::new());
    lines.push(format!(
        "Checked {}: {} accepted, {} rejected",
        plural(entries.len(), "file"),
        entries.len() - rejected,
        rejected
    ));
    lines
}

pub fn print_check_output(entries: &[CheckEntry]) {
    for line in format_check_output(entries) {
        println!("{line}");
    }
}

// ============================================================================
// types
// ============================================================================

pub fn format_types_output(config: &PreviewConfig) -> Vec<String> {
    let mut lines = vec!["Supported types".to_string()];
    for (mime, file_type) in SUPPORTED_MIME_TYPES {
        let marker = if config.supported_types.contains(file_type) {
            "*"
        } else {
            " "
        };
        lines.push(format!(
            "{}{marker} {:<6} {:<72} {}",
            indent(1),
            file_type.as_str(),
            mime,
            file_type.extensions().join(" ")
        ));
    }
    lines.push(String::new());
    lines.push(format!("Enabled (*): {}", config.supported_types_text()));
    lines.push(format!("Accept: {}", config.accept_attribute()));
    lines.push(format!("Max size: {} MB", config.max_file_size_mb()));
    lines
}

pub fn print_types_output(config: &PreviewConfig) {
    for line in format_types_output(config) {
        println!("{line}");
    }
}

// ============================================================================
// preview
// ============================================================================

pub fn format_preview_output(result: &PreviewResult, destination: Option<&Path>) -> Vec<String> {
    let meta = &result.metadata;
    let mut lines = vec![match destination {
        Some(path) => format!("{} → {}", meta.filename, path.display()),
        None => meta.filename.clone(),
    }];
    lines.push(format!("{}Type: {}", indent(1), result.file_type));
    lines.push(format!("{}Size: {}", indent(1), format_mb(meta.size)));
    if let Some(pages) = meta.page_count {
        lines.push(format!("{}Pages: {pages}", indent(1)));
    }
    if let Some(sheets) = &meta.sheet_names {
        lines.push(format!("{}Sheets: {}", indent(1), sheets.join(", ")));
    }
    if let Some(d) = meta.dimensions {
        lines.push(format!("{}Dimensions: {} × {}", indent(1), d.width, d.height));
    }
    if let Some(d) = meta.display_dimensions {
        lines.push(format!("{}Display: {} × {}", indent(1), d.width, d.height));
    }
    lines
}

/// Written to stderr: stdout may be carrying the HTML itself.
pub fn print_preview_output(result: &PreviewResult, destination: Option<&Path>) {
    for line in format_preview_output(result, destination) {
        eprintln!("{line}");
    }
}

// ============================================================================
// batch
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct BatchEntry {
    pub name: String,
    /// Where the page was written, or why it wasn't.
    pub outcome: Result<PathBuf, String>,
}

pub fn format_batch_output(entries: &[BatchEntry]) -> Vec<String> {
    let mut lines = Vec::new();
    let mut failed = 0;
    for (i, entry) in entries.iter().enumerate() {
        let idx = format_index(i + 1);
        match &entry.outcome {
            Ok(path) => lines.push(format!("{idx} {} → {}", entry.name, path.display())),
            Err(reason) => {
                failed += 1;
                lines.push(format!("{idx} {}", entry.name));
                lines.push(format!("{}{reason}", indent(1)));
            }
        }
    }
    lines.push(String::new());
    lines.push(format!(
        "Previewed {}: {} rendered, {} failed",
        plural(entries.len(), "file"),
        entries.len() - failed,
        failed
    ));
    lines
}

pub fn print_batch_output(entries: &[BatchEntry]) {
    for line in format_batch_output(entries) {
        println!("{line}");
    }
}
