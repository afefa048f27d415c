//! File validation.
//!
//! A pure predicate over a [`PreviewFile`] and a [`PreviewConfig`]. Checks run
//! in a fixed order and the first failure wins:
//!
//! 1. size within `max_file_size`
//! 2. MIME type present in [`SUPPORTED_MIME_TYPES`](crate::types::SUPPORTED_MIME_TYPES)
//! 3. resolved type listed in `supported_types`
//! 4. non-blank filename
//! 5. extension not in [`DANGEROUS_EXTENSIONS`]
//!
//! Failures are values, not panics: the `Display` of a [`ValidationError`] is
//! the message shown to the user.

use crate::config::PreviewConfig;
use crate::types::{FileType, PreviewFile};
use thiserror::Error;

/// Executable-like extensions that are never previewed.
pub const DANGEROUS_EXTENSIONS: &[&str] = &[".exe", ".bat", ".cmd", ".scr", ".vbs", ".js"];

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("File size ({}MB) exceeds maximum allowed size ({}MB)", mb(.size), mb(.max))]
    SizeExceeded { size: u64, max: u64 },
    #[error("Unsupported file type: {0}")]
    UnsupportedMime(String),
    #[error("File type '{file_type}' is not supported. Supported types: {}", join_types(.allowed))]
    TypeNotAllowed {
        file_type: FileType,
        allowed: Vec<FileType>,
    },
    #[error("Invalid file name")]
    InvalidName,
    #[error("File extension '{0}' is not allowed for security reasons")]
    DangerousExtension(String),
    #[error("Multiple files are not allowed")]
    MultipleNotAllowed,
    #[error("File {index}: {source}")]
    InFile {
        /// 1-based position in the batch.
        index: usize,
        source: Box<ValidationError>,
    },
}

impl ValidationError {
    /// Human-readable reason.
    pub fn reason(&self) -> String {
        self.to_string()
    }
}

fn mb(bytes: &u64) -> String {
    format!("{:.2}", *bytes as f64 / 1024.0 / 1024.0)
}

fn join_types(types: &[FileType]) -> String {
    types
        .iter()
        .map(|t| t.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Validate one file. On success returns its resolved type.
pub fn validate_file(file: &PreviewFile, config: &PreviewConfig) -> Result<FileType, ValidationError> {
    if config.max_file_size > 0 && file.size > config.max_file_size {
        return Err(ValidationError::SizeExceeded {
            size: file.size,
            max: config.max_file_size,
        });
    }

    let file_type = FileType::from_mime(&file.mime_type)
        .ok_or_else(|| ValidationError::UnsupportedMime(file.mime_type.clone()))?;

    if !config.supported_types.contains(&file_type) {
        return Err(ValidationError::TypeNotAllowed {
            file_type,
            allowed: config.supported_types.clone(),
        });
    }

    if file.name.trim().is_empty() {
        return Err(ValidationError::InvalidName);
    }

    if let Some(ext) = file.extension() {
        let dotted = format!(".{ext}");
        if DANGEROUS_EXTENSIONS.contains(&dotted.as_str()) {
            return Err(ValidationError::DangerousExtension(dotted));
        }
    }

    Ok(file_type)
}

/// Validate a batch. Rejects batches of more than one file unless
/// `allow_multiple_files` is set, then reports the first failing file.
pub fn validate_files(
    files: &[PreviewFile],
    config: &PreviewConfig,
) -> Result<Vec<FileType>, ValidationError> {
    if !config.allow_multiple_files && files.len() > 1 {
        return Err(ValidationError::MultipleNotAllowed);
    }
    files
        .iter()
        .enumerate()
        .map(|(i, file)| {
            validate_file(file, config).map_err(|e| ValidationError::InFile {
                index: i + 1,
                source: Box::new(e),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::file_with;

    fn config() -> PreviewConfig {
        PreviewConfig::default()
    }

    #[test]
    fn accepts_supported_file() {
        let file = file_with("notes.txt", "text/plain", b"hello");
        assert_eq!(validate_file(&file, &config()), Ok(FileType::Txt));
    }

    #[test]
    fn oversized_file_fails_with_size_reason() {
        let file = file_with("big.txt", "text/plain", b"x").with_size(60 * 1024 * 1024);
        let err = validate_file(&file, &config()).unwrap_err();
        assert!(matches!(err, ValidationError::SizeExceeded { .. }));
        assert_eq!(
            err.reason(),
            "File size (60.00MB) exceeds maximum allowed size (50.00MB)"
        );
    }

    #[test]
    fn file_at_exact_limit_passes() {
        let cfg = PreviewConfig {
            max_file_size: 5,
            ..config()
        };
        let file = file_with("a.txt", "text/plain", b"12345");
        assert!(validate_file(&file, &cfg).is_ok());
        let file = file_with("a.txt", "text/plain", b"123456");
        assert!(validate_file(&file, &cfg).is_err());
    }

    #[test]
    fn size_is_checked_before_type() {
        let file = file_with("a.zip", "application/zip", b"").with_size(u64::MAX);
        assert!(matches!(
            validate_file(&file, &config()),
            Err(ValidationError::SizeExceeded { .. })
        ));
    }

    #[test]
    fn unknown_mime_fails() {
        for mime in ["application/zip", "", "video/mp4", "TEXT/PLAIN"] {
            let file = file_with("a.bin", mime, b"");
            let err = validate_file(&file, &config()).unwrap_err();
            assert_eq!(err, ValidationError::UnsupportedMime(mime.to_string()));
        }
    }

    #[test]
    fn type_outside_allowed_list_fails() {
        let file = file_with("data.json", "application/json", b"{}");
        let err = validate_file(&file, &config()).unwrap_err();
        assert_eq!(
            err.reason(),
            "File type 'json' is not supported. Supported types: pdf, docx, xlsx, csv, txt, image"
        );
    }

    #[test]
    fn blank_name_fails() {
        let file = file_with("   ", "text/plain", b"");
        assert_eq!(validate_file(&file, &config()), Err(ValidationError::InvalidName));
    }

    #[test]
    fn dangerous_extension_fails() {
        let file = file_with("Setup.EXE", "text/plain", b"");
        let err = validate_file(&file, &config()).unwrap_err();
        assert_eq!(
            err.reason(),
            "File extension '.exe' is not allowed for security reasons"
        );
    }

    #[test]
    fn js_extension_is_denied_even_as_text() {
        let file = file_with("app.js", "text/plain", b"alert(1)");
        assert!(matches!(
            validate_file(&file, &config()),
            Err(ValidationError::DangerousExtension(ext)) if ext == ".js"
        ));
    }

    #[test]
    fn multiple_files_rejected_by_default() {
        let files = vec![
            file_with("a.txt", "text/plain", b""),
            file_with("b.txt", "text/plain", b""),
        ];
        assert_eq!(
            validate_files(&files, &config()),
            Err(ValidationError::MultipleNotAllowed)
        );
    }

    #[test]
    fn batch_reports_first_failing_index() {
        let cfg = PreviewConfig {
            allow_multiple_files: true,
            ..config()
        };
        let files = vec![
            file_with("a.txt", "text/plain", b""),
            file_with("b.zip", "application/zip", b""),
            file_with("c.exe", "text/plain", b""),
        ];
        let err = validate_files(&files, &cfg).unwrap_err();
        assert_eq!(err.reason(), "File 2: Unsupported file type: application/zip");
    }

    #[test]
    fn batch_returns_types_in_order() {
        let cfg = PreviewConfig {
            allow_multiple_files: true,
            ..config()
        };
        let files = vec![
            file_with("a.csv", "text/csv", b""),
            file_with("b.png", "image/png", b""),
        ];
        assert_eq!(
            validate_files(&files, &cfg),
            Ok(vec![FileType::Csv, FileType::Image])
        );
    }
}
