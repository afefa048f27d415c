//! Image probing backend trait and shared types.
//!
//! The [`ImageBackend`] trait is the seam between the image renderer (which
//! decides what to show) and the code that inspects pixels. The production
//! implementation is [`RustBackend`](super::rust_backend::RustBackend).

use crate::types::Dimensions;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unrecognized image format")]
    UnknownFormat,
    #[error("Decoding failed: {0}")]
    DecodeFailed(String),
}

/// Trait for image inspection backends.
pub trait ImageBackend: Send + Sync {
    /// Intrinsic pixel dimensions of an encoded image.
    fn identify(&self, data: &[u8]) -> Result<Dimensions, BackendError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Mock backend that hands out canned dimensions and records calls.
    #[derive(Default)]
    pub struct MockBackend {
        pub results: Mutex<Vec<Result<Dimensions, String>>>,
        pub calls: Mutex<Vec<usize>>,
    }

    impl MockBackend {
        pub fn with_dimensions(width: u32, height: u32) -> Self {
            Self {
                results: Mutex::new(vec![Ok(Dimensions { width, height })]),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn failing(message: &str) -> Self {
            Self {
                results: Mutex::new(vec![Err(message.to_string())]),
                calls: Mutex::new(Vec::new()),
            }
        }

        /// Byte lengths of every buffer passed to `identify`.
        pub fn get_calls(&self) -> Vec<usize> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl ImageBackend for MockBackend {
        fn identify(&self, data: &[u8]) -> Result<Dimensions, BackendError> {
            self.calls.lock().unwrap().push(data.len());
            self.results
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Err("No mock dimensions".to_string()))
                .map_err(BackendError::DecodeFailed)
        }
    }

    #[test]
    fn mock_records_identify() {
        let backend = MockBackend::with_dimensions(800, 600);
        let dims = backend.identify(b"abc").unwrap();
        assert_eq!(dims, Dimensions { width: 800, height: 600 });
        assert_eq!(backend.get_calls(), vec![3]);
    }

    #[test]
    fn mock_reports_failure() {
        let backend = MockBackend::failing("corrupt");
        let err = backend.identify(b"").unwrap_err();
        assert_eq!(err.to_string(), "Decoding failed: corrupt");
    }
}
