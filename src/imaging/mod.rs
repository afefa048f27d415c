//! Image inspection: header probes and display-size math.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::ImageReader::into_dimensions`, SVG root attributes |
//! | **Display size** | [`fit_within`] (pure) |
//!
//! Probing sits behind [`ImageBackend`] so renderers can be tested without
//! real image bytes; [`RustBackend`] is the only production implementation.

pub mod backend;
mod calculations;
pub mod rust_backend;

pub use backend::{BackendError, ImageBackend};
pub use calculations::{DEFAULT_DISPLAY_BOUNDS, fit_within, scale};
pub use rust_backend::RustBackend;
