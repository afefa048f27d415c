//! Pure calculation functions for image display sizes.
//!
//! All functions here are pure and testable without any I/O or images.

use crate::types::Dimensions;

/// Display bounds used by the image preview.
pub const DEFAULT_DISPLAY_BOUNDS: Dimensions = Dimensions {
    width: 800,
    height: 600,
};

/// Scale `original` down so it fits inside `bounds`, preserving aspect ratio.
///
/// Images that already fit are returned unchanged; nothing is ever scaled up.
/// Landscape (or square) images are first scaled to the bound width, portrait
/// images to the bound height. If the other axis still overflows, the image is
/// rescaled to that axis instead.
///
/// # Examples
/// ```
/// # use file_preview::imaging::fit_within;
/// # use file_preview::types::Dimensions;
/// let d = |width, height| Dimensions { width, height };
/// assert_eq!(fit_within(d(100, 50), d(800, 600)), d(100, 50));
/// assert_eq!(fit_within(d(4000, 2000), d(800, 600)), d(800, 400));
/// ```
pub fn fit_within(original: Dimensions, bounds: Dimensions) -> Dimensions {
    let (w, h) = (original.width, original.height);
    let (max_w, max_h) = (bounds.width, bounds.height);

    if w <= max_w && h <= max_h {
        return original;
    }

    // Overflowing the binding axis guarantees its size is non-zero.
    let by_width = |w: u32, h: u32| Dimensions {
        width: max_w,
        height: (h as f64 * max_w as f64 / w as f64).round() as u32,
    };
    let by_height = |w: u32, h: u32| Dimensions {
        width: (w as f64 * max_h as f64 / h as f64).round() as u32,
        height: max_h,
    };

    let first = if w >= h { by_width(w, h) } else { by_height(w, h) };

    if first.height > max_h {
        by_height(w, h)
    } else if first.width > max_w {
        by_width(w, h)
    } else {
        first
    }
}

/// Convenience wrapper over [`fit_within`] taking raw numbers.
pub fn scale(orig_w: u32, orig_h: u32, max_w: u32, max_h: u32) -> (u32, u32) {
    let d = fit_within(
        Dimensions {
            width: orig_w,
            height: orig_h,
        },
        Dimensions {
            width: max_w,
            height: max_h,
        },
    );
    (d.width, d.height)
}
