//! Error types for the panelchop library

use thiserror::Error;

/// Returned when an operation is handed an image with zero width or height.
///
/// This is the only failure mode of the geometric pipeline itself. It is
/// raised synchronously, before any work is done, so a failing call performs
/// no partial mutation of its output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot process empty image ({width}x{height})")]
pub struct EmptyInputError {
    pub width: u32,
    pub height: u32,
}

impl EmptyInputError {
    /// Guard helper: errors if either dimension is zero.
    pub(crate) fn check(width: u32, height: u32) -> Result<(), EmptyInputError> {
        if width == 0 || height == 0 {
            Err(EmptyInputError { width, height })
        } else {
            Ok(())
        }
    }
}
