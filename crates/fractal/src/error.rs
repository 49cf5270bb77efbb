use std::fmt;

use thiserror::Error;

/// Matrix that failed the invertibility check while packing a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixKind {
    World,
    View,
    Projection,
}

impl fmt::Display for MatrixKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MatrixKind::World => "world",
            MatrixKind::View => "view",
            MatrixKind::Projection => "projection",
        };
        f.write_str(name)
    }
}

/// Precondition failures that abort a single frame.
///
/// None of these are fatal to the process; the render loop logs the error and
/// skips the frame.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum FrameError {
    #[error("{matrix} matrix is not invertible")]
    SingularMatrix { matrix: MatrixKind },
    #[error("output surface is empty ({width}x{height})")]
    EmptySurface { width: u32, height: u32 },
}
