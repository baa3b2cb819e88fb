use std::fmt;

use tilepath_core::Point;

/// Errors from coordinate-based path queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathError {
    /// The coordinate has no node in the graph.
    OutOfBounds(Point),
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds(p) => write!(f, "path: {p} is outside the graph"),
        }
    }
}

impl std::error::Error for PathError {}
