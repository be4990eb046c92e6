use std::path::PathBuf;
use thiserror::Error;

/// Failures while building or loading a [`Map`](crate::simulation::Map).
#[derive(Debug, Error)]
pub enum MapError {
    #[error("failed to read map file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported map line {line_number}: {line:?}")]
    Format { line_number: usize, line: String },

    #[error("max acceleration must be positive, got {0}")]
    InvalidAcceleration(f64),
}

/// Contract violations on a [`Track`](crate::simulation::Track).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrackError {
    #[error("position index {index} out of range (valid: 1..{len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("direction vector too short: magnitude {magnitude} < 1")]
    DirectionTooShort { magnitude: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("segments are parallel or coincident, no unique intersection point")]
    NoUniqueIntersection,
}
