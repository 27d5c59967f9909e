//! Error types for a homodonty run.

use thiserror::Error;

/// Errors that abort a homodonty run.
///
/// Every variant is terminal: no partial table is produced.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HomodontyError {
    /// Missing, repeated or malformed input.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The segment set is empty.
    #[error("no visible segments: the run would not return any results")]
    NoVisibleSegments,

    /// A segment's surface has no faces to project onto.
    #[error("segment {segment} has no surface faces")]
    DegenerateMesh {
        /// Segment display name.
        segment: String,
    },

    /// Jaw joint and jaw tip coincide.
    #[error("jaw length is zero: jaw joint and jaw tip coincide")]
    ZeroJawLength,

    /// A tooth tip coincides with the jaw joint.
    #[error("out-lever of segment {segment} is zero")]
    DegenerateLever {
        /// Segment display name.
        segment: String,
    },

    /// Surface area is zero, negative or not finite.
    #[error("segment {segment} has unusable surface area {area} mm^2")]
    DegenerateArea {
        /// Segment display name.
        segment: String,
        /// Offending area in mm².
        area: f64,
    },

    /// Settings file could not be parsed.
    #[error("invalid settings: {0}")]
    Settings(String),

    /// The result table could not be rendered.
    #[error("failed to write table: {0}")]
    Table(String),
}

impl From<toml::de::Error> for HomodontyError {
    fn from(err: toml::de::Error) -> Self {
        Self::Settings(err.to_string())
    }
}

impl From<csv::Error> for HomodontyError {
    fn from(err: csv::Error) -> Self {
        Self::Table(err.to_string())
    }
}

/// Result type for homodonty operations.
pub type Result<T> = std::result::Result<T, HomodontyError>;
