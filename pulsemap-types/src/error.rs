//! Error type used by the crate.

use thiserror::Error;

/// Error enum.
#[derive(Debug, Error, PartialEq)]
pub enum PulseTypesError {
    /// Geometry conversion error.
    #[error("invalid input geometry: {0}")]
    Conversion(String),
    /// A string could not be parsed into one of the enumerations of the data model.
    #[error("unknown {kind} value: {value}")]
    UnknownVariant {
        /// Name of the enumeration.
        kind: &'static str,
        /// The value that failed to parse.
        value: String,
    },
}
