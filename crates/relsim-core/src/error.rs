//! Unified error types for the relsim crates
//!
//! [`RelsimError`] covers the failures a simulation can actually hit:
//! configuration problems surfaced at the library boundary, malformed
//! input files, and broken simulation invariants. File and CLI glue wraps
//! these in `anyhow` with context, the same way the rest of the workspace
//! does.
//!
//! # Example
//!
//! ```ignore
//! use relsim_core::{RelsimError, RelsimResult};
//!
//! fn checked_delta(delta: f64) -> RelsimResult<f64> {
//!     if delta < 0.0 {
//!         return Err(RelsimError::NegativeSojourn { entity: "G1".into(), ttc: delta });
//!     }
//!     Ok(delta)
//! }
//! ```

use thiserror::Error;

/// Error type for all relsim operations.
#[derive(Error, Debug)]
pub enum RelsimError {
    /// I/O errors (file access)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parsing/deserialization errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The entity chosen as the next event reported a negative (or NaN)
    /// remaining sojourn time. This is a defect, never a runtime condition.
    #[error("Negative sojourn time {ttc} selected for entity {entity}")]
    NegativeSojourn { entity: String, ttc: f64 },

    /// Snapshot does not match the fixed system topology
    #[error("Snapshot error: {0}")]
    Snapshot(String),

    /// Generic errors (for wrapping external errors)
    #[error("{0}")]
    Other(String),
}

/// Convenience type alias for Results using RelsimError.
pub type RelsimResult<T> = Result<T, RelsimError>;

impl From<anyhow::Error> for RelsimError {
    fn from(err: anyhow::Error) -> Self {
        RelsimError::Other(err.to_string())
    }
}

impl From<String> for RelsimError {
    fn from(s: String) -> Self {
        RelsimError::Other(s)
    }
}

impl From<&str> for RelsimError {
    fn from(s: &str) -> Self {
        RelsimError::Other(s.to_string())
    }
}

impl From<serde_json::Error> for RelsimError {
    fn from(err: serde_json::Error) -> Self {
        RelsimError::Parse(err.to_string())
    }
}
