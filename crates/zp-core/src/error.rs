//! Workspace base error type.
//!
//! Sub-crates define their own enums and wrap `ZpError` as one variant where
//! they need to surface a core failure.

use thiserror::Error;

use crate::ZoneName;

/// Errors produced by `zp-core` helpers.
#[derive(Debug, Error)]
pub enum ZpError {
    #[error("zone {0} is unknown to the terrain source")]
    UnknownZone(ZoneName),

    #[error("coordinate ({x}, {y}) lies outside the 50x50 zone grid")]
    OutOfBounds { x: i32, y: i32 },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),
}

/// Shorthand result type for `zp-core`.
pub type ZpResult<T> = Result<T, ZpError>;
