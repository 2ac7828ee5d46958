//! World-side error type.

use thiserror::Error;

use zp_core::{AgentId, ZpError};

/// Errors produced by `zp-world` (layout loading and reference-world edits).
#[derive(Debug, Error)]
pub enum WorldError {
    #[error("agent {0} is not present in the world")]
    UnknownAgent(AgentId),

    #[error("unknown layout feature {0:?}")]
    UnknownFeature(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error(transparent)]
    Core(#[from] ZpError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type WorldResult<T> = Result<T, WorldError>;
