use thiserror::Error;
use zp_core::{Pos, ZoneName};
use zp_matrix::MatrixError;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("no resolvable target position")]
    InvalidTarget,

    #[error("no path to {target}")]
    NoPath { target: Pos },

    #[error("no terrain available for zone {0}")]
    TerrainUnavailable(ZoneName),

    #[error("corrupt move record: {0}")]
    CorruptRecord(String),
}

impl From<MatrixError> for PlanError {
    fn from(err: MatrixError) -> Self {
        match err {
            MatrixError::TerrainUnavailable(zone) => PlanError::TerrainUnavailable(zone),
        }
    }
}

pub type PlanResult<T> = Result<T, PlanError>;
