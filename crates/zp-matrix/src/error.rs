use thiserror::Error;
use zp_core::ZoneName;

#[derive(Debug, Error)]
pub enum MatrixError {
    #[error("no terrain available for zone {0}")]
    TerrainUnavailable(ZoneName),
}

pub type MatrixResult<T> = Result<T, MatrixError>;
