use thiserror::Error;

use zp_core::ZpError;

#[derive(Debug, Error)]
pub enum PathingError {
    #[error("pathing configuration error: {0}")]
    Config(#[from] ZpError),
}

pub type PathingResult<T> = Result<T, PathingError>;
