use thiserror::Error;
use zp_core::ZoneName;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("no costs available for start zone {0}")]
    ZoneUnavailable(ZoneName),
}
