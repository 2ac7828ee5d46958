//! The per-agent state kept between ticks.

use zp_core::{Coord, Pos, ZoneName};

use crate::path::DirectionPath;
use crate::{PlanError, PlanResult};

/// Stored shape: `(target_x, target_y, target_zone, last_x, last_y, path)`.
///
/// With the `serde` feature it serializes as a six-element array.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveRecord(pub u8, pub u8, pub ZoneName, pub u8, pub u8, pub String);

/// Decoded [`MoveRecord`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SerializedMove {
    pub target: Pos,
    /// Agent position when the record was written.
    pub last:   Coord,
    /// Steps still to take from `last`.
    pub path:   DirectionPath,
}

impl SerializedMove {
    pub fn to_record(&self) -> MoveRecord {
        MoveRecord(
            self.target.x(),
            self.target.y(),
            self.target.zone.clone(),
            self.last.x,
            self.last.y,
            self.path.encode(),
        )
    }

    pub fn from_record(record: &MoveRecord) -> PlanResult<SerializedMove> {
        let MoveRecord(tx, ty, zone, lx, ly, encoded) = record;
        let coord = |x: u8, y: u8| {
            Coord::try_new(i32::from(x), i32::from(y))
                .ok_or_else(|| PlanError::CorruptRecord(format!("coordinate ({x}, {y}) out of range")))
        };
        let path = DirectionPath::decode(encoded)
            .ok_or_else(|| PlanError::CorruptRecord(format!("bad direction string {encoded:?}")))?;
        Ok(SerializedMove {
            target: Pos::at(coord(*tx, *ty)?, zone),
            last: coord(*lx, *ly)?,
            path,
        })
    }
}
