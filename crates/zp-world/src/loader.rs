//! CSV layout loader for [`MemoryWorld`].
//!
//! # CSV format
//!
//! One row per non-default cell feature.  Cells not listed stay plain.
//!
//! ```csv
//! zone,x,y,feature,owned,public
//! A,10,4,wall,,
//! A,11,4,swamp,,
//! A,12,4,road,,
//! A,13,4,rampart,true,false
//! A,14,4,site:extension,,
//! ```
//!
//! **`feature`** field:
//!
//! | Value          | Meaning                                           |
//! |----------------|---------------------------------------------------|
//! | `plain`        | terrain mask 0                                    |
//! | `swamp`        | terrain mask `TERRAIN_MASK_SWAMP`                 |
//! | `wall`         | terrain mask `TERRAIN_MASK_WALL`                  |
//! | `site:<kind>`  | own construction site of structure `<kind>`       |
//! | *structure*    | `road`, `container`, `rampart`, `barrier`, `spawn`, `extension`, `tower`, `storage`, `link`, `other` |
//!
//! `owned` and `public` are optional booleans (default `false`) and only
//! matter for structures.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use zp_core::{Coord, ZpError, ZoneName};

use crate::world::{ConstructionSite, Structure, StructureKind, TERRAIN_MASK_SWAMP, TERRAIN_MASK_WALL};
use crate::{MemoryWorld, WorldError, WorldResult};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct LayoutRecord {
    zone:    String,
    x:       i32,
    y:       i32,
    feature: String,
    owned:   Option<bool>,
    public:  Option<bool>,
}

enum Feature {
    Terrain(u8),
    Site(StructureKind),
    Structure(StructureKind),
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a layout file into `world`, returning the number of rows applied.
pub fn load_layout_csv(path: &Path, world: &mut MemoryWorld) -> WorldResult<usize> {
    let file = std::fs::File::open(path)?;
    load_layout_reader(file, world)
}

/// Like [`load_layout_csv`] but accepts any `Read` source.
///
/// Rows are validated as they stream in; the first bad row aborts the load
/// and leaves earlier rows applied.
pub fn load_layout_reader<R: Read>(reader: R, world: &mut MemoryWorld) -> WorldResult<usize> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut applied = 0;

    for result in csv_reader.deserialize::<LayoutRecord>() {
        let row = result.map_err(|e| WorldError::Parse(e.to_string()))?;
        let coord = Coord::try_new(row.x, row.y)
            .ok_or(ZpError::OutOfBounds { x: row.x, y: row.y })?;
        let zone = ZoneName::from(row.zone.trim());

        match parse_feature(&row.feature)? {
            Feature::Terrain(mask) => {
                world.set_terrain(zone, coord, mask);
            }
            Feature::Site(kind) => {
                world.add_construction_site(zone, ConstructionSite { coord, kind });
            }
            Feature::Structure(kind) => {
                world.add_structure(
                    zone,
                    Structure {
                        coord,
                        kind,
                        owned:  row.owned.unwrap_or(false),
                        public: row.public.unwrap_or(false),
                    },
                );
            }
        }
        applied += 1;
    }

    Ok(applied)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn parse_feature(raw: &str) -> WorldResult<Feature> {
    let name = raw.trim();
    match name {
        "plain" => return Ok(Feature::Terrain(0)),
        "swamp" => return Ok(Feature::Terrain(TERRAIN_MASK_SWAMP)),
        "wall" => return Ok(Feature::Terrain(TERRAIN_MASK_WALL)),
        _ => {}
    }
    if let Some(kind) = name.strip_prefix("site:") {
        return structure_kind(kind).map(Feature::Site);
    }
    structure_kind(name).map(Feature::Structure)
}

fn structure_kind(name: &str) -> WorldResult<StructureKind> {
    match StructureKind::from_name(name) {
        StructureKind::Other if name != "other" => Err(WorldError::UnknownFeature(name.to_owned())),
        kind => Ok(kind),
    }
}
