//! `zp-search` — the grid-search service the planner delegates to.
//!
//! The planner never walks the grid itself.  It hands a start position, a
//! set of [`SearchTarget`]s, [`SearchParams`] and a [`ZoneCostProvider`] to
//! a [`PathSearch`] implementation and gets an ordered list of positions
//! back.  [`ZoneAStar`] is the default implementation: a weighted A* over a
//! single zone's 8-connected grid.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                     |
//! |------------|--------------------------------------------------------------|
//! | [`costs`]  | `MovementCosts`, `ZoneCosts`, `ZoneCostProvider`             |
//! | [`search`] | `SearchTarget`, `SearchParams`, `SearchOutcome`, `PathSearch`|
//! | [`astar`]  | `ZoneAStar`                                                  |
//! | [`error`]  | `SearchError`                                                |

pub mod astar;
pub mod costs;
pub mod error;
pub mod search;


pub use astar::ZoneAStar;
pub use costs::{MovementCosts, ZoneCostProvider, ZoneCosts};
pub use error::SearchError;
pub use search::{PathSearch, SearchOutcome, SearchParams, SearchTarget};
