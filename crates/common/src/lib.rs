//! Shared types: region/tile coordinate math and the nav cost grid.
//!
//! # Invariants
//! - Coordinate mapping is a bijection: `region * REGION_SIZE + local == world`
//!   for every integer world coordinate, negatives included.
//! - `NavGrid` indices are bounds-checked; out-of-range reads are `None`, not panics.

mod coords;
mod grid;

pub use coords::{REGION_SIZE, RegionCoord, VIEW_RADIUS, local_of, region_of};
pub use grid::NavGrid;
