//! Region persistence: fixed-size tile-data blocks with a versioned binary format.
//!
//! # Invariants
//! - All four tile grids (and the texture raster) share `REGION_SIZE` dimensions.
//! - An unknown file version is a fatal load error, never silently defaulted.
//! - Reserved flag bits round-trip through save/load unchanged.

mod format;
mod meta;
mod region;
mod store;

pub use format::{FILE_VERSION, RegionError, TEXTURE_DIM};
pub use meta::TileMeta;
pub use region::{FLAG_BLOCKED, Region};
pub use store::RegionStore;
