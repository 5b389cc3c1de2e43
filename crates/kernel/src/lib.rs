//! World facade over the streaming region window.
//!
//! # Invariants
//! - `update_streaming` re-runs `ensure` only on region-boundary crossings.
//! - The stitched walkability window always agrees with `is_walkable` for
//!   every cell it covers.

mod world;

pub use world::{World, WorldError};
