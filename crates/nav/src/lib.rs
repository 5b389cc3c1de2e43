//! Pathfinding: weighted grid A* and a segment-walking movement driver.
//!
//! # Invariants
//! - "No path" is a value (`None`), never a panic; the search always terminates.
//! - Diagonal steps never cut past a blocked orthogonal neighbor.
//! - A new movement request cancels the previous one without snapping the
//!   continuous position to a tile center.

mod astar;
mod mover;

pub use astar::{DEFAULT_NEIGHBOR_OFFSETS, a_star, a_star_with};
pub use mover::{Mover, StepEvent};
