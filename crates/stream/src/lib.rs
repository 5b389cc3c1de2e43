//! Streaming: a resident window of regions kept loaded around a moving
//! reference point, with synchronous or background-thread loading.
//!
//! # Invariants
//! - After `ensure`, no loaded region is farther than the view radius
//!   (Chebyshev) from the reference region.
//! - Only the control thread mutates the loaded/pending/cache maps; the
//!   worker thread runs the pure load function and hands results back.

mod manager;
mod worker;

pub use manager::{RegionManager, RegionSink, StreamConfig};
