//! Developer tooling: read-only inspectors over regions and streaming state.
//!
//! # Invariants
//! - Inspectors never mutate what they look at.

mod inspector;

pub use inspector::{RegionInspector, RegionReport, StreamReport};
