//! Rendering collaborator: positioned mesh data derived from region tiles.
//!
//! # Invariants
//! - Renderers never mutate region truth; mesh data derives from tile arrays.
//! - The core hands over raw grids and a remesh signal, never scene nodes;
//!   draw calls belong to whatever engine consumes `HeightfieldMesh`.

mod mesh;

pub use mesh::{DebugTileRenderer, HeightfieldMesh, MeshCache};
