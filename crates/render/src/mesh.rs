use std::collections::HashMap;

use tileworld_common::{REGION_SIZE, RegionCoord};
use tileworld_region::Region;
use tileworld_stream::RegionSink;

/// CPU-side mesh data for one region: a flat quad per tile, positioned in
/// world space at the region's block origin. No draw calls here; a GPU
/// backend uploads these buffers however it likes.
#[derive(Debug, Clone)]
pub struct HeightfieldMesh {
    pub coord: RegionCoord,
    /// `[x, y, z]` per vertex, 4 vertices per tile.
    pub vertices: Vec<[f32; 3]>,
    /// Two triangles per tile.
    pub indices: Vec<u32>,
    /// Grey shade per vertex derived from the overlay (or base) id.
    pub shades: Vec<f32>,
}

impl HeightfieldMesh {
    /// Build mesh data from a region's tile arrays.
    pub fn build(region: &Region) -> Self {
        let coord = region.coord();
        let (ox, oy) = (
            (coord.rx * REGION_SIZE) as f32,
            (coord.ry * REGION_SIZE) as f32,
        );
        let tiles = (REGION_SIZE * REGION_SIZE) as usize;
        let mut vertices = Vec::with_capacity(tiles * 4);
        let mut indices = Vec::with_capacity(tiles * 6);
        let mut shades = Vec::with_capacity(tiles * 4);

        let mut index = 0u32;
        for ly in 0..REGION_SIZE {
            for lx in 0..REGION_SIZE {
                let z = region.height(lx, ly) as f32;
                let id = if region.overlay(lx, ly) != 0 {
                    region.overlay(lx, ly)
                } else {
                    region.base(lx, ly)
                };
                let shade = if id != 0 { id as f32 / 255.0 } else { 0.2 };
                let (x, y) = (ox + lx as f32, oy + ly as f32);
                vertices.push([x, y, z]);
                vertices.push([x + 1.0, y, z]);
                vertices.push([x + 1.0, y + 1.0, z]);
                vertices.push([x, y + 1.0, z]);
                shades.extend_from_slice(&[shade; 4]);
                indices.extend_from_slice(&[index, index + 1, index + 2]);
                indices.extend_from_slice(&[index, index + 2, index + 3]);
                index += 4;
            }
        }
        Self {
            coord,
            vertices,
            indices,
            shades,
        }
    }
}

/// Keeps one mesh per resident region, rebuilt as the streaming window
/// moves. Plugs into the region manager as its render collaborator.
#[derive(Debug, Default)]
pub struct MeshCache {
    meshes: HashMap<RegionCoord, HeightfieldMesh>,
}

impl MeshCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, coord: RegionCoord) -> Option<&HeightfieldMesh> {
        self.meshes.get(&coord)
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }
}

impl RegionSink for MeshCache {
    fn region_loaded(&mut self, region: &Region) {
        tracing::debug!(coord = %region.coord(), "building region mesh");
        self.meshes.insert(region.coord(), HeightfieldMesh::build(region));
    }

    fn region_released(&mut self, coord: RegionCoord) {
        tracing::debug!(%coord, "releasing region mesh");
        self.meshes.remove(&coord);
    }
}

/// Text renderer for CLI output and tests: one character per tile, `#` for
/// blocked, `.` for open.
#[derive(Debug, Default)]
pub struct DebugTileRenderer;

impl DebugTileRenderer {
    pub fn render(region: &Region) -> String {
        let mut out = String::with_capacity(((REGION_SIZE + 1) * REGION_SIZE) as usize);
        for ly in 0..REGION_SIZE {
            for lx in 0..REGION_SIZE {
                out.push(if region.is_blocked(lx, ly) { '#' } else { '.' });
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mesh_has_four_vertices_per_tile() {
        let region = Region::empty(0, 0);
        let mesh = HeightfieldMesh::build(&region);
        let tiles = (REGION_SIZE * REGION_SIZE) as usize;
        assert_eq!(mesh.vertices.len(), tiles * 4);
        assert_eq!(mesh.indices.len(), tiles * 6);
        assert_eq!(mesh.shades.len(), tiles * 4);
    }

    #[test]
    fn mesh_is_positioned_at_the_region_origin() {
        let region = Region::empty(2, -1);
        let mesh = HeightfieldMesh::build(&region);
        assert_eq!(
            mesh.vertices[0],
            [(2 * REGION_SIZE) as f32, (-REGION_SIZE) as f32, 0.0]
        );
    }

    #[test]
    fn mesh_height_comes_from_the_height_grid() {
        let mut region = Region::empty(0, 0);
        region.set_height(0, 0, 7);
        let mesh = HeightfieldMesh::build(&region);
        assert_eq!(mesh.vertices[0][2], 7.0);
    }

    #[test]
    fn overlay_wins_over_base_for_shading() {
        let mut region = Region::empty(0, 0);
        region.set_base(0, 0, 51);
        region.set_overlay(0, 0, 255);
        let mesh = HeightfieldMesh::build(&region);
        assert_eq!(mesh.shades[0], 1.0);
    }

    #[test]
    fn cache_tracks_load_and_release() {
        let mut cache = MeshCache::new();
        let region = Region::empty(1, 1);
        cache.region_loaded(&region);
        assert_eq!(cache.len(), 1);
        assert!(cache.get(RegionCoord::new(1, 1)).is_some());

        cache.region_released(RegionCoord::new(1, 1));
        assert!(cache.is_empty());
    }

    #[test]
    fn debug_renderer_marks_blocked_tiles() {
        let mut region = Region::empty(0, 0);
        region.set_blocked(1, 0, true);
        let text = DebugTileRenderer::render(&region);
        let first_line = text.lines().next().unwrap();
        assert!(first_line.starts_with(".#."));
    }
}
