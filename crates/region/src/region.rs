use tileworld_common::{REGION_SIZE, RegionCoord};

use crate::format::TEXTURE_DIM;

/// Tile flag bit marking a blocked (non-walkable) tile. Remaining bits are
/// reserved and must survive save/load untouched.
pub const FLAG_BLOCKED: u8 = 0x1;

const TILES: usize = (REGION_SIZE * REGION_SIZE) as usize;
const TEXELS: usize = (TEXTURE_DIM * TEXTURE_DIM) as usize;

/// A fixed-size block of tile data; the unit of streaming and persistence.
///
/// Holds four parallel row-major grids (`height`, `base`, `overlay`, `flags`)
/// plus a 16x16 texture raster per tile. Local indices are `(lx, ly)` in
/// `0..REGION_SIZE`, row-major with `ly` selecting the row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    coord: RegionCoord,
    pub(crate) height: Vec<i16>,
    pub(crate) base: Vec<u8>,
    pub(crate) overlay: Vec<u8>,
    pub(crate) flags: Vec<u8>,
    pub(crate) textures: Vec<u8>,
    needs_remesh: bool,
}

impl Region {
    /// Create a zero-filled region at the given coordinates.
    pub fn empty(rx: i32, ry: i32) -> Self {
        Self {
            coord: RegionCoord::new(rx, ry),
            height: vec![0; TILES],
            base: vec![0; TILES],
            overlay: vec![0; TILES],
            flags: vec![0; TILES],
            textures: vec![0; TILES * TEXELS],
            needs_remesh: false,
        }
    }

    pub(crate) fn from_parts(
        coord: RegionCoord,
        height: Vec<i16>,
        base: Vec<u8>,
        overlay: Vec<u8>,
        flags: Vec<u8>,
        textures: Vec<u8>,
    ) -> Self {
        debug_assert_eq!(height.len(), TILES);
        debug_assert_eq!(base.len(), TILES);
        debug_assert_eq!(overlay.len(), TILES);
        debug_assert_eq!(flags.len(), TILES);
        debug_assert_eq!(textures.len(), TILES * TEXELS);
        Self {
            coord,
            height,
            base,
            overlay,
            flags,
            textures,
            needs_remesh: false,
        }
    }

    pub fn coord(&self) -> RegionCoord {
        self.coord
    }

    fn idx(lx: i32, ly: i32) -> usize {
        assert!(
            (0..REGION_SIZE).contains(&lx) && (0..REGION_SIZE).contains(&ly),
            "local tile index out of range: ({lx}, {ly})"
        );
        (ly * REGION_SIZE + lx) as usize
    }

    pub fn height(&self, lx: i32, ly: i32) -> i16 {
        self.height[Self::idx(lx, ly)]
    }

    pub fn set_height(&mut self, lx: i32, ly: i32, v: i16) {
        self.height[Self::idx(lx, ly)] = v;
        self.needs_remesh = true;
    }

    pub fn base(&self, lx: i32, ly: i32) -> u8 {
        self.base[Self::idx(lx, ly)]
    }

    pub fn set_base(&mut self, lx: i32, ly: i32, v: u8) {
        self.base[Self::idx(lx, ly)] = v;
        self.needs_remesh = true;
    }

    pub fn overlay(&self, lx: i32, ly: i32) -> u8 {
        self.overlay[Self::idx(lx, ly)]
    }

    pub fn set_overlay(&mut self, lx: i32, ly: i32, v: u8) {
        self.overlay[Self::idx(lx, ly)] = v;
        self.needs_remesh = true;
    }

    /// Raw flag byte for a tile.
    pub fn flags(&self, lx: i32, ly: i32) -> u8 {
        self.flags[Self::idx(lx, ly)]
    }

    /// Whether the BLOCKED bit is set for a tile.
    pub fn is_blocked(&self, lx: i32, ly: i32) -> bool {
        self.flags[Self::idx(lx, ly)] & FLAG_BLOCKED != 0
    }

    /// Set or clear the BLOCKED bit, leaving the reserved bits alone.
    pub fn set_blocked(&mut self, lx: i32, ly: i32, blocked: bool) {
        let i = Self::idx(lx, ly);
        if blocked {
            self.flags[i] |= FLAG_BLOCKED;
        } else {
            self.flags[i] &= !FLAG_BLOCKED;
        }
        self.needs_remesh = true;
    }

    /// The 16x16 texture raster for a tile, row-major.
    pub fn texture(&self, lx: i32, ly: i32) -> &[u8] {
        let i = Self::idx(lx, ly) * TEXELS;
        &self.textures[i..i + TEXELS]
    }

    /// Paint a single texel within a tile's raster.
    pub fn set_texel(&mut self, lx: i32, ly: i32, tx: i32, ty: i32, v: u8) {
        assert!(
            (0..TEXTURE_DIM).contains(&tx) && (0..TEXTURE_DIM).contains(&ty),
            "texel index out of range: ({tx}, {ty})"
        );
        let i = Self::idx(lx, ly) * TEXELS + (ty * TEXTURE_DIM + tx) as usize;
        self.textures[i] = v;
        self.needs_remesh = true;
    }

    /// Whether a tile mutation has happened since the mesh was last refreshed.
    pub fn needs_remesh(&self) -> bool {
        self.needs_remesh
    }

    /// Consume the remesh signal. The render collaborator calls this after
    /// rebuilding its mesh for this region.
    pub fn take_needs_remesh(&mut self) -> bool {
        std::mem::take(&mut self.needs_remesh)
    }
}
