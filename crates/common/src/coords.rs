/// Tiles per region edge. Fixed at startup; region files depend on it.
pub const REGION_SIZE: i32 = 64;

/// Chebyshev radius (in regions) kept resident around the reference region.
pub const VIEW_RADIUS: i32 = 1;

/// A 2D region coordinate in the world grid. Negative coordinates are valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionCoord {
    pub rx: i32,
    pub ry: i32,
}

impl RegionCoord {
    pub fn new(rx: i32, ry: i32) -> Self {
        Self { rx, ry }
    }

    /// Chebyshev distance to another region coordinate.
    pub fn chebyshev(&self, other: RegionCoord) -> i32 {
        (self.rx - other.rx).abs().max((self.ry - other.ry).abs())
    }
}

impl std::fmt::Display for RegionCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.rx, self.ry)
    }
}

/// Map a world tile coordinate to its owning region.
///
/// Uses floor division so the mapping is continuous across zero: tile -1
/// belongs to region -1, not region 0.
pub fn region_of(x: i32, y: i32) -> RegionCoord {
    RegionCoord::new(x.div_euclid(REGION_SIZE), y.div_euclid(REGION_SIZE))
}

/// Map a world tile coordinate to its local index within the owning region.
///
/// Euclidean modulo keeps the result in `0..REGION_SIZE` for negative inputs,
/// so `region_of(x, y).rx * REGION_SIZE + local_of(x, y).0 == x` always holds.
pub fn local_of(x: i32, y: i32) -> (i32, i32) {
    (x.rem_euclid(REGION_SIZE), y.rem_euclid(REGION_SIZE))
}
