use std::collections::HashSet;

use tileworld_common::{NavGrid, REGION_SIZE, RegionCoord, local_of, region_of};
use tileworld_region::{Region, RegionError, RegionStore};
use tileworld_stream::{RegionManager, RegionSink, StreamConfig};

/// Errors surfaced by world operations.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    #[error(transparent)]
    Region(#[from] RegionError),
    /// The owning region could not be made resident (still loading in async
    /// mode, or the worker was shut down).
    #[error("region {0} is not resident")]
    NotResident(RegionCoord),
}

/// Facade over the streaming window: walkability queries, tile edits, and the
/// stitched multi-region window consumed by the pathfinder.
pub struct World {
    manager: RegionManager,
    current_region: Option<RegionCoord>,
    dirty: HashSet<RegionCoord>,
}

impl World {
    /// World with default streaming configuration (sync loads, view radius 1).
    pub fn new(store: RegionStore) -> Self {
        Self::with_config(store, StreamConfig::default())
    }

    pub fn with_config(store: RegionStore, config: StreamConfig) -> Self {
        Self {
            manager: RegionManager::new(store, config),
            current_region: None,
            dirty: HashSet::new(),
        }
    }

    /// Attach the render collaborator. Forwarded to the region manager.
    pub fn set_sink(&mut self, sink: Box<dyn RegionSink>) {
        self.manager.set_sink(sink);
    }

    pub fn manager(&self) -> &RegionManager {
        &self.manager
    }

    /// Reference region recorded by the last `update_streaming` call.
    pub fn current_region(&self) -> Option<RegionCoord> {
        self.current_region
    }

    /// Recompute the resident window when the reference point has crossed a
    /// region boundary. Sub-tile movement within one region is free.
    pub fn update_streaming(&mut self, x: i32, y: i32) -> Result<(), WorldError> {
        let here = region_of(x, y);
        if self.current_region != Some(here) {
            self.current_region = Some(here);
            self.manager.ensure(x, y)?;
        }
        Ok(())
    }

    /// Whether world tile `(x, y)` is traversable.
    ///
    /// Triggers `ensure` when the owning region is absent; `Ok(false)` when
    /// the region still cannot be made resident afterwards.
    pub fn is_walkable(&mut self, x: i32, y: i32) -> Result<bool, WorldError> {
        let coord = region_of(x, y);
        if self.manager.get(coord).is_none() {
            self.manager.ensure(x, y)?;
        }
        let Some(region) = self.manager.get(coord) else {
            return Ok(false);
        };
        let (lx, ly) = local_of(x, y);
        Ok(!region.is_blocked(lx, ly))
    }

    /// Stitched walkability window over the 3x3 regions around `(cx, cy)`.
    ///
    /// Returns a `(3*REGION_SIZE)^2` nav grid (1 = walkable) plus the offsets
    /// translating window-local coordinates back to world space: local
    /// `(lx, ly)` is world `(lx + offset_x, ly + offset_y)`. Rebuilt fresh on
    /// every call, never persisted. Requires a view radius of at least 1 so
    /// the full neighborhood can be resident.
    pub fn walkable_window(&mut self, cx: i32, cy: i32) -> Result<(NavGrid, i32, i32), WorldError> {
        let center = region_of(cx, cy);
        self.manager.ensure(cx, cy)?;

        let s = REGION_SIZE;
        let mut grid = NavGrid::filled(3 * s, 3 * s, 0);
        for (row, j) in (-1..=1).enumerate() {
            for (col, i) in (-1..=1).enumerate() {
                let coord = RegionCoord::new(center.rx + i, center.ry + j);
                let region = self
                    .manager
                    .get(coord)
                    .ok_or(WorldError::NotResident(coord))?;
                blit_block(&mut grid, region, col as i32 * s, row as i32 * s);
            }
        }

        let offset_x = (center.rx - 1) * s;
        let offset_y = (center.ry - 1) * s;
        Ok((grid, offset_x, offset_y))
    }

    fn edit_region<T>(
        &mut self,
        x: i32,
        y: i32,
        f: impl FnOnce(&mut Region, i32, i32) -> T,
    ) -> Result<T, WorldError> {
        let coord = region_of(x, y);
        if self.manager.get(coord).is_none() {
            self.manager.ensure(x, y)?;
        }
        let region = self
            .manager
            .get_mut(coord)
            .ok_or(WorldError::NotResident(coord))?;
        let (lx, ly) = local_of(x, y);
        self.dirty.insert(coord);
        Ok(f(region, lx, ly))
    }

    /// Set or clear the BLOCKED flag at a world tile. Returns the old state.
    pub fn set_blocked(&mut self, x: i32, y: i32, blocked: bool) -> Result<bool, WorldError> {
        self.edit_region(x, y, |r, lx, ly| {
            let old = r.is_blocked(lx, ly);
            r.set_blocked(lx, ly, blocked);
            old
        })
    }

    /// Set the overlay id at a world tile. Returns the old value.
    pub fn set_overlay(&mut self, x: i32, y: i32, v: u8) -> Result<u8, WorldError> {
        self.edit_region(x, y, |r, lx, ly| {
            let old = r.overlay(lx, ly);
            r.set_overlay(lx, ly, v);
            old
        })
    }

    /// Paint one texel of a tile's texture raster. Returns the old value.
    pub fn paint_texel(
        &mut self,
        x: i32,
        y: i32,
        tx: i32,
        ty: i32,
        v: u8,
    ) -> Result<u8, WorldError> {
        self.edit_region(x, y, |r, lx, ly| {
            let old = r.texture(lx, ly)[(ty * tileworld_region::TEXTURE_DIM + tx) as usize];
            r.set_texel(lx, ly, tx, ty, v);
            old
        })
    }

    /// Save every resident region edited since the last save. Returns how
    /// many files were written.
    pub fn save_dirty(&mut self) -> Result<usize, WorldError> {
        let mut written = 0;
        let coords: Vec<RegionCoord> = self.dirty.iter().copied().collect();
        for coord in coords {
            if let Some(region) = self.manager.get(coord) {
                self.manager.store().save(region)?;
                self.dirty.remove(&coord);
                written += 1;
            }
        }
        Ok(written)
    }

    pub fn shutdown(&mut self) {
        self.manager.shutdown();
    }
}

fn blit_block(grid: &mut NavGrid, region: &Region, x0: i32, y0: i32) {
    for ly in 0..REGION_SIZE {
        for lx in 0..REGION_SIZE {
            let walkable = !region.is_blocked(lx, ly);
            grid.set(x0 + lx, y0 + ly, walkable as u8);
        }
    }
}
