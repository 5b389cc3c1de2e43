use tileworld_common::REGION_SIZE;
use tileworld_region::Region;
use tileworld_stream::RegionManager;

/// Read-only queries against regions and streaming state for debugging,
/// profiling, and development UI.
pub struct RegionInspector;

impl RegionInspector {
    /// Produce a per-region summary.
    pub fn summary(region: &Region) -> RegionReport {
        let mut blocked = 0usize;
        let mut overlaid = 0usize;
        let mut painted = 0usize;
        let mut min_height = i16::MAX;
        let mut max_height = i16::MIN;
        for ly in 0..REGION_SIZE {
            for lx in 0..REGION_SIZE {
                if region.is_blocked(lx, ly) {
                    blocked += 1;
                }
                if region.overlay(lx, ly) != 0 {
                    overlaid += 1;
                }
                if region.texture(lx, ly).iter().any(|&t| t != 0) {
                    painted += 1;
                }
                let h = region.height(lx, ly);
                min_height = min_height.min(h);
                max_height = max_height.max(h);
            }
        }
        RegionReport {
            rx: region.coord().rx,
            ry: region.coord().ry,
            blocked,
            overlaid,
            painted,
            min_height,
            max_height,
        }
    }

    /// Produce a summary of the streaming state.
    pub fn stream_report(manager: &RegionManager) -> StreamReport {
        StreamReport {
            resident: manager.loaded().len(),
            cached: manager.cache_len(),
            view_radius: manager.view_radius(),
        }
    }
}

/// Summary of one region's tile data.
#[derive(Debug, Clone)]
pub struct RegionReport {
    pub rx: i32,
    pub ry: i32,
    /// Tiles with the BLOCKED flag set.
    pub blocked: usize,
    /// Tiles with a nonzero overlay id.
    pub overlaid: usize,
    /// Tiles whose texture raster has at least one nonzero texel.
    pub painted: usize,
    pub min_height: i16,
    pub max_height: i16,
}

impl std::fmt::Display for RegionReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Region ({}, {}): blocked={} overlaid={} painted={} height={}..={}",
            self.rx,
            self.ry,
            self.blocked,
            self.overlaid,
            self.painted,
            self.min_height,
            self.max_height
        )
    }
}

/// Summary of the streaming window.
#[derive(Debug, Clone)]
pub struct StreamReport {
    pub resident: usize,
    pub cached: usize,
    pub view_radius: i32,
}

impl std::fmt::Display for StreamReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Streaming: resident={} cached={} view_radius={}",
            self.resident, self.cached, self.view_radius
        )
    }
}
