use std::collections::{HashMap, HashSet, VecDeque};

use tileworld_common::{RegionCoord, VIEW_RADIUS, region_of};
use tileworld_region::{Region, RegionError, RegionStore};

use crate::worker::LoadWorker;

/// Render-side collaborator notified as regions enter and leave the resident
/// window. Passed in explicitly so headless and test setups simply omit it.
///
/// `region_released` fires before the region leaves the window, so the
/// implementor can drop any mesh or GPU resource keyed by the coordinate.
pub trait RegionSink {
    fn region_loaded(&mut self, region: &Region);
    fn region_released(&mut self, coord: RegionCoord);
}

/// Streaming configuration, fixed at construction.
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// Chebyshev radius (in regions) kept resident around the reference point.
    pub view_radius: i32,
    /// Load regions on a background thread instead of blocking `ensure`.
    pub async_load: bool,
    /// Capacity of the secondary parsed-region cache. Zero disables it.
    pub cache_capacity: usize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            view_radius: VIEW_RADIUS,
            async_load: false,
            cache_capacity: 32,
        }
    }
}

/// Keeps a square window of regions resident around a reference point.
///
/// Per-region lifecycle: absent -> pending (async mode) -> loaded, or
/// absent -> loaded directly in sync mode. Evicted regions are retained in a
/// bounded FIFO cache so re-entering an area avoids a disk round trip.
pub struct RegionManager {
    store: RegionStore,
    config: StreamConfig,
    loaded: HashMap<RegionCoord, Region>,
    pending: HashSet<RegionCoord>,
    cache: HashMap<RegionCoord, Region>,
    cache_order: VecDeque<RegionCoord>,
    worker: Option<LoadWorker>,
    sink: Option<Box<dyn RegionSink>>,
}

impl RegionManager {
    pub fn new(store: RegionStore, config: StreamConfig) -> Self {
        let worker = config
            .async_load
            .then(|| LoadWorker::spawn(store.clone()));
        Self {
            store,
            config,
            loaded: HashMap::new(),
            pending: HashSet::new(),
            cache: HashMap::new(),
            cache_order: VecDeque::new(),
            worker,
            sink: None,
        }
    }

    /// Attach the render collaborator notified on load/release.
    pub fn set_sink(&mut self, sink: Box<dyn RegionSink>) {
        self.sink = Some(sink);
    }

    /// The resident window, keyed by region coordinates.
    pub fn loaded(&self) -> &HashMap<RegionCoord, Region> {
        &self.loaded
    }

    pub fn get(&self, coord: RegionCoord) -> Option<&Region> {
        self.loaded.get(&coord)
    }

    pub fn get_mut(&mut self, coord: RegionCoord) -> Option<&mut Region> {
        self.loaded.get_mut(&coord)
    }

    pub fn is_pending(&self, coord: RegionCoord) -> bool {
        self.pending.contains(&coord)
    }

    pub fn view_radius(&self) -> i32 {
        self.config.view_radius
    }

    pub fn store(&self) -> &RegionStore {
        &self.store
    }

    /// Number of parsed regions retained in the secondary cache.
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Drop every cached region.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
        self.cache_order.clear();
    }

    fn wanted(&self, center: RegionCoord) -> HashSet<RegionCoord> {
        let r = self.config.view_radius;
        let mut want = HashSet::with_capacity(((2 * r + 1) * (2 * r + 1)) as usize);
        for i in -r..=r {
            for j in -r..=r {
                want.insert(RegionCoord::new(center.rx + i, center.ry + j));
            }
        }
        want
    }

    /// Bring the window around world tile `(x, y)` resident.
    ///
    /// Evicts regions outside the window (releasing them through the sink
    /// first), cancels stale pending loads, adopts completed background
    /// loads, then loads whatever is still missing. In sync mode the call
    /// blocks until every wanted region is loaded; in async mode missing
    /// regions are submitted to the worker and adopted on a later call.
    pub fn ensure(&mut self, x: i32, y: i32) -> Result<(), RegionError> {
        let center = region_of(x, y);
        let _span = tracing::info_span!("ensure", %center).entered();
        let want = self.wanted(center);

        // Evict regions that left the window, render resources first.
        let gone: Vec<RegionCoord> = self
            .loaded
            .keys()
            .filter(|k| !want.contains(k))
            .copied()
            .collect();
        for key in gone {
            if let Some(sink) = self.sink.as_deref_mut() {
                sink.region_released(key);
            }
            if let Some(region) = self.loaded.remove(&key) {
                tracing::debug!(%key, "evicted region");
                self.cache_insert(key, region);
            }
        }

        // Cancel pending loads that left the window. Best-effort: an already
        // started load still completes and is discarded on poll.
        self.pending.retain(|k| want.contains(k));

        // Adopt completed background loads.
        if let Some(worker) = &self.worker {
            for (coord, result) in worker.poll() {
                if !self.pending.remove(&coord) {
                    tracing::debug!(%coord, "dropping cancelled load result");
                    continue;
                }
                // Pending was filtered to the window above, so any result
                // that survives the remove is wanted.
                let region = result?;
                self.adopt(coord, region);
            }
        }

        // Load whatever the window still misses.
        for key in want {
            if self.loaded.contains_key(&key) || self.pending.contains(&key) {
                continue;
            }
            if let Some(region) = self.cache_take(key) {
                tracing::debug!(%key, "region cache hit");
                self.adopt(key, region);
            } else if let Some(worker) = &self.worker {
                worker.submit(key);
                self.pending.insert(key);
            } else if self.config.async_load {
                // Worker was shut down; no further loads are serviced.
                tracing::debug!(%key, "skipping load after shutdown");
            } else {
                let region = self.store.load(key.rx, key.ry)?;
                self.adopt(key, region);
            }
        }

        tracing::trace!(
            loaded = self.loaded.len(),
            pending = self.pending.len(),
            cached = self.cache.len(),
            "ensure complete"
        );
        Ok(())
    }

    fn adopt(&mut self, coord: RegionCoord, region: Region) {
        if let Some(sink) = self.sink.as_deref_mut() {
            sink.region_loaded(&region);
        }
        self.loaded.insert(coord, region);
    }

    fn cache_insert(&mut self, coord: RegionCoord, region: Region) {
        if self.config.cache_capacity == 0 {
            return;
        }
        if self.cache.insert(coord, region).is_none() {
            self.cache_order.push_back(coord);
        }
        while self.cache.len() > self.config.cache_capacity {
            // FIFO by insertion order.
            if let Some(oldest) = self.cache_order.pop_front() {
                self.cache.remove(&oldest);
            }
        }
    }

    fn cache_take(&mut self, coord: RegionCoord) -> Option<Region> {
        let region = self.cache.remove(&coord)?;
        self.cache_order.retain(|c| *c != coord);
        Some(region)
    }

    /// Stop the background worker. Pending loads are abandoned and no loads
    /// are serviced afterwards.
    pub fn shutdown(&mut self) {
        if let Some(mut worker) = self.worker.take() {
            worker.shutdown();
        }
        self.pending.clear();
    }
}

impl Drop for RegionManager {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};
    use tileworld_common::REGION_SIZE;

    fn sync_manager(dir: &std::path::Path, radius: i32) -> RegionManager {
        RegionManager::new(
            RegionStore::new(dir),
            StreamConfig {
                view_radius: radius,
                ..StreamConfig::default()
            },
        )
    }

    #[test]
    fn ensure_fills_the_window() {
        let tmp = tempfile::tempdir().unwrap();
        let mut mgr = sync_manager(tmp.path(), 1);
        mgr.ensure(10, 10).unwrap();
        assert_eq!(mgr.loaded().len(), 9);
        assert!(mgr.get(RegionCoord::new(-1, -1)).is_some());
        assert!(mgr.get(RegionCoord::new(1, 1)).is_some());
    }

    #[test]
    fn crossing_a_boundary_shifts_the_window() {
        let tmp = tempfile::tempdir().unwrap();
        let mut mgr = sync_manager(tmp.path(), 1);
        mgr.ensure(10, 10).unwrap();

        mgr.ensure(REGION_SIZE + 1, 10).unwrap();
        assert!(mgr.get(RegionCoord::new(2, 0)).is_some());
        assert!(mgr.get(RegionCoord::new(-1, 0)).is_none());
        assert_eq!(mgr.loaded().len(), 9);
    }

    #[test]
    fn streaming_bound_holds_under_movement() {
        let tmp = tempfile::tempdir().unwrap();
        for radius in [0, 1, 2] {
            let mut mgr = sync_manager(tmp.path(), radius);
            let stops = [
                (0, 0),
                (REGION_SIZE * 3, -REGION_SIZE),
                (-5 * REGION_SIZE, 7 * REGION_SIZE),
                (1, -1),
            ];
            for &(x, y) in &stops {
                mgr.ensure(x, y).unwrap();
                let bound = ((2 * radius + 1) * (2 * radius + 1)) as usize;
                assert!(mgr.loaded().len() <= bound);
                let center = region_of(x, y);
                for key in mgr.loaded().keys() {
                    assert!(key.chebyshev(center) <= radius);
                }
            }
        }
    }

    #[test]
    fn eviction_keeps_edits_in_the_cache() {
        let tmp = tempfile::tempdir().unwrap();
        let mut mgr = sync_manager(tmp.path(), 1);
        mgr.ensure(0, 0).unwrap();
        mgr.get_mut(RegionCoord::new(0, 0))
            .unwrap()
            .set_blocked(5, 5, true);

        // Walk far enough that region (0, 0) is evicted, then come back.
        mgr.ensure(REGION_SIZE * 10, 0).unwrap();
        assert!(mgr.get(RegionCoord::new(0, 0)).is_none());
        assert!(mgr.cache_len() > 0);

        mgr.ensure(0, 0).unwrap();
        // The edit was never saved; seeing it proves the cache was used
        // instead of a disk read.
        assert!(mgr.get(RegionCoord::new(0, 0)).unwrap().is_blocked(5, 5));
    }

    #[test]
    fn cache_capacity_is_enforced_fifo() {
        let tmp = tempfile::tempdir().unwrap();
        let mut mgr = RegionManager::new(
            RegionStore::new(tmp.path()),
            StreamConfig {
                view_radius: 1,
                async_load: false,
                cache_capacity: 4,
            },
        );
        // Each far jump evicts the full previous 3x3 window.
        mgr.ensure(0, 0).unwrap();
        mgr.ensure(REGION_SIZE * 100, 0).unwrap();
        assert!(mgr.cache_len() <= 4);
        mgr.ensure(-REGION_SIZE * 100, 0).unwrap();
        assert!(mgr.cache_len() <= 4);
    }

    #[test]
    fn zero_capacity_disables_the_cache() {
        let tmp = tempfile::tempdir().unwrap();
        let mut mgr = RegionManager::new(
            RegionStore::new(tmp.path()),
            StreamConfig {
                view_radius: 1,
                async_load: false,
                cache_capacity: 0,
            },
        );
        mgr.ensure(0, 0).unwrap();
        mgr.ensure(REGION_SIZE * 100, 0).unwrap();
        assert_eq!(mgr.cache_len(), 0);
    }

    #[test]
    fn clear_cache_empties_it() {
        let tmp = tempfile::tempdir().unwrap();
        let mut mgr = sync_manager(tmp.path(), 1);
        mgr.ensure(0, 0).unwrap();
        mgr.ensure(REGION_SIZE * 10, 0).unwrap();
        assert!(mgr.cache_len() > 0);
        mgr.clear_cache();
        assert_eq!(mgr.cache_len(), 0);
    }

    fn wait_for_window(mgr: &mut RegionManager, x: i32, y: i32, count: usize) {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            mgr.ensure(x, y).unwrap();
            if mgr.loaded().len() == count {
                return;
            }
            assert!(Instant::now() < deadline, "window never filled");
            std::thread::sleep(Duration::from_millis(2));
        }
    }

    #[test]
    fn async_loads_are_adopted_on_later_ensure() {
        let tmp = tempfile::tempdir().unwrap();
        let mut mgr = RegionManager::new(
            RegionStore::new(tmp.path()),
            StreamConfig {
                view_radius: 1,
                async_load: true,
                cache_capacity: 32,
            },
        );
        mgr.ensure(0, 0).unwrap();
        // Non-blocking: the first call only submits.
        wait_for_window(&mut mgr, 0, 0, 9);
        mgr.shutdown();
    }

    #[test]
    fn cancelled_async_loads_are_discarded() {
        let tmp = tempfile::tempdir().unwrap();
        let mut mgr = RegionManager::new(
            RegionStore::new(tmp.path()),
            StreamConfig {
                view_radius: 1,
                async_load: true,
                cache_capacity: 32,
            },
        );
        mgr.ensure(0, 0).unwrap();
        // Jump away before the first window finishes loading.
        wait_for_window(&mut mgr, REGION_SIZE * 50, 0, 9);
        let center = RegionCoord::new(50, 0);
        for key in mgr.loaded().keys() {
            assert!(key.chebyshev(center) <= 1);
        }
        mgr.shutdown();
    }

    #[test]
    fn async_load_errors_surface_on_adoption() {
        let tmp = tempfile::tempdir().unwrap();
        let store = RegionStore::new(tmp.path());
        std::fs::write(store.path(RegionCoord::new(0, 0)), b"not gzip at all").unwrap();

        let mut mgr = RegionManager::new(
            store,
            StreamConfig {
                view_radius: 1,
                async_load: true,
                cache_capacity: 32,
            },
        );
        let deadline = Instant::now() + Duration::from_secs(5);
        let err = loop {
            match mgr.ensure(0, 0) {
                Err(e) => break e,
                Ok(()) => {
                    assert!(Instant::now() < deadline, "load error never surfaced");
                    std::thread::sleep(Duration::from_millis(2));
                }
            }
        };
        assert!(matches!(err, RegionError::Io(_)));
        mgr.shutdown();
    }

    #[test]
    fn shutdown_stops_servicing_loads() {
        let tmp = tempfile::tempdir().unwrap();
        let mut mgr = RegionManager::new(
            RegionStore::new(tmp.path()),
            StreamConfig {
                view_radius: 1,
                async_load: true,
                cache_capacity: 32,
            },
        );
        mgr.shutdown();
        mgr.ensure(0, 0).unwrap();
        std::thread::sleep(Duration::from_millis(20));
        mgr.ensure(0, 0).unwrap();
        assert!(mgr.loaded().is_empty());
    }

    struct CountingSink {
        loads: std::rc::Rc<std::cell::RefCell<Vec<RegionCoord>>>,
        releases: std::rc::Rc<std::cell::RefCell<Vec<RegionCoord>>>,
    }

    impl RegionSink for CountingSink {
        fn region_loaded(&mut self, region: &Region) {
            self.loads.borrow_mut().push(region.coord());
        }
        fn region_released(&mut self, coord: RegionCoord) {
            self.releases.borrow_mut().push(coord);
        }
    }

    #[test]
    fn sink_sees_loads_and_releases() {
        let tmp = tempfile::tempdir().unwrap();
        let loads = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let releases = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));

        let mut mgr = sync_manager(tmp.path(), 1);
        mgr.set_sink(Box::new(CountingSink {
            loads: loads.clone(),
            releases: releases.clone(),
        }));

        mgr.ensure(0, 0).unwrap();
        assert_eq!(loads.borrow().len(), 9);
        assert!(releases.borrow().is_empty());

        mgr.ensure(REGION_SIZE * 10, 0).unwrap();
        assert_eq!(releases.borrow().len(), 9);
    }
}
