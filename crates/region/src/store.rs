use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::time::Instant;

use tileworld_common::RegionCoord;

use crate::format::{RegionError, read_region, write_region};
use crate::meta::TileMeta;
use crate::region::Region;

/// File-backed region storage: one gzip-compressed file per region inside a
/// maps directory, keyed by region coordinates.
#[derive(Debug, Clone)]
pub struct RegionStore {
    dir: PathBuf,
}

impl RegionStore {
    /// Create a store rooted at the given maps directory. The directory is
    /// created lazily on the first save.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Path of the file backing region `(rx, ry)`.
    pub fn path(&self, coord: RegionCoord) -> PathBuf {
        self.dir.join(format!("region_{}_{}.bin", coord.rx, coord.ry))
    }

    /// Load a region from disk, or return a zero-filled default when no file
    /// exists yet. Format and IO failures propagate unchanged.
    pub fn load(&self, rx: i32, ry: i32) -> Result<Region, RegionError> {
        let coord = RegionCoord::new(rx, ry);
        let path = self.path(coord);
        if !path.exists() {
            tracing::debug!(%coord, "no region file, creating default");
            return Ok(Region::empty(rx, ry));
        }
        let start = Instant::now();
        let file = File::open(&path)?;
        let region = read_region(coord, BufReader::new(file))?;
        tracing::debug!(%coord, elapsed = ?start.elapsed(), "loaded region");
        Ok(region)
    }

    /// Write a region back to disk. Synchronous, un-batched, and without
    /// partial-write protection; an interrupted write can corrupt this
    /// region's file.
    pub fn save(&self, region: &Region) -> Result<(), RegionError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path(region.coord());
        let file = File::create(&path)?;
        write_region(region, file)?;
        tracing::debug!(coord = %region.coord(), ?path, "saved region");
        Ok(())
    }

    /// Path of the sidecar metadata file for a region.
    pub fn meta_path(&self, coord: RegionCoord) -> PathBuf {
        self.dir.join(format!("meta_{}_{}.json", coord.rx, coord.ry))
    }

    /// Load a region's sidecar tile metadata, keyed by `"lx,ly"`. A missing
    /// file is an empty map; malformed JSON propagates.
    pub fn load_meta(&self, coord: RegionCoord) -> Result<BTreeMap<String, TileMeta>, RegionError> {
        let path = self.meta_path(coord);
        if !path.exists() {
            return Ok(BTreeMap::new());
        }
        let file = File::open(&path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    /// Write a region's sidecar tile metadata.
    pub fn save_meta(
        &self,
        coord: RegionCoord,
        meta: &BTreeMap<String, TileMeta>,
    ) -> Result<(), RegionError> {
        std::fs::create_dir_all(&self.dir)?;
        let file = File::create(self.meta_path(coord))?;
        serde_json::to_writer_pretty(BufWriter::new(file), meta)?;
        Ok(())
    }
}
