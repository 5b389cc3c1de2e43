//! Versioned binary layout for region files.
//!
//! Layout after gzip decompression:
//! ```text
//! u16 LE   file version (1 or 2)
//! i16 LE   height, REGION_SIZE^2 tiles row-major
//! u8       base,    REGION_SIZE^2
//! u8       overlay, REGION_SIZE^2
//! u8       flags,   REGION_SIZE^2
//! u8       texture raster, REGION_SIZE^2 * 16 * 16   (version >= 2 only)
//! ```
//! Version 1 files predate the raster; loading one yields an all-zero raster.
//! Any other version is corruption or a format mismatch and must propagate.

use std::io::{self, Read, Write};

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use tileworld_common::{REGION_SIZE, RegionCoord};

use crate::region::Region;

/// Version written by `save()`. Loads accept 1 and 2.
pub const FILE_VERSION: u16 = 2;

/// Edge length of the per-tile texture raster.
pub const TEXTURE_DIM: i32 = 16;

const TILES: usize = (REGION_SIZE * REGION_SIZE) as usize;
const TEXELS: usize = (TEXTURE_DIM * TEXTURE_DIM) as usize;

/// Errors from region load/save.
#[derive(Debug, thiserror::Error)]
pub enum RegionError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("unsupported region version {found} (expected 1 or {FILE_VERSION})")]
    UnsupportedVersion { found: u16 },
    #[error("truncated region payload while reading {0}")]
    Truncated(&'static str),
    #[error("malformed tile metadata: {0}")]
    Meta(#[from] serde_json::Error),
}

/// Compress and write a region through a gzip stream.
pub(crate) fn write_region<W: Write>(region: &Region, writer: W) -> Result<(), RegionError> {
    let mut enc = GzEncoder::new(writer, Compression::default());
    enc.write_all(&FILE_VERSION.to_le_bytes())?;
    let mut heights = Vec::with_capacity(TILES * 2);
    for h in &region.height {
        heights.extend_from_slice(&h.to_le_bytes());
    }
    enc.write_all(&heights)?;
    enc.write_all(&region.base)?;
    enc.write_all(&region.overlay)?;
    enc.write_all(&region.flags)?;
    enc.write_all(&region.textures)?;
    enc.finish()?;
    Ok(())
}

/// Decompress and parse a region from a gzip stream.
pub(crate) fn read_region<R: Read>(coord: RegionCoord, reader: R) -> Result<Region, RegionError> {
    let mut dec = GzDecoder::new(reader);

    let mut version_bytes = [0u8; 2];
    read_field(&mut dec, &mut version_bytes, "version")?;
    let version = u16::from_le_bytes(version_bytes);
    if version != 1 && version != FILE_VERSION {
        return Err(RegionError::UnsupportedVersion { found: version });
    }

    let mut height_bytes = vec![0u8; TILES * 2];
    read_field(&mut dec, &mut height_bytes, "height")?;
    let height = height_bytes
        .chunks_exact(2)
        .map(|c| i16::from_le_bytes([c[0], c[1]]))
        .collect();

    let mut base = vec![0u8; TILES];
    read_field(&mut dec, &mut base, "base")?;
    let mut overlay = vec![0u8; TILES];
    read_field(&mut dec, &mut overlay, "overlay")?;
    let mut flags = vec![0u8; TILES];
    read_field(&mut dec, &mut flags, "flags")?;

    let mut textures = vec![0u8; TILES * TEXELS];
    if version >= 2 {
        read_field(&mut dec, &mut textures, "textures")?;
    }

    Ok(Region::from_parts(coord, height, base, overlay, flags, textures))
}

fn read_field<R: Read>(
    reader: &mut R,
    buf: &mut [u8],
    what: &'static str,
) -> Result<(), RegionError> {
    reader.read_exact(buf).map_err(|e| {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            RegionError::Truncated(what)
        } else {
            RegionError::Io(e)
        }
    })
}
