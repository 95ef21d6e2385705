//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//!Elevation tile grids

use thiserror::Error;

/// Geographic extent
#[derive(PartialEq, Clone, Debug)]
pub struct Extent {
    pub minx: f64,
    pub miny: f64,
    pub maxx: f64,
    pub maxy: f64,
}

/// Min and max grid cell numbers, inclusive on both ends
#[derive(PartialEq, Clone, Debug)]
pub struct ExtentInt {
    pub minx: u32,
    pub miny: u32,
    pub maxx: u32,
    pub maxy: u32,
}

/// Bounding box input errors
#[derive(Error, Debug, PartialEq)]
pub enum BoundsError {
    #[error("invalid bbox '{0}': expected minLon,minLat,maxLon,maxLat")]
    InvalidFormat(String),
    #[error("bbox is empty or inverted")]
    Empty,
}

/// Highest zoom level supported by the u32 cell addressing
pub const MAX_ZOOM: u8 = 31;

// Subtracted from the maximum side before flooring, so a query edge landing
// exactly on a grid line does not pull in an extra column or row through
// floating-point representation error. Never applied to the minimum side,
// where floor() already rounds toward the correct lower tile.
// Fixed absolute tolerance in degree units; at extreme zoom levels the cell
// span approaches this value (known boundary-condition risk).
const EPSILON: f64 = 1e-12;

/// Quadtree tile grid
///
/// Zoom level `z` subdivides the reference extent into `2^z` columns and
/// `2^z` rows. Columns grow west to east, rows north to south: row 0 touches
/// the top edge of the reference extent.
#[derive(Clone, Debug)]
pub struct Grid {
    /// The geographical extent covered by the grid, in degrees.
    /// Must be specified as 4 floating point numbers ordered as minx, miny, maxx, maxy
    /// with minx < maxx and miny < maxy.
    pub extent: Extent,
}

impl Grid {
    /// Whole-globe WGS84 grid
    pub fn wgs84() -> Grid {
        Grid::new(Extent {
            minx: -180.0,
            miny: -90.0,
            maxx: 180.0,
            maxy: 90.0,
        })
    }

    pub fn new(extent: Extent) -> Grid {
        Grid { extent }
    }

    /// Number of columns (and rows) of a grid level
    pub fn level_dim(zoom: u8) -> u32 {
        1u32 << zoom
    }

    /// Extent of a given tile in the grid given its x, y and zoom
    ///
    /// Does not clamp or validate the x/y range. Out-of-range indices
    /// produce extents outside the reference extent; range checking is the
    /// caller's responsibility.
    pub fn tile_extent(&self, xtile: u32, ytile: u32, zoom: u8) -> Extent {
        let n = Self::level_dim(zoom) as f64;
        let lon_span = (self.extent.maxx - self.extent.minx) / n;
        let lat_span = (self.extent.maxy - self.extent.miny) / n;
        let minx = self.extent.minx + xtile as f64 * lon_span;
        let maxy = self.extent.maxy - ytile as f64 * lat_span;
        Extent {
            minx,
            miny: maxy - lat_span,
            maxx: minx + lon_span,
            maxy,
        }
    }

    /// Inclusive range of tile indices at `zoom` whose extents intersect
    /// `query`, clipped to the grid
    ///
    /// Returns `None` when the query does not intersect the grid at this
    /// zoom level. That is an expected outcome for queries outside the
    /// reference extent, not an error.
    pub fn tile_limits(&self, zoom: u8, query: &Extent) -> Option<ExtentInt> {
        let n = Self::level_dim(zoom);
        let lon_span = (self.extent.maxx - self.extent.minx) / n as f64;
        let lat_span = (self.extent.maxy - self.extent.miny) / n as f64;

        let x0 = ((query.minx - self.extent.minx) / lon_span).floor() as i64;
        let x1 = ((query.maxx - self.extent.minx - EPSILON) / lon_span).floor() as i64;
        // y is measured from the top (maxy) downward
        let y0 = ((self.extent.maxy - query.maxy) / lat_span).floor() as i64;
        let y1 = ((self.extent.maxy - query.miny - EPSILON) / lat_span).floor() as i64;

        let level_max = i64::from(n) - 1;
        if x1 < 0 || x0 > level_max || y1 < 0 || y0 > level_max {
            // query lies entirely outside the reference extent on some axis
            return None;
        }
        let (x0, x1) = (x0.max(0), x1.min(level_max));
        let (y0, y1) = (y0.max(0), y1.min(level_max));
        if x1 < x0 || y1 < y0 {
            return None;
        }
        Some(ExtentInt {
            minx: x0 as u32,
            miny: y0 as u32,
            maxx: x1 as u32,
            maxy: y1 as u32,
        })
    }

    /// Tile limits of all levels up to `maxzoom`, indexed by zoom
    pub fn level_limits(&self, query: &Extent, maxzoom: u8) -> Vec<Option<ExtentInt>> {
        (0..=maxzoom)
            .map(|zoom| self.tile_limits(zoom, query))
            .collect()
    }
}

/// Parse a `minLon,minLat,maxLon,maxLat` bounding box in EPSG:4326 degrees
///
/// Longitudes are clamped to [-180, 180] and latitudes to [-90, 90] after
/// parsing.
pub fn parse_bbox(bbox: &str) -> Result<Extent, BoundsError> {
    let parts: Vec<&str> = bbox.split(',').map(|p| p.trim()).collect();
    if parts.len() != 4 {
        return Err(BoundsError::InvalidFormat(bbox.to_string()));
    }
    let mut vals = [0.0f64; 4];
    for (i, part) in parts.iter().enumerate() {
        let v: f64 = part
            .parse()
            .map_err(|_| BoundsError::InvalidFormat(bbox.to_string()))?;
        if !v.is_finite() {
            return Err(BoundsError::InvalidFormat(bbox.to_string()));
        }
        vals[i] = v;
    }
    let (minx, miny, maxx, maxy) = (vals[0], vals[1], vals[2], vals[3]);
    if maxx <= minx || maxy <= miny {
        return Err(BoundsError::Empty);
    }
    let extent = Extent {
        minx: minx.max(-180.0).min(180.0),
        miny: miny.max(-90.0).min(90.0),
        maxx: maxx.max(-180.0).min(180.0),
        maxy: maxy.max(-90.0).min(90.0),
    };
    if extent.maxx <= extent.minx || extent.maxy <= extent.miny {
        return Err(BoundsError::Empty);
    }
    Ok(extent)
}
