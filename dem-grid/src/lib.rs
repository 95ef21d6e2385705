//! A library for elevation tile grid calculations
//!
//! ## Predefined grid
//!
//! ```rust
//! use dem_grid::{Extent, Grid};
//!
//! let grid = Grid::wgs84();
//! assert_eq!(
//!     grid.tile_extent(0, 0, 0),
//!     Extent {
//!         minx: -180.0,
//!         miny: -90.0,
//!         maxx: 180.0,
//!         maxy: 90.0,
//!     }
//! );
//! ```
//!
//! ## Grid iterators
//!
//! ```rust
//! use dem_grid::{Grid, GridIterator};
//!
//! let grid = Grid::wgs84();
//! let limits = grid.level_limits(&grid.extent.clone(), 2);
//! let griditer = GridIterator::new(0, 2, limits);
//! for (z, x, y) in griditer {
//!     println!("Tile {}/{}/{}", z, x, y);
//! }
//! ```
//!
//! ## Custom grids
//!
//! ```rust
//! use dem_grid::{Extent, Grid};
//!
//! let grid = Grid::new(Extent {
//!     minx: 5.0,
//!     miny: 45.0,
//!     maxx: 11.0,
//!     maxy: 48.0,
//! });
//! assert_eq!(
//!     grid.tile_extent(0, 0, 1),
//!     Extent {
//!         minx: 5.0,
//!         miny: 46.5,
//!         maxx: 8.0,
//!         maxy: 48.0,
//!     }
//! );
//! ```

mod grid;
mod grid_iterator;
#[cfg(test)]
mod grid_test;

pub use grid::{parse_bbox, BoundsError, Extent, ExtentInt, Grid, MAX_ZOOM};
pub use grid_iterator::GridIterator;
